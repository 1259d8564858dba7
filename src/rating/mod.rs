//! Rating engine
//!
//! This module turns built team histories into one comparable scalar per
//! team: per-game metrics, recency weighting, trimming, and the calculator
//! seam used by the ranking pass.

pub mod calculator;
pub mod engine;

// Re-export commonly used types
pub use calculator::{MarginRatingCalculator, MarginRatingConfig, RatingCalculator};
pub use engine::{game_metric, game_metrics, rate_team, recency_weights, trimmed_sum};
