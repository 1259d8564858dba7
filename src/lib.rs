//! CFB Ratings - adjusted-margin power ratings for college football
//!
//! This crate builds a league of teams and games from season data, scores
//! every game with venue, bonus and level adjustments, and turns each team's
//! history into a single rating used for rankings and predictions.

pub mod config;
pub mod error;
pub mod ingest;
pub mod league;
pub mod prediction;
pub mod ranking;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use config::{AppConfig, RatingOptions, Tunables};
pub use league::{Game, League, Outcome, ScoringContext, Team};
pub use ranking::{rank_league, RankedTeam, Ranking};
pub use rating::{MarginRatingCalculator, RatingCalculator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
