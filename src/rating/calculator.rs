//! Rating calculator trait and the margin-of-victory implementation
//!
//! A calculator owns its tunables and options, so two ranking passes with
//! different settings can run side by side over the same league.

use crate::config::{RatingOptions, Tunables};
use crate::league::League;
use crate::rating::engine;
use crate::types::TeamId;
use serde::{Deserialize, Serialize};

/// Trait for turning a team's game history into a sortable rating
pub trait RatingCalculator: Send + Sync {
    /// Rating of `team`; higher is better, only the order is meaningful
    fn rate_team(&self, league: &League, team: TeamId) -> f64;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()>;
}

/// Configuration snapshot of a [`MarginRatingCalculator`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginRatingConfig {
    pub tunables: Tunables,
    pub options: RatingOptions,
}

impl MarginRatingConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        self.tunables.validate()?;
        self.options.validate()
    }
}

/// Adjusted-margin rating with opponent strength, recency and trimming
#[derive(Debug, Clone)]
pub struct MarginRatingCalculator {
    config: MarginRatingConfig,
}

impl MarginRatingCalculator {
    /// Create a new calculator from validated settings
    pub fn new(tunables: Tunables, options: RatingOptions) -> crate::error::Result<Self> {
        let config = MarginRatingConfig { tunables, options };
        config.validate()?;
        Ok(Self { config })
    }

    /// Calculator using the league's own tunables
    pub fn for_league(league: &League, options: RatingOptions) -> crate::error::Result<Self> {
        Self::new(league.tunables().clone(), options)
    }

    pub fn tunables(&self) -> &Tunables {
        &self.config.tunables
    }

    pub fn options(&self) -> &RatingOptions {
        &self.config.options
    }

    /// Unweighted per-game metrics of `team`, in chronological order
    pub fn game_metrics(&self, league: &League, team: TeamId) -> Vec<f64> {
        let ctx = league.scoring(&self.config.tunables);
        engine::game_metrics(&ctx, team, &self.config.options)
    }
}

impl RatingCalculator for MarginRatingCalculator {
    fn rate_team(&self, league: &League, team: TeamId) -> f64 {
        let ctx = league.scoring(&self.config.tunables);
        engine::rate_team(&ctx, team, &self.config.options)
    }

    fn name(&self) -> &'static str {
        "adjusted_margin"
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()> {
        let new_config: MarginRatingConfig = serde_json::from_value(config).map_err(|e| {
            crate::error::RatingError::ConfigurationError {
                message: format!("Invalid margin rating configuration: {}", e),
            }
        })?;

        new_config.validate()?;
        self.config = new_config;
        Ok(())
    }
}
