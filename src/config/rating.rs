//! Rating system configuration
//!
//! [`Tunables`] are the league-wide knobs read by every game and team
//! computation. [`RatingOptions`] select how a team's game history is
//! aggregated into a single rating. Both are plain values: a rating pass
//! takes a snapshot and never sees later changes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// JSON has no infinity, so an uncapped margin travels as a missing value.
mod uncapped_as_none {
    use super::*;

    pub fn serialize<S: Serializer>(cap: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if cap.is_finite() {
            serializer.serialize_some(cap)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// League-wide scoring adjustments and opponent policies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Points subtracted from the home score unless the site is neutral
    pub home_advantage: f64,
    /// Points added to the away score unless the site is neutral
    pub away_disadvantage: f64,
    /// Extra points for the real-life winner
    pub winner_bonus: f64,
    /// Absolute cap applied to every adjusted margin, unbounded when absent
    #[serde(with = "uncapped_as_none")]
    pub margin_cap: f64,
    /// Points added to a sub-FBS team playing an FBS team
    pub non_fbs_bonus: f64,
    /// Multiplier applied when a sub-FBS team beats an FBS team
    pub non_fbs_loss_multiplier: f64,
    /// Scaling for games between two sub-FBS teams
    pub fcs_game_factor: f64,
    /// Scaling for games between two non-Power-5 teams
    pub g5_game_factor: f64,
    /// Bonus magnitude for beating a team with a good record
    pub win_adjustment: f64,
    /// Penalty magnitude for losing to a team with a poor record
    pub loss_adjustment: f64,
    /// Non-zero enables blending the previous season's games into a rating
    pub previous_season_weight: f64,
    /// Drop every game against a sub-FBS opponent
    pub ignore_non_fbs: bool,
    /// Drop every game against a non-D1 opponent
    pub ignore_non_d1: bool,
    /// Drop wins (but keep losses) against sub-FBS opponents
    pub ignore_wins_vs_non_fbs: bool,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            home_advantage: 0.0,
            away_disadvantage: 0.0,
            winner_bonus: 0.0,
            margin_cap: f64::INFINITY,
            non_fbs_bonus: 0.0,
            non_fbs_loss_multiplier: 1.0,
            fcs_game_factor: 1.0,
            g5_game_factor: 1.0,
            win_adjustment: 0.0,
            loss_adjustment: 0.0,
            previous_season_weight: 0.0,
            ignore_non_fbs: false,
            ignore_non_d1: false,
            ignore_wins_vs_non_fbs: false,
        }
    }
}

impl Tunables {
    /// Settings used for the published weekly rankings
    pub fn recommended() -> Self {
        Self {
            away_disadvantage: 4.0,
            margin_cap: 28.0,
            fcs_game_factor: 0.15,
            g5_game_factor: 0.6,
            win_adjustment: 10.0,
            loss_adjustment: 10.0,
            ignore_non_d1: true,
            ..Self::default()
        }
    }

    /// Validate tunable values
    ///
    /// Only the configuration layer calls this; game and team computations
    /// trust whatever they are handed.
    pub fn validate(&self) -> crate::error::Result<()> {
        let config_error = |message: &str| -> anyhow::Error {
            crate::error::RatingError::ConfigurationError {
                message: message.to_string(),
            }
            .into()
        };

        if self.margin_cap.is_nan() || self.margin_cap <= 0.0 {
            return Err(config_error("Margin cap must be positive"));
        }
        if !self.fcs_game_factor.is_finite() || self.fcs_game_factor <= 0.0 {
            return Err(config_error("FCS game factor must be positive and finite"));
        }
        if !self.g5_game_factor.is_finite() || self.g5_game_factor <= 0.0 {
            return Err(config_error("G5 game factor must be positive and finite"));
        }
        if !self.non_fbs_loss_multiplier.is_finite() {
            return Err(config_error("Non-FBS loss multiplier must be finite"));
        }

        let additive = [
            self.home_advantage,
            self.away_disadvantage,
            self.winner_bonus,
            self.non_fbs_bonus,
            self.win_adjustment,
            self.loss_adjustment,
            self.previous_season_weight,
        ];
        if additive.iter().any(|v| !v.is_finite()) {
            return Err(config_error("Score adjustments must be finite"));
        }

        Ok(())
    }
}

/// How a team's per-game metrics are combined into a rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingOptions {
    /// Number of lowest weighted metrics to drop
    pub ignore_worst_n: usize,
    /// Number of highest weighted metrics to drop
    pub ignore_best_n: usize,
    /// Total weight spread between the first and the most recent game
    pub recency_bias: f64,
    /// Weight of the opponent's average adjusted margin in each game metric
    pub opponent_strength_weight: f64,
    /// Leave games against the rated team out of the opponent's average
    pub exclude_self_from_opponent: bool,
    /// Multiplier for games outside the rated team's conference
    pub non_conference_scalar: f64,
}

impl Default for RatingOptions {
    fn default() -> Self {
        Self {
            ignore_worst_n: 0,
            ignore_best_n: 0,
            recency_bias: 0.0,
            opponent_strength_weight: 1.0,
            exclude_self_from_opponent: false,
            non_conference_scalar: 1.0,
        }
    }
}

impl RatingOptions {
    /// Options used for the published weekly rankings
    pub fn recommended() -> Self {
        Self {
            opponent_strength_weight: 0.5,
            exclude_self_from_opponent: true,
            ..Self::default()
        }
    }

    /// Validate aggregation options
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.recency_bias.is_finite() || self.recency_bias < 0.0 {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "Recency bias must be non-negative".to_string(),
            }
            .into());
        }

        if !self.opponent_strength_weight.is_finite() || !self.non_conference_scalar.is_finite() {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "Rating weights must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
