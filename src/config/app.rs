//! Main application configuration
//!
//! This module defines the top-level configuration for the rating tool,
//! including TOML file loading, environment variable overrides and
//! validation.

use crate::config::rating::{RatingOptions, Tunables};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub tunables: Tunables,
    pub rating: RatingOptions,
}

/// Process-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Threads for the ranking pass, 0 lets rayon decide
    pub worker_threads: usize,
    /// Number of teams listed in top-N reports
    pub top_n: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "cfb-ratings".to_string(),
            log_level: "info".to_string(),
            worker_threads: 0,
            top_n: 25,
        }
    }
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", key, value)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Configuration used for the published weekly rankings
    pub fn recommended() -> Self {
        Self {
            service: ServiceSettings::default(),
            tunables: Tunables::recommended(),
            rating: RatingOptions::recommended(),
        }
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_over(Self::default(), path)
    }

    /// Load a TOML file on top of `base`, then apply environment overrides
    ///
    /// Keys missing from the file keep their value from `base`.
    pub fn from_file_over(base: AppConfig, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let overlay: toml::Table = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        let mut merged = match toml::Value::try_from(&base)
            .context("Failed to layer configuration")?
        {
            toml::Value::Table(table) => table,
            _ => toml::Table::new(),
        };
        merge_tables(&mut merged, overlay);
        let mut config: AppConfig = toml::Value::Table(merged)
            .try_into()
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_env_over(Self::default())
    }

    /// Apply environment overrides on top of `base`
    pub fn from_env_over(base: AppConfig) -> Result<Self> {
        let mut config = base;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Some(threads) = parse_env("CFB_WORKER_THREADS")? {
            self.service.worker_threads = threads;
        }
        if let Some(top_n) = parse_env("CFB_TOP_N")? {
            self.service.top_n = top_n;
        }

        // Tunables
        let tunables = &mut self.tunables;
        if let Some(v) = parse_env("CFB_HOME_ADVANTAGE")? {
            tunables.home_advantage = v;
        }
        if let Some(v) = parse_env("CFB_AWAY_DISADVANTAGE")? {
            tunables.away_disadvantage = v;
        }
        if let Some(v) = parse_env("CFB_WINNER_BONUS")? {
            tunables.winner_bonus = v;
        }
        if let Some(v) = parse_env("CFB_MARGIN_CAP")? {
            tunables.margin_cap = v;
        }
        if let Some(v) = parse_env("CFB_NON_FBS_BONUS")? {
            tunables.non_fbs_bonus = v;
        }
        if let Some(v) = parse_env("CFB_NON_FBS_LOSS_MULTIPLIER")? {
            tunables.non_fbs_loss_multiplier = v;
        }
        if let Some(v) = parse_env("CFB_FCS_GAME_FACTOR")? {
            tunables.fcs_game_factor = v;
        }
        if let Some(v) = parse_env("CFB_G5_GAME_FACTOR")? {
            tunables.g5_game_factor = v;
        }
        if let Some(v) = parse_env("CFB_WIN_ADJUSTMENT")? {
            tunables.win_adjustment = v;
        }
        if let Some(v) = parse_env("CFB_LOSS_ADJUSTMENT")? {
            tunables.loss_adjustment = v;
        }
        if let Some(v) = parse_env("CFB_PREVIOUS_SEASON_WEIGHT")? {
            tunables.previous_season_weight = v;
        }
        if let Some(v) = parse_env("CFB_IGNORE_NON_FBS")? {
            tunables.ignore_non_fbs = v;
        }
        if let Some(v) = parse_env("CFB_IGNORE_NON_D1")? {
            tunables.ignore_non_d1 = v;
        }
        if let Some(v) = parse_env("CFB_IGNORE_WINS_VS_NON_FBS")? {
            tunables.ignore_wins_vs_non_fbs = v;
        }

        // Rating options
        let rating = &mut self.rating;
        if let Some(v) = parse_env("CFB_IGNORE_WORST_N")? {
            rating.ignore_worst_n = v;
        }
        if let Some(v) = parse_env("CFB_IGNORE_BEST_N")? {
            rating.ignore_best_n = v;
        }
        if let Some(v) = parse_env("CFB_RECENCY_BIAS")? {
            rating.recency_bias = v;
        }
        if let Some(v) = parse_env("CFB_OPPONENT_STRENGTH_WEIGHT")? {
            rating.opponent_strength_weight = v;
        }
        if let Some(v) = parse_env("CFB_EXCLUDE_SELF_FROM_OPPONENT")? {
            rating.exclude_self_from_opponent = v;
        }
        if let Some(v) = parse_env("CFB_NON_CONFERENCE_SCALAR")? {
            rating.non_conference_scalar = v;
        }

        Ok(())
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.top_n == 0 {
        return Err(anyhow!("Top-N report size must be greater than 0"));
    }

    config.tunables.validate()?;
    config.rating.validate()?;

    Ok(())
}
