//! Error types for the rating engine
//!
//! The engine itself never fails on sparse data; these errors cover the
//! layers around it: configuration, season ingest and ranking files.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Unknown team: {name}")]
    UnknownTeam { name: String },

    #[error("Invalid season data: {reason}")]
    InvalidSeasonData { reason: String },

    #[error("Malformed ranking line {line_number}: {line:?}")]
    MalformedRankingLine { line_number: usize, line: String },

    #[error("Rankings cannot be compared: {reason}")]
    RankingMismatch { reason: String },
}
