//! Common types shared by the league, rating and ranking modules

use serde::{Deserialize, Serialize};

/// Index of a team inside a [`crate::league::League`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub usize);

/// Index of a game inside a [`crate::league::League`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub usize);

/// Conferences treated as Power-5 for level scaling
pub const POWER_5_CONFERENCES: [&str; 5] = ["ACC", "Big 12", "Big Ten", "Pac-12", "SEC"];

/// Independent programs that are rated as Power-5 regardless of conference
pub const POWER_5_INDEPENDENTS: [&str; 1] = ["Notre Dame"];

/// Conference label used for FBS teams without a conference
pub const FBS_INDEPENDENTS: &str = "FBS Independents";

/// Competitive division a team plays in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Division {
    Fbs,
    Fcs,
    /// Anything below division 1 (D2, D3, NAIA, ...)
    #[default]
    NonD1,
}

impl Division {
    pub fn is_fbs(self) -> bool {
        matches!(self, Division::Fbs)
    }

    pub fn is_d1(self) -> bool {
        matches!(self, Division::Fbs | Division::Fcs)
    }
}

impl std::fmt::Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Division::Fbs => write!(f, "FBS"),
            Division::Fcs => write!(f, "FCS"),
            Division::NonD1 => write!(f, "Non-D1"),
        }
    }
}

impl std::str::FromStr for Division {
    type Err = crate::error::RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fbs" => Ok(Division::Fbs),
            "fcs" => Ok(Division::Fcs),
            "non_d1" | "non-d1" | "nond1" => Ok(Division::NonD1),
            other => Err(crate::error::RatingError::ConfigurationError {
                message: format!("Unknown division: {}", other),
            }),
        }
    }
}
