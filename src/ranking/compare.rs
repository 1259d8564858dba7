//! Week-over-week ranking comparison

use crate::error::{RatingError, Result};
use crate::ranking::Ranking;
use serde::{Deserialize, Serialize};

/// Rank movement of a team present in both rankings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankChange {
    pub name: String,
    pub old_rank: usize,
    pub new_rank: usize,
}

impl RankChange {
    /// Positive when the team moved up
    pub fn movement(&self) -> i64 {
        self.old_rank as i64 - self.new_rank as i64
    }
}

/// A team in the new top N and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTeamMovement {
    pub name: String,
    pub new_rank: usize,
    /// `None` when the team was not in the old ranking at all
    pub old_rank: Option<usize>,
}

impl TopTeamMovement {
    /// `+3`, `-2`, `0` or `NEW`
    pub fn label(&self) -> String {
        match self.old_rank {
            None => "NEW".to_string(),
            Some(old) if old > self.new_rank => format!("+{}", old - self.new_rank),
            Some(old) if old < self.new_rank => format!("-{}", self.new_rank - old),
            Some(_) => "0".to_string(),
        }
    }
}

/// Summary of how a ranking changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingComparison {
    /// Largest drops first
    pub biggest_droppers: Vec<RankChange>,
    /// Largest climbs first
    pub biggest_improvers: Vec<RankChange>,
    /// New top N in order
    pub top: Vec<TopTeamMovement>,
    /// Old top N teams that fell out, with their new rank if still ranked
    pub dropped_from_top: Vec<(String, Option<usize>)>,
}

/// Compare `old` against `new`
///
/// Only teams ranked in both take part in the droppers and improvers lists;
/// at most `n_biggest` of each are reported and teams that did not move are
/// left out. Equal movements keep the old ranking's order.
pub fn compare_rankings(
    old: &Ranking,
    new: &Ranking,
    n_biggest: usize,
    top_n: usize,
) -> Result<RankingComparison> {
    let new_ranks = new.rank_index();
    let old_ranks = old.rank_index();

    let changes: Vec<RankChange> = old
        .iter()
        .filter_map(|entry| {
            new_ranks.get(entry.name.as_str()).map(|&new_rank| RankChange {
                name: entry.name.clone(),
                old_rank: entry.rank,
                new_rank,
            })
        })
        .collect();

    if changes.is_empty() {
        return Err(RatingError::RankingMismatch {
            reason: "the rankings have no teams in common".to_string(),
        }
        .into());
    }

    let mut droppers: Vec<RankChange> = changes
        .iter()
        .filter(|c| c.movement() < 0)
        .cloned()
        .collect();
    droppers.sort_by_key(|c| c.movement());
    droppers.truncate(n_biggest);

    let mut improvers: Vec<RankChange> = changes
        .iter()
        .filter(|c| c.movement() > 0)
        .cloned()
        .collect();
    improvers.sort_by_key(|c| std::cmp::Reverse(c.movement()));
    improvers.truncate(n_biggest);

    let top = new
        .top(top_n)
        .iter()
        .map(|entry| TopTeamMovement {
            name: entry.name.clone(),
            new_rank: entry.rank,
            old_rank: old_ranks.get(entry.name.as_str()).copied(),
        })
        .collect();

    let dropped_from_top = old
        .top(top_n)
        .iter()
        .filter_map(|entry| match new_ranks.get(entry.name.as_str()) {
            Some(&rank) if rank <= top_n => None,
            Some(&rank) => Some((entry.name.clone(), Some(rank))),
            None => Some((entry.name.clone(), None)),
        })
        .collect();

    Ok(RankingComparison {
        biggest_droppers: droppers,
        biggest_improvers: improvers,
        top,
        dropped_from_top,
    })
}
