//! Ordered rankings of a league
//!
//! A [`Ranking`] is the output of a rating pass: every Division I team,
//! best first. Rankings read back from disk carry names and ratings only.

pub mod compare;
pub mod file;

// Re-export commonly used types
pub use compare::{compare_rankings, RankChange, RankingComparison, TopTeamMovement};
pub use file::{read_ranking, read_ranking_file, write_ranking, write_ranking_file};

use crate::league::League;
use crate::rating::RatingCalculator;
use crate::types::{Division, TeamId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// One line of a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTeam {
    /// 1-based position in the full ranking
    pub rank: usize,
    pub name: String,
    /// Empty for rankings read from a file
    pub conference: String,
    pub division: Division,
    pub rating: f64,
    pub wins: u32,
    pub losses: u32,
}

/// Aggregate standing of one conference within a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceSummary {
    pub conference: String,
    pub teams: usize,
    /// Mean rank of every member
    pub average_rank: f64,
    pub top3_rank: f64,
    pub bottom3_rank: f64,
    pub middle3_rank: f64,
    /// Mean of the four averages above; lower is stronger
    pub total: f64,
}

/// Teams ordered best first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    entries: Vec<RankedTeam>,
}

impl Ranking {
    /// Build a ranking from entries already in order, renumbering ranks
    pub fn from_entries(entries: Vec<RankedTeam>) -> Self {
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| RankedTeam { rank: i + 1, ..entry })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[RankedTeam] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedTeam> {
        self.entries.iter()
    }

    /// The first `n` teams
    pub fn top(&self, n: usize) -> &[RankedTeam] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn get(&self, name: &str) -> Option<&RankedTeam> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// 1-based rank of `name`, if ranked
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.get(name).map(|entry| entry.rank)
    }

    /// Name to rank lookup for repeated queries
    pub fn rank_index(&self) -> HashMap<&str, usize> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.rank))
            .collect()
    }

    /// Entries matching `conference` and `division`, keeping overall ranks
    pub fn filter(&self, conference: Option<&str>, division: Option<Division>) -> Vec<&RankedTeam> {
        self.entries
            .iter()
            .filter(|entry| conference.map_or(true, |c| entry.conference == c))
            .filter(|entry| division.map_or(true, |d| entry.division == d))
            .collect()
    }

    /// Conferences ordered by their combined average rank, strongest first
    ///
    /// Conferences with fewer than three ranked members average over the
    /// members they have.
    pub fn conference_summary(&self) -> Vec<ConferenceSummary> {
        let mut members: Vec<(&str, Vec<usize>)> = Vec::new();
        for entry in &self.entries {
            match members.iter_mut().find(|(name, _)| *name == entry.conference) {
                Some((_, ranks)) => ranks.push(entry.rank),
                None => members.push((entry.conference.as_str(), vec![entry.rank])),
            }
        }

        let mut summaries: Vec<ConferenceSummary> = members
            .into_iter()
            .map(|(conference, ranks)| summarize_conference(conference, &ranks))
            .collect();

        summaries.sort_by(|a, b| {
            a.total
                .total_cmp(&b.total)
                .then_with(|| a.conference.cmp(&b.conference))
        });
        summaries
    }
}

fn mean(ranks: &[usize]) -> f64 {
    if ranks.is_empty() {
        return 0.0;
    }
    ranks.iter().sum::<usize>() as f64 / ranks.len() as f64
}

// `ranks` is ascending because entries are visited in rank order.
fn summarize_conference(conference: &str, ranks: &[usize]) -> ConferenceSummary {
    let n = ranks.len();
    let k = n.min(3);
    let middle_start = (n - k) / 2;

    let average_rank = mean(ranks);
    let top3_rank = mean(&ranks[..k]);
    let bottom3_rank = mean(&ranks[n - k..]);
    let middle3_rank = mean(&ranks[middle_start..middle_start + k]);

    ConferenceSummary {
        conference: conference.to_string(),
        teams: n,
        average_rank,
        top3_rank,
        bottom3_rank,
        middle3_rank,
        total: (average_rank + top3_rank + bottom3_rank + middle3_rank) / 4.0,
    }
}

/// Rate every Division I team of `league` and order them best first
///
/// Teams are rated in parallel. Equal ratings are ordered by name so the
/// result does not depend on scheduling. Placeholder opponents outside
/// Division I are never ranked.
pub fn rank_league(league: &League, calculator: &dyn RatingCalculator) -> Ranking {
    let start_time = std::time::Instant::now();

    let mut rated: Vec<(TeamId, f64)> = league
        .teams()
        .par_iter()
        .filter(|team| team.is_d1())
        .map(|team| (team.id(), calculator.rate_team(league, team.id())))
        .collect();

    rated.sort_by(|(a_id, a_rating), (b_id, b_rating)| {
        b_rating
            .total_cmp(a_rating)
            .then_with(|| league.team(*a_id).name().cmp(league.team(*b_id).name()))
    });

    let entries = rated
        .into_iter()
        .enumerate()
        .map(|(i, (id, rating))| {
            let team = league.team(id);
            debug!("Rated {} at {:.3}", team.name(), rating);
            RankedTeam {
                rank: i + 1,
                name: team.name().to_string(),
                conference: team.conference().to_string(),
                division: team.division(),
                rating,
                wins: team.wins(),
                losses: team.losses(),
            }
        })
        .collect::<Vec<_>>();

    info!(
        "Ranking pass complete - calculator: {}, teams: {}, time: {:.2}ms",
        calculator.name(),
        entries.len(),
        start_time.elapsed().as_secs_f64() * 1000.0
    );

    Ranking { entries }
}
