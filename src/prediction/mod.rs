//! Ranking-based game predictions and how they held up
//!
//! The better-ranked team is always the pick. Analysis replays a slate of
//! finished games against those picks and against the sportsbook.

use crate::league::{Game, League};
use crate::ranking::Ranking;
use crate::types::TeamId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Stake placed on every simulated moneyline bet
pub const BET_STAKE: f64 = 100.0;

/// The ranking's pick for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub game_id: String,
    pub home: String,
    pub away: String,
    pub home_rank: usize,
    pub away_rank: usize,
    pub predicted_winner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upset {
    pub winner: String,
    pub winner_rank: usize,
    pub loser: String,
    pub loser_rank: usize,
}

impl Upset {
    pub fn rank_difference(&self) -> usize {
        self.winner_rank.abs_diff(self.loser_rank)
    }
}

/// A game where the ranking and the sportsbook picked different teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportsbookDisagreement {
    pub winner: String,
    pub loser: String,
    pub sportsbook_pick: String,
    pub spread: f64,
    pub ranking_pick: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionAnalysis {
    pub games_predicted: usize,
    pub correct: usize,
    /// Wrong picks, biggest rank difference first
    pub upsets: Vec<Upset>,
    pub games_with_moneyline: usize,
    /// Stake returned plus winnings over every simulated bet
    pub revenue: f64,
    pub disagreements: Vec<SportsbookDisagreement>,
    /// Disagreements where the ranking's pick won
    pub disagreements_correct: usize,
}

impl PredictionAnalysis {
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.games_predicted)
    }

    pub fn amount_wagered(&self) -> f64 {
        BET_STAKE * self.games_with_moneyline as f64
    }

    pub fn profit(&self) -> f64 {
        self.revenue - self.amount_wagered()
    }

    pub fn disagreement_accuracy(&self) -> f64 {
        ratio(self.disagreements_correct, self.disagreements.len())
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Stake plus winnings of a winning bet at `moneyline`
pub fn moneyline_payout(moneyline: i32) -> f64 {
    if moneyline < 0 {
        BET_STAKE + BET_STAKE * (BET_STAKE / f64::from(moneyline.unsigned_abs()))
    } else {
        BET_STAKE + f64::from(moneyline)
    }
}

/// Ranks of both teams, or `None` if either is unranked
fn ranks(game: &Game, league: &League, index: &HashMap<&str, usize>) -> Option<(usize, usize)> {
    let home = league.team(game.home()).name();
    let away = league.team(game.away()).name();
    match (index.get(home), index.get(away)) {
        (Some(&home_rank), Some(&away_rank)) => Some((home_rank, away_rank)),
        _ => {
            warn!("Skipping game {}: {} or {} is unranked", game.external_id(), away, home);
            None
        }
    }
}

fn pick(game: &Game, home_rank: usize, away_rank: usize) -> TeamId {
    if home_rank < away_rank {
        game.home()
    } else {
        game.away()
    }
}

/// Pick a winner for every game in `slate` whose teams are both ranked
pub fn predict_games(ranking: &Ranking, slate: &League) -> Vec<Prediction> {
    let index = ranking.rank_index();

    slate
        .games()
        .iter()
        .filter_map(|game| {
            let (home_rank, away_rank) = ranks(game, slate, &index)?;
            Some(Prediction {
                game_id: game.external_id().to_string(),
                home: slate.team(game.home()).name().to_string(),
                away: slate.team(game.away()).name().to_string(),
                home_rank,
                away_rank,
                predicted_winner: slate.team(pick(game, home_rank, away_rank)).name().to_string(),
            })
        })
        .collect()
}

/// Score the ranking's picks over the finished games of `slate`
///
/// Tied or unplayed games and games with an unranked team are skipped. A
/// simulated bet of [`BET_STAKE`] is placed on the pick whenever the pick's
/// own moneyline is known: a correct pick is gated on the winner's line and
/// earns its payout, a wrong pick is gated on the loser's line and forfeits
/// the stake. The winner's line never decides whether a losing bet counts.
pub fn analyze_predictions(ranking: &Ranking, slate: &League) -> PredictionAnalysis {
    let index = ranking.rank_index();
    let mut analysis = PredictionAnalysis::default();

    for game in slate.games() {
        let (Some(winner), Some(loser)) = (game.winner(), game.loser()) else {
            continue;
        };
        let Some((home_rank, away_rank)) = ranks(game, slate, &index) else {
            continue;
        };

        let ranking_pick = pick(game, home_rank, away_rank);
        let rank_of = |team: TeamId| if team == game.home() { home_rank } else { away_rank };
        analysis.games_predicted += 1;

        if ranking_pick == winner {
            analysis.correct += 1;
            if game.winner_moneyline() != 0 {
                analysis.games_with_moneyline += 1;
                analysis.revenue += moneyline_payout(game.winner_moneyline());
            }
        } else {
            analysis.upsets.push(Upset {
                winner: slate.team(winner).name().to_string(),
                winner_rank: rank_of(winner),
                loser: slate.team(loser).name().to_string(),
                loser_rank: rank_of(loser),
            });
            if game.loser_moneyline() != 0 {
                analysis.games_with_moneyline += 1;
            }
        }

        if let Some(favorite) = game.sportsbook_favorite() {
            if favorite != ranking_pick {
                analysis.disagreements.push(SportsbookDisagreement {
                    winner: slate.team(winner).name().to_string(),
                    loser: slate.team(loser).name().to_string(),
                    sportsbook_pick: slate.team(favorite).name().to_string(),
                    spread: game.spread(),
                    ranking_pick: slate.team(ranking_pick).name().to_string(),
                });
                if ranking_pick == winner {
                    analysis.disagreements_correct += 1;
                }
            }
        }
    }

    analysis
        .upsets
        .sort_by_key(|upset| std::cmp::Reverse(upset.rank_difference()));

    info!(
        "Prediction analysis - games: {}, correct: {}, profit: {:.2}",
        analysis.games_predicted,
        analysis.correct,
        analysis.profit()
    );

    analysis
}
