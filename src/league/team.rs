//! A team and its game history

use crate::config::{RatingOptions, Tunables};
use crate::league::ScoringContext;
use crate::types::{Division, GameId, TeamId, POWER_5_CONFERENCES, POWER_5_INDEPENDENTS};
use serde::{Deserialize, Serialize};

/// A team and the games it has played, in chronological order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: String,
    conference: String,
    division: Division,
    pub(crate) games: Vec<GameId>,
    pub(crate) previous_season_games: Vec<GameId>,
    pub(crate) wins: u32,
    pub(crate) losses: u32,
}

impl Team {
    pub(crate) fn new(id: TeamId, name: String, conference: String, division: Division) -> Self {
        Self {
            id,
            name,
            conference,
            division,
            games: Vec::new(),
            previous_season_games: Vec::new(),
            wins: 0,
            losses: 0,
        }
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conference(&self) -> &str {
        &self.conference
    }

    pub fn division(&self) -> Division {
        self.division
    }

    pub fn is_fbs(&self) -> bool {
        self.division.is_fbs()
    }

    pub fn is_d1(&self) -> bool {
        self.division.is_d1()
    }

    pub fn is_power5(&self) -> bool {
        POWER_5_CONFERENCES.contains(&self.conference.as_str())
            || POWER_5_INDEPENDENTS.contains(&self.name.as_str())
    }

    /// Current-season games in the order they were played
    pub fn games(&self) -> &[GameId] {
        &self.games
    }

    pub fn previous_season_games(&self) -> &[GameId] {
        &self.previous_season_games
    }

    /// Current-season wins
    pub fn wins(&self) -> u32 {
        self.wins
    }

    /// Current-season losses
    pub fn losses(&self) -> u32 {
        self.losses
    }

    /// Games that count toward a rating
    ///
    /// The previous season is prepended only when its blend weight is
    /// non-zero.
    pub fn all_games(&self, tunables: &Tunables) -> Vec<GameId> {
        if tunables.previous_season_weight != 0.0 {
            self.previous_season_games
                .iter()
                .chain(self.games.iter())
                .copied()
                .collect()
        } else {
            self.games.clone()
        }
    }

    /// Mean adjusted margin over `games`, skipping games against `exclude`
    ///
    /// Returns 0 when no game is counted.
    pub fn average_adjusted_margin(
        &self,
        ctx: &ScoringContext<'_>,
        games: &[GameId],
        exclude: Option<TeamId>,
    ) -> f64 {
        let mut total = 0.0;
        let mut counted = 0usize;

        for &game_id in games {
            let game = ctx.game(game_id);
            let Some(opponent) = game.opponent_of(self.id) else {
                continue;
            };
            if exclude == Some(opponent) {
                continue;
            }
            total += game.adjusted_margin(ctx, self.id);
            counted += 1;
        }

        if counted > 0 {
            total / counted as f64
        } else {
            0.0
        }
    }

    /// Rating of this team under `options`, see [`crate::rating::rate_team`]
    pub fn rating(&self, ctx: &ScoringContext<'_>, options: &RatingOptions) -> f64 {
        crate::rating::rate_team(ctx, self.id, options)
    }

    /// Current-season wins, leaving out games against `exclude`
    pub fn wins_excluding(&self, ctx: &ScoringContext<'_>, exclude: TeamId) -> u32 {
        self.count_excluding(ctx, exclude, |game| game.winner())
    }

    /// Current-season losses, leaving out games against `exclude`
    pub fn losses_excluding(&self, ctx: &ScoringContext<'_>, exclude: TeamId) -> u32 {
        self.count_excluding(ctx, exclude, |game| game.loser())
    }

    fn count_excluding(
        &self,
        ctx: &ScoringContext<'_>,
        exclude: TeamId,
        side: impl Fn(&crate::league::Game) -> Option<TeamId>,
    ) -> u32 {
        self.games
            .iter()
            .map(|&game_id| ctx.game(game_id))
            .filter(|game| game.opponent_of(self.id) != Some(exclude))
            .filter(|game| side(game) == Some(self.id))
            .count() as u32
    }

    pub(crate) fn history_mut(&mut self, previous_season: bool) -> &mut Vec<GameId> {
        if previous_season {
            &mut self.previous_season_games
        } else {
            &mut self.games
        }
    }

    pub(crate) fn history(&self, previous_season: bool) -> &[GameId] {
        if previous_season {
            &self.previous_season_games
        } else {
            &self.games
        }
    }
}
