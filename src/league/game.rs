//! A single game and its adjusted-score computation
//!
//! A [`Game`] refers to its participants by [`TeamId`]; everything that
//! depends on team classification or on the tunables goes through a
//! [`ScoringContext`].

use crate::league::ScoringContext;
use crate::types::TeamId;
use crate::utils::{clip_to_range, scale_for_level};
use serde::{Deserialize, Serialize};

/// Result of a game from one participant's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

/// A game between two teams
///
/// Two games are equal when they share an external identifier, no matter
/// which side reported them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    external_id: String,
    home: TeamId,
    away: TeamId,
    home_score: u32,
    away_score: u32,
    neutral_site: bool,
    sportsbook_favorite: Option<TeamId>,
    spread: f64,
    home_moneyline: i32,
    away_moneyline: i32,
}

impl PartialEq for Game {
    fn eq(&self, other: &Self) -> bool {
        self.external_id == other.external_id
    }
}

impl Eq for Game {}

impl Game {
    /// Create a game; zero scores stand in for a game not yet played
    pub fn new(
        home: TeamId,
        away: TeamId,
        home_score: u32,
        away_score: u32,
        external_id: impl Into<String>,
        neutral_site: bool,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            home,
            away,
            home_score,
            away_score,
            neutral_site,
            sportsbook_favorite: None,
            spread: 0.0,
            home_moneyline: 0,
            away_moneyline: 0,
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn home(&self) -> TeamId {
        self.home
    }

    pub fn away(&self) -> TeamId {
        self.away
    }

    pub fn home_score(&self) -> u32 {
        self.home_score
    }

    pub fn away_score(&self) -> u32 {
        self.away_score
    }

    pub fn is_neutral_site(&self) -> bool {
        self.neutral_site
    }

    pub fn set_neutral_site(&mut self, neutral_site: bool) {
        self.neutral_site = neutral_site;
    }

    pub fn involves(&self, team: TeamId) -> bool {
        team == self.home || team == self.away
    }

    /// The other participant, or `None` if `team` did not play in this game
    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        if team == self.home {
            Some(self.away)
        } else if team == self.away {
            Some(self.home)
        } else {
            None
        }
    }

    pub fn is_tie(&self) -> bool {
        self.home_score == self.away_score
    }

    /// Real-life winner by raw score, `None` on a tie
    pub fn winner(&self) -> Option<TeamId> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(self.home),
            std::cmp::Ordering::Less => Some(self.away),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Real-life loser by raw score, `None` on a tie
    pub fn loser(&self) -> Option<TeamId> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(self.away),
            std::cmp::Ordering::Less => Some(self.home),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Outcome for `team`, `None` if it did not play in this game
    pub fn outcome_for(&self, team: TeamId) -> Option<Outcome> {
        if !self.involves(team) {
            return None;
        }
        Some(match self.winner() {
            Some(winner) if winner == team => Outcome::Win,
            Some(_) => Outcome::Loss,
            None => Outcome::Tie,
        })
    }

    /// Home score after venue, winner and division adjustments
    pub fn adjusted_home_score(&self, ctx: &ScoringContext<'_>) -> f64 {
        let tunables = ctx.tunables;
        let mut score = self.home_score as f64;

        if !self.neutral_site {
            score -= tunables.home_advantage;
        }
        if self.winner() == Some(self.home) {
            score += tunables.winner_bonus;
        }
        if !ctx.team(self.home).is_fbs() && ctx.team(self.away).is_fbs() {
            score += tunables.non_fbs_bonus;
        }

        score
    }

    /// Away score after venue, winner and division adjustments
    pub fn adjusted_away_score(&self, ctx: &ScoringContext<'_>) -> f64 {
        let tunables = ctx.tunables;
        let mut score = self.away_score as f64;

        if !self.neutral_site {
            score += tunables.away_disadvantage;
        }
        if self.winner() == Some(self.away) {
            score += tunables.winner_bonus;
        }
        if !ctx.team(self.away).is_fbs() && ctx.team(self.home).is_fbs() {
            score += tunables.non_fbs_bonus;
        }

        score
    }

    /// Team with the lower adjusted score; the home team when they are equal
    pub fn adjusted_loser(&self, ctx: &ScoringContext<'_>) -> TeamId {
        if self.adjusted_home_score(ctx) > self.adjusted_away_score(ctx) {
            self.away
        } else {
            self.home
        }
    }

    /// Team with the higher adjusted score; the home team when they are equal
    pub fn adjusted_winner(&self, ctx: &ScoringContext<'_>) -> TeamId {
        if self.adjusted_home_score(ctx) < self.adjusted_away_score(ctx) {
            self.away
        } else {
            self.home
        }
    }

    /// Adjusted margin of victory for `team`, negative for the adjusted loser
    ///
    /// The upset multiplier is applied first, then level scaling, then the
    /// result is clamped to the margin cap. Level scaling divides negative
    /// margins by the factor, so the two participants' values mirror each
    /// other exactly only while both level factors are 1.
    ///
    /// A tied game has no raw winner, so the upset multiplier can never
    /// apply to it; callers rating tied games must guard with
    /// [`Game::is_tie`] themselves.
    pub fn adjusted_margin(&self, ctx: &ScoringContext<'_>, team: TeamId) -> f64 {
        let home_score = self.adjusted_home_score(ctx);
        let away_score = self.adjusted_away_score(ctx);

        let mut margin = (home_score - away_score).abs();
        let adjusted_loser = if home_score > away_score {
            self.away
        } else {
            self.home
        };
        if team == adjusted_loser {
            margin = -margin;
        }

        if let (Some(winner), Some(loser)) = (self.winner(), self.loser()) {
            if !ctx.team(winner).is_fbs() && ctx.team(loser).is_fbs() {
                margin *= ctx.tunables.non_fbs_loss_multiplier;
            }
        }

        let margin = self.scale_for_level(ctx, margin);
        let cap = ctx.tunables.margin_cap;
        clip_to_range(margin, -cap, cap)
    }

    /// Record-based bonus or penalty for `team`, independent of the margin
    ///
    /// Beating an opponent with a good record earns up to the win
    /// adjustment; losing to an opponent with a poor record costs up to the
    /// loss adjustment. The opponent's record leaves out its games against
    /// `team`. Returns 0 when `team` did not play in this game.
    pub fn result_adjustment(&self, ctx: &ScoringContext<'_>, team: TeamId) -> f64 {
        let Some(opponent_id) = self.opponent_of(team) else {
            return 0.0;
        };
        let opponent = ctx.team(opponent_id);

        let wins = opponent.wins_excluding(ctx, team);
        let losses = opponent.losses_excluding(ctx, team);
        let opponent_win_rate = if wins + losses > 0 {
            wins as f64 / (wins + losses) as f64
        } else {
            0.5
        };

        let adjustment = if self.loser() == Some(team) {
            -ctx.tunables.loss_adjustment * (1.0 - opponent_win_rate)
        } else {
            ctx.tunables.win_adjustment * opponent_win_rate
        };

        self.scale_for_level(ctx, adjustment)
    }

    fn scale_for_level(&self, ctx: &ScoringContext<'_>, value: f64) -> f64 {
        let home = ctx.team(self.home);
        let away = ctx.team(self.away);

        if !home.is_fbs() && !away.is_fbs() {
            scale_for_level(value, ctx.tunables.fcs_game_factor)
        } else if !home.is_power5() && !away.is_power5() {
            scale_for_level(value, ctx.tunables.g5_game_factor)
        } else {
            value
        }
    }

    /// Set the sportsbook favorite and spread
    ///
    /// A favorite that is not one of the participants is recorded as no
    /// favorite.
    pub fn set_odds(&mut self, favorite: Option<TeamId>, spread: f64) {
        self.sportsbook_favorite = favorite.filter(|team| self.involves(*team));
        self.spread = spread;
    }

    /// Set the moneylines, 0 meaning unknown
    pub fn set_moneylines(&mut self, home_moneyline: i32, away_moneyline: i32) {
        self.home_moneyline = home_moneyline;
        self.away_moneyline = away_moneyline;
    }

    pub fn sportsbook_favorite(&self) -> Option<TeamId> {
        self.sportsbook_favorite
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    pub fn home_moneyline(&self) -> i32 {
        self.home_moneyline
    }

    pub fn away_moneyline(&self) -> i32 {
        self.away_moneyline
    }

    /// Moneyline of the real-life winner; 0 when unknown or tied
    pub fn winner_moneyline(&self) -> i32 {
        match self.winner() {
            Some(winner) if winner == self.home => self.home_moneyline,
            Some(_) => self.away_moneyline,
            None => 0,
        }
    }

    /// Moneyline of the real-life loser; 0 when unknown or tied
    pub fn loser_moneyline(&self) -> i32 {
        match self.loser() {
            Some(loser) if loser == self.home => self.home_moneyline,
            Some(_) => self.away_moneyline,
            None => 0,
        }
    }
}
