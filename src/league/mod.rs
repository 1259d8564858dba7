//! League arena: teams, games and the history-building phase
//!
//! Teams and games reference each other through [`TeamId`] and [`GameId`]
//! indices into a single [`League`]. The league is built once (every
//! [`League::add_game`] call) and then only read while ratings are computed.

pub mod game;
pub mod team;

pub use game::{Game, Outcome};
pub use team::Team;

use crate::config::Tunables;
use crate::error::RatingError;
use crate::types::{Division, GameId, TeamId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Registry of every team and game in a ranking run
#[derive(Debug, Clone, Default)]
pub struct League {
    teams: Vec<Team>,
    games: Vec<Game>,
    team_index: HashMap<String, TeamId>,
    game_index: HashMap<String, GameId>,
    tunables: Tunables,
}

/// Read-only view handed to game and team computations
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub league: &'a League,
    pub tunables: &'a Tunables,
}

impl<'a> ScoringContext<'a> {
    pub fn new(league: &'a League, tunables: &'a Tunables) -> Self {
        Self { league, tunables }
    }

    pub fn team(&self, id: TeamId) -> &'a Team {
        self.league.team(id)
    }

    pub fn game(&self, id: GameId) -> &'a Game {
        self.league.game(id)
    }
}

impl League {
    /// Create an empty league whose opponent policies come from `tunables`
    pub fn new(tunables: Tunables) -> Self {
        Self {
            tunables,
            ..Self::default()
        }
    }

    /// Tunables the league was built with
    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    /// Scoring view over this league with an explicit tunables snapshot
    pub fn scoring<'a>(&'a self, tunables: &'a Tunables) -> ScoringContext<'a> {
        ScoringContext::new(self, tunables)
    }

    /// Register a team, returning the existing id if the name is known
    pub fn add_team(
        &mut self,
        name: impl Into<String>,
        conference: impl Into<String>,
        division: Division,
    ) -> TeamId {
        let name = name.into();
        if let Some(&id) = self.team_index.get(&name) {
            return id;
        }

        let id = TeamId(self.teams.len());
        self.team_index.insert(name.clone(), id);
        self.teams.push(Team::new(id, name, conference.into(), division));
        id
    }

    pub fn team_id(&self, name: &str) -> Option<TeamId> {
        self.team_index.get(name).copied()
    }

    /// Look up a team id by name, failing for unknown names
    pub fn require_team(&self, name: &str) -> crate::error::Result<TeamId> {
        self.team_id(name).ok_or_else(|| {
            RatingError::UnknownTeam {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Team by id
    ///
    /// Ids are only minted by this league, so an unknown id is a caller bug
    /// and panics.
    pub fn team(&self, id: TeamId) -> &Team {
        &self.teams[id.0]
    }

    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.team_id(name).map(|id| self.team(id))
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Game by id; panics on ids from another league
    pub fn game(&self, id: GameId) -> &Game {
        &self.games[id.0]
    }

    pub fn game_mut(&mut self, id: GameId) -> &mut Game {
        &mut self.games[id.0]
    }

    pub fn game_id(&self, external_id: &str) -> Option<GameId> {
        self.game_index.get(external_id).copied()
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Attach sportsbook odds, resolving the favorite by team name
    pub fn set_odds(&mut self, game: GameId, favorite_name: &str, spread: f64) {
        let favorite = self.team_id(favorite_name);
        self.games[game.0].set_odds(favorite, spread);
    }

    pub fn set_moneylines(&mut self, game: GameId, home_moneyline: i32, away_moneyline: i32) {
        self.games[game.0].set_moneylines(home_moneyline, away_moneyline);
    }

    /// Add `game` to `team`'s history
    ///
    /// Games are matched by external id. A game already in the history is
    /// not added again; if the incoming copy disagrees about the home team
    /// the stored game becomes a neutral-site game. A new game is rejected
    /// when `team` did not play in it or when an opponent policy excludes
    /// the opponent. When `correct_position` is inside the history, the game
    /// is swapped into that slot so the history stays chronological even if
    /// the opponent linked it first.
    ///
    /// Returns whether the game is (now) part of the history. Only
    /// current-season games change the win/loss record; ties count as
    /// neither.
    pub fn add_game(
        &mut self,
        team: TeamId,
        game: Game,
        correct_position: Option<usize>,
        use_previous_season: bool,
    ) -> bool {
        if team.0 >= self.teams.len() {
            warn!("Ignoring game {} for unknown team id {:?}", game.external_id(), team);
            return false;
        }

        let existing = self.game_id(game.external_id());
        if let Some(game_id) = existing {
            if self.teams[team.0].history(use_previous_season).contains(&game_id) {
                self.reconcile_venue(game_id, &game);
                self.move_to_position(team, game_id, correct_position, use_previous_season);
                return true;
            }
        }

        let Some(opponent_id) = game.opponent_of(team) else {
            debug!(
                "Rejecting game {}: {} did not play in it",
                game.external_id(),
                self.teams[team.0].name()
            );
            return false;
        };
        if game.home().0 >= self.teams.len() || game.away().0 >= self.teams.len() {
            warn!("Ignoring game {} with unknown participant", game.external_id());
            return false;
        }

        let opponent = &self.teams[opponent_id.0];
        if self.tunables.ignore_non_fbs && !opponent.is_fbs() {
            debug!("Rejecting game {}: non-FBS opponent {}", game.external_id(), opponent.name());
            return false;
        }
        if self.tunables.ignore_non_d1 && !opponent.is_d1() {
            debug!("Rejecting game {}: non-D1 opponent {}", game.external_id(), opponent.name());
            return false;
        }

        let outcome = game.outcome_for(team);
        if outcome != Some(Outcome::Loss)
            && self.tunables.ignore_wins_vs_non_fbs
            && !opponent.is_fbs()
        {
            debug!(
                "Rejecting game {}: win over non-FBS opponent {}",
                game.external_id(),
                opponent.name()
            );
            return false;
        }

        let game_id = match existing {
            Some(game_id) => {
                self.reconcile_venue(game_id, &game);
                game_id
            }
            None => {
                let game_id = GameId(self.games.len());
                self.game_index.insert(game.external_id().to_string(), game_id);
                self.games.push(game);
                game_id
            }
        };

        let team_entry = &mut self.teams[team.0];
        if !use_previous_season {
            match outcome {
                Some(Outcome::Win) => team_entry.wins += 1,
                Some(Outcome::Loss) => team_entry.losses += 1,
                _ => {}
            }
        }
        team_entry.history_mut(use_previous_season).push(game_id);

        self.move_to_position(team, game_id, correct_position, use_previous_season);
        true
    }

    /// Mark the stored game neutral when two reports disagree on the home team
    fn reconcile_venue(&mut self, game_id: GameId, reported: &Game) {
        let stored = &mut self.games[game_id.0];
        if stored.home() != reported.home() && !stored.is_neutral_site() {
            debug!(
                "Game {} reported with swapped home/away, marking neutral site",
                stored.external_id()
            );
            stored.set_neutral_site(true);
        }
    }

    fn move_to_position(
        &mut self,
        team: TeamId,
        game_id: GameId,
        correct_position: Option<usize>,
        use_previous_season: bool,
    ) {
        let Some(position) = correct_position else {
            return;
        };
        let history = self.teams[team.0].history_mut(use_previous_season);
        if position >= history.len() {
            return;
        }
        if let Some(current) = history.iter().position(|&id| id == game_id) {
            history.swap(current, position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_teams(tunables: Tunables) -> (League, TeamId, TeamId) {
        let mut league = League::new(tunables);
        let a = league.add_team("Texas", "SEC", Division::Fbs);
        let b = league.add_team("Oklahoma", "SEC", Division::Fbs);
        (league, a, b)
    }

    #[test]
    fn test_add_team_is_keyed_by_name() {
        let mut league = League::default();
        let first = league.add_team("Texas", "SEC", Division::Fbs);
        let second = league.add_team("Texas", "Big 12", Division::Fcs);
        assert_eq!(first, second);
        assert_eq!(league.teams().len(), 1);
        assert_eq!(league.team(first).conference(), "SEC");
        assert!(league.require_team("Baylor").is_err());
    }

    #[test]
    fn test_add_game_is_idempotent() {
        let (mut league, a, b) = two_teams(Tunables::default());
        let game = Game::new(a, b, 34, 3, "401", false);

        assert!(league.add_game(a, game.clone(), None, false));
        assert!(league.add_game(a, game.clone(), None, false));
        assert!(league.add_game(b, game, None, false));

        assert_eq!(league.games().len(), 1);
        assert_eq!(league.team(a).games().len(), 1);
        assert_eq!(league.team(a).wins(), 1);
        assert_eq!(league.team(b).losses(), 1);
        assert!(!league.game(league.team(a).games()[0]).is_neutral_site());
    }

    #[test]
    fn test_swapped_home_away_marks_neutral() {
        let (mut league, a, b) = two_teams(Tunables::default());
        let from_a = Game::new(a, b, 28, 21, "401", false);
        let from_b = Game::new(b, a, 21, 28, "401", false);

        assert!(league.add_game(a, from_a.clone(), Some(0), false));
        assert!(league.add_game(b, from_a, None, false));
        assert!(league.add_game(b, from_b.clone(), Some(0), false));
        assert!(league.add_game(a, from_b, None, false));

        let game_id = league.game_id("401").unwrap();
        assert!(league.game(game_id).is_neutral_site());
        assert_eq!(league.team(a).games().len(), 1);
        assert_eq!(league.team(b).games().len(), 1);
    }

    #[test]
    fn test_rejects_non_participant() {
        let (mut league, a, b) = two_teams(Tunables::default());
        let c = league.add_team("Baylor", "Big 12", Division::Fbs);
        let game = Game::new(a, b, 10, 7, "401", false);

        assert!(!league.add_game(c, game, None, false));
        assert!(league.team(c).games().is_empty());
        assert!(league.games().is_empty());
    }

    #[test]
    fn test_opponent_policies() {
        let tunables = Tunables {
            ignore_non_d1: true,
            ..Tunables::default()
        };
        let (mut league, a, _) = two_teams(tunables);
        let d2 = league.add_team("Tarleton", "", Division::NonD1);
        let fcs = league.add_team("Montana", "Big Sky", Division::Fcs);

        assert!(!league.add_game(a, Game::new(a, d2, 56, 0, "1", false), None, false));
        assert!(league.add_game(a, Game::new(a, fcs, 42, 7, "2", false), None, false));
        assert_eq!(league.team(a).wins(), 1);

        let tunables = Tunables {
            ignore_non_fbs: true,
            ..Tunables::default()
        };
        let (mut league, a, _) = two_teams(tunables);
        let fcs = league.add_team("Montana", "Big Sky", Division::Fcs);
        assert!(!league.add_game(a, Game::new(a, fcs, 42, 7, "2", false), None, false));
        assert_eq!(league.team(a).wins(), 0);
    }

    #[test]
    fn test_ignore_wins_vs_non_fbs_keeps_losses() {
        let tunables = Tunables {
            ignore_wins_vs_non_fbs: true,
            ..Tunables::default()
        };
        let (mut league, a, b) = two_teams(tunables);
        let fcs = league.add_team("Montana", "Big Sky", Division::Fcs);

        assert!(!league.add_game(a, Game::new(a, fcs, 42, 7, "1", false), None, false));
        assert!(league.add_game(b, Game::new(b, fcs, 17, 20, "2", false), None, false));
        assert_eq!(league.team(a).wins(), 0);
        assert_eq!(league.team(b).losses(), 1);

        // the FCS side of a win over an FBS team is unaffected
        assert!(league.add_game(fcs, Game::new(b, fcs, 17, 20, "2", false), None, false));
        assert_eq!(league.team(fcs).wins(), 1);
    }

    #[test]
    fn test_correct_position_restores_chronology() {
        let mut league = League::default();
        let a = league.add_team("A", "SEC", Division::Fbs);
        let b = league.add_team("B", "SEC", Division::Fbs);
        let c = league.add_team("C", "SEC", Division::Fbs);

        // B and C are processed first and link their games with A
        let week2 = Game::new(b, a, 10, 20, "week2", false);
        let week1 = Game::new(a, c, 30, 0, "week1", false);
        league.add_game(b, week2.clone(), Some(0), false);
        league.add_game(a, week2.clone(), None, false);
        league.add_game(c, week1.clone(), Some(0), false);
        league.add_game(a, week1.clone(), None, false);
        assert_eq!(league.team(a).games(), &[GameId(0), GameId(1)]);

        // now A's own schedule is processed in order
        league.add_game(a, week1, Some(0), false);
        league.add_game(a, week2, Some(1), false);
        assert_eq!(league.team(a).games(), &[GameId(1), GameId(0)]);
        assert_eq!(league.team(a).wins(), 2);
    }

    #[test]
    fn test_out_of_range_position_is_ignored() {
        let (mut league, a, b) = two_teams(Tunables::default());
        assert!(league.add_game(a, Game::new(a, b, 7, 3, "1", false), Some(5), false));
        assert_eq!(league.team(a).games().len(), 1);
    }

    #[test]
    fn test_set_odds_by_name() {
        let (mut league, a, b) = two_teams(Tunables::default());
        league.add_game(a, Game::new(a, b, 7, 3, "1", false), None, false);
        let game_id = league.game_id("1").unwrap();

        league.set_odds(game_id, "Oklahoma", 2.5);
        league.set_moneylines(game_id, 120, -140);
        assert_eq!(league.game(game_id).sportsbook_favorite(), Some(b));
        assert_eq!(league.game(game_id).winner_moneyline(), 120);

        league.set_odds(game_id, "Nobody", 0.0);
        assert_eq!(league.game(game_id).sportsbook_favorite(), None);
    }
}
