//! Season and slate files
//!
//! A season file lists every Division I team with its own schedule, in the
//! order the games were played. Building a league replays those schedules
//! team by team, so every game is reported twice (once per participant)
//! unless the opponent is unknown. A slate file is a flat list of games used
//! for predictions and their analysis.
//!
//! Files are JSON, or TOML when the path ends in `.toml`.

use crate::config::Tunables;
use crate::error::{RatingError, Result};
use crate::league::{Game, League};
use crate::types::{Division, TeamId};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Where a scheduled game was played, from the listing team's side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    #[default]
    Home,
    Away,
    Neutral,
}

/// One game on a team's schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// External game id shared by both participants' schedules
    pub id: String,
    pub opponent: String,
    #[serde(default)]
    pub venue: Venue,
    /// `None` for a postponed or unplayed game
    pub score: Option<u32>,
    pub opponent_score: Option<u32>,
    /// Sportsbook favorite by team name
    #[serde(default)]
    pub favorite: Option<String>,
    #[serde(default)]
    pub spread: Option<f64>,
    #[serde(default)]
    pub moneyline: Option<i32>,
    #[serde(default)]
    pub opponent_moneyline: Option<i32>,
}

/// A team and its chronological schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    #[serde(default)]
    pub conference: String,
    pub division: Division,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonFile {
    #[serde(default)]
    pub season: Option<u16>,
    pub teams: Vec<TeamRecord>,
}

/// A game on a prediction slate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlateGame {
    pub id: String,
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub neutral_site: bool,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    #[serde(default)]
    pub favorite: Option<String>,
    #[serde(default)]
    pub spread: Option<f64>,
    #[serde(default)]
    pub home_moneyline: Option<i32>,
    #[serde(default)]
    pub away_moneyline: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlateFile {
    pub games: Vec<SlateGame>,
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_toml = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&content).with_context(|| format!("Failed to parse TOML {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON {}", path.display()))
    }
}

pub fn load_season(path: &Path) -> Result<SeasonFile> {
    load_document(path)
}

pub fn load_slate(path: &Path) -> Result<SlateFile> {
    load_document(path)
}

fn invalid(reason: impl Into<String>) -> anyhow::Error {
    RatingError::InvalidSeasonData {
        reason: reason.into(),
    }
    .into()
}

fn register_teams(league: &mut League, season: &SeasonFile) -> Result<()> {
    let mut seen = HashSet::new();
    for record in &season.teams {
        if record.name.trim().is_empty() {
            return Err(invalid("team with an empty name"));
        }
        if !seen.insert(record.name.as_str()) {
            return Err(invalid(format!("team {} is listed twice", record.name)));
        }
        league.add_team(record.name.clone(), record.conference.clone(), record.division);
    }
    Ok(())
}

/// The game an entry describes, from `team`'s side
fn entry_game(team: TeamId, opponent: TeamId, entry: &ScheduleEntry) -> Option<Game> {
    let (Some(score), Some(opponent_score)) = (entry.score, entry.opponent_score) else {
        debug!("Skipping game {} without a final score", entry.id);
        return None;
    };

    let game = match entry.venue {
        Venue::Away => Game::new(opponent, team, opponent_score, score, entry.id.clone(), false),
        Venue::Home | Venue::Neutral => Game::new(
            team,
            opponent,
            score,
            opponent_score,
            entry.id.clone(),
            entry.venue == Venue::Neutral,
        ),
    };

    Some(game)
}

/// Copy the sportsbook favorite and spread onto the stored game
fn attach_odds(league: &mut League, entry: &ScheduleEntry) {
    let Some(favorite) = &entry.favorite else {
        return;
    };
    let Some(game_id) = league.game_id(&entry.id) else {
        return;
    };
    league.set_odds(game_id, favorite, entry.spread.unwrap_or(0.0));
}

/// Copy moneylines onto the stored game, whichever side it lists as home
fn attach_moneylines(league: &mut League, team: TeamId, entry: &ScheduleEntry) {
    let (Some(moneyline), Some(opponent_moneyline)) = (entry.moneyline, entry.opponent_moneyline)
    else {
        return;
    };
    let Some(game_id) = league.game_id(&entry.id) else {
        return;
    };

    if league.game(game_id).home() == team {
        league.set_moneylines(game_id, moneyline, opponent_moneyline);
    } else {
        league.set_moneylines(game_id, opponent_moneyline, moneyline);
    }
}

/// Add one team's schedule, keeping it chronological
///
/// Opponents missing from the league are created as non-D1 placeholders for
/// the current season and skipped for the previous one.
fn replay_schedule(league: &mut League, record: &TeamRecord, previous_season: bool) -> Result<()> {
    let team = league.require_team(&record.name)?;
    let mut position = 0usize;

    for entry in &record.schedule {
        let opponent = match league.team_id(&entry.opponent) {
            Some(opponent) => opponent,
            None if previous_season => {
                debug!("Skipping previous-season game {} against {}", entry.id, entry.opponent);
                continue;
            }
            None => {
                debug!(
                    "Adding placeholder team {} from {}'s schedule",
                    entry.opponent, record.name
                );
                league.add_team(entry.opponent.clone(), "", Division::NonD1)
            }
        };
        if opponent == team {
            return Err(invalid(format!(
                "{} is listed as its own opponent in game {}",
                record.name, entry.id
            )));
        }

        let Some(game) = entry_game(team, opponent, entry) else {
            continue;
        };

        if league.add_game(team, game.clone(), Some(position), previous_season) {
            position += 1;
        }
        league.add_game(opponent, game, None, previous_season);
        attach_odds(league, entry);
        attach_moneylines(league, team, entry);
    }

    Ok(())
}

/// Build a league from a season, optionally blending in the previous one
///
/// Previous-season games only link teams that exist in the current season
/// and must not reuse a current-season game id.
pub fn build_league(
    season: &SeasonFile,
    previous: Option<&SeasonFile>,
    tunables: Tunables,
) -> Result<League> {
    let mut league = League::new(tunables);
    register_teams(&mut league, season)?;

    for record in &season.teams {
        replay_schedule(&mut league, record, false)?;
    }
    let current_games = league.games().len();

    if let Some(previous) = previous {
        for record in &previous.teams {
            for entry in &record.schedule {
                if let Some(game_id) = league.game_id(&entry.id) {
                    if game_id.0 < current_games {
                        return Err(invalid(format!(
                            "game id {} appears in both the current and the previous season",
                            entry.id
                        )));
                    }
                }
            }

            if league.team_id(&record.name).is_none() {
                warn!("Previous-season team {} is not in the current season", record.name);
                continue;
            }
            replay_schedule(&mut league, record, true)?;
        }
    }

    info!(
        "League built - teams: {}, games: {}, previous-season games: {}",
        league.teams().len(),
        current_games,
        league.games().len() - current_games
    );

    Ok(league)
}

/// Build a league holding exactly the games of a slate
///
/// Team names are taken as given; conference and division stay unknown.
pub fn build_slate(slate: &SlateFile) -> Result<League> {
    let mut league = League::default();

    for slate_game in &slate.games {
        if slate_game.home == slate_game.away {
            return Err(invalid(format!("game {} has the same team on both sides", slate_game.id)));
        }
        if league.game_id(&slate_game.id).is_some() {
            return Err(invalid(format!("game {} is listed twice", slate_game.id)));
        }

        let home = league.add_team(slate_game.home.clone(), "", Division::default());
        let away = league.add_team(slate_game.away.clone(), "", Division::default());

        let mut game = Game::new(
            home,
            away,
            slate_game.home_score.unwrap_or(0),
            slate_game.away_score.unwrap_or(0),
            slate_game.id.clone(),
            slate_game.neutral_site,
        );
        if let Some(favorite) = &slate_game.favorite {
            game.set_odds(league.team_id(favorite), slate_game.spread.unwrap_or(0.0));
        }
        if let (Some(home_ml), Some(away_ml)) =
            (slate_game.home_moneyline, slate_game.away_moneyline)
        {
            game.set_moneylines(home_ml, away_ml);
        }

        league.add_game(home, game.clone(), None, false);
        league.add_game(away, game, None, false);
    }

    Ok(league)
}
