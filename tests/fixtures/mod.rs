//! Test fixtures and mock implementations for integration testing

#![allow(dead_code)]

use cfb_ratings::ingest::{ScheduleEntry, SeasonFile, SlateGame, TeamRecord, Venue};
use cfb_ratings::league::League;
use cfb_ratings::rating::RatingCalculator;
use cfb_ratings::types::{Division, TeamId};

mockall::mock! {
    /// Calculator whose ratings are scripted per test
    pub Calculator {}

    impl RatingCalculator for Calculator {
        fn rate_team(&self, league: &League, team: TeamId) -> f64;
        fn name(&self) -> &'static str;
        fn config(&self) -> serde_json::Value;
        fn update_config(&mut self, config: serde_json::Value) -> cfb_ratings::Result<()>;
    }
}

/// Builds season files game by game, writing both participants' schedules
#[derive(Debug, Default)]
pub struct SeasonBuilder {
    teams: Vec<TeamRecord>,
}

impl SeasonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(mut self, name: &str, conference: &str, division: Division) -> Self {
        self.teams.push(TeamRecord {
            name: name.to_string(),
            conference: conference.to_string(),
            division,
            schedule: Vec::new(),
        });
        self
    }

    /// A home game for `home`; opponents not added with [`Self::team`] only
    /// show up on the listed team's schedule
    pub fn game(self, id: &str, home: &str, away: &str, home_score: u32, away_score: u32) -> Self {
        self.record(id, home, away, home_score, away_score, Venue::Home, Venue::Away)
    }

    pub fn neutral_game(self, id: &str, home: &str, away: &str, home_score: u32, away_score: u32) -> Self {
        self.record(id, home, away, home_score, away_score, Venue::Neutral, Venue::Neutral)
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        mut self,
        id: &str,
        home: &str,
        away: &str,
        home_score: u32,
        away_score: u32,
        home_venue: Venue,
        away_venue: Venue,
    ) -> Self {
        let sides = [
            (home, away, home_score, away_score, home_venue),
            (away, home, away_score, home_score, away_venue),
        ];
        for (team, opponent, score, opponent_score, venue) in sides {
            if let Some(record) = self.teams.iter_mut().find(|t| t.name == team) {
                record.schedule.push(ScheduleEntry {
                    id: id.to_string(),
                    opponent: opponent.to_string(),
                    venue,
                    score: Some(score),
                    opponent_score: Some(opponent_score),
                    favorite: None,
                    spread: None,
                    moneyline: None,
                    opponent_moneyline: None,
                });
            }
        }
        self
    }

    pub fn build(self) -> SeasonFile {
        SeasonFile {
            season: Some(2024),
            teams: self.teams,
        }
    }
}

/// A small season: two Power 5 conferences, a Group of 5 team, an FCS team
/// and an unlisted non-D1 opponent
pub fn sample_season() -> SeasonFile {
    SeasonBuilder::new()
        .team("Georgia", "SEC", Division::Fbs)
        .team("Alabama", "SEC", Division::Fbs)
        .team("Ohio State", "Big Ten", Division::Fbs)
        .team("Michigan", "Big Ten", Division::Fbs)
        .team("Boise State", "Mountain West", Division::Fbs)
        .team("Montana", "Big Sky", Division::Fcs)
        // week 1
        .game("1", "Georgia", "Montana", 56, 3)
        .game("2", "Ohio State", "Boise State", 38, 17)
        .game("3", "Alabama", "Tiny College", 70, 0)
        .neutral_game("4", "Michigan", "Montana", 24, 10)
        // week 2
        .game("5", "Alabama", "Georgia", 41, 34)
        .game("6", "Boise State", "Montana", 31, 28)
        .game("7", "Michigan", "Ohio State", 13, 10)
        // week 3
        .game("8", "Georgia", "Ohio State", 27, 24)
        .game("9", "Boise State", "Michigan", 21, 35)
        .game("10", "Alabama", "Boise State", 45, 20)
        .build()
}

pub fn slate_game(id: &str, home: &str, away: &str, home_score: u32, away_score: u32) -> SlateGame {
    SlateGame {
        id: id.to_string(),
        home: home.to_string(),
        away: away.to_string(),
        neutral_site: false,
        home_score: Some(home_score),
        away_score: Some(away_score),
        favorite: None,
        spread: None,
        home_moneyline: None,
        away_moneyline: None,
    }
}
