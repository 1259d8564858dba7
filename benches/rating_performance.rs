//! Performance benchmarks for rating calculations

use cfb_ratings::config::{RatingOptions, Tunables};
use cfb_ratings::ingest::{build_league, ScheduleEntry, SeasonFile, TeamRecord, Venue};
use cfb_ratings::league::League;
use cfb_ratings::ranking::rank_league;
use cfb_ratings::rating::{MarginRatingCalculator, RatingCalculator};
use cfb_ratings::types::Division;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const TEAMS: usize = 134;
const WEEKS: usize = 12;

/// A full-size season with deterministic scores
fn create_bench_season() -> SeasonFile {
    let conferences = [
        "ACC",
        "Big 12",
        "Big Ten",
        "SEC",
        "American",
        "MAC",
        "Sun Belt",
        "Mountain West",
    ];
    let mut teams: Vec<TeamRecord> = (0..TEAMS)
        .map(|i| TeamRecord {
            name: format!("Team {}", i),
            conference: conferences[i % conferences.len()].to_string(),
            division: if i % 10 == 9 { Division::Fcs } else { Division::Fbs },
            schedule: Vec::new(),
        })
        .collect();

    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next_score = || {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        ((seed >> 33) % 56) as u32
    };

    for week in 0..WEEKS {
        for i in (0..TEAMS).step_by(2) {
            let home = i;
            let away = (i + 1 + 2 * week) % TEAMS;
            if home == away {
                continue;
            }
            let id = format!("{}-{}-{}", week, home, away);
            let (home_score, away_score) = (next_score(), next_score());

            for (team, opponent, score, opponent_score, venue) in [
                (home, away, home_score, away_score, Venue::Home),
                (away, home, away_score, home_score, Venue::Away),
            ] {
                let opponent_name = teams[opponent].name.clone();
                teams[team].schedule.push(ScheduleEntry {
                    id: id.clone(),
                    opponent: opponent_name,
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
    }

    SeasonFile {
        season: Some(2024),
        teams,
    }
}

fn create_bench_league() -> League {
    build_league(&create_bench_season(), None, Tunables::recommended()).unwrap()
}

fn bench_single_team_rating(c: &mut Criterion) {
    let league = create_bench_league();
    let calculator =
        MarginRatingCalculator::for_league(&league, RatingOptions::recommended()).unwrap();
    let team = league.teams()[0].id();

    c.bench_function("rate_single_team", |b| {
        b.iter(|| black_box(calculator.rate_team(black_box(&league), team)))
    });
}

fn bench_full_ranking_pass(c: &mut Criterion) {
    let league = create_bench_league();
    let calculator =
        MarginRatingCalculator::for_league(&league, RatingOptions::recommended()).unwrap();

    c.bench_function("rank_full_league", |b| {
        b.iter(|| black_box(rank_league(black_box(&league), &calculator)))
    });
}

fn bench_league_build(c: &mut Criterion) {
    let season = create_bench_season();

    c.bench_function("build_league", |b| {
        b.iter(|| {
            black_box(build_league(black_box(&season), None, Tunables::recommended()).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_single_team_rating,
    bench_full_ranking_pass,
    bench_league_build
);
criterion_main!(benches);
