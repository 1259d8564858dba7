//! Per-game metrics and their aggregation into a team rating
//!
//! Everything here is a pure function of an already-built [`League`]
//! snapshot, a tunables snapshot and [`RatingOptions`]. Opponent strength
//! is read one level deep (the opponent's own average adjusted margin);
//! there is no league-wide iteration to a fixed point.
//!
//! [`League`]: crate::league::League

use crate::config::RatingOptions;
use crate::league::ScoringContext;
use crate::types::{GameId, TeamId, FBS_INDEPENDENTS};

/// Metric of one game for `team`
///
/// `opponent_strength_weight * opponent_avg_margin + adjusted_margin +
/// result_adjustment`, optionally scaled for non-conference games. Returns
/// `None` for a game `team` did not play.
pub fn game_metric(
    ctx: &ScoringContext<'_>,
    team: TeamId,
    game_id: GameId,
    options: &RatingOptions,
) -> Option<f64> {
    let game = ctx.game(game_id);
    let opponent_id = game.opponent_of(team)?;
    let opponent = ctx.team(opponent_id);

    let exclude = options.exclude_self_from_opponent.then_some(team);
    let opponent_games = opponent.all_games(ctx.tunables);
    let opponent_avg_margin = opponent.average_adjusted_margin(ctx, &opponent_games, exclude);

    let mut metric = options.opponent_strength_weight * opponent_avg_margin
        + game.adjusted_margin(ctx, team)
        + game.result_adjustment(ctx, team);

    let rated = ctx.team(team);
    if rated.conference() != opponent.conference() && rated.conference() != FBS_INDEPENDENTS {
        metric *= options.non_conference_scalar;
    }

    Some(metric)
}

/// Metrics for every counted game of `team`, in chronological order
pub fn game_metrics(ctx: &ScoringContext<'_>, team: TeamId, options: &RatingOptions) -> Vec<f64> {
    ctx.team(team)
        .all_games(ctx.tunables)
        .into_iter()
        .filter_map(|game_id| game_metric(ctx, team, game_id, options))
        .collect()
}

/// Recency weights for `n` chronologically ordered games
///
/// Each game starts at `1/n`. The i-th game of the first half loses
/// `recency_bias / 2^(i+1)`, the i-th game of the second half gains
/// `recency_bias / 2^(n-i)`, and the middle game of an odd count keeps the
/// base weight. The curve is symmetric about the midpoint, so the weights
/// still sum to 1.
pub fn recency_weights(n: usize, recency_bias: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }

    let base_weight = 1.0 / n as f64;
    (0..n)
        .map(|i| {
            if i < n / 2 {
                base_weight - recency_bias / 2f64.powi(i as i32 + 1)
            } else if n % 2 == 1 && i == n / 2 {
                base_weight
            } else {
                base_weight + recency_bias / 2f64.powi((n - i) as i32)
            }
        })
        .collect()
}

/// Sum of `values` after dropping the lowest `ignore_worst_n` and highest
/// `ignore_best_n`
///
/// With no trimming requested the values are summed as given. Trimming more
/// values than exist yields 0. A zero result is always `+0.0`.
pub fn trimmed_sum(mut values: Vec<f64>, ignore_worst_n: usize, ignore_best_n: usize) -> f64 {
    if ignore_worst_n == 0 && ignore_best_n == 0 {
        return positive_zero(values.iter().sum());
    }

    values.sort_by(|a, b| a.total_cmp(b));
    let end = values.len().saturating_sub(ignore_best_n);
    if ignore_worst_n >= end {
        return 0.0;
    }
    positive_zero(values[ignore_worst_n..end].iter().sum())
}

// An empty f64 sum is -0.0, which total_cmp orders below +0.0.
fn positive_zero(value: f64) -> f64 {
    value + 0.0
}

/// Rating of `team`: recency-weighted, optionally trimmed sum of its game
/// metrics
///
/// A team without counted games rates 0.
pub fn rate_team(ctx: &ScoringContext<'_>, team: TeamId, options: &RatingOptions) -> f64 {
    let metrics = game_metrics(ctx, team, options);
    let weights = recency_weights(metrics.len(), options.recency_bias);

    let weighted: Vec<f64> = metrics
        .iter()
        .zip(weights.iter())
        .map(|(metric, weight)| metric * weight)
        .collect();

    trimmed_sum(weighted, options.ignore_worst_n, options.ignore_best_n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tunables;
    use crate::league::{Game, League};
    use crate::types::Division;

    fn link(league: &mut League, game: Game) {
        let (home, away) = (game.home(), game.away());
        league.add_game(home, game.clone(), None, false);
        league.add_game(away, game, None, false);
    }

    #[test]
    fn test_trimmed_sum_zero_is_positive() {
        assert!(trimmed_sum(Vec::new(), 0, 0).is_sign_positive());
        assert!(trimmed_sum(vec![-0.0, -0.0], 0, 0).is_sign_positive());
        assert!(trimmed_sum(vec![-0.0, 1.0], 0, 1).is_sign_positive());
    }

    #[test]
    fn test_recency_weights_without_bias() {
        let weights = recency_weights(4, 0.0);
        assert_eq!(weights, vec![0.25; 4]);
        assert!(recency_weights(0, 0.1).is_empty());
    }

    #[test]
    fn test_recency_weights_even_count() {
        let weights = recency_weights(4, 0.04);
        let expected = [0.25 - 0.02, 0.25 - 0.01, 0.25 + 0.01, 0.25 + 0.02];
        for (w, e) in weights.iter().zip(expected.iter()) {
            assert!((w - e).abs() < 1e-12);
        }
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_recency_weights_odd_count_keeps_middle() {
        let weights = recency_weights(5, 0.05);
        assert!((weights[2] - 0.2).abs() < 1e-12);
        assert!(weights[0] < weights[1]);
        assert!(weights[3] < weights[4]);
        assert!((weights[4] - weights[0] - 0.05).abs() < 1e-12);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_trimmed_sum() {
        let values = vec![3.0, -1.0, 10.0, 4.0, 0.5];
        assert_eq!(trimmed_sum(values.clone(), 0, 0), 16.5);
        assert_eq!(trimmed_sum(values.clone(), 1, 0), 17.5);
        assert_eq!(trimmed_sum(values.clone(), 0, 1), 6.5);
        assert_eq!(trimmed_sum(values.clone(), 1, 1), 7.5);
        assert_eq!(trimmed_sum(values.clone(), 3, 3), 0.0);
        assert_eq!(trimmed_sum(Vec::new(), 1, 0), 0.0);
    }

    #[test]
    fn test_team_without_games_rates_zero() {
        let mut league = League::default();
        let lonely = league.add_team("Lonely", "SEC", Division::Fbs);
        let tunables = Tunables::recommended();
        let ctx = league.scoring(&tunables);

        let options = RatingOptions {
            ignore_worst_n: 2,
            ignore_best_n: 1,
            recency_bias: 0.1,
            ..RatingOptions::recommended()
        };
        assert_eq!(rate_team(&ctx, lonely, &options), 0.0);
        assert_eq!(rate_team(&ctx, lonely, &RatingOptions::default()), 0.0);
    }

    #[test]
    fn test_rating_uses_opponent_strength() {
        let mut league = League::default();
        let a = league.add_team("A", "SEC", Division::Fbs);
        let b = league.add_team("B", "SEC", Division::Fbs);
        let c = league.add_team("C", "SEC", Division::Fbs);

        link(&mut league, Game::new(a, b, 21, 14, "ab", true));
        link(&mut league, Game::new(b, c, 28, 0, "bc", true));

        let tunables = Tunables::default();
        let ctx = league.scoring(&tunables);

        // B averages (-7 + 28) / 2 = 10.5 including the loss to A
        let options = RatingOptions::default();
        assert!((rate_team(&ctx, a, &options) - (10.5 + 7.0)).abs() < 1e-9);

        // excluding A from B's average leaves only the 28-point win
        let options = RatingOptions {
            exclude_self_from_opponent: true,
            ..RatingOptions::default()
        };
        assert!((rate_team(&ctx, a, &options) - (28.0 + 7.0)).abs() < 1e-9);

        let options = RatingOptions {
            opponent_strength_weight: 0.0,
            ..RatingOptions::default()
        };
        assert!((rate_team(&ctx, a, &options) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_rating_is_weighted_mean_of_metrics() {
        let mut league = League::default();
        let a = league.add_team("A", "SEC", Division::Fbs);
        let b = league.add_team("B", "SEC", Division::Fbs);
        let c = league.add_team("C", "SEC", Division::Fbs);

        link(&mut league, Game::new(a, b, 20, 10, "1", true));
        link(&mut league, Game::new(a, c, 14, 17, "2", true));

        let tunables = Tunables::default();
        let ctx = league.scoring(&tunables);
        let options = RatingOptions {
            opponent_strength_weight: 0.0,
            ..RatingOptions::default()
        };

        assert_eq!(game_metrics(&ctx, a, &options), vec![10.0, -3.0]);
        assert!((rate_team(&ctx, a, &options) - 3.5).abs() < 1e-9);

        let trimmed = RatingOptions {
            ignore_worst_n: 1,
            ..options
        };
        assert!((rate_team(&ctx, a, &trimmed) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_conference_scalar() {
        let mut league = League::default();
        let a = league.add_team("A", "SEC", Division::Fbs);
        let b = league.add_team("B", "ACC", Division::Fbs);
        let nd = league.add_team("Notre Dame", FBS_INDEPENDENTS, Division::Fbs);

        link(&mut league, Game::new(a, b, 24, 14, "1", true));
        link(&mut league, Game::new(nd, b, 24, 14, "2", true));

        let tunables = Tunables::default();
        let ctx = league.scoring(&tunables);
        let options = RatingOptions {
            opponent_strength_weight: 0.0,
            non_conference_scalar: 0.5,
            ..RatingOptions::default()
        };

        assert_eq!(game_metrics(&ctx, a, &options), vec![5.0]);
        // independents are never scaled
        assert_eq!(game_metrics(&ctx, nd, &options), vec![10.0]);
    }
}
