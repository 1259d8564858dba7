//! Command-line entry point for CFB Ratings
//!
//! Builds rankings from season files, compares rankings week over week and
//! scores ranking-based predictions against finished games.

use anyhow::Result;
use cfb_ratings::config::AppConfig;
use cfb_ratings::ingest;
use cfb_ratings::prediction::{analyze_predictions, predict_games};
use cfb_ratings::ranking::{self, compare_rankings, rank_league, Ranking};
use cfb_ratings::rating::{MarginRatingCalculator, RatingCalculator};
use cfb_ratings::types::Division;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// CFB Ratings - Adjusted-margin power ratings for college football
#[derive(Parser)]
#[command(
    name = "cfb-ratings",
    version,
    about = "Adjusted-margin power ratings for college football",
    long_about = "CFB Ratings scores every game of a season with venue, bonus and level \
                 adjustments, weighs each result by opponent strength and recency, and ranks \
                 teams by the resulting rating. Rankings can be compared week over week and \
                 used to predict games."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        global = true,
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Use the published weekly settings
    #[arg(long, global = true, help = "Start from the recommended tunables and rating options")]
    recommended: bool,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, global = true, help = "Validate configuration and exit without running")]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rate and rank every team of a season
    Rank {
        #[arg(long, value_name = "FILE", help = "Season file (JSON or TOML)")]
        season: PathBuf,

        #[arg(long, value_name = "FILE", help = "Previous season file to blend in")]
        previous: Option<PathBuf>,

        #[arg(short, long, value_name = "FILE", help = "Write the ranking to this file")]
        output: Option<PathBuf>,

        #[arg(long, help = "Only list teams from this conference")]
        conference: Option<String>,

        #[arg(long, help = "Only list teams from this division (fbs, fcs)")]
        division: Option<Division>,

        #[arg(long, help = "Print the conference summary")]
        conferences: bool,
    },

    /// Compare two ranking files
    Compare {
        #[arg(long, value_name = "FILE")]
        old: PathBuf,

        #[arg(long, value_name = "FILE")]
        new: PathBuf,

        #[arg(short = 'n', long, default_value_t = 5, help = "Teams listed per direction")]
        biggest: usize,
    },

    /// Predict the games of a slate from a ranking
    Predict {
        #[arg(long, value_name = "FILE")]
        ranking: PathBuf,

        #[arg(long, value_name = "FILE", help = "Slate file (JSON or TOML)")]
        slate: PathBuf,
    },

    /// Score a ranking's picks over a slate of finished games
    Analyze {
        #[arg(long, value_name = "FILE")]
        ranking: PathBuf,

        #[arg(long, value_name = "FILE", help = "Slate file with final scores")]
        slate: PathBuf,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Size the global rayon pool used by the ranking pass
fn init_thread_pool(worker_threads: usize) -> Result<()> {
    if worker_threads == 0 {
        return Ok(());
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads)
        .build_global()
        .map_err(|e| anyhow::anyhow!("Failed to initialize worker pool: {}", e))
}

/// Display startup banner with rating settings
fn display_startup_banner(config: &AppConfig) {
    info!("🏈 CFB Ratings v{}", cfb_ratings::VERSION);
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   Margin cap: {}", config.tunables.margin_cap);
    info!(
        "   Level factors: FCS {} / G5 {}",
        config.tunables.fcs_game_factor, config.tunables.g5_game_factor
    );
    info!(
        "   Opponent weight: {}, recency bias: {}",
        config.rating.opponent_strength_weight, config.rating.recency_bias
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from file or environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    // The preset is the base layer; file and environment values override it
    let base = if args.recommended {
        AppConfig::recommended()
    } else {
        AppConfig::default()
    };

    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file_over(base, config_path)?
    } else {
        AppConfig::from_env_over(base)?
    };

    // Apply CLI overrides

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    cfb_ratings::config::validate_config(&config)?;
    Ok(config)
}

fn print_ranking(ranking: &Ranking, conference: Option<&str>, division: Option<Division>) {
    for (i, entry) in ranking.filter(conference, division).into_iter().enumerate() {
        let position = if conference.is_some() || division.is_some() {
            format!("{}. ({})", i + 1, entry.rank)
        } else {
            format!("{}.", entry.rank)
        };
        println!(
            "{} {} {}-{} ({:.4})",
            position, entry.name, entry.wins, entry.losses, entry.rating
        );
    }
}

fn run_rank(
    config: &AppConfig,
    season: &Path,
    previous: Option<&Path>,
    output: Option<&Path>,
    conference: Option<&str>,
    division: Option<Division>,
    conferences: bool,
) -> Result<()> {
    let season = ingest::load_season(season)?;
    let previous = previous.map(ingest::load_season).transpose()?;

    let league = ingest::build_league(&season, previous.as_ref(), config.tunables.clone())?;
    let calculator = MarginRatingCalculator::for_league(&league, config.rating.clone())?;
    info!("Rating {} teams with {}", league.teams().len(), calculator.name());

    let ranking = rank_league(&league, &calculator);
    print_ranking(&ranking, conference, division);

    if conferences {
        println!();
        println!("Conference summary:");
        for (i, summary) in ranking.conference_summary().iter().enumerate() {
            println!(
                "\t{}. {} (total {:.2}, average {:.2}, top 3 {:.2}, middle 3 {:.2}, \
                 bottom 3 {:.2})",
                i + 1,
                summary.conference,
                summary.total,
                summary.average_rank,
                summary.top3_rank,
                summary.middle3_rank,
                summary.bottom3_rank
            );
        }
    }

    if let Some(path) = output {
        ranking::write_ranking_file(&ranking, path)?;
        info!("Ranking written to {}", path.display());
    }

    Ok(())
}

fn run_compare(config: &AppConfig, old: &Path, new: &Path, biggest: usize) -> Result<()> {
    let old = ranking::read_ranking_file(old)?;
    let new = ranking::read_ranking_file(new)?;
    let comparison = compare_rankings(&old, &new, biggest, config.service.top_n)?;

    println!("Biggest droppers:");
    for change in &comparison.biggest_droppers {
        println!(
            "\t{}: {} ({} -> {})",
            change.name,
            change.movement(),
            change.old_rank,
            change.new_rank
        );
    }

    println!("Biggest improvers:");
    for change in &comparison.biggest_improvers {
        println!(
            "\t{}: +{} ({} -> {})",
            change.name,
            change.movement(),
            change.old_rank,
            change.new_rank
        );
    }

    println!("Top {}:", config.service.top_n);
    for team in &comparison.top {
        println!("\t{}. {} ({})", team.new_rank, team.name, team.label());
    }

    if !comparison.dropped_from_top.is_empty() {
        println!("Dropped out:");
        for (name, rank) in &comparison.dropped_from_top {
            match rank {
                Some(rank) => println!("\t{} (now {})", name, rank),
                None => println!("\t{} (unranked)", name),
            }
        }
    }

    Ok(())
}

fn run_predict(ranking: &Path, slate: &Path) -> Result<()> {
    let ranking = ranking::read_ranking_file(ranking)?;
    let slate = ingest::build_slate(&ingest::load_slate(slate)?)?;

    for prediction in predict_games(&ranking, &slate) {
        println!(
            "{} ({}) @ {} ({}): Predicted winner: {}",
            prediction.away,
            prediction.away_rank,
            prediction.home,
            prediction.home_rank,
            prediction.predicted_winner
        );
    }

    Ok(())
}

fn run_analyze(ranking: &Path, slate: &Path) -> Result<()> {
    let ranking = ranking::read_ranking_file(ranking)?;
    let slate = ingest::build_slate(&ingest::load_slate(slate)?)?;
    let analysis = analyze_predictions(&ranking, &slate);

    println!(
        "Correctly predicted {:.2}% ({}/{})",
        analysis.accuracy() * 100.0,
        analysis.correct,
        analysis.games_predicted
    );

    println!("Biggest upsets:");
    for upset in &analysis.upsets {
        println!(
            "\t{} ({}) def. {} ({}): {} difference",
            upset.winner,
            upset.winner_rank,
            upset.loser,
            upset.loser_rank,
            upset.rank_difference()
        );
    }

    println!(
        "Betting $100 on the projected winner's moneyline in {} games (${:.2} total) \
         returned ${:.2}, or ${:.2} profit",
        analysis.games_with_moneyline,
        analysis.amount_wagered(),
        analysis.revenue,
        analysis.profit()
    );

    println!(
        "In games with a different pick than the sportsbook, {:.2}% ({}/{}) were picked correctly",
        analysis.disagreement_accuracy() * 100.0,
        analysis.disagreements_correct,
        analysis.disagreements.len()
    );
    for disagreement in &analysis.disagreements {
        println!(
            "\t{} def. {}: sportsbook selected {} ({}), ranking selected {}",
            disagreement.winner,
            disagreement.loser,
            disagreement.sportsbook_pick,
            disagreement.spread,
            disagreement.ranking_pick
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        info!("Dry run completed - exiting without running");
        return Ok(());
    }

    display_startup_banner(&config);
    init_thread_pool(config.service.worker_threads)?;

    let result = match &args.command {
        Command::Rank {
            season,
            previous,
            output,
            conference,
            division,
            conferences,
        } => run_rank(
            &config,
            season,
            previous.as_deref(),
            output.as_deref(),
            conference.as_deref(),
            *division,
            *conferences,
        ),
        Command::Compare { old, new, biggest } => run_compare(&config, old, new, *biggest),
        Command::Predict { ranking, slate } => run_predict(ranking, slate),
        Command::Analyze { ranking, slate } => run_analyze(ranking, slate),
    };

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}
