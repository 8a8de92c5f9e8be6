//! fplhub - explore Fantasy Premier League data from the terminal.
//!
//! Player tables, rankings, squad tools and fixture difficulty come from the
//! live FPL API (through the local cache); historical form comes from the
//! season CSVs in the data directory.

mod commands;
mod table;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fplhub_core::analysis::{
    PlayerFilter, PlayerMetric, DEFAULT_MIN_MINUTES, DEFAULT_PRICE_MAX, DEFAULT_SUGGESTIONS,
    DEFAULT_TRANSFER_BUDGET,
};
use fplhub_core::Config;

use commands::{ChartChoice, Runner};

#[derive(Parser)]
#[command(name = "fplhub", version)]
#[command(about = "Fantasy Premier League stats, rankings and fixture difficulty")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Bypass the local cache for this run
    #[arg(long, global = true)]
    no_cache: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List players matching filters
    Players {
        /// Position name, e.g. Midfielder (repeatable)
        #[arg(short, long)]
        position: Vec<String>,

        /// Team name (repeatable)
        #[arg(short, long)]
        team: Vec<String>,

        #[arg(long, default_value_t = 0.0)]
        min_price: f64,

        #[arg(long, default_value_t = DEFAULT_PRICE_MAX)]
        max_price: f64,

        #[arg(long, default_value_t = 0.0)]
        min_points: f64,

        #[arg(long, default_value_t = 0.0)]
        min_form: f64,

        /// Substring of the player's name
        #[arg(short, long, default_value = "")]
        search: String,

        /// Column to sort by
        #[arg(long, default_value = "total_points")]
        sort: PlayerMetric,

        #[arg(short = 'n', long, default_value_t = 50)]
        limit: usize,
    },

    /// Top players by a metric
    Top {
        #[arg(default_value = "total_points")]
        metric: PlayerMetric,

        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },

    /// Best points per million
    BestValue {
        #[arg(long, default_value_t = DEFAULT_MIN_MINUTES)]
        min_minutes: f64,
    },

    /// Side-by-side stats for named players
    Compare {
        #[arg(required = true, num_args = 2..)]
        players: Vec<String>,
    },

    /// Summarize a squad and suggest transfers
    Squad {
        #[arg(required = true)]
        players: Vec<String>,

        #[arg(long, default_value_t = DEFAULT_TRANSFER_BUDGET)]
        budget: f64,

        #[arg(long, default_value_t = DEFAULT_SUGGESTIONS)]
        suggestions: usize,
    },

    /// Upcoming fixtures and difficulty for one team
    Fixtures {
        /// Team name or short name
        team: String,

        #[arg(short, long, default_value_t = 5)]
        gameweeks: usize,
    },

    /// Fixture difficulty overview for every team
    Fdr {
        #[arg(short, long, default_value_t = 5)]
        gameweeks: usize,
    },

    /// Gameweek schedule and status
    Gameweeks,

    /// Recent gameweeks from the season data files
    Form {
        /// Player id or web name
        player: String,

        #[arg(short, long, default_value_t = 5)]
        gameweeks: usize,

        #[arg(long)]
        season: Option<String>,
    },

    /// This season's gameweek history from the API
    History {
        player: String,

        #[arg(short, long, default_value_t = 5)]
        gameweeks: usize,
    },

    /// List available seasons
    Seasons,

    /// Print a chart specification as JSON
    Chart {
        #[arg(value_enum)]
        kind: ChartChoice,

        /// Players for radar, comparison and form trend charts
        players: Vec<String>,

        #[arg(long, default_value = "total_points")]
        metric: PlayerMetric,

        #[arg(long)]
        season: Option<String>,
    },

    /// Inspect or clear the local cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// Show or initialize the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the current settings to the config file
    Init,
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Show tracked entries and their age
    Status,
    /// Delete every cached file
    Clear,
}

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // RUST_LOG wins over --verbose
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if cli.no_cache {
        config.use_cache = false;
    }
    debug!(?config, "Loaded configuration");
    info!("fplhub starting");

    let runner = Runner::new(config, cli.json);

    match cli.command {
        Commands::Players {
            position,
            team,
            min_price,
            max_price,
            min_points,
            min_form,
            search,
            sort,
            limit,
        } => {
            let filter = PlayerFilter {
                positions: position,
                teams: team,
                price_min: min_price,
                price_max: max_price,
                points_min: min_points,
                form_min: min_form,
                search,
            };
            runner.players(&filter, sort, limit)
        }
        Commands::Top { metric, count } => runner.top(metric, count),
        Commands::BestValue { min_minutes } => runner.best_value(min_minutes),
        Commands::Compare { players } => runner.compare(&players),
        Commands::Squad {
            players,
            budget,
            suggestions,
        } => runner.squad(&players, budget, suggestions),
        Commands::Fixtures { team, gameweeks } => runner.fixtures(&team, gameweeks),
        Commands::Fdr { gameweeks } => runner.fdr(gameweeks),
        Commands::Gameweeks => runner.gameweeks(),
        Commands::Form {
            player,
            gameweeks,
            season,
        } => runner.form(&player, gameweeks, season.as_deref()),
        Commands::History { player, gameweeks } => runner.history(&player, gameweeks),
        Commands::Seasons => runner.seasons(),
        Commands::Chart {
            kind,
            players,
            metric,
            season,
        } => runner.chart(kind, &players, metric, season.as_deref()),
        Commands::Cache { command } => match command {
            CacheCommand::Status => runner.cache_status(),
            CacheCommand::Clear => runner.cache_clear(),
        },
        Commands::Config { command } => match command {
            ConfigCommand::Show => runner.config_show(),
            ConfigCommand::Init => runner.config_init(),
        },
    }
}
