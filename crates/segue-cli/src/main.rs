use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use segue_core::EngineConfig;

mod commands;

#[derive(Parser)]
#[command(name = "segue")]
#[command(author, version, about = "Replay and validate page-transition animations")]
struct Cli {
    /// Engine configuration file (defaults to ~/.config/segue/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay clicks against a page fixture and print the timeline
    Simulate {
        /// Page fixture (TOML)
        #[arg(short = 'p', long)]
        page: PathBuf,
        /// Element to click, optionally at a time: `nav-about` or `nav-about@120`
        #[arg(long = "click", required = true)]
        clicks: Vec<String>,
        /// Give up after this much virtual time (ms)
        #[arg(long, default_value_t = 10_000)]
        limit_ms: u64,
        /// Print the timeline as JSON
        #[arg(long)]
        json: bool,
        /// Pace the replay against the wall clock
        #[arg(long)]
        realtime: bool,
        /// Playback speed for --realtime
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },
    /// Check registered animations against a page fixture
    Check {
        /// Page fixture (TOML)
        #[arg(short = 'p', long)]
        page: PathBuf,
    },
    /// Print the effective engine configuration
    Config {
        /// Only print where the configuration file is read from
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::load()?,
    };

    match cli.command {
        Commands::Simulate {
            page,
            clicks,
            limit_ms,
            json,
            realtime,
            speed,
        } => {
            let options = commands::simulate::Options {
                limit_ms,
                json,
                realtime,
                speed,
            };
            commands::simulate::run(&page, config, &clicks, options).await
        }
        Commands::Check { page } => commands::check::run(&page, &config),
        Commands::Config { path } => commands::config::run(&config, cli.config.as_deref(), path),
    }
}
