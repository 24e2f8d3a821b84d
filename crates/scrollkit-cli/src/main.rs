use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrollkit_core::EngineConfig;

mod commands;
mod scenario;

#[derive(Parser)]
#[command(name = "scrollkit")]
#[command(author, version, about = "Deterministic scroll physics simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of ~/.config/scrollkit/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted input scenario and print every frame
    Simulate {
        /// Scenario file (.toml or .json)
        scenario: PathBuf,
        /// Emit one JSON object per frame
        #[arg(long)]
        json: bool,
        /// Pace frames at the configured frame rate
        #[arg(long)]
        realtime: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first so it can supply the log level
    let config_path = cli.config.unwrap_or_else(EngineConfig::config_path);
    let config = EngineConfig::load_from(&config_path)?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Simulate {
            scenario,
            json,
            realtime,
        } => commands::simulate::run(&config, &scenario, json, realtime).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config, &config_path).await,
            ConfigAction::Init { force } => commands::config::init(&config_path, force).await,
        },
    }
}
