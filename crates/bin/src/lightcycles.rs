//! Light cycles - duel server and simulated client

mod sim;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lightcycles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the match server
    Run {
        /// Configuration file (created with defaults if missing)
        #[arg(long, default_value = "config.toml")]
        config: PathBuf,
    },
    /// Connect a client that steers at random
    Sim {
        /// Server WebSocket URL
        #[arg(long, default_value = "ws://localhost:8080/")]
        url: String,
        /// Send a start command once a slot is assigned
        #[arg(long)]
        start: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Run { config } => {
            info!("Light cycles server v{}", env!("CARGO_PKG_VERSION"));

            let config = server::Config::load(&config)?;
            info!("Loaded configuration");
            info!("  Port: {}", config.server.port);
            info!("  Tick: {}ms", config.game.tick_interval_ms);
            info!("  Countdown: {}s", config.game.countdown_secs);

            server::run(config).await?;
        }
        Commands::Sim { url, start } => sim::run(&url, start).await?,
    }

    Ok(())
}
