//! Checkpoint Agent - attendance gate controller
//!
//! Reads RFID/barcode tokens, photographs the student, asks the attendance
//! service for a verdict and signals it on the buzzer and status LEDs.

mod commands;
mod observability;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::runtime::Builder;

#[derive(Parser)]
#[command(name = "checkpoint-agent")]
#[command(author, version, about = "Attendance checkpoint agent for RFID/barcode gates")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ~/.checkpoint-agent/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scan loop (default)
    Run {
        /// Log buzzer/LED signals instead of driving GPIO
        #[arg(long)]
        no_gpio: bool,
    },

    /// Send one heartbeat and exit
    #[command(alias = "ping")]
    Heartbeat,

    /// Verify one token without GPIO feedback
    Verify {
        /// Token to submit
        token: String,

        /// Skip the face photo
        #[arg(long)]
        no_photo: bool,
    },

    /// Show current configuration
    Config {
        /// Write the defaults to the config file if it does not exist
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    observability::init_logging();

    // Single-threaded runtime: the agent is one sequential control loop
    let runtime = Builder::new_current_thread().enable_all().build()?;
    let result = runtime.block_on(dispatch(cli));

    // A stdin read parked in the blocking pool must not hold up exit
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let store = commands::config_store(cli.config)?;

    match cli.command.unwrap_or(Commands::Run { no_gpio: false }) {
        Commands::Run { no_gpio } => {
            let config = store.load().await?;
            commands::run::run(config, no_gpio).await?;
        }
        Commands::Heartbeat => {
            let config = store.load().await?;
            commands::heartbeat::run(&config, cli.json).await?;
        }
        Commands::Verify { token, no_photo } => {
            let config = store.load().await?;
            commands::verify::run(&config, &token, no_photo, cli.json).await?;
        }
        Commands::Config { init } => {
            commands::config::show(&store, init, cli.json).await?;
        }
    }

    Ok(())
}
