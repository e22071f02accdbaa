//! Dropboard CLI - drop images onto an ordered board and rearrange them.
//!
//! The CLI stands in for a drop zone and a drag gesture: paths become the
//! dropped files, and `--move` plays back drags over the resulting board.
//!
//! # Usage
//!
//! ```bash
//! # Drop a folder of images and print the board
//! dropboard ingest ./photos/
//!
//! # Drop two files, drag item 0 onto slot 1, then item 2 to the front
//! dropboard ingest a.png b.jpg c.webp --move 0:1 --move 2:0
//!
//! # Drag item 3 across slots 2, 1 and 0 in one gesture
//! dropboard ingest ./photos/ --move 3:2,1,0 -f jsonl -o board.jsonl
//!
//! # View configuration
//! dropboard config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Dropboard - drop images onto an ordered board and rearrange them.
#[derive(Parser, Debug)]
#[command(name = "dropboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest image files onto a board, optionally rearrange it, and print it
    Ingest(cli::ingest::IngestArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match dropboard_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `dropboard config path`."
            );
            dropboard_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Dropboard v{}", dropboard_core::VERSION);

    match cli.command {
        Commands::Ingest(args) => cli::ingest::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
