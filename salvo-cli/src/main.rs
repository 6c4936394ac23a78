//! # salvo
//!
//! Two-player Battleship over a shared SQLite file.
//!
//! Both players run `salvo` against the same data directory. There is no
//! server: each move is a transaction on `game_<id>.db`, and each side
//! notices the other's moves by polling.
//!
//! ## Commands
//!
//! - `start`: Create a game and play as red
//! - `join`: Join a game and play as blue
//! - `watch`: Show both fleets as the game unfolds
//! - `status`: Print tables, turn, board counts and recent moves
//!
//! ## Example
//!
//! ```bash
//! # Terminal 1
//! salvo start harbor
//!
//! # Terminal 2
//! salvo join harbor
//!
//! # Anyone
//! salvo watch harbor
//! ```

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use salvo_types::GameId;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::play::Placement;
use commands::{join, start, status, watch, Context};
use config::Config;
use render::Terminal;

/// Two-player Battleship over a shared SQLite file.
#[derive(Parser, Debug)]
#[command(name = "salvo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: salvo.toml in the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding game databases
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a game and play as red
    Start {
        /// Game ID (generated if omitted)
        id: Option<GameId>,

        /// Place ships by hand instead of at random
        #[arg(long)]
        manual: bool,
    },

    /// Join a game and play as blue
    Join {
        /// Game ID
        id: GameId,

        /// Place ships by hand instead of at random
        #[arg(long)]
        manual: bool,
    },

    /// Watch a game with both fleets visible
    Watch {
        /// Game ID
        id: GameId,
    },

    /// Show the state of a game database
    Status {
        /// Game ID
        id: GameId,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dirs = directories::ProjectDirs::from("io", "salvo", "salvo");
    let default_config = dirs.as_ref().map(|d| d.config_dir().join("salvo.toml"));
    let config = Config::load(cli.config.as_deref(), default_config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.filter_or_default()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Determine data directory
    let data_dir = match cli.data_dir.or_else(|| config.store.data_dir.clone()) {
        Some(dir) => dir,
        None => dirs
            .map(|d| d.data_dir().to_path_buf())
            .context("Could not determine home directory")?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let ctx = Context {
        data_dir,
        config,
        term: Terminal::detect(),
    };

    match cli.command {
        Commands::Start { id, manual } => {
            start::run(&ctx, id, placement(manual)).await?;
        }
        Commands::Join { id, manual } => {
            join::run(&ctx, &id, placement(manual)).await?;
        }
        Commands::Watch { id } => {
            watch::run(&ctx, &id).await?;
        }
        Commands::Status { id } => {
            status::run(&ctx, &id).await?;
        }
    }

    Ok(())
}

fn placement(manual: bool) -> Placement {
    if manual {
        Placement::Manual
    } else {
        Placement::Random
    }
}
