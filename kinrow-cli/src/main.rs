//! KINROW CLI - Command-line interface
//!
//! Commands:
//! - play: Play against the computer in the terminal
//! - match: Play a series of AI vs AI games
//! - bench: Compare search cost with and without pruning

mod benchmark;
mod match_cmd;
mod play;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kinrow_core::GameConfig;

#[derive(Parser)]
#[command(name = "kinrow")]
#[command(about = "K-in-a-row games with a minimax opponent")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer
    Play(play::PlayArgs),
    /// Play AI vs AI games
    Match(match_cmd::MatchArgs),
    /// Benchmark search with and without pruning
    Bench(benchmark::BenchmarkArgs),
}

/// Which game to play, shared by all commands
#[derive(Args, Clone, Debug)]
pub struct GameArgs {
    /// Built-in game: connect-four or tic-tac-toe
    #[arg(long, default_value = "connect-four")]
    pub game: String,

    /// Custom game config JSON file (overrides --game)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl GameArgs {
    pub fn load(&self) -> Result<GameConfig> {
        if let Some(path) = &self.config {
            return GameConfig::load(path);
        }
        match GameConfig::preset(&self.game) {
            Some(config) => Ok(config),
            None => bail!("Unknown game '{}' (expected connect-four or tic-tac-toe)", self.game),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Bench(args) => benchmark::run(args, cli.seed),
    }
}
