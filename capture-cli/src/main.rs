//! CAPTURE CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single game and print the outcome
//! - bench: Play a batch of games between two teams

mod bench_cmd;
mod play_cmd;
mod team;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "capture")]
#[command(about = "Adversarial search agents for two-team capture-the-flag mazes")]
struct Cli {
    /// Seed for reproducible runs (random when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Play many games between two teams
    Bench(bench_cmd::BenchArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, seed),
        Commands::Bench(args) => bench_cmd::run(args, seed),
    }
}
