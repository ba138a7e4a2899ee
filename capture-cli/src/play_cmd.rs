//! Play command - one game between two teams
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_match(), report_game()
//! - Level 3: play_match() (capture-arena)
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;

use capture_arena::{play_match, GameOutcome, Layout, MatchConfig, DEFAULT_MOVES};
use capture_core::Team;

use crate::team::TeamConfig;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Red team: builtin name or team JSON file
    #[arg(long, default_value = "balanced")]
    pub red: String,

    /// Blue team: builtin name or team JSON file
    #[arg(long, default_value = "baseline")]
    pub blue: String,

    /// Maze: builtin name or layout file
    #[arg(long, default_value = "default")]
    pub layout: String,

    /// Move budget shared by all agents
    #[arg(long, default_value_t = DEFAULT_MOVES)]
    pub max_moves: u32,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Load both teams and the layout
/// 2. Play one game
/// 3. Report the outcome
pub fn run(args: PlayArgs, seed: u64) -> Result<()> {
    let (red, blue, layout) = load_match(&args)?;

    tracing::info!(
        "Starting game: {} (red) vs {} (blue) on {} [seed={}]",
        red.name,
        blue.name,
        args.layout,
        seed
    );

    let config = MatchConfig {
        games: 1,
        max_moves: args.max_moves,
        seed,
        parallel: false,
    };
    let result = play_match(layout, &red.into_setup(), &blue.into_setup(), config)?;
    let outcome = result
        .game_outcomes
        .first()
        .context("match finished without a game")?;

    report_game(outcome, seed, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_match(args: &PlayArgs) -> Result<(TeamConfig, TeamConfig, Layout)> {
    let red = TeamConfig::resolve(&args.red)
        .with_context(|| format!("Failed to load red team: {}", args.red))?;
    let blue = TeamConfig::resolve(&args.blue)
        .with_context(|| format!("Failed to load blue team: {}", args.blue))?;
    let layout = Layout::resolve(&args.layout)?;
    Ok((red, blue, layout))
}

fn report_game(outcome: &GameOutcome, seed: u64, json: bool) -> Result<()> {
    if json {
        #[derive(serde::Serialize)]
        struct JsonGame<'a> {
            seed: u64,
            #[serde(flatten)]
            outcome: &'a GameOutcome,
        }
        println!("{}", serde_json::to_string_pretty(&JsonGame { seed, outcome })?);
    } else {
        print_text_game(outcome, seed);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

pub(crate) fn winner_label(outcome: &GameOutcome) -> String {
    match outcome.winner {
        Some(Team::Red) => format!("{} (red)", outcome.red),
        Some(Team::Blue) => format!("{} (blue)", outcome.blue),
        None => "draw".to_string(),
    }
}

fn print_text_game(outcome: &GameOutcome, seed: u64) {
    println!("\n=== Game Result ===");
    println!("Red:        {}", outcome.red);
    println!("Blue:       {}", outcome.blue);
    println!("Winner:     {}", winner_label(outcome));
    println!("Score:      {:+}", outcome.red_score);
    println!("Moves:      {}", outcome.moves);
    println!(
        "Food left:  red {} / blue {}",
        outcome.red_food_left, outcome.blue_food_left
    );
    if outcome.escapes > 0 || outcome.faults > 0 {
        println!("Escapes:    {}", outcome.escapes);
        println!("Faults:     {}", outcome.faults);
    }
    println!("Seed:       {}", seed);
}
