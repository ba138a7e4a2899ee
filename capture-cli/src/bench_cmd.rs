//! Bench command - head-to-head match between two teams
//!
//! Plays a batch of games with alternating sides and reports win rates
//! together with throughput.
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_teams(), report_results()
//! - Level 3: play_match() (capture-arena)
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;

use capture_arena::{play_match, Layout, MatchConfig, MatchResult, DEFAULT_MOVES};

use crate::team::TeamConfig;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchArgs {
    /// First team: builtin name or team JSON file
    #[arg(long, default_value = "balanced")]
    pub first: String,

    /// Second team: builtin name or team JSON file
    #[arg(long, default_value = "baseline")]
    pub second: String,

    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Maze: builtin name or layout file
    #[arg(long, default_value = "default")]
    pub layout: String,

    /// Move budget per game
    #[arg(long, default_value_t = DEFAULT_MOVES)]
    pub max_moves: u32,

    /// Play games one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Match result plus timing
struct BenchReport {
    first: String,
    second: String,
    layout: String,
    seed: u64,
    result: MatchResult,
    total_time: Duration,
}

impl BenchReport {
    fn games_per_second(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs > 0.0 {
            self.result.games_played as f64 / secs
        } else {
            0.0
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run bench command
///
/// 1. Load both teams and the layout
/// 2. Play the match
/// 3. Report win rates and timing
pub fn run(args: BenchArgs, seed: u64) -> Result<()> {
    let (first, second) = load_teams(&args)?;
    let layout = Layout::resolve(&args.layout)?;

    tracing::info!(
        "Benchmarking {} vs {} over {} games on {} [seed={}]",
        first.name,
        second.name,
        args.games,
        args.layout,
        seed
    );

    let config = MatchConfig {
        games: args.games,
        max_moves: args.max_moves,
        seed,
        parallel: !args.sequential,
    };

    let start = Instant::now();
    let result = play_match(layout, &first.clone().into_setup(), &second.clone().into_setup(), config)?;
    let total_time = start.elapsed();

    let report = BenchReport {
        first: first.name,
        second: second.name,
        layout: args.layout.clone(),
        seed,
        result,
        total_time,
    };
    report_results(&report, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_teams(args: &BenchArgs) -> Result<(TeamConfig, TeamConfig)> {
    let first = TeamConfig::resolve(&args.first)
        .with_context(|| format!("Failed to load first team: {}", args.first))?;
    let second = TeamConfig::resolve(&args.second)
        .with_context(|| format!("Failed to load second team: {}", args.second))?;
    Ok((first, second))
}

fn report_results(report: &BenchReport, json: bool) -> Result<()> {
    if json {
        print_json_results(report)
    } else {
        print_text_results(report);
        Ok(())
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 60 {
        format!("{}m {:.1}s", d.as_secs() / 60, (d.as_secs() % 60) as f64 + d.subsec_millis() as f64 / 1000.0)
    } else if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    }
}

fn print_json_results(report: &BenchReport) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        first: &'a str,
        second: &'a str,
        layout: &'a str,
        seed: u64,
        first_win_rate: f32,
        first_score: f32,
        second_score: f32,
        total_time_ms: u64,
        games_per_second: f64,
        result: &'a MatchResult,
    }

    let output = JsonOutput {
        first: &report.first,
        second: &report.second,
        layout: &report.layout,
        seed: report.seed,
        first_win_rate: report.result.first_win_rate(),
        first_score: report.result.score_for_first(),
        second_score: report.result.score_for_second(),
        total_time_ms: report.total_time.as_millis() as u64,
        games_per_second: report.games_per_second(),
        result: &report.result,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_results(report: &BenchReport) {
    let result = &report.result;

    println!("\n=== CAPTURE Bench Results ===");
    println!("Layout: {}  Seed: {}\n", report.layout, report.seed);

    println!(
        "{:<20} {:>6} {:>8} {:>8}",
        "Team", "Wins", "Score", "Win %"
    );
    println!("{}", "-".repeat(46));
    println!(
        "{:<20} {:>6} {:>8.1} {:>7.1}%",
        report.first,
        result.first_wins,
        result.score_for_first(),
        result.first_win_rate() * 100.0
    );
    let second_rate = if result.games_played > 0 {
        result.second_wins as f32 / result.games_played as f32
    } else {
        0.0
    };
    println!(
        "{:<20} {:>6} {:>8.1} {:>7.1}%",
        report.second,
        result.second_wins,
        result.score_for_second(),
        second_rate * 100.0
    );

    println!("\nDraws:        {}", result.draws);
    println!("Games:        {}", result.games_played);
    println!("Avg moves:    {:.1}", result.avg_moves);
    println!("Total time:   {}", format_duration(report.total_time));
    println!("Games/s:      {:.2}", report.games_per_second());

    let escapes: u32 = result.game_outcomes.iter().map(|g| g.escapes).sum();
    let faults: u32 = result.game_outcomes.iter().map(|g| g.faults).sum();
    if escapes > 0 || faults > 0 {
        println!("Escapes:      {}", escapes);
        println!("Faults:       {}", faults);
    }
}
