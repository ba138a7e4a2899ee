//! CAPTURE Arena - Reference world for the search agents
//!
//! This crate hosts full matches for `capture-core` agents:
//! - Text maze layouts with spawn, food and capsule markers
//! - Precomputed maze distances
//! - A game state implementing the core's `Observation` contract
//! - Match play between two teams, sequential or parallel
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: CLI commands (in `capture-cli`)
//! - Level 2: play_match (phases)
//! - Level 3: play_game, create_agents (steps)
//! - Level 4: layout, distancer, state (utilities)

mod distancer;
mod layout;
mod match_play;
mod state;

pub use distancer::Distancer;
pub use layout::{team_of, Layout, BUILTIN_LAYOUTS};
pub use match_play::{play_match, GameOutcome, MatchConfig, MatchResult, TeamSetup};
pub use state::{AgentState, GameState, DEFAULT_MOVES, SCARED_MOVES, SIGHT_RANGE};
