//! CAPTURE Core - Adversarial search agent
//!
//! This crate provides the decision core for a capture-the-flag agent:
//! - Observation contract consumed from the host world
//! - Turn rotation over one maximizer and N minimizers
//! - Generalized alpha-beta search
//! - Sparse linear evaluation (named features times a weight table)
//! - Opponent reduction to keep branching inside the tick budget
//! - Cross-turn memory (vulnerability timers, stuck counter, death inference)
//! - Per-tick action selection with random tie-break

pub mod observation;
pub mod error;
pub mod config;
pub mod rotation;
pub mod features;
pub mod heuristics;
pub mod memory;
pub mod opponents;
pub mod search;
pub mod agent;

#[cfg(test)]
pub(crate) mod mock;

// Re-exports for convenient access
pub use observation::{Action, AgentIndex, Cell, Observation, Position, Team, ACTIONS};
pub use error::{ConfigError, SearchError};
pub use config::{AgentConfig, RotationPolicy, TrackerConfig};
pub use rotation::Rotation;
pub use features::{Evaluate, Evaluator, FeatureExtractor, FeatureVector, WeightTable};
pub use heuristics::Role;
pub use memory::{AgentMemory, TickEvents};
pub use opponents::select_rotation;
pub use search::{canonical_successor, AlphaBeta, SearchStats};
pub use agent::{Decision, SearchAgent};
