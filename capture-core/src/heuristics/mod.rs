//! Evaluation roles
//!
//! Each role is one feature extractor plus a default weight table. Weight
//! values are tuning data; the feature definitions are the design.

mod baseline;
mod defense;
mod offense;

pub use baseline::BaselineFeatures;
pub use defense::DefenseFeatures;
pub use offense::OffenseFeatures;

use serde::{Deserialize, Serialize};

use crate::features::{FeatureExtractor, FeatureVector, WeightTable};
use crate::memory::AgentMemory;
use crate::observation::{Action, AgentIndex, Cell, Observation};

/// Evaluation role of an agent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Score difference only
    Baseline,
    /// Raids the opposing half for food
    #[default]
    Offense,
    /// Guards the home half against invaders
    Defense,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::Baseline => "baseline",
            Role::Offense => "offense",
            Role::Defense => "defense",
        }
    }

    pub fn default_weights(self) -> WeightTable {
        match self {
            Role::Baseline => baseline::default_weights(),
            Role::Offense => offense::default_weights(),
            Role::Defense => defense::default_weights(),
        }
    }

    pub fn extractor<O: Observation + 'static>(self) -> Box<dyn FeatureExtractor<O>> {
        match self {
            Role::Baseline => Box::new(BaselineFeatures),
            Role::Offense => Box::new(OffenseFeatures),
            Role::Defense => Box::new(DefenseFeatures),
        }
    }
}

// ============================================================================
// SHARED FEATURE HELPERS
// ============================================================================

/// Closeness in (0, 1]: 1 when on top of the target
fn closeness(distance: f64) -> f64 {
    1.0 / (distance + 1.0)
}

/// Shortest maze distance from `from` to any of `targets`
fn nearest_distance<O: Observation>(
    observation: &O,
    from: Cell,
    targets: impl IntoIterator<Item = Cell>,
) -> Option<f64> {
    targets
        .into_iter()
        .map(|target| observation.maze_distance(from, target))
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Cells of the given opponents whose positions are observable
fn visible_cells<O: Observation>(
    observation: &O,
    agents: impl IntoIterator<Item = AgentIndex>,
) -> Vec<Cell> {
    agents
        .into_iter()
        .filter_map(|agent| observation.position(agent))
        .map(|position| position.nearest_cell())
        .collect()
}

/// `frozen` and `captured`, both judged against the previous tick
fn lookback_features<O: Observation>(
    features: &mut FeatureVector,
    observation: &O,
    memory: &AgentMemory<O>,
) {
    if memory.unmoved_since_previous(observation) {
        features.set("frozen", 1.0);
    }
    if memory.self_died_since_previous(observation) {
        features.set("captured", 1.0);
    }
}

/// `stop` and `reverse`, only in one-ply reflex mode
fn action_features<O: Observation>(
    features: &mut FeatureVector,
    memory: &AgentMemory<O>,
    action: Option<Action>,
) {
    let Some(action) = action else {
        return;
    };
    if action == Action::Stop {
        features.set("stop", 1.0);
    }
    let heading = memory.heading();
    if heading != Action::Stop && action == heading.reverse() {
        features.set("reverse", 1.0);
    }
}
