//! Baseline role: score difference only

use crate::features::{FeatureExtractor, FeatureVector, WeightTable};
use crate::memory::AgentMemory;
use crate::observation::{Action, Observation};

const FEATURES: &[&str] = &["successorScore"];

pub(crate) fn default_weights() -> WeightTable {
    WeightTable::from_pairs(&[("successorScore", 1.0)])
}

/// Scores a state by the team's current score and nothing else
pub struct BaselineFeatures;

impl<O: Observation> FeatureExtractor<O> for BaselineFeatures {
    fn role(&self) -> &'static str {
        "baseline"
    }

    fn feature_names(&self) -> &'static [&'static str] {
        FEATURES
    }

    fn extract(
        &self,
        observation: &O,
        memory: &AgentMemory<O>,
        _action: Option<Action>,
    ) -> FeatureVector {
        let mut features = FeatureVector::new();
        features.set("successorScore", observation.score(memory.team()));
        features
    }
}
