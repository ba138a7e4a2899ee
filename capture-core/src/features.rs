//! Sparse linear evaluation
//!
//! A state is scored as the dot product of a sparse feature vector with a
//! fixed weight table. Features absent from the vector contribute nothing;
//! a feature present without a weight is a configuration fault.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::memory::AgentMemory;
use crate::observation::{Action, Observation};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Named feature values emitted for one state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureVector {
    values: FxHashMap<&'static str, f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: f64) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }
}

// ============================================================================
// WEIGHT TABLE
// ============================================================================

/// Feature name to coefficient, fixed per agent role
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    weights: FxHashMap<String, f64>,
}

impl WeightTable {
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self {
            weights: pairs
                .iter()
                .map(|(name, weight)| (name.to_string(), *weight))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.weights.get(name).copied()
    }

    pub fn set(&mut self, name: &str, weight: f64) {
        self.weights.insert(name.to_string(), weight);
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Names from `features` that have no weight entry
    pub fn missing<'a>(&self, features: &[&'a str]) -> Vec<&'a str> {
        features
            .iter()
            .copied()
            .filter(|name| !self.weights.contains_key(*name))
            .collect()
    }

    /// Weighted sum over the features present in the vector
    pub fn reduce(&self, features: &FeatureVector, role: &'static str) -> Result<f64, SearchError> {
        let mut total = 0.0;
        for (name, value) in features.iter() {
            let weight = self
                .get(name)
                .ok_or_else(|| SearchError::UnweightedFeature {
                    feature: name.to_string(),
                    role,
                })?;
            total += value * weight;
        }
        Ok(total)
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Role-specific feature extraction
///
/// Extraction is pure with respect to the observation but may read the
/// agent's cross-turn memory (timers, spawn cells, previous tick).
pub trait FeatureExtractor<O: Observation>: Send + Sync {
    /// Role name, used in diagnostics
    fn role(&self) -> &'static str;

    /// Every feature name this extractor can emit
    fn feature_names(&self) -> &'static [&'static str];

    /// Features of `observation`; `action` is set only in one-ply reflex mode
    fn extract(
        &self,
        observation: &O,
        memory: &AgentMemory<O>,
        action: Option<Action>,
    ) -> FeatureVector;
}

/// Static evaluation at a search leaf
pub trait Evaluate<O> {
    fn evaluate(&self, observation: &O) -> Result<f64, SearchError>;
}

/// Extractor, weights and memory bound together for one decision
pub struct Evaluator<'a, O: Observation> {
    extractor: &'a dyn FeatureExtractor<O>,
    weights: &'a WeightTable,
    memory: &'a AgentMemory<O>,
}

impl<'a, O: Observation> Evaluator<'a, O> {
    pub fn new(
        extractor: &'a dyn FeatureExtractor<O>,
        weights: &'a WeightTable,
        memory: &'a AgentMemory<O>,
    ) -> Self {
        Self {
            extractor,
            weights,
            memory,
        }
    }

    pub fn features(&self, observation: &O, action: Option<Action>) -> FeatureVector {
        self.extractor.extract(observation, self.memory, action)
    }

    /// One-ply variant: `observation` is the successor produced by `action`
    pub fn evaluate_action(&self, observation: &O, action: Action) -> Result<f64, SearchError> {
        let features = self.features(observation, Some(action));
        self.weights.reduce(&features, self.extractor.role())
    }
}

impl<'a, O: Observation> Evaluate<O> for Evaluator<'a, O> {
    fn evaluate(&self, observation: &O) -> Result<f64, SearchError> {
        let features = self.features(observation, None);
        self.weights.reduce(&features, self.extractor.role())
    }
}
