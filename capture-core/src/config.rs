//! Agent configuration
//!
//! Loaded once at agent construction and immutable afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::features::WeightTable;
use crate::heuristics::Role;

/// Deepest search the per-tick budget tolerates
pub const MAX_DEPTH: u32 = 2;

/// Ticks of immobility before search is bypassed
pub const DEFAULT_STUCK_THRESHOLD: u32 = 10;

/// Length of the vulnerability window opened by a capsule
pub const DEFAULT_VULNERABLE_TICKS: u32 = 40;

/// How many adversaries take part in the search rotation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Full at depth 1 or less, nearest-one deeper
    #[default]
    Auto,
    /// Every opponent, in host enumeration order
    Full,
    /// Only the observable opponent closest by maze distance
    Nearest,
    /// The closest observable invader, else the closest observable opponent
    NearestInvader,
}

/// Constants read by the temporal state tracker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackerConfig {
    pub vulnerable_ticks: u32,
    pub stuck_threshold: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            vulnerable_ticks: DEFAULT_VULNERABLE_TICKS,
            stuck_threshold: DEFAULT_STUCK_THRESHOLD,
        }
    }
}

/// Configuration for one search agent
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Evaluation role (feature extractor and default weights)
    pub role: Role,
    /// Search depth in full rotations; 0 degenerates to one-ply reflex
    pub depth: u32,
    /// Opponent selection for the rotation
    pub rotation: RotationPolicy,
    pub stuck_threshold: u32,
    pub vulnerable_ticks: u32,
    /// Below this many time units remaining, depth is capped at 1
    pub low_time_threshold: Option<f64>,
    /// Replaces the role's default weight table when present
    pub weights: Option<WeightTable>,
    /// Random seed for reproducibility (None = entropy)
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            role: Role::Offense,
            depth: MAX_DEPTH,
            rotation: RotationPolicy::Auto,
            stuck_threshold: DEFAULT_STUCK_THRESHOLD,
            vulnerable_ticks: DEFAULT_VULNERABLE_TICKS,
            low_time_threshold: None,
            weights: None,
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Default config for a role
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            ..Default::default()
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse from a JSON string and validate
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth > MAX_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "depth {} exceeds the supported maximum of {}",
                self.depth, MAX_DEPTH
            )));
        }
        if self.stuck_threshold == 0 {
            return Err(ConfigError::Invalid(
                "stuck_threshold must be at least 1".to_string(),
            ));
        }
        if let Some(threshold) = self.low_time_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "low_time_threshold must be a non-negative number, got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }

    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig {
            vulnerable_ticks: self.vulnerable_ticks,
            stuck_threshold: self.stuck_threshold,
        }
    }

    /// The configured weight table, or the role's defaults
    pub fn weight_table(&self) -> WeightTable {
        self.weights
            .clone()
            .unwrap_or_else(|| self.role.default_weights())
    }
}
