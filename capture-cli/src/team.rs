//! Team files
//!
//! A team is a name plus one agent config per teammate, as JSON:
//!
//! ```json
//! {
//!   "name": "balanced",
//!   "agents": [
//!     { "role": "offense", "depth": 2 },
//!     { "role": "defense", "depth": 2, "rotation": "nearest_invader" }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use capture_arena::TeamSetup;
use capture_core::{AgentConfig, Role, RotationPolicy};
use serde::{Deserialize, Serialize};

/// Names accepted by `TeamConfig::builtin`
pub const BUILTIN_TEAMS: &[&str] = &["balanced", "offensive", "reflex", "baseline"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    pub agents: [AgentConfig; 2],
}

impl TeamConfig {
    pub fn builtin(name: &str) -> Option<Self> {
        let agents = match name {
            "balanced" => [
                AgentConfig::for_role(Role::Offense),
                AgentConfig::for_role(Role::Defense).with_rotation(RotationPolicy::NearestInvader),
            ],
            "offensive" => [
                AgentConfig::for_role(Role::Offense),
                AgentConfig::for_role(Role::Offense).with_depth(1),
            ],
            "reflex" => [
                AgentConfig::for_role(Role::Offense).with_depth(0),
                AgentConfig::for_role(Role::Defense).with_depth(0),
            ],
            "baseline" => [
                AgentConfig::for_role(Role::Baseline).with_depth(1),
                AgentConfig::for_role(Role::Baseline).with_depth(1),
            ],
            _ => return None,
        };
        Some(Self {
            name: name.to_string(),
            agents,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read team file: {}", path.display()))?;
        let team: TeamConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse team file: {}", path.display()))?;
        team.validate()?;
        Ok(team)
    }

    /// Builtin team name or path to a team file
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        match Self::builtin(name_or_path) {
            Some(team) => Ok(team),
            None => Self::load(Path::new(name_or_path)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (slot, agent) in self.agents.iter().enumerate() {
            agent
                .validate()
                .with_context(|| format!("team {} agent {}", self.name, slot))?;
        }
        Ok(())
    }

    pub fn into_setup(self) -> TeamSetup {
        TeamSetup {
            name: self.name,
            agents: self.agents.to_vec(),
        }
    }
}
