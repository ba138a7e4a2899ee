//! Per-tick action selection
//!
//! One decision runs, in order: tracker update, stuck guard, rotation
//! selection, then a full-window search under every legal root action.
//! The best-scoring actions are tied fairly with a seeded RNG.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::AgentConfig;
use crate::error::{ConfigError, SearchError};
use crate::features::{Evaluator, FeatureExtractor, WeightTable};
use crate::memory::{AgentMemory, TickEvents};
use crate::observation::{Action, AgentIndex, Observation};
use crate::opponents::select_rotation;
use crate::search::{canonical_successor, AlphaBeta, SearchStats};

/// Outcome of one decision tick
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    /// Chosen by search; `tied` counts root actions sharing the best value
    Searched {
        action: Action,
        value: f64,
        tied: usize,
    },
    /// Random legal action taken to break out of a stuck position
    Escaped { action: Action },
    /// The agent had no legal action at all
    NoLegalActions,
}

impl Decision {
    pub fn action(&self) -> Option<Action> {
        match self {
            Decision::Searched { action, .. } | Decision::Escaped { action } => Some(*action),
            Decision::NoLegalActions => None,
        }
    }
}

/// Alpha-beta agent with persistent per-match memory
pub struct SearchAgent<O: Observation> {
    index: AgentIndex,
    config: AgentConfig,
    weights: WeightTable,
    extractor: Box<dyn FeatureExtractor<O>>,
    memory: Option<AgentMemory<O>>,
    rng: ChaCha8Rng,
    last_stats: SearchStats,
}

impl<O: Observation + 'static> SearchAgent<O> {
    pub fn new(index: AgentIndex, config: AgentConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let extractor = config.role.extractor::<O>();
        let weights = config.weight_table();
        let missing = weights.missing(extractor.feature_names());
        if !missing.is_empty() {
            tracing::warn!(agent = index, role = config.role.name(), ?missing, "weight table is incomplete");
        }

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            index,
            config,
            weights,
            extractor,
            memory: None,
            rng,
            last_stats: SearchStats::default(),
        })
    }

    /// Record spawn cells and roster from the opening observation
    pub fn initialize(&mut self, observation: &O) {
        let memory = AgentMemory::initialize(self.index, observation);
        tracing::debug!(
            agent = self.index,
            role = self.config.role.name(),
            depth = self.config.depth,
            opponents = ?memory.opponents(),
            "agent initialized"
        );
        self.memory = Some(memory);
    }

    /// Pick this tick's action
    pub fn choose_action(&mut self, observation: &O) -> Result<Decision, SearchError> {
        let tracker = self.config.tracker();
        let depth = self.depth_for(observation);
        let memory = self
            .memory
            .as_mut()
            .ok_or(SearchError::Uninitialized(self.index))?;

        let events = memory.observe(observation, &tracker);
        log_events(self.index, &events);

        let actions = observation.legal_actions(self.index);
        if actions.is_empty() {
            memory.remember(observation.clone());
            return Ok(Decision::NoLegalActions);
        }

        if events.stuck {
            let action = actions[self.rng.gen_range(0..actions.len())];
            memory.reset_stuck();
            memory.remember(observation.clone());
            tracing::debug!(agent = self.index, action = action.as_str(), "stuck, escaping at random");
            return Ok(Decision::Escaped { action });
        }

        let rotation = select_rotation(observation, memory, self.config.rotation, depth);
        let evaluator = Evaluator::new(self.extractor.as_ref(), &self.weights, memory);
        let mut search = AlphaBeta::new(&rotation, &evaluator);
        let (cursor, remaining) = rotation.advance(0, depth);

        let mut scored = Vec::with_capacity(actions.len());
        for &action in &actions {
            let child = canonical_successor(observation, self.index, action);
            let value = if depth == 0 {
                evaluator.evaluate_action(&child, action)?
            } else {
                search.score(&child, remaining, cursor, f64::NEG_INFINITY, f64::INFINITY)?
            };
            scored.push((action, value));
        }
        self.last_stats = search.stats();

        let best = scored
            .iter()
            .map(|&(_, value)| value)
            .fold(f64::NEG_INFINITY, f64::max);
        let tied: Vec<Action> = scored
            .iter()
            .filter(|&&(_, value)| value == best)
            .map(|&(action, _)| action)
            .collect();
        let action = if tied.is_empty() {
            // Every root value was NaN
            actions[0]
        } else {
            tied[self.rng.gen_range(0..tied.len())]
        };

        tracing::debug!(
            agent = self.index,
            action = action.as_str(),
            value = best,
            tied = tied.len(),
            depth,
            rotation = ?rotation.minimizers(),
            nodes = self.last_stats.nodes,
            cutoffs = self.last_stats.cutoffs,
            "decision"
        );

        memory.remember(observation.clone());
        Ok(Decision::Searched {
            action,
            value: best,
            tied: tied.len(),
        })
    }

    /// Configured depth, capped at 1 once the clock runs low
    fn depth_for(&self, observation: &O) -> u32 {
        match self.config.low_time_threshold {
            Some(threshold) if observation.time_remaining() < threshold => self.config.depth.min(1),
            _ => self.config.depth,
        }
    }

    pub fn index(&self) -> AgentIndex {
        self.index
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// `None` until `initialize` has run
    pub fn memory(&self) -> Option<&AgentMemory<O>> {
        self.memory.as_ref()
    }

    /// Search counters from the most recent searched decision
    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }
}

fn log_events(agent: AgentIndex, events: &TickEvents) {
    if events.opponents_now_vulnerable {
        tracing::debug!(agent, "opponents vulnerable");
    }
    if events.self_now_vulnerable {
        tracing::debug!(agent, "own defenders vulnerable");
    }
    if events.self_died {
        tracing::debug!(agent, "captured, back at spawn");
    }
    for opponent in &events.opponents_died {
        tracing::debug!(agent, opponent, "opponent captured");
    }
}
