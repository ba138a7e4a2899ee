//! Generalized alpha-beta over a turn rotation
//!
//! The participant at cursor 0 maximizes; every other participant minimizes
//! the same utility on its own turn. Depth counts full rotations and drops
//! only when the cursor wraps back to the maximizer.
//!
//! The walker is deterministic. Tie-breaking randomness lives in the caller.

use crate::error::SearchError;
use crate::features::Evaluate;
use crate::observation::{Action, AgentIndex, Observation};
use crate::rotation::Rotation;

// ============================================================================
// SUCCESSOR CANONICALIZATION
// ============================================================================

/// Successor that always lands the acting agent on a lattice cell
///
/// A slowed agent can stop halfway between cells. The same action is then
/// applied once more so every ply moves a whole cell.
pub fn canonical_successor<O: Observation>(observation: &O, agent: AgentIndex, action: Action) -> O {
    let next = observation.successor(agent, action);
    match next.position(agent) {
        Some(position) if !position.is_lattice() => next.successor(agent, action),
        _ => next,
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// Counters for one decision's worth of search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered, leaves included
    pub nodes: u64,
    /// Nodes scored by the evaluator
    pub leaves: u64,
    /// Alpha and beta cutoffs taken
    pub cutoffs: u64,
}

/// Alpha-beta walker bound to one rotation and one evaluator
pub struct AlphaBeta<'a, E> {
    rotation: &'a Rotation,
    evaluator: &'a E,
    stats: SearchStats,
}

impl<'a, E> AlphaBeta<'a, E> {
    pub fn new(rotation: &'a Rotation, evaluator: &'a E) -> Self {
        Self {
            rotation,
            evaluator,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Utility of `observation` with the participant at `cursor` to move
    pub fn score<O>(
        &mut self,
        observation: &O,
        depth: u32,
        cursor: usize,
        alpha: f64,
        beta: f64,
    ) -> Result<f64, SearchError>
    where
        O: Observation,
        E: Evaluate<O>,
    {
        self.stats.nodes += 1;

        let agent = self.rotation.participant(cursor);
        let actions = if depth == 0 {
            Vec::new()
        } else {
            observation.legal_actions(agent)
        };
        if actions.is_empty() {
            self.stats.leaves += 1;
            return self.evaluator.evaluate(observation);
        }

        let (next_cursor, next_depth) = self.rotation.advance(cursor, depth);
        if self.rotation.is_maximizer(cursor) {
            self.maximize(observation, agent, &actions, next_depth, next_cursor, alpha, beta)
        } else {
            self.minimize(observation, agent, &actions, next_depth, next_cursor, alpha, beta)
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn maximize<O>(
        &mut self,
        observation: &O,
        agent: AgentIndex,
        actions: &[Action],
        depth: u32,
        cursor: usize,
        mut alpha: f64,
        beta: f64,
    ) -> Result<f64, SearchError>
    where
        O: Observation,
        E: Evaluate<O>,
    {
        let mut value = f64::NEG_INFINITY;
        for &action in actions {
            let child = canonical_successor(observation, agent, action);
            value = value.max(self.score(&child, depth, cursor, alpha, beta)?);
            if value >= beta {
                self.stats.cutoffs += 1;
                return Ok(value);
            }
            alpha = alpha.max(value);
        }
        Ok(value)
    }

    #[allow(clippy::too_many_arguments)]
    fn minimize<O>(
        &mut self,
        observation: &O,
        agent: AgentIndex,
        actions: &[Action],
        depth: u32,
        cursor: usize,
        alpha: f64,
        mut beta: f64,
    ) -> Result<f64, SearchError>
    where
        O: Observation,
        E: Evaluate<O>,
    {
        let mut value = f64::INFINITY;
        for &action in actions {
            let child = canonical_successor(observation, agent, action);
            value = value.min(self.score(&child, depth, cursor, alpha, beta)?);
            if value <= alpha {
                self.stats.cutoffs += 1;
                return Ok(value);
            }
            beta = beta.min(value);
        }
        Ok(value)
    }
}

// ============================================================================
// TESTS
// ============================================================================
