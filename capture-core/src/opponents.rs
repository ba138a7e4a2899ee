//! Opponent reduction
//!
//! Picks which adversaries take part in the search rotation for one tick.
//! Modeling every opponent at depth 2 multiplies the branching factor past
//! the tick budget, so deeper searches keep only the closest one.
//!
//! Unobservable opponents never take part in a distance comparison. When no
//! opponent can be compared the first opponent in enumeration order is used.

use crate::config::RotationPolicy;
use crate::memory::AgentMemory;
use crate::observation::{AgentIndex, Observation};
use crate::rotation::Rotation;

/// Build the rotation for one decision tick
pub fn select_rotation<O: Observation>(
    observation: &O,
    memory: &AgentMemory<O>,
    policy: RotationPolicy,
    depth: u32,
) -> Rotation {
    let me = memory.self_index();
    let opponents = memory.opponents();
    if opponents.is_empty() {
        return Rotation::new(me, &[]);
    }

    let chosen = match resolve(policy, depth) {
        RotationPolicy::Full => return Rotation::new(me, opponents),
        RotationPolicy::NearestInvader => {
            let invaders: Vec<AgentIndex> = opponents
                .iter()
                .copied()
                .filter(|&agent| observation.is_attacking(agent))
                .collect();
            nearest(observation, me, &invaders).or_else(|| nearest(observation, me, opponents))
        }
        _ => nearest(observation, me, opponents),
    };

    let minimizer = chosen.unwrap_or(opponents[0]);
    tracing::trace!(agent = me, minimizer, ?policy, "rotation selected");
    Rotation::new(me, &[minimizer])
}

/// `Auto` is full-width when shallow, nearest-one otherwise
fn resolve(policy: RotationPolicy, depth: u32) -> RotationPolicy {
    match policy {
        RotationPolicy::Auto if depth <= 1 => RotationPolicy::Full,
        RotationPolicy::Auto => RotationPolicy::Nearest,
        other => other,
    }
}

/// Closest observable candidate by maze distance; ties keep the earlier one
fn nearest<O: Observation>(
    observation: &O,
    me: AgentIndex,
    candidates: &[AgentIndex],
) -> Option<AgentIndex> {
    let here = observation.position(me)?.nearest_cell();
    let mut best: Option<(AgentIndex, f64)> = None;

    for &agent in candidates {
        let Some(position) = observation.position(agent) else {
            continue;
        };
        let distance = observation.maze_distance(here, position.nearest_cell());
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((agent, distance)),
        }
    }

    best.map(|(agent, _)| agent)
}
