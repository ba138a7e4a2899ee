//! Offense role: raid the opposing half
//!
//! Food and capsules are read from the opponents' half. Ghosts (observable
//! opponents on their home half) are threats while our capsule window is
//! closed and prey while it is open.

use crate::features::{FeatureExtractor, FeatureVector, WeightTable};
use crate::memory::AgentMemory;
use crate::observation::{Action, Observation};

use super::{action_features, closeness, lookback_features, nearest_distance, visible_cells};

/// Ghosts farther than this are ignored when fleeing
const FEAR_RADIUS: f64 = 5.0;

const FEATURES: &[&str] = &[
    "successorScore",
    "distanceToFood",
    "distanceToCapsule",
    "numCapsules",
    "numberOfGhosts",
    "ghostThreat",
    "scaredGhostDistance",
    "attacking",
    "frozen",
    "captured",
    "stop",
    "reverse",
];

pub(crate) fn default_weights() -> WeightTable {
    WeightTable::from_pairs(&[
        ("successorScore", 100.0),
        ("distanceToFood", 10.0),
        ("distanceToCapsule", 20.0),
        ("numCapsules", -100.0),
        ("numberOfGhosts", -50.0),
        ("ghostThreat", -40.0),
        ("scaredGhostDistance", 200.0),
        ("attacking", 5.0),
        ("frozen", -10.0),
        ("captured", -500.0),
        ("stop", -100.0),
        ("reverse", -2.0),
    ])
}

/// Offensive feature extractor
pub struct OffenseFeatures;

impl<O: Observation> FeatureExtractor<O> for OffenseFeatures {
    fn role(&self) -> &'static str {
        "offense"
    }

    fn feature_names(&self) -> &'static [&'static str] {
        FEATURES
    }

    fn extract(
        &self,
        observation: &O,
        memory: &AgentMemory<O>,
        action: Option<Action>,
    ) -> FeatureVector {
        let mut features = FeatureVector::new();
        let me = memory.self_index();
        let theirs = memory.team().opponent();
        let attacking = observation.is_attacking(me);

        features.set("successorScore", observation.score(memory.team()));
        features.set("attacking", if attacking { 1.0 } else { 0.0 });
        lookback_features(&mut features, observation, memory);
        action_features(&mut features, memory, action);

        let capsules = observation.capsules(theirs);
        features.set("numCapsules", capsules.len() as f64);

        let here = match observation.position(me) {
            Some(position) => position.nearest_cell(),
            None => return features,
        };

        // Inverse-square pull towards the nearest food
        if let Some(distance) = nearest_distance(observation, here, observation.food(theirs)) {
            features.set("distanceToFood", 1.0 / (distance * distance + 1.0));
        }

        let ghosts = visible_cells(
            observation,
            memory
                .opponents()
                .iter()
                .copied()
                .filter(|&agent| !observation.is_attacking(agent)),
        );
        let nearest_ghost = nearest_distance(observation, here, ghosts.iter().copied());

        if memory.opponents_vulnerable() {
            if let Some(distance) = nearest_ghost {
                features.set("scaredGhostDistance", closeness(distance));
            }
        } else {
            features.set("numberOfGhosts", ghosts.len() as f64);
            if let Some(distance) = nearest_distance(observation, here, capsules) {
                features.set("distanceToCapsule", closeness(distance));
            }
            if attacking {
                if let Some(distance) = nearest_ghost.filter(|&d| d <= FEAR_RADIUS) {
                    features.set("ghostThreat", FEAR_RADIUS + 1.0 - distance);
                }
            }
        }

        features
    }
}
