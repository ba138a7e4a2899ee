//! Defense role: hold the home half
//!
//! Invaders are observable opponents currently attacking our half. With no
//! invader in sight the defender spreads itself between the visible
//! opponents and shades towards the food they are most likely to take.

use crate::features::{FeatureExtractor, FeatureVector, WeightTable};
use crate::memory::AgentMemory;
use crate::observation::{Action, Cell, Observation};

use super::{action_features, closeness, lookback_features, nearest_distance, visible_cells};

const FEATURES: &[&str] = &[
    "onDefense",
    "numInvaders",
    "distanceToInvader",
    "scaredInvaderProximity",
    "distanceToEnemies",
    "distanceBetweenEnemyAndFood",
    "highRiskFoodProximity",
    "frozen",
    "captured",
    "stop",
    "reverse",
];

pub(crate) fn default_weights() -> WeightTable {
    WeightTable::from_pairs(&[
        ("onDefense", 100.0),
        ("numInvaders", -1000.0),
        ("distanceToInvader", 100.0),
        ("scaredInvaderProximity", -100.0),
        ("distanceToEnemies", 50.0),
        ("distanceBetweenEnemyAndFood", 1.0),
        ("highRiskFoodProximity", -2.0),
        ("frozen", -10.0),
        ("captured", -500.0),
        ("stop", -100.0),
        ("reverse", -2.0),
    ])
}

/// Defensive feature extractor
pub struct DefenseFeatures;

impl<O: Observation> FeatureExtractor<O> for DefenseFeatures {
    fn role(&self) -> &'static str {
        "defense"
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
        let opponents = memory.opponents();

        let on_defense = !observation.is_attacking(me);
        features.set("onDefense", if on_defense { 1.0 } else { 0.0 });
        lookback_features(&mut features, observation, memory);
        action_features(&mut features, memory, action);

        let enemies = visible_cells(observation, opponents.iter().copied());
        let invaders = visible_cells(
            observation,
            opponents
                .iter()
                .copied()
                .filter(|&agent| observation.is_attacking(agent)),
        );
        features.set("numInvaders", invaders.len() as f64);

        let food = observation.food(memory.team());
        if !enemies.is_empty() && !food.is_empty() {
            food_pressure(&mut features, observation, &enemies, &food);
        }

        let here = match observation.position(me) {
            Some(position) => position.nearest_cell(),
            None => return features,
        };

        if let Some(distance) = nearest_distance(observation, here, invaders.iter().copied()) {
            if memory.self_vulnerable() {
                features.set("scaredInvaderProximity", closeness(distance));
            } else {
                features.set("distanceToInvader", closeness(distance));
            }
        } else if !enemies.is_empty() {
            let spread: f64 = enemies
                .iter()
                .map(|&enemy| observation.maze_distance(here, enemy).powi(2))
                .sum();
            features.set("distanceToEnemies", 1.0 / (spread + 1.0));
        }

        if enemies.is_empty() {
            return features;
        }

        // Distance to the defended food most exposed to any visible opponent
        let exposed = food.iter().copied().min_by(|&a, &b| {
            let a = nearest_distance(observation, a, enemies.iter().copied());
            let b = nearest_distance(observation, b, enemies.iter().copied());
            a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(target) = exposed {
            features.set("highRiskFoodProximity", observation.maze_distance(here, target));
        }

        features
    }
}

/// How far, in total, the visible opponents are from our food
fn food_pressure<O: Observation>(
    features: &mut FeatureVector,
    observation: &O,
    enemies: &[Cell],
    food: &[Cell],
) {
    let total: f64 = enemies
        .iter()
        .filter_map(|&enemy| nearest_distance(observation, enemy, food.iter().copied()))
        .sum();
    features.set("distanceBetweenEnemyAndFood", total);
}
