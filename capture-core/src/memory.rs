//! Cross-turn agent memory
//!
//! Each agent owns one `AgentMemory` for the whole match. It is updated once
//! per decision tick, before the rotation is chosen, and read by evaluation.
//!
//! Update rules, in order:
//! 1. Vulnerability timers: a drop in the capsule count on a side restarts
//!    that side's window at `vulnerable_ticks`; otherwise both timers tick
//!    down by one, floored at zero.
//! 2. Stuck counter: incremented when the agent has not moved since the
//!    previous tick, reset to zero otherwise.
//! 3. Death inference: an agent died when it moved and now stands on its
//!    own spawn. Opponents are only judged when observable on both ticks.

use rustc_hash::FxHashMap;

use crate::config::TrackerConfig;
use crate::observation::{Action, AgentIndex, Observation, Position, Team};

/// Positions closer than this are the same spot
const SAME_SPOT_EPSILON: f64 = 1e-3;

/// What the tracker noticed on one tick
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// A capsule on the opponents' half was eaten this tick
    pub opponents_now_vulnerable: bool,
    /// A capsule on our own half was eaten this tick
    pub self_now_vulnerable: bool,
    pub self_died: bool,
    pub opponents_died: Vec<AgentIndex>,
    /// The stuck counter has reached the escape threshold
    pub stuck: bool,
}

/// Persistent per-match state owned by one search agent
#[derive(Clone, Debug)]
pub struct AgentMemory<O> {
    self_index: AgentIndex,
    team: Team,
    teammate: Option<AgentIndex>,
    opponents: Vec<AgentIndex>,
    spawn: Position,
    opponent_spawns: FxHashMap<AgentIndex, Position>,
    heading: Action,
    self_vulnerable_ticks: u32,
    opponents_vulnerable_ticks: u32,
    stuck_ticks: u32,
    previous: Option<O>,
    ticks: u32,
    deaths: u32,
    captures: u32,
}

/// True when an agent moved and landed exactly on its spawn
pub fn is_death(previous: Position, current: Position, spawn: Position) -> bool {
    !same_spot(previous, current) && same_spot(current, spawn)
}

fn same_spot(a: Position, b: Position) -> bool {
    a.distance_to(b) < SAME_SPOT_EPSILON
}

impl<O: Observation> AgentMemory<O> {
    /// Capture roster and spawn cells from the opening observation
    pub fn initialize(self_index: AgentIndex, observation: &O) -> Self {
        let team = observation.team_of(self_index);
        let teammate = observation
            .agents_on(team)
            .into_iter()
            .find(|&agent| agent != self_index);
        let opponents = observation.agents_on(team.opponent());

        let opponent_spawns = opponents
            .iter()
            .map(|&agent| (agent, Position::from(observation.spawn(agent))))
            .collect();

        Self {
            self_index,
            team,
            teammate,
            opponents,
            spawn: Position::from(observation.spawn(self_index)),
            opponent_spawns,
            heading: observation.facing(self_index),
            self_vulnerable_ticks: 0,
            opponents_vulnerable_ticks: 0,
            stuck_ticks: 0,
            previous: None,
            ticks: 0,
            deaths: 0,
            captures: 0,
        }
    }

    /// Apply one tick's update rules against the previous observation
    pub fn observe(&mut self, observation: &O, config: &TrackerConfig) -> TickEvents {
        let mut events = TickEvents::default();
        self.ticks += 1;
        self.heading = observation.facing(self.self_index);

        self.update_vulnerability(observation, config, &mut events);
        self.update_stuck(observation, config, &mut events);
        self.infer_deaths(observation, &mut events);

        events
    }

    /// Replace the one-tick lookback once the decision is made
    pub fn remember(&mut self, observation: O) {
        self.previous = Some(observation);
    }

    // ========================================================================
    // UPDATE RULES
    // ========================================================================

    fn update_vulnerability(
        &mut self,
        observation: &O,
        config: &TrackerConfig,
        events: &mut TickEvents,
    ) {
        let (theirs_dropped, ours_dropped) = match &self.previous {
            Some(previous) => (
                observation.capsules(self.team.opponent()).len()
                    < previous.capsules(self.team.opponent()).len(),
                observation.capsules(self.team).len() < previous.capsules(self.team).len(),
            ),
            None => (false, false),
        };

        if theirs_dropped {
            self.opponents_vulnerable_ticks = config.vulnerable_ticks;
            events.opponents_now_vulnerable = true;
        } else {
            self.opponents_vulnerable_ticks = self.opponents_vulnerable_ticks.saturating_sub(1);
        }

        if ours_dropped {
            self.self_vulnerable_ticks = config.vulnerable_ticks;
            events.self_now_vulnerable = true;
        } else {
            self.self_vulnerable_ticks = self.self_vulnerable_ticks.saturating_sub(1);
        }
    }

    fn update_stuck(&mut self, observation: &O, config: &TrackerConfig, events: &mut TickEvents) {
        if self.unmoved_since_previous(observation) {
            self.stuck_ticks += 1;
        } else {
            self.stuck_ticks = 0;
        }
        events.stuck = self.stuck_ticks >= config.stuck_threshold;
    }

    fn infer_deaths(&mut self, observation: &O, events: &mut TickEvents) {
        if self.self_died_since_previous(observation) {
            events.self_died = true;
            self.deaths += 1;
            // A respawned defender is no longer vulnerable
            self.self_vulnerable_ticks = 0;
        }

        for &opponent in &self.opponents {
            let spawn = match self.opponent_spawns.get(&opponent) {
                Some(spawn) => *spawn,
                None => continue,
            };
            if let (Some(before), Some(now)) =
                (self.previous_position(opponent), observation.position(opponent))
            {
                if is_death(before, now, spawn) {
                    events.opponents_died.push(opponent);
                }
            }
        }
        self.captures += events.opponents_died.len() as u32;
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Death inference for self between the previous tick and `observation`
    pub fn self_died_since_previous(&self, observation: &O) -> bool {
        match (
            self.previous_position(self.self_index),
            observation.position(self.self_index),
        ) {
            (Some(before), Some(now)) => is_death(before, now, self.spawn),
            _ => false,
        }
    }

    /// True when self stands where it stood on the previous tick
    pub fn unmoved_since_previous(&self, observation: &O) -> bool {
        match (
            self.previous_position(self.self_index),
            observation.position(self.self_index),
        ) {
            (Some(before), Some(now)) => same_spot(before, now),
            _ => false,
        }
    }

    /// An agent's position on the previous tick, if it was observable
    pub fn previous_position(&self, agent: AgentIndex) -> Option<Position> {
        self.previous.as_ref().and_then(|p| p.position(agent))
    }

    pub fn previous(&self) -> Option<&O> {
        self.previous.as_ref()
    }

    pub fn self_index(&self) -> AgentIndex {
        self.self_index
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn teammate(&self) -> Option<AgentIndex> {
        self.teammate
    }

    pub fn opponents(&self) -> &[AgentIndex] {
        &self.opponents
    }

    /// Direction of self's last move as of the current tick
    pub fn heading(&self) -> Action {
        self.heading
    }

    pub fn spawn(&self) -> Position {
        self.spawn
    }

    pub fn opponent_spawn(&self, opponent: AgentIndex) -> Option<Position> {
        self.opponent_spawns.get(&opponent).copied()
    }

    pub fn self_vulnerable_ticks(&self) -> u32 {
        self.self_vulnerable_ticks
    }

    pub fn opponents_vulnerable_ticks(&self) -> u32 {
        self.opponents_vulnerable_ticks
    }

    pub fn self_vulnerable(&self) -> bool {
        self.self_vulnerable_ticks > 0
    }

    pub fn opponents_vulnerable(&self) -> bool {
        self.opponents_vulnerable_ticks > 0
    }

    pub fn stuck_ticks(&self) -> u32 {
        self.stuck_ticks
    }

    pub fn reset_stuck(&mut self) {
        self.stuck_ticks = 0;
    }

    /// Ticks observed so far
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Inferred deaths of self so far
    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    /// Inferred opponent deaths so far
    pub fn captures(&self) -> u32 {
        self.captures
    }
}
