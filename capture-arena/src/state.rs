//! Reference capture world
//!
//! Rules:
//! - Agents move one cell per move, half a cell while scared. A half-stepped
//!   agent can only keep going in the direction it faces, and finishes the
//!   step at half speed even if its scare ran out meanwhile, so every agent
//!   is back on a cell after at most one more move.
//! - Stepping onto a cell on the opposing half eats the food there (+1 for
//!   the eater's team) or the capsule there (every opposing agent is scared
//!   for its next 40 moves).
//! - Opponents in contact are resolved on the half they stand on: the
//!   visitor is captured, unless the home agent is scared, in which case the
//!   home agent is. Captured agents respawn unscared.
//! - A team observes every opponent within Manhattan distance 5 of any of
//!   its own agents. Other opponents have no position in its observation.
//! - The match ends when a half is down to 2 food or the moves run out.

use std::sync::Arc;

use capture_core::{Action, AgentIndex, Cell, Observation, Position, Team, ACTIONS};

use crate::distancer::Distancer;
use crate::layout::{team_of, Layout};

/// Moves an agent stays scared after a capsule is eaten
pub const SCARED_MOVES: u32 = 40;

/// Manhattan sight range of a team
pub const SIGHT_RANGE: i32 = 5;

/// Distance covered per move while scared or finishing a half step
const HALF_STEP: f64 = 0.5;

/// Agents closer than this are in contact
const CONTACT_DISTANCE: f64 = 0.7;

/// A half is finished once this little food is left on it
const FOOD_TO_WIN: usize = 2;

/// Default move budget, shared by all agents
pub const DEFAULT_MOVES: u32 = 1200;

#[derive(Clone, Debug, PartialEq)]
pub struct AgentState {
    pub position: Position,
    pub facing: Action,
    pub scared_moves: u32,
}

/// Full world state, optionally viewed by one team
#[derive(Clone, Debug)]
pub struct GameState {
    layout: Arc<Layout>,
    distancer: Arc<Distancer>,
    agents: Vec<AgentState>,
    food: Vec<Cell>,
    capsules: Vec<Cell>,
    /// Positive favours red
    red_score: f64,
    moves_left: u32,
    viewer: Option<Team>,
}

impl GameState {
    pub fn new(layout: Layout, moves: u32) -> Self {
        let distancer = Distancer::new(&layout);
        Self::with_distancer(Arc::new(layout), Arc::new(distancer), moves)
    }

    /// Fresh match sharing an existing layout and distance table
    pub fn with_distancer(layout: Arc<Layout>, distancer: Arc<Distancer>, moves: u32) -> Self {
        let agents = layout
            .spawns
            .iter()
            .map(|&spawn| AgentState {
                position: Position::from(spawn),
                facing: Action::Stop,
                scared_moves: 0,
            })
            .collect();
        Self {
            food: layout.food.clone(),
            capsules: layout.capsules.clone(),
            layout,
            distancer,
            agents,
            red_score: 0.0,
            moves_left: moves,
            viewer: None,
        }
    }

    /// This state as seen by one team
    pub fn observe(&self, team: Team) -> GameState {
        GameState {
            viewer: Some(team),
            ..self.clone()
        }
    }

    /// The unfiltered state
    pub fn omniscient(&self) -> GameState {
        GameState {
            viewer: None,
            ..self.clone()
        }
    }

    pub fn is_over(&self) -> bool {
        self.moves_left == 0
            || self.food(Team::Red).len() <= FOOD_TO_WIN
            || self.food(Team::Blue).len() <= FOOD_TO_WIN
    }

    /// Leading team, `None` on a level score
    pub fn leader(&self) -> Option<Team> {
        if self.red_score > 0.0 {
            Some(Team::Red)
        } else if self.red_score < 0.0 {
            Some(Team::Blue)
        } else {
            None
        }
    }

    pub fn red_score(&self) -> f64 {
        self.red_score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn agent(&self, agent: AgentIndex) -> &AgentState {
        &self.agents[agent]
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_scared(&self, agent: AgentIndex) -> bool {
        self.agents[agent].scared_moves > 0
    }

    /// Whether `viewer` can currently see `agent`
    fn visible(&self, agent: AgentIndex) -> bool {
        let Some(team) = self.viewer else {
            return true;
        };
        if team_of(agent) == team {
            return true;
        }
        let target = self.agents[agent].position.nearest_cell();
        (0..self.agents.len())
            .filter(|&i| team_of(i) == team)
            .any(|i| self.agents[i].position.nearest_cell().manhattan(target) <= SIGHT_RANGE)
    }

    /// Moves permitted by the maze, ignoring observability
    fn moves_for(&self, agent: AgentIndex) -> Vec<Action> {
        let state = &self.agents[agent];
        if !state.position.is_lattice() {
            let ahead = state.position.advanced(state.facing, HALF_STEP);
            if ahead.is_lattice() && !self.layout.is_wall(ahead.nearest_cell()) {
                return vec![state.facing];
            }
            // Blocked ahead: back out to the cell the step started from
            return vec![state.facing.reverse()];
        }
        let here = state.position.nearest_cell();
        ACTIONS
            .iter()
            .copied()
            .filter(|&action| action == Action::Stop || !self.layout.is_wall(here.step(action)))
            .collect()
    }

    fn respawn(&mut self, agent: AgentIndex) {
        let spawn = self.layout.spawns[agent];
        let state = &mut self.agents[agent];
        state.position = Position::from(spawn);
        state.facing = Action::Stop;
        state.scared_moves = 0;
        tracing::trace!(agent, "captured");
    }

    /// Food and capsule pickup for an agent standing on a lattice cell
    fn consume(&mut self, agent: AgentIndex, cell: Cell) {
        let team = team_of(agent);
        if self.layout.home_team(cell) == team {
            return;
        }
        if let Some(i) = self.food.iter().position(|&f| f == cell) {
            self.food.remove(i);
            self.red_score += match team {
                Team::Red => 1.0,
                Team::Blue => -1.0,
            };
        }
        if let Some(i) = self.capsules.iter().position(|&c| c == cell) {
            self.capsules.remove(i);
            for other in (0..self.agents.len()).filter(|&i| team_of(i) != team) {
                self.agents[other].scared_moves = SCARED_MOVES;
            }
        }
    }

    /// Resolve contact between the mover and every opponent it touches
    fn resolve_contacts(&mut self, agent: AgentIndex) {
        let team = team_of(agent);
        for other in 0..self.agents.len() {
            if team_of(other) == team {
                continue;
            }
            let (here, there) = (self.agents[agent].position, self.agents[other].position);
            if here.distance_to(there) > CONTACT_DISTANCE {
                continue;
            }
            let (home, visitor) = if self.layout.home_team(there.nearest_cell()) == team {
                (agent, other)
            } else {
                (other, agent)
            };
            if self.is_scared(home) {
                self.respawn(home);
            } else {
                self.respawn(visitor);
            }
            // A respawned mover touches nobody else
            if self.agents[agent].position != here {
                return;
            }
        }
    }
}

impl Observation for GameState {
    fn legal_actions(&self, agent: AgentIndex) -> Vec<Action> {
        if !self.visible(agent) {
            return Vec::new();
        }
        self.moves_for(agent)
    }

    fn successor(&self, agent: AgentIndex, action: Action) -> Self {
        let mut next = self.clone();
        let legal = self.moves_for(agent);
        let action = if legal.contains(&action) {
            action
        } else if legal.contains(&Action::Stop) {
            Action::Stop
        } else {
            // Mid-step, the forced move replaces an illegal one
            legal.first().copied().unwrap_or(Action::Stop)
        };

        let state = &mut next.agents[agent];
        let speed = if state.scared_moves > 0 || !state.position.is_lattice() {
            HALF_STEP
        } else {
            1.0
        };
        state.position = state.position.advanced(action, speed);
        state.facing = action;
        state.scared_moves = state.scared_moves.saturating_sub(1);

        let position = state.position;
        if position.is_lattice() {
            next.consume(agent, position.nearest_cell());
        }
        next.resolve_contacts(agent);
        next.moves_left = next.moves_left.saturating_sub(1);
        next
    }

    fn position(&self, agent: AgentIndex) -> Option<Position> {
        self.visible(agent).then(|| self.agents[agent].position)
    }

    fn spawn(&self, agent: AgentIndex) -> Cell {
        self.layout.spawns[agent]
    }

    fn facing(&self, agent: AgentIndex) -> Action {
        self.agents[agent].facing
    }

    fn is_attacking(&self, agent: AgentIndex) -> bool {
        self.layout.home_team(self.agents[agent].position.nearest_cell()) != team_of(agent)
    }

    fn team_of(&self, agent: AgentIndex) -> Team {
        team_of(agent)
    }

    fn agents_on(&self, team: Team) -> Vec<AgentIndex> {
        (0..self.agents.len()).filter(|&i| team_of(i) == team).collect()
    }

    fn score(&self, team: Team) -> f64 {
        match team {
            Team::Red => self.red_score,
            Team::Blue => -self.red_score,
        }
    }

    fn food(&self, team: Team) -> Vec<Cell> {
        self.food
            .iter()
            .copied()
            .filter(|&cell| self.layout.home_team(cell) == team)
            .collect()
    }

    fn capsules(&self, team: Team) -> Vec<Cell> {
        self.capsules
            .iter()
            .copied()
            .filter(|&cell| self.layout.home_team(cell) == team)
            .collect()
    }

    /// Agents always stand on or between open cells, so only cells a caller
    /// makes up (walls, outside the grid) reach the Manhattan fallback
    fn maze_distance(&self, a: Cell, b: Cell) -> f64 {
        match self.distancer.distance(a, b) {
            Some(d) => d as f64,
            None => a.manhattan(b) as f64,
        }
    }

    fn time_remaining(&self) -> f64 {
        self.moves_left as f64
    }
}
