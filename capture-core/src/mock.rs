//! Test doubles for the observation contract

use rustc_hash::FxHashMap;

use crate::error::SearchError;
use crate::features::Evaluate;
use crate::observation::{Action, AgentIndex, Cell, Observation, Position, Team, ACTIONS};

// ============================================================================
// MOCK WORLD - open grid with scripted agents
// ============================================================================

#[derive(Clone, Debug)]
pub struct MockAgent {
    pub position: Option<Position>,
    pub spawn: Cell,
    pub facing: Action,
    pub team: Team,
    pub attacking: bool,
    pub speed: f64,
    pub actions: Vec<Action>,
}

impl MockAgent {
    pub fn new(team: Team, x: i32, y: i32) -> Self {
        Self {
            position: Some(Position::from(Cell::new(x, y))),
            spawn: Cell::new(x, y),
            facing: Action::Stop,
            team,
            attacking: false,
            speed: 1.0,
            actions: vec![Action::North, Action::South, Action::East, Action::West, Action::Stop],
        }
    }

    pub fn red(x: i32, y: i32) -> Self {
        Self::new(Team::Red, x, y)
    }

    pub fn blue(x: i32, y: i32) -> Self {
        Self::new(Team::Blue, x, y)
    }

    pub fn hidden(mut self) -> Self {
        self.position = None;
        self
    }

    pub fn attacking(mut self) -> Self {
        self.attacking = true;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_actions(mut self, actions: &[Action]) -> Self {
        self.actions = actions.to_vec();
        self
    }
}

/// Open world: no walls, Manhattan distances unless overridden
#[derive(Clone, Debug)]
pub struct MockWorld {
    pub agents: Vec<MockAgent>,
    pub food: [Vec<Cell>; 2],
    pub capsules: [Vec<Cell>; 2],
    pub red_score: f64,
    pub distances: FxHashMap<(Cell, Cell), f64>,
    pub time: f64,
}

impl MockWorld {
    pub fn new(agents: Vec<MockAgent>) -> Self {
        Self {
            agents,
            food: [Vec::new(), Vec::new()],
            capsules: [Vec::new(), Vec::new()],
            red_score: 0.0,
            distances: FxHashMap::default(),
            time: 1200.0,
        }
    }

    pub fn with_food(mut self, team: Team, cells: &[Cell]) -> Self {
        self.food[team as usize] = cells.to_vec();
        self
    }

    pub fn with_capsules(mut self, team: Team, cells: &[Cell]) -> Self {
        self.capsules[team as usize] = cells.to_vec();
        self
    }

    pub fn with_distance(mut self, a: Cell, b: Cell, distance: f64) -> Self {
        self.distances.insert((a, b), distance);
        self.distances.insert((b, a), distance);
        self
    }

    pub fn moved(mut self, agent: AgentIndex, x: i32, y: i32) -> Self {
        self.agents[agent].position = Some(Position::from(Cell::new(x, y)));
        self
    }

    pub fn hide(mut self, agent: AgentIndex) -> Self {
        self.agents[agent].position = None;
        self
    }
}

impl Observation for MockWorld {
    fn legal_actions(&self, agent: AgentIndex) -> Vec<Action> {
        match self.agents[agent].position {
            Some(_) => self.agents[agent].actions.clone(),
            None => Vec::new(),
        }
    }

    fn successor(&self, agent: AgentIndex, action: Action) -> Self {
        let mut next = self.clone();
        let state = &mut next.agents[agent];
        if let Some(position) = state.position {
            state.position = Some(position.advanced(action, state.speed));
        }
        state.facing = action;
        next.time -= 1.0;
        next
    }

    fn position(&self, agent: AgentIndex) -> Option<Position> {
        self.agents[agent].position
    }

    fn spawn(&self, agent: AgentIndex) -> Cell {
        self.agents[agent].spawn
    }

    fn facing(&self, agent: AgentIndex) -> Action {
        self.agents[agent].facing
    }

    fn is_attacking(&self, agent: AgentIndex) -> bool {
        self.agents[agent].attacking
    }

    fn team_of(&self, agent: AgentIndex) -> Team {
        self.agents[agent].team
    }

    fn agents_on(&self, team: Team) -> Vec<AgentIndex> {
        (0..self.agents.len())
            .filter(|&i| self.agents[i].team == team)
            .collect()
    }

    fn score(&self, team: Team) -> f64 {
        match team {
            Team::Red => self.red_score,
            Team::Blue => -self.red_score,
        }
    }

    fn food(&self, team: Team) -> Vec<Cell> {
        self.food[team as usize].clone()
    }

    fn capsules(&self, team: Team) -> Vec<Cell> {
        self.capsules[team as usize].clone()
    }

    fn maze_distance(&self, a: Cell, b: Cell) -> f64 {
        self.distances
            .get(&(a, b))
            .copied()
            .unwrap_or_else(|| a.manhattan(b) as f64)
    }

    fn time_remaining(&self) -> f64 {
        self.time
    }
}

// ============================================================================
// TREE WORLD - synthetic game tree for search properties
// ============================================================================

/// Every participant has `branching` actions; the state is the move path
#[derive(Clone, Debug)]
pub struct TreeWorld {
    pub players: usize,
    pub branching: usize,
    pub path: Vec<(AgentIndex, Action)>,
}

impl TreeWorld {
    pub fn new(players: usize, branching: usize) -> Self {
        Self {
            players,
            branching,
            path: Vec::new(),
        }
    }

    pub fn moves_by(&self, agent: AgentIndex) -> usize {
        self.path.iter().filter(|(a, _)| *a == agent).count()
    }
}

impl Observation for TreeWorld {
    fn legal_actions(&self, _agent: AgentIndex) -> Vec<Action> {
        ACTIONS[..self.branching].to_vec()
    }

    fn successor(&self, agent: AgentIndex, action: Action) -> Self {
        let mut next = self.clone();
        next.path.push((agent, action));
        next
    }

    fn position(&self, _agent: AgentIndex) -> Option<Position> {
        Some(Position::new(0.0, 0.0))
    }

    fn spawn(&self, _agent: AgentIndex) -> Cell {
        Cell::new(0, 0)
    }

    fn facing(&self, _agent: AgentIndex) -> Action {
        Action::Stop
    }

    fn is_attacking(&self, _agent: AgentIndex) -> bool {
        false
    }

    fn team_of(&self, agent: AgentIndex) -> Team {
        if agent == 0 {
            Team::Red
        } else {
            Team::Blue
        }
    }

    fn agents_on(&self, team: Team) -> Vec<AgentIndex> {
        (0..self.players).filter(|&i| self.team_of(i) == team).collect()
    }

    fn score(&self, _team: Team) -> f64 {
        0.0
    }

    fn food(&self, _team: Team) -> Vec<Cell> {
        Vec::new()
    }

    fn capsules(&self, _team: Team) -> Vec<Cell> {
        Vec::new()
    }

    fn maze_distance(&self, a: Cell, b: Cell) -> f64 {
        a.manhattan(b) as f64
    }

    fn time_remaining(&self) -> f64 {
        f64::INFINITY
    }
}

/// Deterministic pseudo-random leaf values keyed by the move path
pub struct PathValue {
    pub seed: u64,
}

impl Evaluate<TreeWorld> for PathValue {
    fn evaluate(&self, observation: &TreeWorld) -> Result<f64, SearchError> {
        // FNV-1a over the path, folded into [-100, 100)
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325 ^ self.seed;
        for (agent, action) in &observation.path {
            for byte in [*agent as u8, *action as u8] {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(0x0100_0000_01b3);
            }
        }
        Ok((hash % 200) as f64 - 100.0)
    }
}
