//! Observation contract and grid value types
//!
//! The core never owns a world model. Everything it knows about a tick comes
//! through the `Observation` trait, implemented by the host environment.

use serde::{Deserialize, Serialize};

/// Tolerance for deciding whether a coordinate sits on the movement lattice
const LATTICE_EPSILON: f64 = 1e-3;

/// Index of a participant in the host's agent enumeration
pub type AgentIndex = usize;

// ============================================================================
// TEAMS
// ============================================================================

/// One of the two fixed sides of a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red = 0,
    Blue = 1,
}

impl Team {
    pub fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }
}

// ============================================================================
// COORDINATES
// ============================================================================

/// A discrete grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, ignoring walls
    pub fn manhattan(&self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Neighbouring cell in the given direction (`Stop` returns self)
    pub fn step(&self, action: Action) -> Cell {
        let (dx, dy) = action.delta();
        Cell::new(self.x + dx, self.y + dy)
    }
}

/// A continuous agent position
///
/// Agents moving at reduced speed stop between cells, so positions are
/// real-valued. Distances are always measured between lattice cells.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nearest lattice cell
    pub fn nearest_cell(&self) -> Cell {
        Cell::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// True if the position coincides with its nearest lattice cell
    pub fn is_lattice(&self) -> bool {
        let cell = self.nearest_cell();
        (self.x - cell.x as f64).abs() < LATTICE_EPSILON
            && (self.y - cell.y as f64).abs() < LATTICE_EPSILON
    }

    /// Move by `speed` units in a direction
    pub fn advanced(&self, action: Action, speed: f64) -> Position {
        let (dx, dy) = action.delta();
        Position::new(self.x + dx as f64 * speed, self.y + dy as f64 * speed)
    }

    /// Euclidean distance between two positions
    pub fn distance_to(&self, other: Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<Cell> for Position {
    fn from(cell: Cell) -> Self {
        Position::new(cell.x as f64, cell.y as f64)
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// A discrete move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    North,
    South,
    East,
    West,
    Stop,
}

/// All actions in canonical enumeration order
pub const ACTIONS: [Action; 5] = [
    Action::North,
    Action::South,
    Action::East,
    Action::West,
    Action::Stop,
];

impl Action {
    /// Unit grid delta (dx, dy); north is +y
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::North => (0, 1),
            Action::South => (0, -1),
            Action::East => (1, 0),
            Action::West => (-1, 0),
            Action::Stop => (0, 0),
        }
    }

    /// Opposite direction (`Stop` reverses to itself)
    pub fn reverse(self) -> Action {
        match self {
            Action::North => Action::South,
            Action::South => Action::North,
            Action::East => Action::West,
            Action::West => Action::East,
            Action::Stop => Action::Stop,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::North => "north",
            Action::South => "south",
            Action::East => "east",
            Action::West => "west",
            Action::Stop => "stop",
        }
    }
}

// ============================================================================
// OBSERVATION CONTRACT
// ============================================================================

/// Immutable snapshot of the world at one tick, as seen by one team
///
/// Implementations own the grid, the legal-move generator, the successor
/// generator and the precomputed maze-distance oracle. The core only queries.
pub trait Observation: Clone {
    /// Legal actions for an agent. Empty when the agent's position is unknown.
    fn legal_actions(&self, agent: AgentIndex) -> Vec<Action>;

    /// The snapshot after `agent` performs `action`
    fn successor(&self, agent: AgentIndex, action: Action) -> Self;

    /// Current position, or `None` when outside sensor range
    fn position(&self, agent: AgentIndex) -> Option<Position>;

    /// Starting cell of an agent, known for every agent whether observable or not
    fn spawn(&self, agent: AgentIndex) -> Cell;

    /// Direction of the agent's last move
    fn facing(&self, agent: AgentIndex) -> Action;

    /// True while the agent is on the opposing half (attacking role)
    fn is_attacking(&self, agent: AgentIndex) -> bool;

    fn team_of(&self, agent: AgentIndex) -> Team;

    /// Agents of a team, in host enumeration order
    fn agents_on(&self, team: Team) -> Vec<AgentIndex>;

    /// Signed score; positive favours `team`
    fn score(&self, team: Team) -> f64;

    /// Food lying on the half `team` defends
    fn food(&self, team: Team) -> Vec<Cell>;

    /// Capsules lying on the half `team` defends
    fn capsules(&self, team: Team) -> Vec<Cell>;

    /// Precomputed shortest-path distance between two cells
    fn maze_distance(&self, a: Cell, b: Cell) -> f64;

    fn time_remaining(&self) -> f64;
}
