//! Text maze layouts
//!
//! `%` wall, `.` food, `o` capsule, `1`-`4` spawn of agent 0-3, anything
//! else open floor. The first text row is the top of the maze, so north
//! (+y) points up the file.

use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use capture_core::{AgentIndex, Cell, Team};

const DEFAULT_LAYOUT: &str = include_str!("../layouts/default.lay");
const SMALL_LAYOUT: &str = include_str!("../layouts/small.lay");

/// Names accepted by `Layout::builtin`
pub const BUILTIN_LAYOUTS: &[&str] = &["default", "small"];

/// A parsed maze
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    walls: Vec<bool>,
    pub food: Vec<Cell>,
    pub capsules: Vec<Cell>,
    /// Spawn cell per agent index
    pub spawns: Vec<Cell>,
}

impl Layout {
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .filter(|row| !row.trim().is_empty())
            .collect();
        ensure!(!rows.is_empty(), "layout is empty");

        let height = rows.len() as i32;
        let width = rows[0].chars().count() as i32;
        ensure!(width % 2 == 0, "layout width {} is odd, halves would be uneven", width);

        let mut walls = vec![false; (width * height) as usize];
        let mut food = Vec::new();
        let mut capsules = Vec::new();
        let mut spawns: Vec<Option<Cell>> = vec![None; 4];

        for (row, line) in rows.iter().enumerate() {
            ensure!(
                line.chars().count() as i32 == width,
                "layout row {} has width {}, expected {}",
                row,
                line.chars().count(),
                width
            );
            let y = height - 1 - row as i32;
            for (x, ch) in line.chars().enumerate() {
                let cell = Cell::new(x as i32, y);
                match ch {
                    '%' => walls[(y * width + x as i32) as usize] = true,
                    '.' => food.push(cell),
                    'o' => capsules.push(cell),
                    '1'..='4' => {
                        let agent = ch as usize - '1' as usize;
                        if spawns[agent].replace(cell).is_some() {
                            bail!("spawn {} appears twice", ch);
                        }
                    }
                    _ => {}
                }
            }
        }

        let count = spawns.iter().take_while(|spawn| spawn.is_some()).count();
        ensure!(count >= 2, "layout needs at least spawns 1 and 2");
        ensure!(
            spawns[count..].iter().all(Option::is_none),
            "spawn numbers must be consecutive from 1"
        );
        let spawns: Vec<Cell> = spawns.into_iter().flatten().collect();

        let layout = Self {
            width,
            height,
            walls,
            food,
            capsules,
            spawns,
        };
        for (agent, &spawn) in layout.spawns.iter().enumerate() {
            ensure!(
                layout.home_team(spawn) == team_of(agent),
                "spawn {} lies on the wrong half",
                agent + 1
            );
        }
        Ok(layout)
    }

    /// One of the layouts shipped with the crate
    pub fn builtin(name: &str) -> Result<Self> {
        match name {
            "default" => Self::parse(DEFAULT_LAYOUT),
            "small" => Self::parse(SMALL_LAYOUT),
            other => bail!("unknown layout `{}` (known: {})", other, BUILTIN_LAYOUTS.join(", ")),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read layout {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid layout {}", path.display()))
    }

    /// Builtin name or path on disk
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        if BUILTIN_LAYOUTS.contains(&name_or_path) {
            Self::builtin(name_or_path)
        } else {
            Self::load(Path::new(name_or_path))
        }
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Out-of-bounds cells count as walls
    pub fn is_wall(&self, cell: Cell) -> bool {
        !self.in_bounds(cell) || self.walls[(cell.y * self.width + cell.x) as usize]
    }

    /// Team whose half contains the cell; red holds the left half
    pub fn home_team(&self, cell: Cell) -> Team {
        if cell.x < self.width / 2 {
            Team::Red
        } else {
            Team::Blue
        }
    }

    pub fn agent_count(&self) -> usize {
        self.spawns.len()
    }

    /// Every non-wall cell, row-major from the bottom
    pub fn open_cells(&self) -> Vec<Cell> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Cell::new(x, y)))
            .filter(|&cell| !self.is_wall(cell))
            .collect()
    }
}

/// Even agent indices play red, odd play blue
pub fn team_of(agent: AgentIndex) -> Team {
    if agent % 2 == 0 {
        Team::Red
    } else {
        Team::Blue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_small() {
        let layout = Layout::builtin("small").unwrap();
        assert_eq!((layout.width, layout.height), (10, 5));
        assert_eq!(layout.agent_count(), 4);
        assert_eq!(layout.spawns[0], Cell::new(1, 1));
        assert_eq!(layout.spawns[1], Cell::new(8, 3));
        assert_eq!(layout.spawns[2], Cell::new(1, 3));
        assert_eq!(layout.spawns[3], Cell::new(8, 1));
        assert_eq!(layout.capsules.len(), 2);
        assert!(layout.is_wall(Cell::new(0, 0)));
        assert!(layout.is_wall(Cell::new(2, 2)));
        assert!(layout.is_wall(Cell::new(-1, 2)));
        assert!(!layout.is_wall(Cell::new(3, 2)));
    }

    #[test]
    fn test_halves_are_even() {
        let layout = Layout::builtin("default").unwrap();
        let red = layout.food.iter().filter(|&&c| layout.home_team(c) == Team::Red).count();
        let blue = layout.food.len() - red;
        assert_eq!(red, blue);
        assert!(red > 2);
    }

    #[test]
    fn test_rejects_bad_layouts() {
        assert!(Layout::parse("").is_err());
        assert!(Layout::parse("%%%%\n%1.%\n%%%").is_err());
        assert!(Layout::parse("%%%%\n%12%\n%%%%").is_ok());
        assert!(Layout::parse("%%%%\n%21%\n%%%%").is_err());
        assert!(Layout::parse("%%%%%%\n%1..2%\n%%%%%%").is_ok());
        assert!(Layout::parse("%%%%%%\n%1.12%\n%%%%%%").is_err());
    }

    #[test]
    fn test_unknown_builtin() {
        let err = Layout::builtin("huge").unwrap_err();
        assert!(err.to_string().contains("unknown layout"));
    }
}
