//! All-pairs maze distances, computed once per layout

use std::collections::VecDeque;

use capture_core::{Action, Cell};
use rustc_hash::FxHashMap;

use crate::layout::Layout;

/// Shortest-path oracle over the open cells of a layout
#[derive(Clone, Debug)]
pub struct Distancer {
    index: FxHashMap<Cell, usize>,
    /// Row-major `n * n` table, `u32::MAX` when unreachable
    table: Vec<u32>,
}

impl Distancer {
    /// Breadth-first search from every open cell
    pub fn new(layout: &Layout) -> Self {
        let cells = layout.open_cells();
        let n = cells.len();
        let index: FxHashMap<Cell, usize> =
            cells.iter().enumerate().map(|(i, &cell)| (cell, i)).collect();

        let mut table = vec![u32::MAX; n * n];
        let mut queue = VecDeque::new();
        for (source, &start) in cells.iter().enumerate() {
            let row = &mut table[source * n..(source + 1) * n];
            row[source] = 0;
            queue.push_back(start);
            while let Some(cell) = queue.pop_front() {
                let here = row[index[&cell]];
                for action in [Action::North, Action::South, Action::East, Action::West] {
                    let next = cell.step(action);
                    if let Some(&i) = index.get(&next) {
                        if row[i] == u32::MAX {
                            row[i] = here + 1;
                            queue.push_back(next);
                        }
                    }
                }
            }
        }

        tracing::debug!(cells = n, "maze distances computed");
        Self { index, table }
    }

    /// Maze distance, `None` for walls and unreachable pairs
    pub fn distance(&self, a: Cell, b: Cell) -> Option<u32> {
        let (&i, &j) = (self.index.get(&a)?, self.index.get(&b)?);
        match self.table[i * self.index.len() + j] {
            u32::MAX => None,
            d => Some(d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances_route_around_walls() {
        let layout = Layout::parse(
            "%%%%%%\n\
             %1%.2%\n\
             %....%\n\
             %%%%%%",
        )
        .unwrap();
        let distancer = Distancer::new(&layout);

        // (1,2) to (3,2) must go down and around the wall at (2,2)
        assert_eq!(distancer.distance(Cell::new(1, 2), Cell::new(3, 2)), Some(4));
        assert_eq!(distancer.distance(Cell::new(1, 1), Cell::new(4, 1)), Some(3));
        assert_eq!(distancer.distance(Cell::new(4, 2), Cell::new(4, 2)), Some(0));
        assert_eq!(distancer.distance(Cell::new(2, 2), Cell::new(1, 1)), None);
    }

    #[test]
    fn test_symmetric_on_builtin() {
        let layout = Layout::builtin("small").unwrap();
        let distancer = Distancer::new(&layout);
        let cells = layout.open_cells();
        for &a in &cells {
            for &b in &cells {
                assert_eq!(distancer.distance(a, b), distancer.distance(b, a));
                assert!(distancer.distance(a, b).is_some());
            }
        }
    }
}
