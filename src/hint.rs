//! Exhaustive pair search: hint lookup and deadlock detection.

use crate::cell::Coord;
use crate::grid::GridStore;
use crate::path::{self, Path};

/// A linkable pair: board coordinates plus the padded-grid route between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub first: Coord,
    pub second: Coord,
    pub path: Path,
}

/// First linkable pair in raster order, or `None` when the board is stuck.
///
/// `first` runs row-major over the board; `second` starts on the same row
/// strictly to the right of `first`, then continues over the following rows.
/// Deterministic for a given board.
pub fn find_any_pair(grid: &GridStore) -> Option<Hint> {
    let (rows, cols) = (grid.rows(), grid.cols());
    for (first, cell) in grid.cells() {
        let Some(id) = cell.icon() else {
            continue;
        };
        for r2 in first.row..rows {
            let start = if r2 == first.row { first.col + 1 } else { 0 };
            for c2 in start..cols {
                let second = Coord::new(r2, c2);
                if grid.get(second).and_then(|c| c.icon()) != Some(id) {
                    continue;
                }
                if let Some(path) = path::can_connect_board(grid, first, second) {
                    return Some(Hint {
                        first,
                        second,
                        path,
                    });
                }
            }
        }
    }
    None
}

/// Icons remain but no pair can be linked.
///
/// A cleared board is not deadlocked; there is nothing left to shuffle.
pub fn is_deadlocked(grid: &GridStore) -> bool {
    !grid.is_cleared() && find_any_pair(grid).is_none()
}
