//! Grid store: the padded grid used for line scans and the display board.
//!
//! The padded grid is `(rows + 2) x (cols + 2)` with a permanently empty
//! border ring so path scans can leave the board without bounds checks.
//! The display board is the interior, shifted by `(+1, +1)`. Every public
//! mutation writes both and leaves them in sync.

use crate::cell::{Cell, Coord};
use crate::gravity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridStore {
    rows: usize,
    cols: usize,
    /// board[r][c], row 0 on top.
    board: Vec<Vec<Cell>>,
    /// padded[r + 1][c + 1] == board[r][c]; border cells are always `Empty`.
    padded: Vec<Vec<Cell>>,
}

impl GridStore {
    /// All-empty board of the given size.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            board: vec![vec![Cell::Empty; cols]; rows],
            padded: vec![vec![Cell::Empty; cols + 2]; rows + 2],
        }
    }

    /// Build from display rows. Rows shorter than the first are padded with `Empty`,
    /// longer ones are truncated.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        let board: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(cols, Cell::Empty);
                row
            })
            .collect();
        let mut store = Self::new(board.len(), cols);
        store.board = board;
        store.sync();
        store
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Display board snapshot (row-major).
    #[inline]
    pub fn board(&self) -> &[Vec<Cell>] {
        &self.board
    }

    /// Board cell at a display coordinate.
    #[inline]
    pub fn get(&self, at: Coord) -> Option<Cell> {
        self.board.get(at.row).and_then(|row| row.get(at.col)).copied()
    }

    /// Padded grid cell; border cells read as `Empty`.
    #[inline]
    pub fn padded_get(&self, at: Coord) -> Option<Cell> {
        self.padded.get(at.row).and_then(|row| row.get(at.col)).copied()
    }

    /// Padded dimensions `(rows + 2, cols + 2)`.
    #[inline]
    pub fn padded_dims(&self) -> (usize, usize) {
        (self.rows + 2, self.cols + 2)
    }

    /// Write one board cell (and its padded twin). Out-of-range writes are ignored.
    pub fn set(&mut self, at: Coord, cell: Cell) {
        if at.row < self.rows && at.col < self.cols {
            self.board[at.row][at.col] = cell;
            let p = at.padded();
            self.padded[p.row][p.col] = cell;
        }
    }

    /// Clear a matched pair.
    pub fn clear_pair(&mut self, a: Coord, b: Coord) {
        self.set(a, Cell::Empty);
        self.set(b, Cell::Empty);
    }

    /// Run column compaction on the board and resync the padded grid.
    pub fn apply_gravity(&mut self) {
        gravity::apply_gravity(&mut self.board);
        self.sync();
    }

    /// Whole-board rewrites (shuffle). `f` gets fixed-length row slices, so
    /// cells can change but the shape cannot. The padded grid is resynced
    /// once `f` returns.
    pub fn rewrite(&mut self, f: impl FnOnce(&mut [&mut [Cell]])) {
        let mut rows: Vec<&mut [Cell]> = self.board.iter_mut().map(Vec::as_mut_slice).collect();
        f(&mut rows);
        self.sync();
    }

    /// Copy the board into the interior of the padded grid.
    fn sync(&mut self) {
        for (r, row) in self.board.iter().enumerate() {
            self.padded[r + 1][1..=self.cols].copy_from_slice(row);
        }
        debug_assert!(self.is_consistent());
    }

    /// Board and padded grid agree and the border ring is empty.
    pub fn is_consistent(&self) -> bool {
        let (prow, pcol) = self.padded_dims();
        if self.padded.len() != prow || self.padded.iter().any(|r| r.len() != pcol) {
            return false;
        }
        let border_empty = (0..prow).all(|r| {
            (0..pcol).all(|c| {
                let on_border = r == 0 || c == 0 || r == prow - 1 || c == pcol - 1;
                !on_border || self.padded[r][c].is_empty()
            })
        });
        border_empty
            && self.board.iter().enumerate().all(|(r, row)| {
                row.iter()
                    .enumerate()
                    .all(|(c, cell)| self.padded[r + 1][c + 1] == *cell)
            })
    }

    /// Icons still on the board.
    pub fn icon_count(&self) -> usize {
        self.cells().filter(|(_, c)| c.icon().is_some()).count()
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells().filter(|(_, c)| c.is_obstacle()).count()
    }

    /// Board cleared: no icon left (obstacles may remain).
    pub fn is_cleared(&self) -> bool {
        self.icon_count() == 0
    }

    /// Cells with their coordinates in raster order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.board.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, cell)| (Coord::new(r, c), *cell))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::ObstacleKind;

    fn sample() -> GridStore {
        GridStore::from_rows(vec![
            vec![Cell::Icon(1), Cell::Empty, Cell::Icon(2)],
            vec![Cell::Obstacle(ObstacleKind::Rock), Cell::Icon(1), Cell::Icon(2)],
        ])
    }

    #[test]
    fn test_from_rows_syncs_padded() {
        let g = sample();
        assert_eq!((g.rows(), g.cols()), (2, 3));
        assert_eq!(g.padded_dims(), (4, 5));
        assert!(g.is_consistent());
        assert_eq!(g.padded_get(Coord::new(1, 1)), Some(Cell::Icon(1)));
        assert_eq!(g.padded_get(Coord::new(0, 0)), Some(Cell::Empty));
        assert_eq!(g.padded_get(Coord::new(3, 4)), Some(Cell::Empty));
        assert_eq!(g.padded_get(Coord::new(4, 0)), None);
    }

    #[test]
    fn test_set_writes_both_views() {
        let mut g = sample();
        g.set(Coord::new(0, 1), Cell::Icon(9));
        assert_eq!(g.get(Coord::new(0, 1)), Some(Cell::Icon(9)));
        assert_eq!(g.padded_get(Coord::new(1, 2)), Some(Cell::Icon(9)));
        assert!(g.is_consistent());
    }

    #[test]
    fn test_out_of_range_set_ignored() {
        let mut g = sample();
        let before = g.clone();
        g.set(Coord::new(5, 5), Cell::Icon(3));
        assert_eq!(g, before);
    }

    #[test]
    fn test_counts_and_cleared() {
        let mut g = sample();
        assert_eq!(g.icon_count(), 4);
        assert_eq!(g.obstacle_count(), 1);
        assert!(!g.is_cleared());
        g.clear_pair(Coord::new(0, 0), Coord::new(1, 1));
        g.clear_pair(Coord::new(0, 2), Coord::new(1, 2));
        assert!(g.is_cleared());
        assert_eq!(g.obstacle_count(), 1);
    }

    #[test]
    fn test_gravity_keeps_views_in_sync() {
        let mut g = sample();
        g.clear_pair(Coord::new(1, 1), Coord::new(1, 2));
        g.apply_gravity();
        assert!(g.is_consistent());
        assert_eq!(g.get(Coord::new(1, 2)), Some(Cell::Icon(2)));
        assert_eq!(g.get(Coord::new(0, 2)), Some(Cell::Empty));
    }

    #[test]
    fn test_rewrite_sees_fixed_rows_and_resyncs() {
        let mut g = sample();
        g.rewrite(|rows| {
            assert_eq!(rows.len(), 2);
            assert!(rows.iter().all(|r| r.len() == 3));
            rows[0][1] = Cell::Icon(7);
        });
        assert!(g.is_consistent());
        assert_eq!(g.get(Coord::new(0, 1)), Some(Cell::Icon(7)));
        assert_eq!(g.padded_get(Coord::new(1, 2)), Some(Cell::Icon(7)));
    }

    #[test]
    fn test_ragged_rows_are_normalised() {
        let g = GridStore::from_rows(vec![vec![Cell::Icon(1), Cell::Icon(1)], vec![Cell::Icon(2)]]);
        assert_eq!(g.get(Coord::new(1, 1)), Some(Cell::Empty));
        assert!(g.is_consistent());
    }
}
