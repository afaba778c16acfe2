//! Path solver: can two tiles be linked by an orthogonal route with at most
//! two bends?
//!
//! All coordinates here are *padded grid* coordinates, so a route may run
//! through the empty border ring around the board.
//!
//! Candidates are tried in a fixed order and the first that fits wins:
//! straight line, corner `(row(a), col(b))`, corner `(row(b), col(a))`,
//! two bends through an intermediate column (ascending), two bends through an
//! intermediate row (ascending). The two endpoints count as empty while
//! probing since they are the tiles about to be removed.

use crate::cell::{Cell, Coord};
use crate::grid::GridStore;

/// Polyline from the first tile to the second: 2, 3 or 4 padded-grid points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    points: Vec<Coord>,
}

impl Path {
    fn new(points: Vec<Coord>) -> Self {
        debug_assert!((2..=4).contains(&points.len()));
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    /// Number of 90° turns.
    #[inline]
    pub fn bends(&self) -> usize {
        self.points.len() - 2
    }

    #[inline]
    pub fn start(&self) -> Coord {
        self.points[0]
    }

    #[inline]
    pub fn end(&self) -> Coord {
        self.points[self.points.len() - 1]
    }

    /// Every padded cell the route passes through, endpoints and corners included.
    pub fn cells(&self) -> Vec<Coord> {
        let mut out = vec![self.start()];
        for w in self.points.windows(2) {
            let (from, to) = (w[0], w[1]);
            if from.row == to.row {
                let step: isize = if to.col > from.col { 1 } else { -1 };
                let mut c = from.col as isize;
                while c != to.col as isize {
                    c += step;
                    out.push(Coord::new(from.row, c as usize));
                }
            } else {
                let step: isize = if to.row > from.row { 1 } else { -1 };
                let mut r = from.row as isize;
                while r != to.row as isize {
                    r += step;
                    out.push(Coord::new(r as usize, from.col));
                }
            }
        }
        out
    }

    /// Same route walked from the other end.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }
}

/// Read-only probe over the padded grid with the two endpoints masked as empty.
struct Probe<'a> {
    grid: &'a GridStore,
    a: Coord,
    b: Coord,
}

impl Probe<'_> {
    fn is_empty(&self, at: Coord) -> bool {
        if at == self.a || at == self.b {
            return true;
        }
        self.grid.padded_get(at).is_some_and(Cell::is_empty)
    }

    /// Straight segment whose cells strictly between the ends are all empty.
    /// Fails for ends that share neither row nor column.
    fn clear_line(&self, from: Coord, to: Coord) -> bool {
        if from.row == to.row {
            let (lo, hi) = (from.col.min(to.col), from.col.max(to.col));
            return (lo + 1..hi).all(|c| self.is_empty(Coord::new(from.row, c)));
        }
        if from.col == to.col {
            let (lo, hi) = (from.row.min(to.row), from.row.max(to.row));
            return (lo + 1..hi).all(|r| self.is_empty(Coord::new(r, from.col)));
        }
        false
    }

    fn via_corner(&self, corner: Coord) -> bool {
        self.is_empty(corner) && self.clear_line(self.a, corner) && self.clear_line(corner, self.b)
    }

    fn via_two(&self, c1: Coord, c2: Coord) -> bool {
        self.is_empty(c1)
            && self.is_empty(c2)
            && self.clear_line(self.a, c1)
            && self.clear_line(c1, c2)
            && self.clear_line(c2, self.b)
    }
}

/// Link `a` to `b` (padded coordinates) or `None`.
///
/// `None` for identical points, coordinates outside the padded grid, differing
/// values, or values that are empty/obstacles. The grid is never written.
pub fn can_connect(grid: &GridStore, a: Coord, b: Coord) -> Option<Path> {
    if a == b {
        return None;
    }
    let va = grid.padded_get(a)?;
    let vb = grid.padded_get(b)?;
    if va != vb || va.icon().is_none() {
        return None;
    }

    let probe = Probe { grid, a, b };

    if probe.clear_line(a, b) {
        return Some(Path::new(vec![a, b]));
    }

    let corner = Coord::new(a.row, b.col);
    if probe.via_corner(corner) {
        return Some(Path::new(vec![a, corner, b]));
    }
    let corner = Coord::new(b.row, a.col);
    if probe.via_corner(corner) {
        return Some(Path::new(vec![a, corner, b]));
    }

    let (prows, pcols) = grid.padded_dims();
    for cc in (0..pcols).filter(|&cc| cc != a.col && cc != b.col) {
        let (c1, c2) = (Coord::new(a.row, cc), Coord::new(b.row, cc));
        if probe.via_two(c1, c2) {
            return Some(Path::new(vec![a, c1, c2, b]));
        }
    }
    for rr in (0..prows).filter(|&rr| rr != a.row && rr != b.row) {
        let (c1, c2) = (Coord::new(rr, a.col), Coord::new(rr, b.col));
        if probe.via_two(c1, c2) {
            return Some(Path::new(vec![a, c1, c2, b]));
        }
    }
    None
}

/// [`can_connect`] on display-board coordinates.
pub fn can_connect_board(grid: &GridStore, a: Coord, b: Coord) -> Option<Path> {
    can_connect(grid, a.padded(), b.padded())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::ObstacleKind;

    const E: Cell = Cell::Empty;
    const R: Cell = Cell::Obstacle(ObstacleKind::Rock);

    fn i(id: u8) -> Cell {
        Cell::Icon(id)
    }

    /// Interior points of a path are empty in the grid and ends match the request.
    fn assert_valid(grid: &GridStore, path: &Path, a: Coord, b: Coord) {
        assert_eq!(path.start(), a);
        assert_eq!(path.end(), b);
        let pts = path.points();
        for p in &pts[1..pts.len() - 1] {
            assert_eq!(grid.padded_get(*p), Some(Cell::Empty), "corner {p} not empty");
        }
        for c in path.cells() {
            if c != a && c != b {
                assert_eq!(grid.padded_get(c), Some(Cell::Empty), "cell {c} not empty");
            }
        }
    }

    #[test]
    fn test_straight_row() {
        let g = GridStore::from_rows(vec![vec![i(5), E, E, i(5)]]);
        let (a, b) = (Coord::new(0, 0).padded(), Coord::new(0, 3).padded());
        let path = can_connect(&g, a, b).unwrap();
        assert_eq!(path.points(), &[a, b]);
        assert_eq!(path.bends(), 0);
    }

    #[test]
    fn test_adjacent_tiles_link_straight() {
        let g = GridStore::from_rows(vec![vec![i(1), i(1)], vec![i(2), i(3)]]);
        let path = can_connect_board(&g, Coord::new(0, 0), Coord::new(0, 1)).unwrap();
        assert_eq!(path.bends(), 0);
    }

    #[test]
    fn test_diagonal_prefers_first_corner() {
        let g = GridStore::from_rows(vec![
            vec![i(5), E, E],
            vec![E, E, E],
            vec![E, E, i(5)],
        ]);
        let (a, b) = (Coord::new(0, 0).padded(), Coord::new(2, 2).padded());
        let path = can_connect(&g, a, b).unwrap();
        assert_eq!(path.points(), &[a, Coord::new(a.row, b.col), b]);
    }

    #[test]
    fn test_second_corner_when_first_blocked() {
        let g = GridStore::from_rows(vec![
            vec![i(5), E, R],
            vec![E, E, E],
            vec![E, E, i(5)],
        ]);
        let (a, b) = (Coord::new(0, 0).padded(), Coord::new(2, 2).padded());
        let path = can_connect(&g, a, b).unwrap();
        assert_eq!(path.points(), &[a, Coord::new(b.row, a.col), b]);
        assert_valid(&g, &path, a, b);
    }

    #[test]
    fn test_blocked_everywhere_is_none() {
        // Enclose both tiles so neither corner nor any detour is open.
        let g = GridStore::from_rows(vec![
            vec![R, R, R, R, R],
            vec![R, i(5), E, R, R],
            vec![R, R, R, R, R],
            vec![R, R, R, i(5), R],
            vec![R, R, R, R, R],
        ]);
        let before = g.clone();
        assert!(can_connect_board(&g, Coord::new(1, 1), Coord::new(3, 3)).is_none());
        assert_eq!(g, before);
    }

    #[test]
    fn test_two_bends_through_border() {
        // Same row, blocked between: route goes over the top border.
        let g = GridStore::from_rows(vec![vec![i(4), R, i(4)], vec![E, E, E]]);
        let (a, b) = (Coord::new(0, 0).padded(), Coord::new(0, 2).padded());
        let path = can_connect(&g, a, b).unwrap();
        assert_eq!(path.bends(), 2);
        assert_eq!(path.points()[1], Coord::new(0, a.col));
        assert_eq!(path.points()[2], Coord::new(0, b.col));
        assert_valid(&g, &path, a, b);
    }

    #[test]
    fn test_column_scan_before_row_scan() {
        // Same column, blocked between: the column scan finds the left border
        // first (lowest column index).
        let g = GridStore::from_rows(vec![
            vec![E, i(6), E],
            vec![R, R, R],
            vec![E, i(6), E],
        ]);
        let (a, b) = (Coord::new(0, 1).padded(), Coord::new(2, 1).padded());
        let path = can_connect(&g, a, b).unwrap();
        assert_eq!(path.points()[1].col, 0);
        assert_eq!(path.points()[2].col, 0);
    }

    #[test]
    fn test_rejects_mismatch_self_and_non_icons() {
        let g = GridStore::from_rows(vec![vec![i(1), i(2), E, R, R]]);
        let p = |c| Coord::new(0, c).padded();
        assert!(can_connect(&g, p(0), p(0)).is_none());
        assert!(can_connect(&g, p(0), p(1)).is_none());
        assert!(can_connect(&g, p(3), p(4)).is_none());
        assert!(can_connect(&g, Coord::new(0, 0), Coord::new(0, 1)).is_none());
        assert!(can_connect(&g, p(0), Coord::new(40, 40)).is_none());
    }

    #[test]
    fn test_symmetric() {
        let g = GridStore::from_rows(vec![
            vec![i(1), R, E, i(2)],
            vec![E, R, i(1), E],
            vec![i(2), E, R, E],
        ]);
        let pairs = [
            (Coord::new(0, 0), Coord::new(1, 2)),
            (Coord::new(0, 3), Coord::new(2, 0)),
        ];
        for (a, b) in pairs {
            let ab = can_connect_board(&g, a, b);
            let ba = can_connect_board(&g, b, a);
            assert_eq!(ab.is_some(), ba.is_some());
            if let Some(path) = ab {
                assert_valid(&g, &path, a.padded(), b.padded());
            }
            if let Some(path) = ba {
                assert_valid(&g, &path, b.padded(), a.padded());
            }
        }
    }

    #[test]
    fn test_path_cells_walk_every_step() {
        let path = Path::new(vec![Coord::new(1, 1), Coord::new(1, 3), Coord::new(3, 3)]);
        assert_eq!(
            path.cells(),
            vec![
                Coord::new(1, 1),
                Coord::new(1, 2),
                Coord::new(1, 3),
                Coord::new(2, 3),
                Coord::new(3, 3),
            ]
        );
        assert_eq!(path.reversed().start(), Coord::new(3, 3));
    }
}
