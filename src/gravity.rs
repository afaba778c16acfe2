//! Column compaction after a pair is cleared.

use crate::cell::Cell;

/// Per column, slide every non-empty cell (icons *and* obstacles) to the
/// bottom edge keeping their top-to-bottom order; the top fills with `Empty`.
///
/// Works on the display board (`board[row][col]`, row 0 on top). The caller
/// must resync the padded grid afterwards.
pub fn apply_gravity(board: &mut [Vec<Cell>]) {
    let rows = board.len();
    let cols = board.first().map_or(0, Vec::len);
    let mut stack = Vec::with_capacity(rows);
    for c in 0..cols {
        stack.clear();
        // Bottom-up, so stack[0] is the cell that lands on the last row.
        stack.extend(
            (0..rows)
                .rev()
                .map(|r| board[r][c])
                .filter(|cell| !cell.is_empty()),
        );
        for (i, r) in (0..rows).rev().enumerate() {
            board[r][c] = stack.get(i).copied().unwrap_or(Cell::Empty);
        }
    }
}
