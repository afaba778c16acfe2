//! Reshuffle the icons left on the board.

use crate::cell::Cell;
use crate::grid::GridStore;
use rand::Rng;
use rand::seq::SliceRandom;

/// Permute the icons among the cells that currently hold icons.
///
/// Obstacles and empty cells stay where they are. The result is not checked
/// for a linkable pair; callers that care (the deadlock loop) simply shuffle
/// again on their next check.
pub fn shuffle<R: Rng + ?Sized>(grid: &mut GridStore, rng: &mut R) {
    grid.rewrite(|board| {
        let mut icons: Vec<Cell> = board
            .iter()
            .flat_map(|row| row.iter())
            .copied()
            .filter(|c| c.icon().is_some())
            .collect();
        // Fisher–Yates
        icons.shuffle(rng);
        let mut mixed = icons.into_iter();
        for cell in board.iter_mut().flat_map(|row| row.iter_mut()) {
            if cell.icon().is_some() {
                if let Some(next) = mixed.next() {
                    *cell = next;
                }
            }
        }
    });
}
