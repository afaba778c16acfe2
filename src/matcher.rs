//! Selection / match state machine.
//!
//! `Idle` until an icon is clicked, then `Selected` until the next click
//! resolves it: same cell deselects, a different value (or an unlinkable pair)
//! moves the selection, a linkable pair clears both tiles and compacts.

use crate::cell::{Cell, Coord, IconId};
use crate::grid::GridStore;
use crate::path::{self, Path};
use std::time::Instant;

/// Pending selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected { at: Coord, icon: IconId },
}

/// A successful link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    pub first: Coord,
    pub second: Coord,
    pub icon: IconId,
    /// Padded-grid route, as seen before the tiles were removed.
    pub path: Path,
    pub at: Instant,
    /// No icon is left after this match.
    pub cleared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Empty, obstacle or out-of-range cell.
    Rejected,
    Selected(Coord),
    Deselected(Coord),
    /// Different value, or same value without a route. The clicked cell is now selected.
    Mismatch {
        previous: Coord,
        selected: Coord,
        no_path: bool,
    },
    Matched(MatchEvent),
}

#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    selection: Selection,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<Coord> {
        match self.selection {
            Selection::Selected { at, .. } => Some(at),
            Selection::Idle => None,
        }
    }

    /// Drop any pending selection (level change, shuffle).
    pub fn reset(&mut self) {
        self.selection = Selection::Idle;
    }

    /// Feed one click on a board coordinate.
    pub fn click(&mut self, grid: &mut GridStore, at: Coord, now: Instant) -> ClickOutcome {
        let icon = match grid.get(at) {
            Some(Cell::Icon(id)) => id,
            Some(Cell::Empty | Cell::Obstacle(_)) | None => return ClickOutcome::Rejected,
        };

        let (previous, previous_icon) = match self.selection {
            Selection::Idle => {
                self.selection = Selection::Selected { at, icon };
                return ClickOutcome::Selected(at);
            }
            Selection::Selected { at: prev, icon: prev_icon } => (prev, prev_icon),
        };

        if previous == at {
            self.selection = Selection::Idle;
            return ClickOutcome::Deselected(at);
        }

        if previous_icon != icon {
            self.selection = Selection::Selected { at, icon };
            return ClickOutcome::Mismatch {
                previous,
                selected: at,
                no_path: false,
            };
        }

        let Some(path) = path::can_connect_board(grid, previous, at) else {
            log::trace!("no route between {previous} and {at}");
            self.selection = Selection::Selected { at, icon };
            return ClickOutcome::Mismatch {
                previous,
                selected: at,
                no_path: true,
            };
        };

        grid.clear_pair(previous, at);
        grid.apply_gravity();
        self.selection = Selection::Idle;
        let cleared = grid.is_cleared();
        log::debug!(
            "matched icon {icon} {previous} -> {at} ({} bends), cleared={cleared}",
            path.bends()
        );
        ClickOutcome::Matched(MatchEvent {
            first: previous,
            second: at,
            icon,
            path,
            at: now,
            cleared,
        })
    }
}
