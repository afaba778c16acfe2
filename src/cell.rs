//! Cell values and board coordinates.

use std::fmt;

/// Icon identifier. Levels draw from `0..ICON_ID_COUNT`.
pub type IconId = u8;

/// Number of distinct icon ids available to level generation.
pub const ICON_ID_COUNT: IconId = 20;

/// Decorative obstacle variants (rocks, ice, bushes, vortices).
/// The kind never affects linking; only the renderer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Rock,
    Ice,
    Bush,
    Vortex,
}

impl ObstacleKind {
    pub const ALL: [Self; 4] = [Self::Rock, Self::Ice, Self::Bush, Self::Vortex];
}

/// Single cell: empty, a linkable icon, or an inert obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Icon(IconId),
    Obstacle(ObstacleKind),
}

impl Cell {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline]
    pub fn is_obstacle(self) -> bool {
        matches!(self, Self::Obstacle(_))
    }

    /// Icon id if this cell holds a linkable tile.
    #[inline]
    pub fn icon(self) -> Option<IconId> {
        match self {
            Self::Icon(id) => Some(id),
            Self::Empty | Self::Obstacle(_) => None,
        }
    }
}

/// Row/column position. Whether it addresses the display board or the padded
/// grid depends on the API it is passed to; see [`Coord::padded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Board coordinate → padded grid coordinate (shift by the border ring).
    #[inline]
    pub const fn padded(self) -> Self {
        Self {
            row: self.row + 1,
            col: self.col + 1,
        }
    }

    /// Padded grid coordinate → board coordinate, `None` on the border ring.
    pub fn unpadded(self, rows: usize, cols: usize) -> Option<Self> {
        if self.row == 0 || self.col == 0 || self.row > rows || self.col > cols {
            return None;
        }
        Some(Self::new(self.row - 1, self.col - 1))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
