//! Level table and board generation.

use crate::cell::{Cell, ICON_ID_COUNT, IconId, ObstacleKind};
use crate::grid::GridStore;
use rand::Rng;
use rand::seq::SliceRandom;

pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLS: usize = 8;

/// Per-level knobs: fewer seconds and more icon kinds as levels go up,
/// obstacles from level 4 on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    /// 1-based.
    pub index: u32,
    pub duration_secs: u32,
    pub icon_types: u8,
    pub obstacles: usize,
    /// Backdrop variant for the front-end.
    pub background: u8,
}

const fn level(index: u32, duration_secs: u32, icon_types: u8, obstacles: usize) -> LevelConfig {
    LevelConfig {
        index,
        duration_secs,
        icon_types,
        obstacles,
        background: index as u8,
    }
}

pub const LEVELS: [LevelConfig; 7] = [
    level(1, 150, 5, 0),
    level(2, 120, 7, 0),
    level(3, 100, 9, 0),
    level(4, 85, 11, 8),
    level(5, 70, 13, 12),
    level(6, 60, 14, 16),
    level(7, 50, 15, 22),
];

pub const LEVEL_COUNT: u32 = LEVELS.len() as u32;

impl LevelConfig {
    /// Config for level `n`, clamped into `1..=LEVEL_COUNT`.
    pub fn for_level(n: u32) -> Self {
        let idx = n.clamp(1, LEVEL_COUNT) as usize - 1;
        LEVELS[idx]
    }

    pub fn is_last(&self) -> bool {
        self.index >= LEVEL_COUNT
    }
}

/// Lay out a fresh board.
///
/// `floor((rows * cols - obstacles) / 2)` pairs, pair `i` showing icon
/// `i % icon_types`, shuffled; obstacles are then dropped in at random spots
/// of the flat sequence, which fills the board row-major. Cells left over at
/// the end stay empty, so every icon appears an even number of times.
pub fn generate<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    cfg: &LevelConfig,
    rng: &mut R,
) -> GridStore {
    let total = rows * cols;
    let obstacles = cfg.obstacles.min(total);
    let types = cfg.icon_types.clamp(1, ICON_ID_COUNT);
    let pairs = (total - obstacles) / 2;

    let mut flat: Vec<Cell> = Vec::with_capacity(total);
    for i in 0..pairs {
        let id = (i % usize::from(types)) as IconId;
        flat.push(Cell::Icon(id));
        flat.push(Cell::Icon(id));
    }
    flat.shuffle(rng);

    for _ in 0..obstacles {
        let at = rng.gen_range(0..=flat.len());
        let kind = ObstacleKind::ALL[rng.gen_range(0..ObstacleKind::ALL.len())];
        flat.insert(at, Cell::Obstacle(kind));
    }
    flat.resize(total, Cell::Empty);

    let board: Vec<Vec<Cell>> = flat.chunks(cols.max(1)).map(<[Cell]>::to_vec).collect();
    let grid = GridStore::from_rows(board);
    log::debug!(
        "generated level {} board {rows}x{cols}: {} icons, {} obstacles",
        cfg.index,
        grid.icon_count(),
        grid.obstacle_count()
    );
    grid
}
