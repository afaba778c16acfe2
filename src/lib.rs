//! Onet-style tile-connection puzzle core.
//!
//! Two equal tiles can be removed when an orthogonal route with at most two
//! bends joins them through empty cells, including the empty ring around the
//! board. Removed tiles make the cells above fall down. [`game::Session`]
//! owns one run: board, selection, combo, timer, level and shuffle budget.
//!
//! Nothing in here touches the terminal or the filesystem; the binary
//! supplies clicks and the clock and renders what comes back.

pub mod cell;
pub mod game;
pub mod gravity;
pub mod grid;
pub mod hint;
pub mod level;
pub mod matcher;
pub mod path;
pub mod scoring;
pub mod shuffle;
pub mod timer;
