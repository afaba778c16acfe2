//! onettui: Onet-style tile-connection puzzle in the terminal.

mod app;
mod input;
mod logging;
mod progress;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use onettui::game::{GameConfig, Options};
use onettui::level::LEVEL_COUNT;

/// Smallest board the front-end accepts in either direction.
pub const MIN_BOARD_SIDE: usize = 2;
/// Largest board; beyond this the tiles no longer fit a normal terminal.
pub const MAX_BOARD_SIDE: usize = 16;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref(), args.verbose)
        .with_context(|| format!("opening log file {:?}", args.log_file))?;

    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        log::warn!("theme not loaded, using defaults: {e}");
        theme::Theme::load(None, args.palette).unwrap_or_default()
    });
    let progress = progress::load_progress();
    let config = game_config(&args, progress.options, progress.last_level);
    log::info!(
        "starting: {}x{} board, level {}, seed {:?}",
        config.rows,
        config.cols,
        config.start_level,
        config.seed
    );

    let mut app = App::new(args, config, theme, progress);
    app.run()?;
    Ok(())
}

/// Merge CLI flags over the persisted options, clamping sizes and level.
pub fn game_config(args: &Args, saved: Options, last_level: u32) -> GameConfig {
    let mut options = saved;
    if args.fast_timer {
        options.fast_timer = true;
    }
    if args.no_auto_shuffle {
        options.auto_shuffle = false;
    }
    GameConfig {
        rows: args.rows.clamp(MIN_BOARD_SIDE, MAX_BOARD_SIDE),
        cols: args.cols.clamp(MIN_BOARD_SIDE, MAX_BOARD_SIDE),
        start_level: args.level.unwrap_or(last_level).clamp(1, LEVEL_COUNT),
        options,
        seed: args.seed,
    }
}

/// Onet-style tile-connection puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "onettui",
    version,
    about = "Onet-style tile-connection puzzle in the terminal. Link matching tiles with at most two turns.",
    long_about = "onettui is a terminal take on the Onet / Pikachu connect puzzle.\n\n\
        Pick two equal tiles. They vanish when a line with at most two 90° turns joins them \
        through empty cells (the edge around the board counts as empty); the tiles above fall \
        into the gap. Clear the board before the clock runs out. Matches within two seconds \
        of each other build a combo; a 4-chain adds five seconds.\n\n\
        CONTROLS:\n  Arrows / hjkl  Move cursor   Enter/Space  Select   Mouse  Click a tile\n  \
        ? / t  Hint   s  Shuffle (3 per level)   p  Pause   r  Restart   q / Esc  Quit\n  \
        a  Auto-shuffle on/off   f  Fast timer on/off   m  Sound flag on/off\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Level to start on (1-7). Defaults to the last level reached.
    #[arg(short, long, value_name = "N")]
    pub level: Option<u32>,

    /// Board height in tiles.
    #[arg(long, default_value = "10", value_name = "ROWS")]
    pub rows: usize,

    /// Board width in tiles.
    #[arg(long, default_value = "8", value_name = "COLS")]
    pub cols: usize,

    /// Run the level clock at double speed.
    #[arg(long)]
    pub fast_timer: bool,

    /// Do not reshuffle automatically when no move is left.
    #[arg(long)]
    pub no_auto_shuffle: bool,

    /// RNG seed for reproducible boards and shuffles.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the link fade animation.
    #[arg(long)]
    pub no_animation: bool,

    /// Skip main menu and start game immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Redraws (and clock checks) per second.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub tick_rate: f64,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<std::path::PathBuf>,

    /// More log detail (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
