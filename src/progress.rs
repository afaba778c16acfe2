//! Persist progress to disk (XDG config or ~/.config/onettui): best score,
//! last level reached and player options.

use onettui::game::Options;
use onettui::level::LEVEL_COUNT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FILENAME: &str = "progress.json";

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad progress file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub best_score: u32,
    pub last_level: u32,
    pub options: Options,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            best_score: 0,
            last_level: 1,
            options: Options::default(),
        }
    }
}

impl Progress {
    /// Record a score; true if it beat the previous best.
    pub fn offer_score(&mut self, score: u32) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    pub fn set_last_level(&mut self, level: u32) {
        self.last_level = level.clamp(1, LEVEL_COUNT);
    }
}

/// Returns the path to the progress file (config dir / onettui / progress.json).
pub fn config_path() -> PathBuf {
    let home_config = || {
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from("."))
    };
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => home_config(),
    };
    base.join("onettui").join(FILENAME)
}

pub fn load_from(path: &Path) -> Result<Progress, ProgressError> {
    let content = fs::read_to_string(path)?;
    let mut progress: Progress = serde_json::from_str(&content)?;
    progress.set_last_level(progress.last_level);
    Ok(progress)
}

/// Load progress; defaults on a missing or unreadable file.
pub fn load_progress() -> Progress {
    let path = config_path();
    match load_from(&path) {
        Ok(p) => p,
        Err(ProgressError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Progress::default(),
        Err(e) => {
            log::warn!("ignoring {}: {e}", path.display());
            Progress::default()
        }
    }
}

/// Write progress as pretty JSON, creating the config directory if needed.
pub fn save_to(path: &Path, progress: &Progress) -> Result<(), ProgressError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(progress)?;
    fs::write(path, json)?;
    Ok(())
}
