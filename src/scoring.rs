//! Score and combo: matches within [`COMBO_WINDOW`] of each other chain.

use std::time::{Duration, Instant};

/// Max gap between two matches for the combo to grow instead of resetting.
pub const COMBO_WINDOW: Duration = Duration::from_millis(2000);

/// Points for any match before the combo bonus.
pub const BASE_SCORE: u32 = 10;

/// Combo length that grants bonus time.
pub const TIME_BONUS_COMBO: u32 = 4;

/// Seconds added to the level timer when [`TIME_BONUS_COMBO`] is reached.
pub const COMBO_TIME_BONUS_SECS: u32 = 5;

/// Level-clear bonus per second left on the clock.
pub const TIME_BONUS_PER_SEC: u32 = 10;

/// Bonus on top of [`BASE_SCORE`] for the n-th match in a chain. Flat from 5 on.
pub fn combo_bonus(count: u32) -> u32 {
    match count {
        0 | 1 => 0,
        2 => 10,
        3 => 20,
        4 => 30,
        _ => 40,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboState {
    pub count: u32,
    pub last_match: Option<Instant>,
}

/// What one match was worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreAward {
    pub points: u32,
    pub combo: u32,
    /// Seconds to hand to the level timer, if this match earned any.
    pub bonus_secs: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreSnapshot {
    pub score: u32,
    pub combo: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ComboScorer {
    combo: ComboState,
    score: u32,
}

impl ComboScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carry a running score into a new level; the combo starts over.
    pub fn with_score(score: u32) -> Self {
        Self {
            combo: ComboState::default(),
            score,
        }
    }

    pub fn on_match(&mut self, at: Instant) -> ScoreAward {
        let chained = self
            .combo
            .last_match
            .is_some_and(|last| at.saturating_duration_since(last) <= COMBO_WINDOW);
        self.combo.count = if chained { self.combo.count + 1 } else { 1 };
        self.combo.last_match = Some(at);

        let points = BASE_SCORE + combo_bonus(self.combo.count);
        self.score = self.score.saturating_add(points);
        let bonus_secs = (self.combo.count == TIME_BONUS_COMBO).then_some(COMBO_TIME_BONUS_SECS);
        ScoreAward {
            points,
            combo: self.combo.count,
            bonus_secs,
        }
    }

    /// Convert leftover seconds into points at level clear. Returns the bonus.
    pub fn award_time_left(&mut self, remaining_secs: u32) -> u32 {
        let bonus = remaining_secs.saturating_mul(TIME_BONUS_PER_SEC);
        self.score = self.score.saturating_add(bonus);
        bonus
    }

    /// Combo for display: drops to 0 once the window has lapsed.
    pub fn live_combo(&self, now: Instant) -> u32 {
        match self.combo.last_match {
            Some(last) if now.saturating_duration_since(last) <= COMBO_WINDOW => self.combo.count,
            _ => 0,
        }
    }

    /// Fraction of the combo window still open, 1.0 right after a match.
    pub fn window_ratio(&self, now: Instant) -> f64 {
        let Some(last) = self.combo.last_match else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(last).as_secs_f64();
        (1.0 - elapsed / COMBO_WINDOW.as_secs_f64()).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn combo(&self) -> ComboState {
        self.combo
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            combo: self.combo.count,
        }
    }
}
