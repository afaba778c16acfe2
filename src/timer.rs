//! Level countdown.
//!
//! Remaining time is always derived from a monotonic anchor instant and a
//! time budget, never accumulated tick by tick, so late or missed ticks cannot
//! make the clock drift. Pausing, speed changes and bonus time re-derive the
//! budget; only resume and speed changes move the anchor.

use std::time::{Duration, Instant};

/// Speed multiplier of the "fast timer" option.
pub const FAST_SPEED: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerPhase {
    /// Not started, or frozen after a level clear.
    #[default]
    Stopped,
    Running,
    Paused,
    /// Ran out. Stays here until the next `start`.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerSnapshot {
    pub remaining: u32,
    pub duration: u32,
}

impl TimerSnapshot {
    /// Fraction of the level budget still left, for gauges.
    pub fn ratio(self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        (f64::from(self.remaining) / f64::from(self.duration)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct LevelTimer {
    phase: TimerPhase,
    duration: u32,
    speed: u32,
    /// Game time left at `anchor`.
    budget: Duration,
    anchor: Instant,
    /// Whole seconds left as of the last refresh, rounded up.
    remaining: u32,
}

impl LevelTimer {
    pub fn new(now: Instant) -> Self {
        Self {
            phase: TimerPhase::Stopped,
            duration: 0,
            speed: 1,
            budget: Duration::ZERO,
            anchor: now,
            remaining: 0,
        }
    }

    pub fn start(&mut self, duration_secs: u32, speed: u32, now: Instant) {
        self.phase = TimerPhase::Running;
        self.duration = duration_secs;
        self.speed = speed.max(1);
        self.budget = Duration::from_secs(u64::from(duration_secs));
        self.anchor = now;
        self.remaining = duration_secs;
        log::debug!("timer started: {duration_secs}s at x{}", self.speed);
    }

    /// Game time consumed since the anchor.
    fn consumed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.anchor) * self.speed
    }

    fn left(&self, now: Instant) -> Duration {
        match self.phase {
            TimerPhase::Running => self.budget.saturating_sub(self.consumed(now)),
            TimerPhase::Paused | TimerPhase::Stopped => self.budget,
            TimerPhase::Expired => Duration::ZERO,
        }
    }

    fn refresh(&mut self, now: Instant) {
        let left = self.left(now);
        let secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
        self.remaining = u32::try_from(secs).unwrap_or(u32::MAX);
    }

    /// Recompute remaining time. Fires [`TimerEvent::Expired`] once, on the
    /// tick that finds the budget used up.
    pub fn tick(&mut self, now: Instant) -> Option<TimerEvent> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        self.refresh(now);
        if self.remaining > 0 {
            return None;
        }
        self.phase = TimerPhase::Expired;
        self.budget = Duration::ZERO;
        log::debug!("timer expired");
        Some(TimerEvent::Expired)
    }

    pub fn pause(&mut self, now: Instant) {
        if self.phase == TimerPhase::Running {
            self.budget = self.left(now);
            self.phase = TimerPhase::Paused;
            self.refresh(now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.phase == TimerPhase::Paused {
            self.anchor = now;
            self.phase = TimerPhase::Running;
        }
    }

    /// Change the multiplier without touching the time left.
    pub fn set_speed(&mut self, speed: u32, now: Instant) {
        let speed = speed.max(1);
        if self.phase == TimerPhase::Running {
            self.budget = self.left(now);
            self.anchor = now;
        }
        self.speed = speed;
        self.refresh(now);
    }

    /// Bonus time. Remaining time never goes above the level's duration.
    pub fn add(&mut self, secs: u32, now: Instant) {
        let cap = Duration::from_secs(u64::from(self.duration));
        let bonus = Duration::from_secs(u64::from(secs));
        match self.phase {
            TimerPhase::Running => {
                let consumed = self.consumed(now);
                self.budget = (self.budget + bonus).min(cap + consumed);
            }
            TimerPhase::Paused => self.budget = (self.budget + bonus).min(cap),
            TimerPhase::Stopped | TimerPhase::Expired => return,
        }
        self.refresh(now);
    }

    /// Freeze the clock, keeping what is left (level clear).
    pub fn stop(&mut self, now: Instant) {
        if matches!(self.phase, TimerPhase::Running | TimerPhase::Paused) {
            self.refresh(now);
            self.budget = self.left(now);
            self.phase = TimerPhase::Stopped;
        }
    }

    #[inline]
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    #[inline]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            remaining: self.remaining,
            duration: self.duration,
        }
    }
}
