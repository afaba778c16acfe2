//! Session: board, selection, score, timer and level for one run.
//!
//! Everything the front-end can do goes through `&mut Session`, and every
//! call runs to completion before returning, so a second click can never
//! land in the middle of a match and its gravity pass.

use crate::cell::Coord;
use crate::grid::GridStore;
use crate::hint::{self, Hint};
use crate::level::{self, DEFAULT_COLS, DEFAULT_ROWS, LevelConfig};
use crate::matcher::{ClickOutcome, MatchEngine, Selection};
use crate::path::Path;
use crate::scoring::{ComboScorer, ScoreAward};
use crate::shuffle;
use crate::timer::{FAST_SPEED, LevelTimer, TimerEvent, TimerPhase, TimerSnapshot};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Manual shuffles granted at the start of every level.
pub const SHUFFLES_PER_LEVEL: u32 = 3;

/// How often the deadlock check runs while auto-shuffle is on.
pub const DEADLOCK_CHECK_INTERVAL: Duration = Duration::from_millis(2000);

/// Player options; persisted by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub auto_shuffle: bool,
    pub fast_timer: bool,
    /// Kept for the settings file only; nothing here makes sound.
    pub sound_on: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            auto_shuffle: true,
            fast_timer: false,
            sound_on: true,
        }
    }
}

impl Options {
    pub fn timer_speed(&self) -> u32 {
        if self.fast_timer { FAST_SPEED } else { 1 }
    }
}

/// What a session is built from. Values are expected to be sane already;
/// the front-end clamps user input.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub start_level: u32,
    pub options: Options,
    /// Fixed RNG seed for reproducible boards and shuffles.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            start_level: 1,
            options: Options::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Board emptied; `bonus` is the time bonus just added to the score.
    LevelCleared { bonus: u32 },
    /// Last level cleared.
    Victory { bonus: u32 },
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleOutcome {
    Shuffled,
    NoShufflesLeft,
    /// Not playing, or paused.
    Unavailable,
}

/// Things that happened during a [`Session::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    TimedOut,
    AutoShuffled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Match,
    Hint,
}

/// Route to draw over the board for a short while.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub path: Path,
    pub at: Instant,
}

/// Most recent status message (screen-reader style live region).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
    pub at: Instant,
}

/// Everything a sidebar needs, in one copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub level: u32,
    pub score: u32,
    pub combo: u32,
    pub timer: TimerSnapshot,
    pub shuffles_left: u32,
    pub phase: Phase,
    pub paused: bool,
}

#[derive(Debug)]
pub struct Session {
    rows: usize,
    cols: usize,
    grid: GridStore,
    matcher: MatchEngine,
    scorer: ComboScorer,
    timer: LevelTimer,
    level: LevelConfig,
    shuffles_left: u32,
    options: Options,
    rng: StdRng,
    phase: Phase,
    paused: bool,
    hint: Option<Hint>,
    flash: Option<Flash>,
    last_award: Option<ScoreAward>,
    announcement: Option<Announcement>,
    last_deadlock_check: Instant,
}

impl Session {
    pub fn new(config: &GameConfig, now: Instant) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut session = Self {
            rows: config.rows,
            cols: config.cols,
            grid: GridStore::new(config.rows, config.cols),
            matcher: MatchEngine::new(),
            scorer: ComboScorer::new(),
            timer: LevelTimer::new(now),
            level: LevelConfig::for_level(config.start_level),
            shuffles_left: SHUFFLES_PER_LEVEL,
            options: config.options,
            rng,
            phase: Phase::Playing,
            paused: false,
            hint: None,
            flash: None,
            last_award: None,
            announcement: None,
            last_deadlock_check: now,
        };
        session.start_level(config.start_level, now);
        session
    }

    /// Fresh board for level `n` (clamped). The score carries over.
    pub fn start_level(&mut self, n: u32, now: Instant) {
        self.level = LevelConfig::for_level(n);
        self.grid = level::generate(self.rows, self.cols, &self.level, &mut self.rng);
        self.matcher.reset();
        self.scorer = ComboScorer::with_score(self.scorer.score());
        self.timer
            .start(self.level.duration_secs, self.options.timer_speed(), now);
        self.shuffles_left = SHUFFLES_PER_LEVEL;
        self.phase = Phase::Playing;
        self.paused = false;
        self.hint = None;
        self.flash = None;
        self.last_award = None;
        self.last_deadlock_check = now;
        self.announce(format!("Level {}", self.level.index), now);
        log::info!("level {} started", self.level.index);
    }

    /// Move on after a clear. Returns false unless the phase was `LevelCleared`.
    pub fn next_level(&mut self, now: Instant) -> bool {
        if !matches!(self.phase, Phase::LevelCleared { .. }) {
            return false;
        }
        self.start_level(self.level.index + 1, now);
        true
    }

    /// New run from level 1 with the score back at zero.
    pub fn restart(&mut self, now: Instant) {
        self.scorer = ComboScorer::new();
        self.start_level(1, now);
    }

    fn accepts_input(&self) -> bool {
        self.phase == Phase::Playing && !self.paused
    }

    fn announce(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        log::debug!("announce: {text}");
        self.announcement = Some(Announcement { text, at: now });
    }

    /// Click on a board cell.
    pub fn click(&mut self, at: Coord, now: Instant) -> ClickOutcome {
        if !self.accepts_input() {
            return ClickOutcome::Rejected;
        }
        let outcome = self.matcher.click(&mut self.grid, at, now);
        match &outcome {
            ClickOutcome::Matched(event) => {
                self.hint = None;
                let award = self.scorer.on_match(event.at);
                self.last_award = Some(award);
                self.flash = Some(Flash {
                    kind: FlashKind::Match,
                    path: event.path.clone(),
                    at: now,
                });
                if let Some(secs) = award.bonus_secs {
                    self.timer.add(secs, now);
                    self.announce(format!("+{secs}s combo {}", award.combo), now);
                }
                if event.cleared {
                    self.clear_level(now);
                }
            }
            ClickOutcome::Mismatch { no_path: true, .. } => self.announce("No path!", now),
            ClickOutcome::Mismatch { .. }
            | ClickOutcome::Selected(_)
            | ClickOutcome::Deselected(_)
            | ClickOutcome::Rejected => {}
        }
        outcome
    }

    fn clear_level(&mut self, now: Instant) {
        self.timer.stop(now);
        let bonus = self.scorer.award_time_left(self.timer.remaining());
        self.phase = if self.level.is_last() {
            Phase::Victory { bonus }
        } else {
            Phase::LevelCleared { bonus }
        };
        self.announce(format!("Level cleared! +{bonus}"), now);
        log::info!(
            "level {} cleared, bonus {bonus}, score {}",
            self.level.index,
            self.scorer.score()
        );
    }

    /// First linkable pair, remembered for highlighting. Announces when there is none.
    pub fn hint(&mut self, now: Instant) -> Option<Hint> {
        if !self.accepts_input() {
            return None;
        }
        let found = hint::find_any_pair(&self.grid);
        match &found {
            Some(h) => {
                self.flash = Some(Flash {
                    kind: FlashKind::Hint,
                    path: h.path.clone(),
                    at: now,
                });
            }
            None => self.announce("No moves left", now),
        }
        self.hint.clone_from(&found);
        found
    }

    /// Reshuffle the icons. A manual shuffle (`forced == false`) spends one of
    /// the level's shuffles; a forced one is free.
    pub fn shuffle(&mut self, forced: bool, now: Instant) -> ShuffleOutcome {
        if !self.accepts_input() {
            return ShuffleOutcome::Unavailable;
        }
        if !forced {
            if self.shuffles_left == 0 {
                self.announce("No shuffles left", now);
                return ShuffleOutcome::NoShufflesLeft;
            }
            self.shuffles_left -= 1;
        }
        shuffle::shuffle(&mut self.grid, &mut self.rng);
        self.matcher.reset();
        self.hint = None;
        self.flash = None;
        log::debug!("shuffled (forced={forced}), {} left", self.shuffles_left);
        ShuffleOutcome::Shuffled
    }

    /// Periodic wake-up: timer expiry, then the auto-shuffle deadlock check.
    pub fn tick(&mut self, now: Instant) -> Option<SessionEvent> {
        if !self.accepts_input() {
            return None;
        }
        if self.timer.tick(now) == Some(TimerEvent::Expired) {
            self.phase = Phase::TimedOut;
            self.matcher.reset();
            self.hint = None;
            self.announce("Time's up!", now);
            log::info!("timed out on level {}", self.level.index);
            return Some(SessionEvent::TimedOut);
        }
        if !self.options.auto_shuffle
            || now.saturating_duration_since(self.last_deadlock_check) < DEADLOCK_CHECK_INTERVAL
        {
            return None;
        }
        self.last_deadlock_check = now;
        if !hint::is_deadlocked(&self.grid) {
            return None;
        }
        log::debug!("deadlock on level {}", self.level.index);
        self.shuffle(true, now);
        self.announce("No moves left, shuffling", now);
        Some(SessionEvent::AutoShuffled)
    }

    pub fn pause(&mut self, now: Instant) {
        if self.phase == Phase::Playing && !self.paused {
            self.paused = true;
            self.timer.pause(now);
            self.announce("Paused", now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.paused {
            self.paused = false;
            self.timer.resume(now);
            self.last_deadlock_check = now;
            self.announce("Resumed", now);
        }
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        if self.paused {
            self.resume(now);
        } else {
            self.pause(now);
        }
    }

    pub fn set_fast_timer(&mut self, on: bool, now: Instant) {
        self.options.fast_timer = on;
        self.timer.set_speed(self.options.timer_speed(), now);
    }

    pub fn set_auto_shuffle(&mut self, on: bool, now: Instant) {
        self.options.auto_shuffle = on;
        self.last_deadlock_check = now;
    }

    pub fn set_sound(&mut self, on: bool) {
        self.options.sound_on = on;
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn selection(&self) -> Selection {
        self.matcher.selection()
    }

    pub fn selected(&self) -> Option<Coord> {
        self.matcher.selected()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn score(&self) -> u32 {
        self.scorer.score()
    }

    pub fn scorer(&self) -> &ComboScorer {
        &self.scorer
    }

    pub fn timer_phase(&self) -> TimerPhase {
        self.timer.phase()
    }

    pub fn shuffles_left(&self) -> u32 {
        self.shuffles_left
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn current_hint(&self) -> Option<&Hint> {
        self.hint.as_ref()
    }

    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    pub fn last_award(&self) -> Option<ScoreAward> {
        self.last_award
    }

    pub fn announcement(&self) -> Option<&Announcement> {
        self.announcement.as_ref()
    }

    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            level: self.level.index,
            score: self.scorer.score(),
            combo: self.scorer.live_combo(now),
            timer: self.timer.snapshot(),
            shuffles_left: self.shuffles_left,
            phase: self.phase,
            paused: self.paused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn config() -> GameConfig {
        GameConfig {
            rows: 4,
            cols: 4,
            seed: Some(5),
            ..GameConfig::default()
        }
    }

    /// Click the first hinted pair.
    fn play_hint(s: &mut Session, now: Instant) -> ClickOutcome {
        let h = hint::find_any_pair(s.grid()).expect("board has a move");
        s.click(h.first, now);
        s.click(h.second, now)
    }

    #[test]
    fn test_new_session_starts_playing() {
        let t0 = Instant::now();
        let s = Session::new(&config(), t0);
        let snap = s.snapshot(t0);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.shuffles_left, SHUFFLES_PER_LEVEL);
        assert_eq!(snap.timer.remaining, 150);
        assert_eq!(snap.phase, Phase::Playing);
        assert_eq!(s.grid().icon_count(), 16);
        assert_eq!(s.announcement().map(|a| a.text.as_str()), Some("Level 1"));
    }

    #[test]
    fn test_match_scores_and_flashes() {
        let t0 = Instant::now();
        let mut s = Session::new(&config(), t0);
        let outcome = play_hint(&mut s, t0);
        assert!(matches!(outcome, ClickOutcome::Matched(_)));
        assert_eq!(s.score(), 10);
        assert_eq!(s.grid().icon_count(), 14);
        assert_eq!(s.flash().map(|f| f.kind), Some(FlashKind::Match));
    }

    #[test]
    fn test_clearing_board_awards_time_bonus() {
        let t0 = Instant::now();
        let mut s = Session::new(&config(), t0);
        let mut now = t0;
        // Spread matches out so combos stay at 1 and the sum is easy to check.
        while s.phase() == Phase::Playing {
            if hint::find_any_pair(s.grid()).is_none() {
                assert_eq!(s.shuffle(true, now), ShuffleOutcome::Shuffled);
                continue;
            }
            now += Duration::from_secs(3);
            play_hint(&mut s, now);
        }
        let Phase::LevelCleared { bonus } = s.phase() else {
            panic!("expected level clear, got {:?}", s.phase());
        };
        assert_eq!(bonus, (150 - 24) * 10);
        assert_eq!(s.score(), 8 * 10 + bonus);
        assert_eq!(s.timer_phase(), TimerPhase::Stopped);

        assert!(s.next_level(now));
        assert_eq!(s.level().index, 2);
        assert_eq!(s.score(), 8 * 10 + bonus);
        assert_eq!(s.snapshot(now).timer.remaining, 120);
    }

    /// Four matches at one instant, reshuffling whenever the board is stuck.
    fn play_combo_of_four(s: &mut Session, now: Instant) {
        for _ in 0..4 {
            while hint::find_any_pair(s.grid()).is_none() {
                s.shuffle(true, now);
            }
            assert!(matches!(play_hint(s, now), ClickOutcome::Matched(_)));
        }
    }

    #[test]
    fn test_fourth_chained_match_adds_time() {
        let t0 = Instant::now();
        let mut s = Session::new(&config(), t0);
        let t20 = t0 + Duration::from_secs(20);
        s.tick(t20);
        assert_eq!(s.snapshot(t20).timer.remaining, 130);

        play_combo_of_four(&mut s, t20);
        let award = s.last_award().expect("four matches scored");
        assert_eq!(award.combo, 4);
        assert_eq!(award.bonus_secs, Some(5));
        assert_eq!(s.snapshot(t20).timer.remaining, 135);
        assert_eq!(
            s.announcement().map(|a| a.text.as_str()),
            Some("+5s combo 4")
        );
    }

    #[test]
    fn test_combo_time_bonus_capped_at_duration() {
        let t0 = Instant::now();
        let mut s = Session::new(&config(), t0);
        let t2 = t0 + Duration::from_secs(2);
        s.tick(t2);
        assert_eq!(s.snapshot(t2).timer.remaining, 148);

        play_combo_of_four(&mut s, t2);
        let timer = s.snapshot(t2).timer;
        assert_eq!(timer.duration, 150);
        assert_eq!(timer.remaining, timer.duration);
    }

    #[test]
    fn test_last_level_clear_is_victory() {
        let t0 = Instant::now();
        let cfg = GameConfig {
            start_level: level::LEVEL_COUNT,
            ..config()
        };
        let mut s = Session::new(&cfg, t0);
        assert!(!s.next_level(t0));
        assert_eq!(s.level().index, level::LEVEL_COUNT);

        s.grid = GridStore::from_rows(vec![vec![Cell::Icon(3), Cell::Icon(3)]]);
        let now = t0 + Duration::from_secs(10);
        s.click(Coord::new(0, 0), now);
        assert!(matches!(s.click(Coord::new(0, 1), now), ClickOutcome::Matched(_)));

        let Phase::Victory { bonus } = s.phase() else {
            panic!("expected victory, got {:?}", s.phase());
        };
        let remaining = s.snapshot(now).timer.remaining;
        assert_eq!(remaining, 50 - 10);
        assert_eq!(bonus, remaining * 10);
        assert_eq!(s.score(), 10 + bonus);
        assert_eq!(s.timer_phase(), TimerPhase::Stopped);

        assert!(!s.next_level(now));
        assert_eq!(s.level().index, level::LEVEL_COUNT);
        assert_eq!(s.click(Coord::new(0, 0), now), ClickOutcome::Rejected);
    }

    #[test]
    fn test_manual_shuffle_budget() {
        let t0 = Instant::now();
        let mut s = Session::new(&config(), t0);
        for left in (0..SHUFFLES_PER_LEVEL).rev() {
            assert_eq!(s.shuffle(false, t0), ShuffleOutcome::Shuffled);
            assert_eq!(s.shuffles_left(), left);
        }
        assert_eq!(s.shuffle(false, t0), ShuffleOutcome::NoShufflesLeft);
        assert_eq!(s.shuffle(true, t0), ShuffleOutcome::Shuffled);
        assert_eq!(s.shuffles_left(), 0);
    }

    #[test]
    fn test_timeout_then_restart() {
        let t0 = Instant::now();
        let mut s = Session::new(&config(), t0);
        play_hint(&mut s, t0);
        assert_eq!(s.tick(t0 + Duration::from_secs(150)), Some(SessionEvent::TimedOut));
        assert_eq!(s.phase(), Phase::TimedOut);
        assert_eq!(s.click(Coord::new(0, 0), t0), ClickOutcome::Rejected);
        assert_eq!(s.tick(t0 + Duration::from_secs(151)), None);

        s.restart(t0 + Duration::from_secs(160));
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.score(), 0);
        assert_eq!(s.level().index, 1);
    }

    #[test]
    fn test_pause_blocks_input_and_freezes_timer() {
        let t0 = Instant::now();
        let mut s = Session::new(&config(), t0);
        s.pause(t0 + Duration::from_secs(10));
        assert!(s.is_paused());
        assert_eq!(s.click(Coord::new(0, 0), t0), ClickOutcome::Rejected);
        assert!(s.hint(t0).is_none());
        assert_eq!(s.shuffle(false, t0), ShuffleOutcome::Unavailable);
        assert_eq!(s.tick(t0 + Duration::from_secs(400)), None);
        s.toggle_pause(t0 + Duration::from_secs(400));
        assert!(!s.is_paused());
        s.tick(t0 + Duration::from_secs(405));
        assert_eq!(s.snapshot(t0).timer.remaining, 135);
    }

    #[test]
    fn test_fast_timer_toggle_keeps_remaining() {
        let t0 = Instant::now();
        let mut s = Session::new(&config(), t0);
        s.tick(t0 + Duration::from_secs(10));
        s.set_fast_timer(true, t0 + Duration::from_secs(10));
        assert_eq!(s.snapshot(t0).timer.remaining, 140);
        s.tick(t0 + Duration::from_secs(15));
        assert_eq!(s.snapshot(t0).timer.remaining, 130);
        assert!(s.options().fast_timer);
    }

    #[test]
    fn test_auto_shuffle_resolves_deadlock() {
        let t0 = Instant::now();
        let mut s = Session::new(&config(), t0);
        // Wall every icon in: one pair sealed apart by obstacles.
        let rock = Cell::Obstacle(crate::cell::ObstacleKind::Rock);
        s.grid = GridStore::from_rows(vec![
            vec![rock, rock, rock, rock],
            vec![Cell::Icon(1), rock, rock, Cell::Icon(1)],
            vec![rock, rock, rock, rock],
        ]);
        assert!(hint::is_deadlocked(s.grid()));
        assert_eq!(s.tick(t0 + Duration::from_millis(1000)), None);
        assert_eq!(s.tick(t0 + Duration::from_millis(2000)), Some(SessionEvent::AutoShuffled));
        assert_eq!(s.shuffles_left(), SHUFFLES_PER_LEVEL);
        // Next check waits another full interval.
        assert_eq!(s.tick(t0 + Duration::from_millis(3000)), None);

        s.set_auto_shuffle(false, t0 + Duration::from_millis(3000));
        assert_eq!(s.tick(t0 + Duration::from_millis(9000)), None);
    }

    #[test]
    fn test_hint_remembers_pair() {
        let t0 = Instant::now();
        let mut s = Session::new(&config(), t0);
        let h = s.hint(t0).expect("fresh board has a move");
        assert_eq!(s.current_hint(), Some(&h));
        assert_eq!(s.flash().map(|f| f.kind), Some(FlashKind::Hint));
    }

    #[test]
    fn test_options_default_and_serde() {
        let opts: Options = serde_json::from_str(r#"{"fast_timer":true}"#).unwrap();
        assert!(opts.auto_shuffle);
        assert!(opts.fast_timer);
        assert_eq!(opts.timer_speed(), FAST_SPEED);
    }
}
