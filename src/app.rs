//! App: terminal init, main loop, key/mouse handling and progress saves.

use crate::Args;
use crate::input::{Action, key_to_action};
use crate::progress::{self, Progress};
use crate::theme::Theme;
use crate::ui::{self, PathFx, View};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use onettui::cell::Coord;
use onettui::game::{GameConfig, Phase, Session, SessionEvent};
use onettui::matcher::ClickOutcome;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Pause on the "level cleared" banner before the next board appears.
const LEVEL_ADVANCE_DELAY: Duration = Duration::from_millis(900);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
    Victory,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    MainMenu,
    Exit,
}

impl QuitOption {
    fn next(self) -> Self {
        match self {
            Self::Resume => Self::MainMenu,
            Self::MainMenu => Self::Exit,
            Self::Exit => Self::Resume,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Resume => Self::Exit,
            Self::MainMenu => Self::Resume,
            Self::Exit => Self::MainMenu,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Continue,
    NewGame,
    AutoShuffle,
    FastTimer,
    Sound,
    Exit,
}

impl MenuItem {
    pub const ALL: [Self; 6] = [
        Self::Continue,
        Self::NewGame,
        Self::AutoShuffle,
        Self::FastTimer,
        Self::Sound,
        Self::Exit,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|&i| i == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub selected: MenuItem,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            selected: MenuItem::Continue,
        }
    }
}

pub struct App {
    args: Args,
    config: GameConfig,
    theme: Theme,
    session: Session,
    screen: Screen,
    cursor: Coord,
    progress: Progress,
    progress_path: PathBuf,
    menu: MenuState,
    quit_selected: QuitOption,
    /// Session was running when the quit menu opened.
    resume_on_return: bool,
    path_fx: PathFx,
    /// When the current "level cleared" banner went up.
    cleared_at: Option<Instant>,
    new_best: bool,
    /// Terminal area of the last frame, for mouse hit-testing.
    area: Rect,
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme, progress: Progress) -> Self {
        let now = Instant::now();
        let mut session = Session::new(&config, now);
        let screen = if args.no_menu {
            Screen::Playing
        } else {
            session.pause(now);
            Screen::Menu
        };
        Self {
            args,
            config,
            theme,
            session,
            screen,
            cursor: Coord::new(0, 0),
            progress,
            progress_path: progress::config_path(),
            menu: MenuState::default(),
            quit_selected: QuitOption::Resume,
            resume_on_return: false,
            path_fx: PathFx::default(),
            cleared_at: None,
            new_best: false,
            area: Rect::default(),
        }
    }

    fn save_progress(&self) {
        if let Err(e) = progress::save_to(&self.progress_path, &self.progress) {
            log::warn!("could not save progress: {e}");
        }
    }

    /// Fresh session from `level` with the persisted options.
    fn start_run(&mut self, level: u32, now: Instant) {
        let config = GameConfig {
            start_level: level,
            options: self.progress.options,
            ..self.config.clone()
        };
        self.session = Session::new(&config, now);
        self.screen = Screen::Playing;
        self.cursor = Coord::new(0, 0);
        self.cleared_at = None;
        self.new_best = false;
        self.path_fx = PathFx::default();
        log::info!("run started at level {level}");
    }

    /// Run is over (timeout or last level): record the score and show the result.
    fn finish_run(&mut self, screen: Screen) {
        self.new_best |= self.progress.offer_score(self.session.score());
        if screen == Screen::GameOver {
            self.progress.set_last_level(1);
        }
        self.save_progress();
        self.screen = screen;
        log::info!(
            "run over on level {} with {} points",
            self.session.level().index,
            self.session.score()
        );
    }

    fn click(&mut self, at: Coord, now: Instant) {
        let outcome = self.session.click(at, now);
        log::trace!("click {at}: {outcome:?}");
        if !matches!(outcome, ClickOutcome::Matched(_)) {
            return;
        }
        if let Phase::LevelCleared { .. } | Phase::Victory { .. } = self.session.phase() {
            self.new_best |= self.progress.offer_score(self.session.score());
            self.progress
                .set_last_level(self.session.level().index + 1);
            self.save_progress();
            self.cleared_at = Some(now);
        }
    }

    fn move_cursor(&mut self, action: Action) {
        let grid = self.session.grid();
        let (rows, cols) = (grid.rows(), grid.cols());
        let Coord { row, col } = self.cursor;
        self.cursor = match action {
            Action::CursorLeft => Coord::new(row, col.saturating_sub(1)),
            Action::CursorRight => Coord::new(row, (col + 1).min(cols - 1)),
            Action::CursorUp => Coord::new(row.saturating_sub(1), col),
            Action::CursorDown => Coord::new((row + 1).min(rows - 1), col),
            _ => self.cursor,
        };
    }

    fn toggle_option(&mut self, action: Action, now: Instant) {
        let options = &mut self.progress.options;
        match action {
            Action::ToggleAutoShuffle => {
                options.auto_shuffle = !options.auto_shuffle;
                self.session.set_auto_shuffle(options.auto_shuffle, now);
            }
            Action::ToggleFastTimer => {
                options.fast_timer = !options.fast_timer;
                self.session.set_fast_timer(options.fast_timer, now);
            }
            Action::ToggleSound => {
                options.sound_on = !options.sound_on;
                self.session.set_sound(options.sound_on);
            }
            _ => return,
        }
        log::info!("options now {:?}", self.progress.options);
        self.save_progress();
    }

    fn open_quit_menu(&mut self, now: Instant) {
        self.resume_on_return = !self.session.is_paused();
        self.session.pause(now);
        self.quit_selected = QuitOption::Resume;
        self.screen = Screen::QuitMenu;
    }

    fn close_quit_menu(&mut self, now: Instant) {
        if self.resume_on_return {
            self.session.resume(now);
        }
        self.screen = Screen::Playing;
    }

    /// Level advance, timeout and victory, checked once per loop.
    fn update(&mut self, now: Instant) {
        if self.screen != Screen::Playing {
            return;
        }
        if self.session.tick(now) == Some(SessionEvent::TimedOut) {
            self.finish_run(Screen::GameOver);
            return;
        }
        match self.session.phase() {
            Phase::LevelCleared { .. } => {
                let since = *self.cleared_at.get_or_insert(now);
                if now.saturating_duration_since(since) >= LEVEL_ADVANCE_DELAY {
                    self.cleared_at = None;
                    self.session.next_level(now);
                }
            }
            Phase::Victory { .. } => self.finish_run(Screen::Victory),
            Phase::TimedOut => self.finish_run(Screen::GameOver),
            Phase::Playing => {}
        }
    }

    /// Handle one key action. Returns true when the app should exit.
    fn on_action(&mut self, action: Action, now: Instant) -> bool {
        match self.screen {
            Screen::Menu => match action {
                Action::Quit => return true,
                Action::CursorUp | Action::CursorLeft => self.menu.selected = self.menu.selected.prev(),
                Action::CursorDown | Action::CursorRight => {
                    self.menu.selected = self.menu.selected.next();
                }
                Action::ToggleAutoShuffle | Action::ToggleFastTimer | Action::ToggleSound => {
                    self.toggle_option(action, now);
                }
                Action::Select => match self.menu.selected {
                    MenuItem::Continue => self.start_run(self.progress.last_level, now),
                    MenuItem::NewGame => self.start_run(1, now),
                    MenuItem::AutoShuffle => self.toggle_option(Action::ToggleAutoShuffle, now),
                    MenuItem::FastTimer => self.toggle_option(Action::ToggleFastTimer, now),
                    MenuItem::Sound => self.toggle_option(Action::ToggleSound, now),
                    MenuItem::Exit => return true,
                },
                _ => {}
            },
            Screen::Playing => {
                if action == Action::Quit {
                    self.open_quit_menu(now);
                    return false;
                }
                if matches!(self.session.phase(), Phase::LevelCleared { .. }) {
                    return false;
                }
                match action {
                    Action::Pause => self.session.toggle_pause(now),
                    Action::CursorLeft
                    | Action::CursorRight
                    | Action::CursorUp
                    | Action::CursorDown => self.move_cursor(action),
                    Action::Select => self.click(self.cursor, now),
                    Action::Hint => {
                        self.session.hint(now);
                    }
                    Action::Shuffle => {
                        let outcome = self.session.shuffle(false, now);
                        log::debug!("manual shuffle: {outcome:?}");
                    }
                    Action::Restart => {
                        self.session.restart(now);
                        self.progress.set_last_level(1);
                        self.save_progress();
                        self.cleared_at = None;
                        self.new_best = false;
                    }
                    Action::ToggleAutoShuffle | Action::ToggleFastTimer | Action::ToggleSound => {
                        self.toggle_option(action, now);
                    }
                    Action::Quit | Action::None => {}
                }
            }
            Screen::QuitMenu => match action {
                Action::CursorDown | Action::CursorRight => {
                    self.quit_selected = self.quit_selected.next();
                }
                Action::CursorUp | Action::CursorLeft => {
                    self.quit_selected = self.quit_selected.prev();
                }
                Action::Select => match self.quit_selected {
                    QuitOption::Resume => self.close_quit_menu(now),
                    QuitOption::MainMenu => {
                        self.progress.offer_score(self.session.score());
                        self.save_progress();
                        self.screen = Screen::Menu;
                    }
                    QuitOption::Exit => {
                        self.progress.offer_score(self.session.score());
                        self.save_progress();
                        return true;
                    }
                },
                Action::Pause | Action::Quit => self.close_quit_menu(now),
                _ => {}
            },
            Screen::GameOver | Screen::Victory => match action {
                Action::Quit => return true,
                Action::Restart => self.start_run(1, now),
                Action::Select => self.screen = Screen::Menu,
                _ => {}
            },
        }
        false
    }

    fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if self.screen != Screen::Playing || mouse.kind != MouseEventKind::Down(MouseButton::Left)
        {
            return;
        }
        let grid = self.session.grid();
        let (rows, cols) = (grid.rows(), grid.cols());
        let layout = ui::board_layout(self.area, rows, cols);
        if let Some(at) = ui::cell_at(&layout, rows, cols, mouse.column, mouse.row) {
            self.cursor = at;
            self.click(at, now);
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.args.tick_rate.clamp(1.0, 240.0));
        loop {
            let now = Instant::now();
            self.update(now);

            terminal.draw(|f| {
                self.area = f.area();
                let view = View {
                    screen: self.screen,
                    session: &self.session,
                    theme: &self.theme,
                    cursor: self.cursor,
                    menu: &self.menu,
                    quit_selected: self.quit_selected,
                    options: self.progress.options,
                    best_score: self.progress.best_score,
                    new_best: self.new_best,
                    last_level: self.progress.last_level,
                    no_animation: self.args.no_animation,
                    now,
                };
                ui::draw(f, &view, &mut self.path_fx);
            })?;

            let timeout = frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            if self.on_action(key_to_action(key), Instant::now()) {
                                return Ok(());
                            }
                        }
                        Event::Mouse(mouse) => self.on_mouse(mouse, Instant::now()),
                        _ => {}
                    }
                }
            }
        }
    }
}
