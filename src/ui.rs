//! Layout and drawing: menu, board, link route, sidebar, status line, overlays.

use crate::app::{MenuItem, MenuState, QuitOption, Screen};
use crate::theme::Theme;
use onettui::cell::{Cell, Coord, ObstacleKind};
use onettui::game::{Flash, FlashKind, Options, Phase, Session};
use onettui::level::LEVEL_COUNT;
use onettui::path::Path;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

const SIDEBAR_WIDTH: u16 = 26;
const SIDEBAR_HEIGHT: u16 = 19;
const STATUS_HEIGHT: u16 = 1;

/// How long a link route stays on screen (TachyonFX fade to background).
pub const PATH_FADE_MS: u32 = 450;

/// Announcements older than this give the status line back to the key help.
const ANNOUNCE_MS: u64 = 2500;

/// One glyph per icon id.
const ICON_GLYPHS: [&str; 20] = [
    "♠", "♥", "♦", "♣", "★", "●", "▲", "■", "◆", "♪", "☀", "☂", "♞", "✿", "☾", "♫", "✦", "♜", "☘",
    "⚑",
];

fn obstacle_glyph(kind: ObstacleKind) -> &'static str {
    match kind {
        ObstacleKind::Rock => "█",
        ObstacleKind::Ice => "░",
        ObstacleKind::Bush => "▒",
        ObstacleKind::Vortex => "@",
    }
}

/// Everything the drawing code reads for one frame.
pub struct View<'a> {
    pub screen: Screen,
    pub session: &'a Session,
    pub theme: &'a Theme,
    pub cursor: Coord,
    pub menu: &'a MenuState,
    pub quit_selected: QuitOption,
    pub options: Options,
    pub best_score: u32,
    pub new_best: bool,
    pub last_level: u32,
    pub no_animation: bool,
    pub now: Instant,
}

/// Fade effect for the last link route, kept across frames.
#[derive(Default)]
pub struct PathFx {
    effect: Option<Effect>,
    last_process: Option<Instant>,
    /// `Flash::at` of the route the effect was built for.
    source: Option<Instant>,
}

/// Where the board, its tiles, the status line and the sidebar go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub board: Rect,
    /// Padded grid area: the board plus its empty ring.
    pub inner: Rect,
    pub status: Rect,
    pub sidebar: Rect,
    pub cell_w: u16,
    pub cell_h: u16,
}

/// Tile size in terminal cells: roomy when it fits, compact otherwise.
pub fn cell_size(area: Rect, rows: usize, cols: usize) -> (u16, u16) {
    let (pr, pc) = (rows as u16 + 2, cols as u16 + 2);
    let fits = |cw: u16, ch: u16| {
        pc * cw + 2 + SIDEBAR_WIDTH <= area.width && pr * ch + 2 + STATUS_HEIGHT <= area.height
    };
    if fits(5, 2) {
        (5, 2)
    } else if fits(4, 2) {
        (4, 2)
    } else {
        (3, 1)
    }
}

pub fn board_layout(area: Rect, rows: usize, cols: usize) -> BoardLayout {
    let (cell_w, cell_h) = cell_size(area, rows, cols);
    let bw = (cols as u16 + 2) * cell_w + 2;
    let bh = (rows as u16 + 2) * cell_h + 2;
    let total_w = bw + SIDEBAR_WIDTH;
    let total_h = (bh + STATUS_HEIGHT).max(SIDEBAR_HEIGHT);
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(total_h) / 2;
    let board = Rect {
        x,
        y,
        width: bw.min(area.width),
        height: bh.min(area.height),
    };
    let inner = Rect {
        x: x + 1,
        y: y + 1,
        width: board.width.saturating_sub(2),
        height: board.height.saturating_sub(2),
    };
    let status = Rect {
        x,
        y: y + board.height,
        width: board.width,
        height: STATUS_HEIGHT.min(area.height.saturating_sub(board.height)),
    };
    let sidebar = Rect {
        x: x + board.width,
        y,
        width: SIDEBAR_WIDTH.min(area.width.saturating_sub(board.width)),
        height: total_h.min(area.height),
    };
    BoardLayout {
        board,
        inner,
        status,
        sidebar,
        cell_w,
        cell_h,
    }
}

/// Screen rect of a padded-grid cell, `None` when it falls outside the board.
pub fn cell_rect(layout: &BoardLayout, at: Coord) -> Option<Rect> {
    let x = layout.inner.x + at.col as u16 * layout.cell_w;
    let y = layout.inner.y + at.row as u16 * layout.cell_h;
    let rect = Rect {
        x,
        y,
        width: layout.cell_w,
        height: layout.cell_h,
    };
    (rect.right() <= layout.inner.right() && rect.bottom() <= layout.inner.bottom()).then_some(rect)
}

/// Board coordinate under a screen position (mouse click), if it hits a tile slot.
pub fn cell_at(layout: &BoardLayout, rows: usize, cols: usize, x: u16, y: u16) -> Option<Coord> {
    if !layout.inner.contains(Position::new(x, y)) {
        return None;
    }
    let col = usize::from((x - layout.inner.x) / layout.cell_w);
    let row = usize::from((y - layout.inner.y) / layout.cell_h);
    Coord::new(row, col).unpadded(rows, cols)
}

/// Width of the tile face; wide cells keep one column of gap on the right.
fn face_width(cell_w: u16) -> u16 {
    if cell_w >= 4 { cell_w - 1 } else { cell_w }
}

fn cell_center(rect: Rect) -> (u16, u16) {
    (
        rect.x + face_width(rect.width) / 2,
        rect.y + rect.height.saturating_sub(1) / 2,
    )
}

fn put(buf: &mut Buffer, x: u16, y: u16, symbol: &str, style: Style) {
    if buf.area.contains(Position::new(x, y)) {
        buf[(x, y)].set_symbol(symbol).set_style(style);
    }
}

/// Line-drawing glyphs for a route: straight runs through each cell and a
/// corner piece where it turns. Endpoint centres are left to the tiles.
pub fn path_glyphs(path: &Path, layout: &BoardLayout) -> Vec<(u16, u16, &'static str)> {
    let cells = path.cells();
    let mut out = Vec::new();
    for (i, &p) in cells.iter().enumerate() {
        let Some(rect) = cell_rect(layout, p) else {
            continue;
        };
        let (cx, cy) = cell_center(rect);
        let (mut left, mut right, mut up, mut down) = (false, false, false, false);
        let prev = i.checked_sub(1).map(|j| cells[j]);
        let next = cells.get(i + 1).copied();
        for n in [prev, next].into_iter().flatten() {
            if n.row == p.row {
                if n.col < p.col {
                    left = true;
                } else {
                    right = true;
                }
            } else if n.row < p.row {
                up = true;
            } else {
                down = true;
            }
        }
        if left {
            out.extend((rect.x..cx).map(|x| (x, cy, "─")));
        }
        if right {
            out.extend((cx + 1..rect.right()).map(|x| (x, cy, "─")));
        }
        if up {
            out.extend((rect.y..cy).map(|y| (cx, y, "│")));
        }
        if down {
            out.extend((cy + 1..rect.bottom()).map(|y| (cx, y, "│")));
        }
        if i != 0 && i + 1 != cells.len() {
            let glyph = match (left, right, up, down) {
                (true, true, _, _) => "─",
                (_, _, true, true) => "│",
                (true, _, true, _) => "┘",
                (true, _, _, true) => "┐",
                (_, true, true, _) => "└",
                (_, true, _, true) => "┌",
                _ => "·",
            };
            out.push((cx, cy, glyph));
        }
    }
    out
}

/// Draw current screen with its overlays.
pub fn draw(frame: &mut Frame, view: &View, fx: &mut PathFx) {
    let area = frame.area();
    frame
        .buffer_mut()
        .set_style(area, Style::default().bg(view.theme.bg));
    match view.screen {
        Screen::Menu => draw_menu(frame, view, area),
        Screen::Playing => {
            draw_game(frame, view, area, fx);
            match view.session.phase() {
                Phase::LevelCleared { bonus } => draw_level_cleared(frame, view, area, bonus),
                _ if view.session.is_paused() => draw_pause_overlay(frame, view.theme, area),
                _ => {}
            }
        }
        Screen::QuitMenu => {
            draw_game(frame, view, area, fx);
            draw_quit_menu(frame, view.theme, view.quit_selected);
        }
        Screen::GameOver | Screen::Victory => {
            draw_game(frame, view, area, fx);
            draw_game_over(frame, view, area);
        }
    }
}

fn draw_menu(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let popup_w = 44u16;
    let popup_h = 16u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };

    let title = Line::from(vec![
        Span::styled(
            " onet ",
            Style::default()
                .fg(theme.icon_color(2))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " tui ",
            Style::default()
                .fg(theme.main_fg)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    // Tile strip under the title, one glyph per colour.
    let strip: Vec<Span> = (0..crate::theme::ICON_COLORS as u8)
        .map(|i| {
            Span::styled(
                format!("{} ", ICON_GLYPHS[usize::from(i)]),
                Style::default().fg(theme.icon_color(i)),
            )
        })
        .collect();

    let highlight = Style::default()
        .fg(theme.bg)
        .bg(theme.title)
        .add_modifier(Modifier::BOLD);
    let normal = Style::default().fg(theme.main_fg);
    let check = |on: bool| if on { "[x]" } else { "[ ]" };

    let mut lines = vec![Line::from(""), title, Line::from(strip), Line::from("")];
    for item in MenuItem::ALL {
        let label = match item {
            MenuItem::Continue => format!(" Continue (level {}) ", view.last_level),
            MenuItem::NewGame => " New game ".to_string(),
            MenuItem::AutoShuffle => format!(" {} Auto-shuffle ", check(view.options.auto_shuffle)),
            MenuItem::FastTimer => format!(" {} Fast timer ", check(view.options.fast_timer)),
            MenuItem::Sound => format!(" {} Sound ", check(view.options.sound_on)),
            MenuItem::Exit => " Exit ".to_string(),
        };
        let style = if item == view.menu.selected {
            highlight
        } else {
            normal
        };
        lines.push(Line::from(Span::styled(label, style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" Best: {} ", view.best_score),
        Style::default().fg(theme.title),
    )));
    lines.push(Line::from(Span::styled(
        " ↑/↓ Choose   Enter Select   Q Quit ",
        Style::default().fg(theme.inactive_fg),
    )));

    Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    )
    .render(popup, frame.buffer_mut());
}

/// Draw game: board + status line + sidebar, centred in the full area.
fn draw_game(frame: &mut Frame, view: &View, area: Rect, fx: &mut PathFx) {
    let grid = view.session.grid();
    let layout = board_layout(area, grid.rows(), grid.cols());
    draw_board(frame, view, &layout);
    if let Some(flash) = view.session.flash() {
        draw_flash(frame, view, &layout, flash, fx);
    }
    draw_status(frame, view, layout.status);
    draw_sidebar(frame, view, layout.sidebar);
}

fn draw_board(frame: &mut Frame, view: &View, layout: &BoardLayout) {
    let theme = view.theme;
    let session = view.session;
    let grid = session.grid();
    let (rows, cols) = (grid.rows(), grid.cols());

    let title = format!(" onettui  Level {}/{} ", session.level().index, LEVEL_COUNT);
    // Each level's backdrop id tints the frame.
    let frame_color = theme.icon_color(session.level().background);
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(frame_color).bg(theme.bg))
        .title(Span::styled(title, theme.title))
        .render(layout.board, frame.buffer_mut());

    let hinted: HashSet<Coord> = session
        .current_hint()
        .map(|h| [h.first, h.second].into_iter().collect())
        .unwrap_or_default();
    let selected = session.selected();
    let show_cursor = view.screen == Screen::Playing && session.phase() == Phase::Playing;
    let tile_bg = theme.div_line;

    let buf = frame.buffer_mut();
    for pr in 0..rows + 2 {
        for pc in 0..cols + 2 {
            let padded = Coord::new(pr, pc);
            let Some(rect) = cell_rect(layout, padded) else {
                continue;
            };
            let at = padded.unpadded(rows, cols);
            let cell = grid.padded_get(padded).unwrap_or_default();
            let face_w = face_width(rect.width);
            let (cx, cy) = cell_center(rect);

            let (symbol, mut style, fill) = match cell {
                Cell::Empty => (" ", Style::default().bg(theme.bg), " "),
                Cell::Obstacle(kind) => {
                    let g = obstacle_glyph(kind);
                    (g, Style::default().fg(theme.inactive_fg).bg(theme.bg), g)
                }
                Cell::Icon(id) => {
                    let glyph = ICON_GLYPHS[usize::from(id) % ICON_GLYPHS.len()];
                    let color = theme.icon_color(id);
                    let style = if at.is_some() && at == selected {
                        Style::default().fg(theme.bg).bg(color)
                    } else if at.is_some_and(|c| hinted.contains(&c)) {
                        Style::default().fg(theme.bg).bg(theme.hint)
                    } else {
                        Style::default().fg(color).bg(tile_bg)
                    };
                    (glyph, style.add_modifier(Modifier::BOLD), " ")
                }
            };
            if show_cursor && at == Some(view.cursor) {
                style = style.add_modifier(Modifier::REVERSED);
                if cell.is_empty() {
                    style = style.bg(theme.div_line);
                }
            }
            for y in rect.y..rect.bottom() {
                for x in rect.x..rect.x + face_w {
                    put(buf, x, y, fill, style);
                }
            }
            put(buf, cx, cy, symbol, style);
        }
    }
}

/// Route overlay for the last match or hint, faded out with TachyonFX.
fn draw_flash(frame: &mut Frame, view: &View, layout: &BoardLayout, flash: &Flash, fx: &mut PathFx) {
    let age = view.now.saturating_duration_since(flash.at);
    if age >= Duration::from_millis(u64::from(PATH_FADE_MS)) {
        fx.effect = None;
        return;
    }
    let color = match flash.kind {
        FlashKind::Match => view.theme.selected,
        FlashKind::Hint => view.theme.hint,
    };
    let glyphs = path_glyphs(&flash.path, layout);
    {
        let buf = frame.buffer_mut();
        for &(x, y, g) in &glyphs {
            put(buf, x, y, g, Style::default().fg(color).add_modifier(Modifier::BOLD));
        }
    }
    if view.no_animation {
        return;
    }

    if fx.source != Some(flash.at) {
        let positions: HashSet<(u16, u16)> = glyphs.iter().map(|&(x, y, _)| (x, y)).collect();
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            positions.contains(&(pos.x, pos.y))
        }));
        let bg = view.theme.bg;
        let effect = fx::fade_to(bg, bg, (PATH_FADE_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(layout.inner);
        fx.effect = Some(effect);
        fx.source = Some(flash.at);
        fx.last_process = None;
    }

    let delta = fx
        .last_process
        .map(|t| view.now.saturating_duration_since(t))
        .unwrap_or(Duration::ZERO);
    let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
    fx.last_process = Some(view.now);
    if let Some(effect) = fx.effect.as_mut() {
        frame.render_effect(effect, layout.inner, TfxDuration::from_millis(delta_ms));
        if effect.done() {
            fx.effect = None;
        }
    }
}

/// One-line live region: latest announcement, else key help.
fn draw_status(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let recent = view
        .session
        .announcement()
        .filter(|a| view.now.saturating_duration_since(a.at) < Duration::from_millis(ANNOUNCE_MS));
    let line = match recent {
        Some(a) => Line::from(Span::styled(
            format!(" {} ", a.text),
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            " ?:hint  s:shuffle  p:pause  q:quit ",
            Style::default().fg(theme.inactive_fg),
        )),
    };
    Paragraph::new(line)
        .alignment(Alignment::Center)
        .render(area, frame.buffer_mut());
}

fn gauge_color(ratio: f64) -> Color {
    if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.2 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn draw_sidebar(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let snap = view.session.snapshot(view.now);
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);
    let section = |title: &'static str| {
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(title, title_style))
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Stats (border + level, score, best, shuffles)
            Constraint::Length(4), // Time (border + clock + bar)
            Constraint::Length(4), // Combo (border + count + window bar)
            Constraint::Length(5), // Options
        ])
        .split(area);

    // --- Stats ---
    let stats = section(" Stats ");
    let stats_inner = stats.inner(chunks[0]);
    stats.render(chunks[0], frame.buffer_mut());
    let stat = |label: &'static str, value: String| {
        Line::from(vec![Span::styled(label, title_style), Span::styled(value, fg_style)])
    };
    let stats_lines = vec![
        stat("Level: ", format!("{}/{}", snap.level, LEVEL_COUNT)),
        stat("Score: ", snap.score.to_string()),
        stat("Best: ", view.best_score.max(snap.score).to_string()),
        stat("Shuffles: ", snap.shuffles_left.to_string()),
    ];
    Paragraph::new(ratatui::text::Text::from(stats_lines))
        .render(stats_inner, frame.buffer_mut());

    // --- Time ---
    let time = section(" Time ");
    let time_inner = time.inner(chunks[1]);
    time.render(chunks[1], frame.buffer_mut());
    let time_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(time_inner);
    let remaining = snap.timer.remaining;
    let speed = if view.session.options().fast_timer { "  x2" } else { "" };
    Paragraph::new(Line::from(Span::styled(
        format!("{:02}:{:02}{speed}", remaining / 60, remaining % 60),
        fg_style,
    )))
    .render(time_layout[0], frame.buffer_mut());
    let ratio = snap.timer.ratio();
    Gauge::default()
        .ratio(ratio)
        .label("")
        .gauge_style(Style::default().fg(gauge_color(ratio)))
        .render(time_layout[1], frame.buffer_mut());

    // --- Combo ---
    let combo = section(" Combo ");
    let combo_inner = combo.inner(chunks[2]);
    combo.render(chunks[2], frame.buffer_mut());
    let combo_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(combo_inner);
    let combo_label = if snap.combo > 1 {
        format!("x{}", snap.combo)
    } else {
        "-".to_string()
    };
    let mut combo_line = vec![Span::styled(combo_label, title_style)];
    if let Some(award) = view.session.last_award().filter(|_| snap.combo > 0) {
        combo_line.push(Span::styled(format!("  +{}", award.points), fg_style));
    }
    Paragraph::new(Line::from(combo_line)).render(combo_layout[0], frame.buffer_mut());
    let window = view.session.scorer().window_ratio(view.now);
    Gauge::default()
        .ratio(window)
        .label("")
        .gauge_style(Style::default().fg(gauge_color(window)))
        .render(combo_layout[1], frame.buffer_mut());

    // --- Options ---
    let opts = section(" Options ");
    let opts_inner = opts.inner(chunks[3]);
    opts.render(chunks[3], frame.buffer_mut());
    let o = view.session.options();
    let flag = |key: &'static str, label: &'static str, on: bool| {
        Line::from(vec![
            Span::styled(key, title_style),
            Span::styled(label, fg_style),
            Span::styled(
                if on { "on" } else { "off" },
                Style::default().fg(if on { Color::Green } else { theme.inactive_fg }),
            ),
        ])
    };
    Paragraph::new(ratatui::text::Text::from(vec![
        flag("a ", "Auto-shuffle ", o.auto_shuffle),
        flag("f ", "Fast timer ", o.fast_timer),
        flag("m ", "Sound ", o.sound_on),
    ]))
    .render(opts_inner, frame.buffer_mut());
}

fn centered(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — Resume    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_level_cleared(frame: &mut Frame, view: &View, area: Rect, bonus: u32) {
    let theme = view.theme;
    let popup = centered(area, 30, 5);
    let lines = vec![
        Line::from(Span::styled(
            format!(" Level {} cleared! ", view.session.level().index),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" Time bonus +{bonus} "),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(" Next level… ", Style::default().fg(theme.inactive_fg))),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let session = view.session;
    let popup = centered(area, 34, 11);
    let (title, title_style) = if view.screen == Screen::Victory {
        (
            " You cleared every level! ",
            Style::default().fg(Color::Black).bg(Color::Green),
        )
    } else {
        (" Time's up! ", Style::default().fg(Color::White).bg(Color::Red))
    };
    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled(title, title_style)),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {} ", session.score()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!(" Best: {} ", view.best_score),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!(" Level: {}/{} ", session.level().index, LEVEL_COUNT),
            Style::default().fg(theme.main_fg),
        )),
    ];
    if view.new_best {
        lines.push(Line::from(Span::styled(
            " New record! ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " R — Restart    Q — Quit ",
        Style::default().fg(theme.main_fg),
    )));
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" onettui ", theme.title)),
        )
        .render(popup, frame.buffer_mut());
}

pub fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: QuitOption) {
    let quit_rect = centered(frame.area(), 24, 8);
    frame
        .buffer_mut()
        .set_style(quit_rect, Style::default().bg(theme.bg));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title))
        .title(" Quit? ");
    let inner = block.inner(quit_rect);
    block.render(quit_rect, frame.buffer_mut());

    let options = [
        (QuitOption::Resume, " Resume "),
        (QuitOption::MainMenu, " Main Menu "),
        (QuitOption::Exit, " Exit "),
    ];
    for (i, (opt, label)) in options.iter().enumerate() {
        let style = if *opt == selected {
            Style::default()
                .fg(theme.bg)
                .bg(theme.title)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.title)
        };
        let rx = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        let ry = inner.y + 1 + i as u16 * 2;
        if ry < inner.bottom() {
            frame.buffer_mut().set_string(rx, ry, label, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roomy() -> BoardLayout {
        board_layout(Rect::new(0, 0, 120, 40), 10, 8)
    }

    #[test]
    fn test_cell_size_shrinks_on_small_terminals() {
        assert_eq!(cell_size(Rect::new(0, 0, 120, 40), 10, 8), (5, 2));
        assert_eq!(cell_size(Rect::new(0, 0, 60, 20), 10, 8), (3, 1));
    }

    #[test]
    fn test_cell_at_round_trips_cell_rect() {
        let layout = roomy();
        for at in [Coord::new(0, 0), Coord::new(9, 7), Coord::new(4, 3)] {
            let rect = cell_rect(&layout, at.padded()).unwrap();
            assert_eq!(cell_at(&layout, 10, 8, rect.x, rect.y), Some(at));
            assert_eq!(
                cell_at(&layout, 10, 8, rect.right() - 1, rect.bottom() - 1),
                Some(at)
            );
        }
    }

    #[test]
    fn test_cell_at_ignores_ring_and_outside() {
        let layout = roomy();
        let ring = cell_rect(&layout, Coord::new(0, 0)).unwrap();
        assert_eq!(cell_at(&layout, 10, 8, ring.x, ring.y), None);
        assert_eq!(cell_at(&layout, 10, 8, 0, 0), None);
    }

    #[test]
    fn test_path_glyphs_turn_and_stay_inside() {
        let layout = roomy();
        let grid = onettui::grid::GridStore::from_rows(vec![
            vec![Cell::Icon(1), Cell::Empty],
            vec![Cell::Empty, Cell::Icon(1)],
        ]);
        let path = onettui::path::can_connect_board(&grid, Coord::new(0, 0), Coord::new(1, 1))
            .unwrap();
        let glyphs = path_glyphs(&path, &layout);
        assert!(glyphs.iter().any(|&(_, _, g)| g == "┐" || g == "└"));
        assert!(
            glyphs
                .iter()
                .all(|&(x, y, _)| layout.inner.contains(Position::new(x, y)))
        );
    }
}
