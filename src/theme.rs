//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Number of distinct icon colours; icon ids wrap around this.
pub const ICON_COLORS: usize = 10;

/// One Dark palette plus the board colours, loaded from a theme file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Icon tile colours, indexed by `icon id % ICON_COLORS`.
    pub icons: [Color; ICON_COLORS],
    /// Board background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, level).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text, obstacles.
    pub inactive_fg: Color,
    /// Selected tile and link route.
    pub selected: Color,
    /// Hinted pair.
    pub hint: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const ONEDARK_ICONS: [Color; ICON_COLORS] = [
    rgb(0x98_C3_79), // green
    rgb(0xE5_C0_7B), // yellow
    rgb(0xE0_6C_75), // red
    rgb(0x61_AF_EF), // blue
    rgb(0xC6_78_DD), // magenta
    rgb(0x56_B6_C2), // cyan
    rgb(0xD1_9A_66), // orange
    rgb(0xBE_50_46), // dark red
    rgb(0xAB_B2_BF), // grey
    rgb(0x7E_C6_99), // mint
];

/// Theme keys feeding the icon colours, each with a fallback key.
const ICON_KEYS: [(&str, &str); ICON_COLORS] = [
    ("mem_box", "cpu_start"),
    ("title", "cpu_mid"),
    ("cpu_end", "temp_end"),
    ("cpu_box", "cpu_box"),
    ("net_box", "net_box"),
    ("hi_fg", "proc_misc"),
    ("temp_mid", "used_mid"),
    ("free_end", "free_end"),
    ("main_fg", "main_fg"),
    ("available_start", "cached_start"),
];

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    /// Hardcoded One Dark defaults: hex values from onedark.theme.
    pub fn onedark_default() -> Self {
        Self {
            icons: ONEDARK_ICONS,
            bg: rgb(0x31_35_3F),          // meter_bg
            div_line: rgb(0x3F_44_4F),    // div_line
            main_fg: rgb(0xAB_B2_BF),     // main_fg
            title: rgb(0xE5_C0_7B),       // title
            inactive_fg: rgb(0x5C_63_70), // inactive_fg
            selected: rgb(0xFF_FF_FF),    // selected_fg
            hint: rgb(0x61_AF_EF),        // hi_fg
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file does not exist.
    /// `palette` then overrides the icon colours.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override icon colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.icons = [
                    rgb(0x00_FF_00),
                    rgb(0xFF_FF_00),
                    rgb(0xFF_00_00),
                    rgb(0x00_88_FF),
                    rgb(0xFF_00_FF),
                    rgb(0x00_FF_FF),
                    rgb(0xFF_88_00),
                    rgb(0xFF_FF_FF),
                    rgb(0x88_FF_88),
                    rgb(0xFF_88_CC),
                ];
                self.selected = rgb(0xFF_FF_FF);
                self.hint = rgb(0x00_FF_FF);
            }
            crate::Palette::Colorblind => {
                // Paul Tol's bright + muted sets; glyphs still tell icons apart
                self.icons = [
                    rgb(0x00_77_BB),
                    rgb(0xEE_77_33),
                    rgb(0x00_99_88),
                    rgb(0xCC_33_11),
                    rgb(0xEE_33_77),
                    rgb(0xBB_BB_00),
                    rgb(0x33_BB_EE),
                    rgb(0xAA_44_99),
                    rgb(0xDD_CC_77),
                    rgb(0x88_CC_EE),
                ];
                self.hint = rgb(0xEE_77_33);
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .and_then(|v| parse_hex(v.trim_matches('"').trim_matches('\'').trim()).ok())
        };
        let base = Self::onedark_default();
        let mut icons = base.icons;
        for (slot, (key, alt)) in icons.iter_mut().zip(ICON_KEYS) {
            if let Some(c) = get(key).or_else(|| get(alt)) {
                *slot = c;
            }
        }
        Self {
            icons,
            bg: get("meter_bg").unwrap_or(base.bg),
            div_line: get("div_line").unwrap_or(base.div_line),
            main_fg: get("main_fg").unwrap_or(base.main_fg),
            title: get("title").unwrap_or(base.title),
            inactive_fg: get("inactive_fg").unwrap_or(base.inactive_fg),
            selected: get("selected_fg").unwrap_or(base.selected),
            hint: get("hi_fg").unwrap_or(base.hint),
        }
    }

    #[inline]
    pub fn icon_color(&self, id: u8) -> Color {
        self.icons[usize::from(id) % ICON_COLORS]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

fn hex_digits(s: &str) -> Result<u8, ThemeError> {
    u8::from_str_radix(s, 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(ThemeError::InvalidHex(s.to_string()));
    }
    let (r, g, b) = match s.len() {
        6 => (hex_digits(&s[0..2])?, hex_digits(&s[2..4])?, hex_digits(&s[4..6])?),
        3 => (
            hex_digits(&s[0..1])? * 17,
            hex_digits(&s[1..2])? * 17,
            hex_digits(&s[2..3])? * 17,
        ),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}
