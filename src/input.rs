//! Key bindings: normal and vim-style.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    /// Click the tile under the cursor.
    Select,
    Hint,
    Shuffle,
    Pause,
    Restart,
    ToggleAutoShuffle,
    ToggleFastTimer,
    ToggleSound,
    Quit,
    None,
}

/// Map key event to game action. Supports both normal (arrows) and vim (hjkl).
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod && modifiers != KeyModifiers::CONTROL {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc if no_mod => Action::Quit,
        KeyCode::Char('p') if modifiers == KeyModifiers::CONTROL => Action::Pause,
        KeyCode::Char('p') if no_mod => Action::Pause,
        KeyCode::Left | KeyCode::Char('h') if no_mod => Action::CursorLeft,
        KeyCode::Right | KeyCode::Char('l') if no_mod => Action::CursorRight,
        KeyCode::Up | KeyCode::Char('k') if no_mod => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') if no_mod => Action::CursorDown,
        KeyCode::Enter | KeyCode::Char(' ') if no_mod => Action::Select,
        KeyCode::Char('?' | 't') if no_mod => Action::Hint,
        KeyCode::Char('s') if no_mod => Action::Shuffle,
        KeyCode::Char('r') if no_mod => Action::Restart,
        KeyCode::Char('a') if no_mod => Action::ToggleAutoShuffle,
        KeyCode::Char('f') if no_mod => Action::ToggleFastTimer,
        KeyCode::Char('m') if no_mod => Action::ToggleSound,
        _ => Action::None,
    }
}
