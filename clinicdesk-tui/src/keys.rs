//! Keybinding definitions for the console.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextPane,
    PrevPane,
    MoveUp,
    MoveDown,
    /// Open the sidebar row under the cursor, or mark the selected item read.
    Open,
    ToggleSection,
    Complete,
    Restore,
    ToggleHidden,
    OpenSearch,
    Cancel,
    Reload,
}

/// Map a key press outside search input mode.
pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Reload),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('x') => Some(Action::ToggleSection),
        KeyCode::Char('c') => Some(Action::Complete),
        KeyCode::Char('r') => Some(Action::Restore),
        KeyCode::Char('v') => Some(Action::ToggleHidden),
        KeyCode::Enter => Some(Action::Open),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextPane),
        KeyCode::BackTab => Some(Action::PrevPane),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        _ => None,
    }
}

/// What a key does while the search bar has focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKey {
    Insert(char),
    Backspace,
    Accept,
    Abort,
}

pub fn map_search_key(event: KeyEvent) -> Option<SearchKey> {
    let KeyEvent { code, modifiers, .. } = event;
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(SearchKey::Abort),
            _ => None,
        };
    }
    match code {
        KeyCode::Char(c) => Some(SearchKey::Insert(c)),
        KeyCode::Backspace => Some(SearchKey::Backspace),
        KeyCode::Enter => Some(SearchKey::Accept),
        KeyCode::Esc => Some(SearchKey::Abort),
        _ => None,
    }
}
