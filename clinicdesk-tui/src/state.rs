//! Application state for the console.
//!
//! [`App`] wraps one [`DeskSession`] with the console-only bits: which pane
//! has focus, the sidebar cursor, whether the queue shows resolved
//! conversations, the search input and footer notifications. Key presses
//! become [`SessionEvent`]s here.

use crate::feed::Snapshot;
use crate::keys::{map_key, map_search_key, Action, SearchKey};
use crate::nav::Pane;
use crate::notifications::{Notification, NotificationLevel, NotificationLog};
use crate::persistence::PersistedState;
use crate::theme::ClinicTheme;
use chrono::{DateTime, Utc};
use clinicdesk_core::{DeskSession, ItemId, NavRow, SessionEvent, TriageItem};
use crossterm::event::KeyEvent;
use tracing::{debug, info};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Reload,
    Quit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub query: String,
}

#[derive(Debug, Clone, Default)]
pub struct FeedStatus {
    pub last_refresh: Option<DateTime<Utc>>,
    pub failing: bool,
}

#[derive(Debug, Clone)]
pub struct App {
    pub theme: ClinicTheme,
    pub session: DeskSession,
    pub focus: Pane,
    pub sidebar_cursor: usize,
    pub show_hidden: bool,
    pub search: Option<SearchInput>,
    pub notifications: NotificationLog,
    pub feed: FeedStatus,
}

impl App {
    pub fn new(session: DeskSession) -> Self {
        let mut app = Self {
            theme: ClinicTheme::clinic(),
            session,
            focus: Pane::default(),
            sidebar_cursor: 0,
            show_hidden: false,
            search: None,
            notifications: NotificationLog::default(),
            feed: FeedStatus::default(),
        };
        app.cursor_to_active();
        app
    }

    pub fn restore(mut self, state: PersistedState) -> Self {
        self.show_hidden = state.show_hidden;
        self.session = state.restore_into(self.session);
        self.cursor_to_active();
        self
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState::capture(&self.session, self.show_hidden)
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    pub fn sidebar_rows(&self) -> Vec<NavRow> {
        self.session.sidebar_rows()
    }

    /// Items listed in the queue pane: the filtered active or hidden list.
    pub fn visible_items(&self) -> Vec<&TriageItem> {
        let filtered = self.session.filtered();
        if self.show_hidden {
            filtered.hidden
        } else {
            filtered.active
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        for event in snapshot.into_events() {
            self.session.apply(event);
        }
        self.feed.last_refresh = Some(Utc::now());
        if self.feed.failing {
            self.feed.failing = false;
            self.notify(NotificationLevel::Info, "Snapshot feed recovered");
        }
        let counts = self.session.counts();
        info!(
            active = counts.active,
            unread = counts.unread,
            hidden = counts.hidden,
            "snapshot applied"
        );
        self.clamp_cursor();
    }

    pub fn feed_failed(&mut self, message: impl Into<String>) {
        self.feed.failing = true;
        self.notify(NotificationLevel::Error, message);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if self.search.is_some() {
            if let Some(search_key) = map_search_key(key) {
                self.handle_search_key(search_key);
            }
            return Control::Continue;
        }
        match map_key(key) {
            Some(action) => self.handle_action(action),
            None => Control::Continue,
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Control {
        debug!(?action, pane = self.focus.title(), "key action");
        match action {
            Action::Quit => return Control::Quit,
            Action::Reload => return Control::Reload,
            Action::NextPane => self.focus = self.focus.next(),
            Action::PrevPane => self.focus = self.focus.previous(),
            Action::MoveDown => self.move_focus_item(true),
            Action::MoveUp => self.move_focus_item(false),
            Action::Open => self.open(),
            Action::ToggleSection => {
                if let Some(row) = self.cursor_row().filter(|row| row.has_submenu) {
                    self.session.apply(SessionEvent::ToggleSection(row.id));
                    self.clamp_cursor();
                }
            }
            Action::Complete => self.complete_selected(),
            Action::Restore => self.restore_selected(),
            Action::ToggleHidden => self.toggle_hidden(),
            Action::OpenSearch => {
                self.focus = Pane::Queue;
                self.search = Some(SearchInput {
                    query: self.session.triage().filter_text().to_string(),
                });
            }
            Action::Cancel => {
                if !self.session.triage().filter_text().is_empty() {
                    self.session.apply(SessionEvent::Search(String::new()));
                } else {
                    self.notifications.dismiss_latest();
                }
            }
        }
        Control::Continue
    }

    fn handle_search_key(&mut self, key: SearchKey) {
        let Some(search) = self.search.as_mut() else {
            return;
        };
        match key {
            SearchKey::Insert(c) => {
                search.query.push(c);
                let query = search.query.trim().to_string();
                self.session.apply(SessionEvent::Search(query));
            }
            SearchKey::Backspace => {
                search.query.pop();
                let query = search.query.trim().to_string();
                self.session.apply(SessionEvent::Search(query));
            }
            SearchKey::Accept => self.search = None,
            SearchKey::Abort => {
                self.search = None;
                self.session.apply(SessionEvent::Search(String::new()));
            }
        }
    }

    fn move_focus_item(&mut self, forward: bool) {
        match self.focus {
            Pane::Sidebar => {
                let len = self.sidebar_rows().len();
                if len == 0 {
                    return;
                }
                self.sidebar_cursor = if forward {
                    (self.sidebar_cursor + 1).min(len - 1)
                } else {
                    self.sidebar_cursor.saturating_sub(1)
                };
            }
            Pane::Queue => self.move_selection(forward),
        }
    }

    /// Unfiltered active queue steps through the session directly; any
    /// narrower list steps through what is on screen.
    fn move_selection(&mut self, forward: bool) {
        if !self.show_hidden && self.session.triage().filter_text().is_empty() {
            let event = if forward {
                SessionEvent::SelectNext
            } else {
                SessionEvent::SelectPrevious
            };
            self.session.apply(event);
            return;
        }
        let ids: Vec<ItemId> = self.visible_items().iter().map(|item| item.id).collect();
        let current = self.session.triage().selected_id();
        if let Some(id) = step_id(&ids, current, forward) {
            self.session.apply(SessionEvent::Select(id));
        }
    }

    fn open(&mut self) {
        match self.focus {
            Pane::Sidebar => {
                if let Some(row) = self.cursor_row() {
                    self.session.apply(SessionEvent::OpenSection(row.id));
                    self.clamp_cursor();
                }
            }
            Pane::Queue => {
                if let Some(id) = self.session.triage().selected_id() {
                    self.session.apply(SessionEvent::Select(id));
                }
            }
        }
    }

    fn complete_selected(&mut self) {
        let triage = self.session.triage();
        let Some(item) = triage.selected_item().filter(|item| !triage.is_hidden(item.id)) else {
            debug!("complete ignored: no active selection");
            return;
        };
        let (id, name) = (item.id, item.display_name.clone());
        self.session.apply(SessionEvent::Complete(id));
        self.notify(NotificationLevel::Info, format!("Completed {}", name));
    }

    fn restore_selected(&mut self) {
        let triage = self.session.triage();
        let Some(item) = triage.selected_item().filter(|item| triage.is_hidden(item.id)) else {
            debug!("restore ignored: selection is not hidden");
            return;
        };
        let (id, name) = (item.id, item.display_name.clone());
        self.session.apply(SessionEvent::Restore(id));
        self.show_hidden = false;
        self.notify(NotificationLevel::Info, format!("Restored {}", name));
    }

    fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        let current = self.session.triage().selected_id();
        let visible: Vec<ItemId> = self.visible_items().iter().map(|item| item.id).collect();
        if current.map_or(true, |id| !visible.contains(&id)) {
            if let Some(first) = visible.first() {
                self.session.apply(SessionEvent::Focus(*first));
            }
        }
    }

    fn cursor_row(&self) -> Option<NavRow> {
        self.sidebar_rows().into_iter().nth(self.sidebar_cursor)
    }

    fn cursor_to_active(&mut self) {
        if let Some(index) = self.sidebar_rows().iter().position(|row| row.active) {
            self.sidebar_cursor = index;
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.sidebar_rows().len();
        self.sidebar_cursor = self.sidebar_cursor.min(len.saturating_sub(1));
    }
}

/// Next or previous id in `ids` relative to `current`, wrapping. Starts at
/// the first (forward) or last (backward) id when `current` is not listed.
pub fn step_id(ids: &[ItemId], current: Option<ItemId>, forward: bool) -> Option<ItemId> {
    if ids.is_empty() {
        return None;
    }
    let len = ids.len();
    let position = current.and_then(|id| ids.iter().position(|candidate| *candidate == id));
    let index = match (position, forward) {
        (Some(i), true) => (i + 1) % len,
        (Some(0), false) | (None, false) => len - 1,
        (Some(i), false) => i - 1,
        (None, true) => 0,
    };
    Some(ids[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicdesk_core::{ExpandState, SectionId};
    use clinicdesk_test_utils::fixture_time;
    use clinicdesk_test_utils::fixtures::{practice_session, sample_snapshot};
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app_with_items() -> App {
        let mut app = App::new(practice_session());
        app.apply_snapshot(Snapshot {
            items: sample_snapshot(),
            badges: Default::default(),
        });
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_new_app_starts_on_active_row() {
        let app = App::new(practice_session().with_path("/billing"));
        let rows = app.sidebar_rows();
        assert_eq!(rows[app.sidebar_cursor].id, "billing");
    }

    #[test]
    fn test_snapshot_sets_inbox_badge() {
        let app = app_with_items();
        let messages = app.sidebar_rows().into_iter().find(|r| r.id == "messages").unwrap();
        assert_eq!(messages.badge, 2);
        assert_eq!(app.session.triage().selected_id(), Some(ItemId::new(102)));
    }

    #[test]
    fn test_enter_expands_parent_then_opens_child() {
        let mut app = App::new(practice_session());
        app.sidebar_cursor = 1; // patients
        let before = app.sidebar_rows().len();

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.sidebar_rows().len(), before + 3);

        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.session.current_path(), "/chronic-conditions");
        assert_eq!(app.session.active_section(), "patients");
    }

    #[test]
    fn test_toggle_only_applies_to_submenus() {
        let mut app = App::new(practice_session());
        app.session.apply(SessionEvent::ToggleSection(SectionId::new("patients")));

        app.sidebar_cursor = 0; // home
        app.handle_key(key(KeyCode::Char('x')));
        assert!(app.session.expand_state().is_expanded("patients"));

        app.sidebar_cursor = 1;
        app.handle_key(key(KeyCode::Char('x')));
        assert!(!app.session.expand_state().is_expanded("patients"));
        assert_eq!(app.sidebar_rows().len(), 6);
    }

    #[test]
    fn test_sidebar_cursor_stops_at_edges() {
        let mut app = App::new(practice_session());
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.sidebar_cursor, 0);
        for _ in 0..20 {
            app.handle_key(key(KeyCode::Char('j')));
        }
        assert_eq!(app.sidebar_cursor, app.sidebar_rows().len() - 1);
    }

    #[test]
    fn test_queue_navigation_marks_read() {
        let mut app = app_with_items();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Pane::Queue);

        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.session.triage().selected_id(), Some(ItemId::new(104)));
        assert_eq!(app.session.counts().unread, 1);
    }

    #[test]
    fn test_complete_then_restore() {
        let mut app = app_with_items();
        app.focus = Pane::Queue;

        app.handle_key(key(KeyCode::Char('c')));
        assert!(app.session.triage().is_hidden(ItemId::new(102)));
        assert_eq!(app.session.counts().hidden, 2);

        app.handle_key(key(KeyCode::Char('v')));
        assert!(app.show_hidden);
        let selected = app.session.triage().selected_id().unwrap();
        assert!(app.session.triage().is_hidden(selected));

        app.handle_key(key(KeyCode::Char('r')));
        assert!(!app.show_hidden);
        assert!(!app.session.triage().is_hidden(selected));
        assert_eq!(app.session.triage().selected_id(), Some(selected));
    }

    #[test]
    fn test_toggling_views_does_not_mark_read() {
        let mut app = App::new(practice_session());
        app.apply_snapshot(Snapshot {
            items: vec![
                TriageItem::new(ItemId::new(1), "Anna Smith", fixture_time(1)).with_unread(true),
                TriageItem::new(ItemId::new(2), "Ben Ortiz", fixture_time(2)).with_active(false),
            ],
            badges: Default::default(),
        });
        app.session.apply(SessionEvent::Select(ItemId::new(2)));
        let before = app.session.counts().unread;

        app.handle_key(key(KeyCode::Char('v')));
        app.handle_key(key(KeyCode::Char('v')));

        assert!(!app.show_hidden);
        assert_eq!(app.session.counts().unread, before);
        assert_eq!(app.session.triage().selected_id(), Some(ItemId::new(1)));
        assert_eq!(app.session.nav().find("messages").unwrap().badge_count, 1);
    }

    #[test]
    fn test_complete_ignored_in_hidden_view() {
        let mut app = app_with_items();
        app.handle_key(key(KeyCode::Char('v')));
        let before = app.session.counts();
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.session.counts(), before);
    }

    #[test]
    fn test_search_filters_live_and_abort_clears() {
        let mut app = app_with_items();
        app.handle_key(key(KeyCode::Char('/')));
        type_str(&mut app, "an");
        assert_eq!(app.session.triage().filter_text(), "an");
        let names: Vec<_> = app.visible_items().iter().map(|i| i.display_name.clone()).collect();
        assert_eq!(names, vec!["Anna Smith".to_string(), "Dan Webb".to_string()]);

        // `q` is text while searching.
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Control::Continue);
        app.handle_key(key(KeyCode::Backspace));

        app.handle_key(key(KeyCode::Esc));
        assert!(app.search.is_none());
        assert_eq!(app.session.triage().filter_text(), "");
    }

    #[test]
    fn test_search_ignores_surrounding_spaces() {
        let mut app = app_with_items();
        app.handle_key(key(KeyCode::Char('/')));
        type_str(&mut app, " ann ");
        assert_eq!(app.search.as_ref().unwrap().query, " ann ");
        assert_eq!(app.session.triage().filter_text(), "ann");
        assert_eq!(app.visible_items().len(), 1);
    }

    #[test]
    fn test_filtered_stepping_stays_in_visible_list() {
        let mut app = app_with_items();
        app.focus = Pane::Queue;
        app.handle_key(key(KeyCode::Char('/')));
        type_str(&mut app, "an");
        app.handle_key(key(KeyCode::Enter));

        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.session.triage().selected_id(), Some(ItemId::new(101)));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.session.triage().selected_id(), Some(ItemId::new(104)));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.session.triage().selected_id(), Some(ItemId::new(101)));
    }

    #[test]
    fn test_quit_and_reload_controls() {
        let mut app = App::new(practice_session());
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Control::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Control::Reload
        );
    }

    #[test]
    fn test_feed_failure_then_recovery_notifies() {
        let mut app = App::new(practice_session());
        app.feed_failed("snapshot missing");
        assert!(app.feed.failing);

        app.apply_snapshot(Snapshot::default());
        assert!(!app.feed.failing);
        assert_eq!(
            app.notifications.latest().map(|n| n.message.as_str()),
            Some("Snapshot feed recovered")
        );
    }

    #[test]
    fn test_persisted_state_restores() {
        let mut app = App::new(practice_session());
        app.session.apply(SessionEvent::Navigate("/billing".to_string()));
        app.session.apply(SessionEvent::ToggleSection(SectionId::new("patients")));
        app.show_hidden = true;
        let saved = app.persisted_state();

        let restored = App::new(practice_session()).restore(saved);
        assert_eq!(restored.session.current_path(), "/billing");
        assert_eq!(
            restored.session.expand_state(),
            &ExpandState::new().expand("patients")
        );
        assert!(restored.show_hidden);
        assert_eq!(restored.sidebar_rows()[restored.sidebar_cursor].id, "billing");
    }

    #[test]
    fn test_step_id_wraps() {
        let ids = [ItemId::new(1), ItemId::new(2), ItemId::new(3)];
        assert_eq!(step_id(&ids, Some(ItemId::new(3)), true), Some(ItemId::new(1)));
        assert_eq!(step_id(&ids, Some(ItemId::new(1)), false), Some(ItemId::new(3)));
        assert_eq!(step_id(&ids, None, true), Some(ItemId::new(1)));
        assert_eq!(step_id(&ids, Some(ItemId::new(9)), false), Some(ItemId::new(3)));
        assert_eq!(step_id(&[], None, true), None);
    }
}
