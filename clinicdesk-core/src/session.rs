//! Session controller tying navigation and triage state together.
//!
//! A [`DeskSession`] owns everything one view session needs: the navigation
//! tree, resolver, expand state, triage queue, and current path. Inbound data
//! and UI interactions arrive as [`SessionEvent`]s and are applied one at a
//! time; the caller serializes them.

use crate::{
    ActiveSectionResolver, ExpandState, ItemId, NavRow, NavTree, SectionId, TriageCounts,
    TriageItem, TriageQueueState,
};
use crate::triage::FilteredItems;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Everything that can change a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Full upstream snapshot of triage items.
    ItemsRefreshed(Vec<TriageItem>),
    /// Notification counts keyed by section id.
    BadgeCountsRefreshed(BTreeMap<SectionId, u32>),
    Select(ItemId),
    /// Move the selection without marking the item read.
    Focus(ItemId),
    SelectNext,
    SelectPrevious,
    /// Reply complete.
    Complete(ItemId),
    Restore(ItemId),
    Search(String),
    Navigate(String),
    ToggleSection(SectionId),
    /// Sidebar click: toggles a submenu parent, navigates to a leaf.
    OpenSection(SectionId),
}

impl SessionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::ItemsRefreshed(_) => "items_refreshed",
            SessionEvent::BadgeCountsRefreshed(_) => "badge_counts_refreshed",
            SessionEvent::Select(_) => "select",
            SessionEvent::Focus(_) => "focus",
            SessionEvent::SelectNext => "select_next",
            SessionEvent::SelectPrevious => "select_previous",
            SessionEvent::Complete(_) => "complete",
            SessionEvent::Restore(_) => "restore",
            SessionEvent::Search(_) => "search",
            SessionEvent::Navigate(_) => "navigate",
            SessionEvent::ToggleSection(_) => "toggle_section",
            SessionEvent::OpenSection(_) => "open_section",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeskSession {
    nav: NavTree,
    resolver: ActiveSectionResolver,
    expand: ExpandState,
    triage: TriageQueueState,
    current_path: String,
    inbox_section: Option<SectionId>,
}

impl DeskSession {
    pub fn new(nav: NavTree, resolver: ActiveSectionResolver) -> Self {
        Self {
            nav,
            resolver,
            expand: ExpandState::new(),
            triage: TriageQueueState::new(),
            current_path: "/".to_string(),
            inbox_section: None,
        }
    }

    /// Section whose badge mirrors the unread triage count.
    pub fn with_inbox_section(mut self, id: SectionId) -> Self {
        if self.nav.contains(id.as_str()) {
            self.inbox_section = Some(id);
            self.sync_inbox_badge();
        } else {
            warn!(section = %id, "inbox section not in navigation tree");
        }
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.current_path = path.into();
        self
    }

    pub fn with_expand_state(mut self, expand: ExpandState) -> Self {
        self.expand = expand;
        self
    }

    pub fn nav(&self) -> &NavTree {
        &self.nav
    }

    pub fn expand_state(&self) -> &ExpandState {
        &self.expand
    }

    pub fn triage(&self) -> &TriageQueueState {
        &self.triage
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn inbox_section(&self) -> Option<&SectionId> {
        self.inbox_section.as_ref()
    }

    pub fn active_section(&self) -> SectionId {
        self.resolver.resolve(&self.current_path, self.nav.sections())
    }

    pub fn sidebar_rows(&self) -> Vec<NavRow> {
        let active = self.active_section();
        self.nav.visible_rows(&self.expand, Some(&active))
    }

    pub fn filtered(&self) -> FilteredItems<'_> {
        self.triage.filtered()
    }

    pub fn counts(&self) -> TriageCounts {
        self.triage.counts()
    }

    pub fn navigate(&mut self, path: impl Into<String>) {
        self.apply(SessionEvent::Navigate(path.into()));
    }

    pub fn toggle_section(&mut self, id: impl Into<SectionId>) {
        self.apply(SessionEvent::ToggleSection(id.into()));
    }

    pub fn apply(&mut self, event: SessionEvent) {
        debug!(event = event.kind(), "applying session event");
        match event {
            SessionEvent::ItemsRefreshed(items) => {
                self.triage = TriageQueueState::repartition(items, &self.triage);
                self.sync_inbox_badge();
            }
            SessionEvent::BadgeCountsRefreshed(counts) => {
                for id in self.nav.apply_badge_counts(&counts) {
                    debug!(section = %id, "badge count for unknown section");
                }
                self.sync_inbox_badge();
            }
            SessionEvent::Select(id) => self.update_triage(|t| t.select(id)),
            SessionEvent::Focus(id) => self.update_triage(|t| t.focus(id)),
            SessionEvent::SelectNext => self.update_triage(TriageQueueState::select_next),
            SessionEvent::SelectPrevious => self.update_triage(TriageQueueState::select_previous),
            SessionEvent::Complete(id) => self.update_triage(|t| t.hide(id)),
            SessionEvent::Restore(id) => self.update_triage(|t| t.restore(id)),
            SessionEvent::Search(text) => self.update_triage(|t| t.set_filter_text(text)),
            SessionEvent::Navigate(path) => self.current_path = path,
            SessionEvent::ToggleSection(id) => {
                self.expand = self.expand.toggle(id.as_str());
            }
            SessionEvent::OpenSection(id) => self.open_section(&id),
        }
    }

    fn open_section(&mut self, id: &SectionId) {
        let Some(section) = self.nav.find(id.as_str()) else {
            debug!(section = %id, "open ignored: unknown section");
            return;
        };
        if section.has_submenu {
            self.expand = self.expand.toggle(id.as_str());
        } else {
            self.current_path = section.path.clone();
        }
    }

    fn update_triage(&mut self, op: impl FnOnce(TriageQueueState) -> TriageQueueState) {
        let triage = std::mem::take(&mut self.triage);
        self.triage = op(triage);
        self.sync_inbox_badge();
    }

    fn sync_inbox_badge(&mut self) {
        if let Some(id) = &self.inbox_section {
            let unread = u32::try_from(self.triage.counts().unread).unwrap_or(u32::MAX);
            self.nav.set_badge(id.as_str(), unread);
        }
    }
}
