//! Per-section expand/collapse state.

use crate::SectionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which sections have their submenu open. Absent ids are collapsed.
///
/// Independent of the active section: navigating never opens or closes a
/// submenu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandState {
    open: BTreeMap<SectionId, bool>,
}

impl ExpandState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.open.get(id).copied().unwrap_or(false)
    }

    /// Flip one section and return the new state. The receiver is left
    /// untouched so callers can compare old and new values.
    pub fn toggle(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.open.insert(SectionId::new(id), !self.is_expanded(id));
        next
    }

    pub fn expand(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.open.insert(SectionId::new(id), true);
        next
    }

    pub fn collapse(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.open.insert(SectionId::new(id), false);
        next
    }

    pub fn collapse_all(&self) -> Self {
        Self::new()
    }

    /// Ids currently expanded, in sorted order.
    pub fn expanded_ids(&self) -> impl Iterator<Item = &SectionId> {
        self.open
            .iter()
            .filter_map(|(id, open)| open.then_some(id))
    }
}

/// Flip `section_id` in `state`, returning a new value.
pub fn toggle_section_expanded(state: &ExpandState, section_id: &str) -> ExpandState {
    state.toggle(section_id)
}
