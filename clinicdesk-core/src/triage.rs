//! Triage queue: active/hidden partitions with single selection.
//!
//! Every operation consumes the state and returns the next one. Operations
//! that name an id missing from the partition they act on return the state
//! unchanged; the upstream list may have been refreshed between a click and
//! its handler, so a stale id is expected rather than exceptional.
//!
//! Per item the lifecycle is `Hidden ⇄ Active{unread | read}`:
//! - ingestion: unread → Active+unread, else `is_active` → Active+read,
//!   else Hidden
//! - [`TriageQueueState::select`]: Active+unread → Active+read
//! - [`TriageQueueState::hide`]: Active → Hidden
//! - [`TriageQueueState::restore`]: Hidden → Active+read

use crate::{ItemId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A conversation or patient awaiting (or done with) attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriageItem {
    pub id: ItemId,
    pub has_unread: bool,
    pub is_active: bool,
    pub last_activity: Timestamp,
    pub display_name: String,
}

impl TriageItem {
    /// An active, read item.
    pub fn new(id: ItemId, display_name: impl Into<String>, last_activity: Timestamp) -> Self {
        Self {
            id,
            has_unread: false,
            is_active: true,
            last_activity,
            display_name: display_name.into(),
        }
    }

    pub fn with_unread(mut self, has_unread: bool) -> Self {
        self.has_unread = has_unread;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Whether the item belongs in the active partition.
    pub fn needs_attention(&self) -> bool {
        self.has_unread || self.is_active
    }

    fn matches(&self, needle_lower: &str) -> bool {
        self.display_name.to_lowercase().contains(needle_lower)
    }
}

/// Partition sizes, for badges and headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriageCounts {
    pub active: usize,
    pub unread: usize,
    pub hidden: usize,
}

/// Derived view of both partitions narrowed by a search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredItems<'a> {
    pub active: Vec<&'a TriageItem>,
    pub hidden: Vec<&'a TriageItem>,
}

/// Active and hidden partitions, selection, and search text for one view
/// session.
///
/// `selected_id`, when set, always names an item in one of the partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriageQueueState {
    active_items: Vec<TriageItem>,
    hidden_items: Vec<TriageItem>,
    selected_id: Option<ItemId>,
    filter_text: String,
}

impl TriageQueueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_items(&self) -> &[TriageItem] {
        &self.active_items
    }

    pub fn hidden_items(&self) -> &[TriageItem] {
        &self.hidden_items
    }

    pub fn selected_id(&self) -> Option<ItemId> {
        self.selected_id
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn selected_item(&self) -> Option<&TriageItem> {
        self.selected_id.and_then(|id| self.find(id))
    }

    pub fn find(&self, id: ItemId) -> Option<&TriageItem> {
        self.active_items
            .iter()
            .chain(self.hidden_items.iter())
            .find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.find(id).is_some()
    }

    pub fn is_hidden(&self, id: ItemId) -> bool {
        self.hidden_items.iter().any(|item| item.id == id)
    }

    pub fn counts(&self) -> TriageCounts {
        TriageCounts {
            active: self.active_items.len(),
            unread: self.active_items.iter().filter(|item| item.has_unread).count(),
            hidden: self.hidden_items.len(),
        }
    }

    /// Rebuild both partitions from a full upstream snapshot.
    ///
    /// Items are split on [`TriageItem::needs_attention`], keeping input
    /// order. Repeated ids collapse to one entry at the first position,
    /// carrying the most recent `last_activity` copy. A previous selection
    /// survives if its item is still in the snapshot; otherwise the first
    /// unread active item is selected, then the first active item, then
    /// nothing. The search text carries over.
    pub fn repartition(
        all_items: impl IntoIterator<Item = TriageItem>,
        previous: &TriageQueueState,
    ) -> Self {
        let items = dedupe_latest(all_items);

        let (active_items, hidden_items): (Vec<_>, Vec<_>) =
            items.into_iter().partition(TriageItem::needs_attention);

        let kept = previous.selected_id.filter(|id| {
            active_items
                .iter()
                .chain(hidden_items.iter())
                .any(|item| item.id == *id)
        });
        if let (Some(id), None) = (previous.selected_id, kept) {
            debug!(item_id = %id, "selected item left the snapshot");
        }
        let selected_id = kept.or_else(|| auto_select(&active_items));

        Self {
            active_items,
            hidden_items,
            selected_id,
            filter_text: previous.filter_text.clone(),
        }
    }

    /// Open an item: select it and, if it is active, mark it read.
    pub fn select(mut self, id: ItemId) -> Self {
        if let Some(item) = self.active_items.iter_mut().find(|item| item.id == id) {
            item.has_unread = false;
            self.selected_id = Some(id);
        } else if self.is_hidden(id) {
            self.selected_id = Some(id);
        } else {
            debug!(item_id = %id, "select ignored: unknown item");
        }
        self
    }

    /// Move the selection to `id` without opening it, so unread state is
    /// left alone. Unknown ids are ignored.
    pub fn focus(mut self, id: ItemId) -> Self {
        if self.contains(id) {
            self.selected_id = Some(id);
        } else {
            debug!(item_id = %id, "focus ignored: unknown item");
        }
        self
    }

    /// Reply complete: move an active item to the hidden partition as read
    /// and inactive. If it was selected, selection moves to the first
    /// remaining active item, or clears.
    pub fn hide(mut self, id: ItemId) -> Self {
        let Some(position) = self.active_items.iter().position(|item| item.id == id) else {
            debug!(item_id = %id, "hide ignored: not in active partition");
            return self;
        };

        let mut item = self.active_items.remove(position);
        item.is_active = false;
        item.has_unread = false;
        self.hidden_items.push(item);

        if self.selected_id == Some(id) {
            self.selected_id = self.active_items.first().map(|item| item.id);
        }
        self
    }

    /// Bring a hidden item back into the active partition and focus it.
    pub fn restore(mut self, id: ItemId) -> Self {
        let Some(position) = self.hidden_items.iter().position(|item| item.id == id) else {
            debug!(item_id = %id, "restore ignored: not in hidden partition");
            return self;
        };

        let mut item = self.hidden_items.remove(position);
        item.is_active = true;
        self.active_items.push(item);
        self.selected_id = Some(id);
        self
    }

    /// Case-insensitive substring match on display names. Empty text matches
    /// everything; whitespace is matched literally. Never changes the
    /// partitions.
    pub fn filter(&self, text: &str) -> FilteredItems<'_> {
        if text.is_empty() {
            return FilteredItems {
                active: self.active_items.iter().collect(),
                hidden: self.hidden_items.iter().collect(),
            };
        }
        let needle = text.to_lowercase();
        FilteredItems {
            active: self.active_items.iter().filter(|i| i.matches(&needle)).collect(),
            hidden: self.hidden_items.iter().filter(|i| i.matches(&needle)).collect(),
        }
    }

    pub fn set_filter_text(mut self, text: impl Into<String>) -> Self {
        self.filter_text = text.into();
        self
    }

    /// [`Self::filter`] with the stored search text.
    pub fn filtered(&self) -> FilteredItems<'_> {
        self.filter(&self.filter_text)
    }

    /// Step selection forward through the active partition, wrapping.
    /// Starts at the first item when nothing active is selected.
    pub fn select_next(self) -> Self {
        let len = self.active_items.len();
        if len == 0 {
            return self;
        }
        let next = match self.active_position() {
            Some(index) => (index + 1) % len,
            None => 0,
        };
        let id = self.active_items[next].id;
        self.select(id)
    }

    /// Step selection backward through the active partition, wrapping.
    /// Starts at the last item when nothing active is selected.
    pub fn select_previous(self) -> Self {
        let len = self.active_items.len();
        if len == 0 {
            return self;
        }
        let prev = match self.active_position() {
            Some(0) | None => len - 1,
            Some(index) => index - 1,
        };
        let id = self.active_items[prev].id;
        self.select(id)
    }

    fn active_position(&self) -> Option<usize> {
        self.selected_id
            .and_then(|id| self.active_items.iter().position(|item| item.id == id))
    }
}

fn auto_select(active: &[TriageItem]) -> Option<ItemId> {
    active
        .iter()
        .find(|item| item.has_unread)
        .or_else(|| active.first())
        .map(|item| item.id)
}

fn dedupe_latest(all_items: impl IntoIterator<Item = TriageItem>) -> Vec<TriageItem> {
    let mut items: Vec<TriageItem> = Vec::new();
    let mut index: HashMap<ItemId, usize> = HashMap::new();
    for item in all_items {
        match index.get(&item.id) {
            Some(&slot) => {
                debug!(item_id = %item.id, "duplicate item in snapshot");
                if item.last_activity > items[slot].last_activity {
                    items[slot] = item;
                }
            }
            None => {
                index.insert(item.id, items.len());
                items.push(item);
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn at(offset: i64) -> Timestamp {
        DateTime::from_timestamp(1_700_000_000 + offset, 0).unwrap()
    }

    fn item(id: i64, name: &str, has_unread: bool, is_active: bool) -> TriageItem {
        TriageItem::new(ItemId::new(id), name, at(id))
            .with_unread(has_unread)
            .with_active(is_active)
    }

    fn ids(items: &[TriageItem]) -> Vec<i64> {
        items.iter().map(|item| item.id.get()).collect()
    }

    fn sample_state() -> TriageQueueState {
        TriageQueueState::repartition(
            vec![
                item(1, "Anna Smith", false, true),
                item(2, "Ben Ortiz", true, true),
                item(3, "Cara Lee", false, false),
                item(4, "Dan Webb", true, false),
            ],
            &TriageQueueState::new(),
        )
    }

    // ========================================================================
    // repartition
    // ========================================================================

    #[test]
    fn test_new_state_is_empty() {
        let state = TriageQueueState::new();
        assert!(state.active_items().is_empty());
        assert!(state.hidden_items().is_empty());
        assert!(state.selected_id().is_none());
        assert!(state.filter_text().is_empty());
    }

    #[test]
    fn test_repartition_splits_on_unread_or_active() {
        let state = sample_state();
        assert_eq!(ids(state.active_items()), vec![1, 2, 4]);
        assert_eq!(ids(state.hidden_items()), vec![3]);
        assert!(state.hidden_items().iter().all(|i| !i.is_active));
    }

    #[test]
    fn test_auto_select_prefers_first_unread() {
        let state = TriageQueueState::repartition(
            vec![item(1, "a", false, true), item(2, "b", true, true)],
            &TriageQueueState::new(),
        );
        assert_eq!(state.selected_id(), Some(ItemId::new(2)));
    }

    #[test]
    fn test_auto_select_falls_back_to_first_active() {
        let state = TriageQueueState::repartition(
            vec![item(5, "a", false, false), item(6, "b", false, true), item(7, "c", false, true)],
            &TriageQueueState::new(),
        );
        assert_eq!(state.selected_id(), Some(ItemId::new(6)));
    }

    #[test]
    fn test_auto_select_does_not_mark_read() {
        let state = TriageQueueState::repartition(vec![item(1, "a", true, true)], &TriageQueueState::new());
        assert!(state.active_items()[0].has_unread);
    }

    #[test]
    fn test_no_selection_when_nothing_active() {
        let state = TriageQueueState::repartition(vec![item(1, "a", false, false)], &TriageQueueState::new());
        assert!(state.selected_id().is_none());
    }

    #[test]
    fn test_repartition_keeps_existing_selection() {
        let first = sample_state().select(ItemId::new(1));
        let next = TriageQueueState::repartition(
            vec![item(1, "Anna Smith", false, true), item(2, "Ben Ortiz", true, true)],
            &first,
        );
        assert_eq!(next.selected_id(), Some(ItemId::new(1)));
    }

    #[test]
    fn test_repartition_reselects_when_selected_item_vanishes() {
        let first = sample_state().select(ItemId::new(1));
        let next = TriageQueueState::repartition(
            vec![item(8, "h", false, true), item(9, "i", true, true)],
            &first,
        );
        assert_eq!(next.selected_id(), Some(ItemId::new(9)));
    }

    #[test]
    fn test_repartition_carries_filter_text() {
        let state = sample_state().set_filter_text("ann");
        let next = TriageQueueState::repartition(vec![item(1, "Anna Smith", false, true)], &state);
        assert_eq!(next.filter_text(), "ann");
    }

    #[test]
    fn test_repartition_dedupes_keeping_latest_copy() {
        let older = item(1, "Anna (old)", false, true);
        let newer = TriageItem::new(ItemId::new(1), "Anna (new)", at(100)).with_unread(true);
        let state = TriageQueueState::repartition(
            vec![older, item(2, "b", false, true), newer],
            &TriageQueueState::new(),
        );
        assert_eq!(ids(state.active_items()), vec![1, 2]);
        assert_eq!(state.active_items()[0].display_name, "Anna (new)");
    }

    // ========================================================================
    // select
    // ========================================================================

    #[test]
    fn test_select_marks_active_item_read() {
        let state = sample_state().select(ItemId::new(4));
        assert_eq!(state.selected_id(), Some(ItemId::new(4)));
        assert!(!state.find(ItemId::new(4)).unwrap().has_unread);
        // Other unread items untouched.
        assert!(state.find(ItemId::new(2)).unwrap().has_unread);
    }

    #[test]
    fn test_select_hidden_item_only_moves_focus() {
        let state = sample_state().select(ItemId::new(3));
        assert_eq!(state.selected_id(), Some(ItemId::new(3)));
        assert_eq!(ids(state.hidden_items()), vec![3]);
    }

    #[test]
    fn test_focus_keeps_unread() {
        let state = sample_state().focus(ItemId::new(4));
        assert_eq!(state.selected_id(), Some(ItemId::new(4)));
        assert!(state.find(ItemId::new(4)).unwrap().has_unread);
        assert_eq!(state.counts().unread, 2);
    }

    #[test]
    fn test_unknown_id_operations_are_noops() {
        let state = sample_state();
        let missing = ItemId::new(999);
        assert_eq!(state.clone().select(missing), state);
        assert_eq!(state.clone().focus(missing), state);
        assert_eq!(state.clone().hide(missing), state);
        assert_eq!(state.clone().restore(missing), state);
    }

    // ========================================================================
    // hide / restore
    // ========================================================================

    #[test]
    fn test_hide_moves_item_and_clears_flags() {
        let state = sample_state().hide(ItemId::new(4));
        assert_eq!(ids(state.active_items()), vec![1, 2]);
        assert_eq!(ids(state.hidden_items()), vec![3, 4]);
        let hidden = state.find(ItemId::new(4)).unwrap();
        assert!(!hidden.has_unread);
        assert!(!hidden.is_active);
    }

    #[test]
    fn test_hide_selected_moves_selection_to_first_remaining() {
        let state = sample_state().select(ItemId::new(1)).hide(ItemId::new(1));
        assert_eq!(state.selected_id(), Some(ItemId::new(2)));
    }

    #[test]
    fn test_hide_last_active_clears_selection() {
        let state = TriageQueueState::repartition(vec![item(1, "a", true, true)], &TriageQueueState::new())
            .hide(ItemId::new(1));
        assert!(state.selected_id().is_none());
        assert!(state.active_items().is_empty());
    }

    #[test]
    fn test_hide_unselected_keeps_selection() {
        let state = sample_state().select(ItemId::new(2)).hide(ItemId::new(1));
        assert_eq!(state.selected_id(), Some(ItemId::new(2)));
    }

    #[test]
    fn test_hide_of_hidden_item_is_noop() {
        let state = sample_state();
        assert_eq!(state.clone().hide(ItemId::new(3)), state);
    }

    #[test]
    fn test_restore_reactivates_and_focuses() {
        let state = sample_state().restore(ItemId::new(3));
        assert_eq!(ids(state.active_items()), vec![1, 2, 4, 3]);
        assert!(state.hidden_items().is_empty());
        assert!(state.find(ItemId::new(3)).unwrap().is_active);
        assert!(!state.find(ItemId::new(3)).unwrap().has_unread);
        assert_eq!(state.selected_id(), Some(ItemId::new(3)));
    }

    #[test]
    fn test_restore_of_active_item_is_noop() {
        let state = sample_state();
        assert_eq!(state.clone().restore(ItemId::new(1)), state);
    }

    // ========================================================================
    // filter
    // ========================================================================

    #[test]
    fn test_filter_is_case_insensitive() {
        let state = sample_state();
        let view = state.filter("ann");
        assert_eq!(view.active.len(), 1);
        assert_eq!(view.active[0].display_name, "Anna Smith");
        assert!(view.hidden.is_empty());
    }

    #[test]
    fn test_filter_empty_returns_everything() {
        let state = sample_state();
        let view = state.filter("");
        assert_eq!(view.active.len(), 3);
        assert_eq!(view.hidden.len(), 1);
    }

    #[test]
    fn test_filter_matches_whitespace_literally() {
        let state = TriageQueueState::repartition(
            vec![item(1, "Anna Smith", true, true), item(2, "Bob", true, true)],
            &TriageQueueState::new(),
        );

        let spaced = state.filter(" ");
        assert_eq!(spaced.active.len(), 1);
        assert_eq!(spaced.active[0].display_name, "Anna Smith");

        assert!(state.filter("ann ").active.is_empty());
    }

    #[test]
    fn test_filter_covers_hidden_partition() {
        let state = sample_state();
        let view = state.filter("LEE");
        assert!(view.active.is_empty());
        assert_eq!(view.hidden[0].id, ItemId::new(3));
    }

    #[test]
    fn test_filtered_uses_stored_text() {
        let state = sample_state().set_filter_text("webb");
        let view = state.filtered();
        assert_eq!(view.active.len(), 1);
        assert_eq!(view.active[0].id, ItemId::new(4));
    }

    // ========================================================================
    // stepping and counts
    // ========================================================================

    #[test]
    fn test_select_next_wraps_and_marks_read() {
        let state = sample_state().select(ItemId::new(4)).select_next();
        assert_eq!(state.selected_id(), Some(ItemId::new(1)));

        let state = state.select_next();
        assert_eq!(state.selected_id(), Some(ItemId::new(2)));
        assert!(!state.find(ItemId::new(2)).unwrap().has_unread);
    }

    #[test]
    fn test_select_previous_from_hidden_starts_at_last() {
        let state = sample_state().select(ItemId::new(3)).select_previous();
        assert_eq!(state.selected_id(), Some(ItemId::new(4)));
    }

    #[test]
    fn test_stepping_empty_active_keeps_state() {
        let state = TriageQueueState::repartition(vec![item(1, "a", false, false)], &TriageQueueState::new())
            .select(ItemId::new(1));
        assert_eq!(state.clone().select_next(), state);
        assert_eq!(state.clone().select_previous(), state);
    }

    #[test]
    fn test_counts() {
        let counts = sample_state().counts();
        assert_eq!(
            counts,
            TriageCounts {
                active: 3,
                unread: 2,
                hidden: 1
            }
        );
    }
}
