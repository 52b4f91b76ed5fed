//! ClinicDesk Test Utilities
//!
//! Shared test infrastructure for the ClinicDesk workspace:
//! - Proptest generators for triage items and navigation trees
//! - Fixtures for the practice sidebar layouts
//! - Assertions for triage queue invariants

pub use clinicdesk_core::{
    ActiveSectionResolver, AliasTable, DeskSession, ExpandState, ItemId, NavSection, NavTree,
    SectionId, SessionEvent, Timestamp, TriageItem, TriageQueueState,
};

use chrono::DateTime;

/// Fixed epoch all fixtures count from, so runs are reproducible.
pub const FIXTURE_EPOCH_SECS: i64 = 1_700_000_000;

/// `FIXTURE_EPOCH_SECS + offset` as a timestamp.
pub fn fixture_time(offset: i64) -> Timestamp {
    DateTime::from_timestamp(FIXTURE_EPOCH_SECS + offset, 0).unwrap_or_default()
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for ClinicDesk state types.

    use super::*;
    use proptest::prelude::*;

    /// Ids from a small range so snapshots collide and operations hit.
    pub fn arb_item_id() -> impl Strategy<Value = ItemId> {
        (0i64..32).prop_map(ItemId::new)
    }

    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (0i64..86_400 * 30).prop_map(fixture_time)
    }

    pub fn arb_display_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{1,8} [A-Z][a-z]{1,10}"
    }

    pub fn arb_triage_item() -> impl Strategy<Value = TriageItem> {
        (
            arb_item_id(),
            any::<bool>(),
            any::<bool>(),
            arb_timestamp(),
            arb_display_name(),
        )
            .prop_map(|(id, has_unread, is_active, last_activity, display_name)| TriageItem {
                id,
                has_unread,
                is_active,
                last_activity,
                display_name,
            })
    }

    /// A snapshot as the upstream feed would deliver it (duplicates allowed).
    pub fn arb_snapshot(max_len: usize) -> impl Strategy<Value = Vec<TriageItem>> {
        prop::collection::vec(arb_triage_item(), 0..max_len)
    }

    /// Any session event, including refreshes.
    pub fn arb_session_event() -> impl Strategy<Value = SessionEvent> {
        prop_oneof![
            arb_snapshot(10).prop_map(SessionEvent::ItemsRefreshed),
            (0i64..40).prop_map(|id| SessionEvent::Select(ItemId::new(id))),
            (0i64..40).prop_map(|id| SessionEvent::Focus(ItemId::new(id))),
            (0i64..40).prop_map(|id| SessionEvent::Complete(ItemId::new(id))),
            (0i64..40).prop_map(|id| SessionEvent::Restore(ItemId::new(id))),
            Just(SessionEvent::SelectNext),
            Just(SessionEvent::SelectPrevious),
            "[a-z]{0,3}".prop_map(SessionEvent::Search),
            prop::sample::select(vec!["/", "/patients", "/chronic-conditions", "/billing", "/x"])
                .prop_map(|path| SessionEvent::Navigate(path.to_string())),
            prop::sample::select(vec!["patients", "billing", "messages", "unknown"])
                .prop_map(|id| SessionEvent::OpenSection(SectionId::new(id))),
        ]
    }

    /// Two-level section trees with unique ids.
    pub fn arb_nav_sections() -> impl Strategy<Value = Vec<NavSection>> {
        prop::collection::vec((0usize..4, 0u32..20), 1..6).prop_map(|shape| {
            shape
                .into_iter()
                .enumerate()
                .map(|(n, (child_count, badge))| {
                    let id = format!("section-{n}");
                    let path = format!("/{id}");
                    if child_count == 0 {
                        NavSection::leaf(id.as_str(), format!("Section {n}"), path).with_badge(badge)
                    } else {
                        let children = (0..child_count)
                            .map(|c| {
                                let child = format!("{id}-child-{c}");
                                NavSection::leaf(child.as_str(), child.clone(), format!("/{child}"))
                                    .with_badge(badge / 2)
                            })
                            .collect();
                        NavSection::group(id.as_str(), format!("Section {n}"), path, children)
                            .with_badge(badge)
                    }
                })
                .collect()
        })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built sidebars and snapshots.
    //!
    //! The practice console ships three sidebar layouts. They share ids for
    //! the sections they have in common so alias tables carry over.

    use super::*;

    /// Sidebar of the classic layout.
    pub fn standard_sections() -> Vec<NavSection> {
        vec![
            NavSection::leaf("home", "Dashboard", "/"),
            NavSection::group(
                "patients",
                "Patients",
                "/patients",
                vec![
                    NavSection::leaf("chronic-conditions", "Chronic Conditions", "/chronic-conditions"),
                    NavSection::leaf("medication-refills", "Medication Refills", "/medication-refills"),
                    NavSection::leaf("intake-forms", "Intake Forms", "/intake-forms"),
                ],
            ),
            NavSection::leaf("consultations", "Consultations", "/consultations"),
            NavSection::leaf("messages", "Messages", "/messages"),
            NavSection::leaf("billing", "Billing", "/billing"),
            NavSection::leaf("settings", "Settings", "/settings"),
        ]
    }

    /// Sidebar of the layout built around the external messaging inbox.
    pub fn spruce_sections() -> Vec<NavSection> {
        vec![
            NavSection::leaf("home", "Dashboard", "/"),
            NavSection::group(
                "inbox",
                "Inbox",
                "/inbox",
                vec![
                    NavSection::leaf("conversations", "Conversations", "/conversations"),
                    NavSection::leaf("faxes", "Faxes", "/faxes"),
                ],
            ),
            NavSection::leaf("patients", "Patients", "/patients"),
            NavSection::leaf("settings", "Settings", "/settings"),
        ]
    }

    /// Sidebar of the compact layout.
    pub fn modern_sections() -> Vec<NavSection> {
        vec![
            NavSection::leaf("home", "Home", "/"),
            NavSection::leaf("patients", "Patients", "/patients"),
            NavSection::leaf("messages", "Messages", "/messages"),
            NavSection::group(
                "documentation",
                "Documentation",
                "/documentation",
                vec![
                    NavSection::leaf("ai-notes", "AI Notes", "/ai-notes"),
                    NavSection::leaf("templates", "Templates", "/templates"),
                ],
            ),
        ]
    }

    /// Routes that belong to the patients section without being listed.
    pub fn practice_aliases() -> AliasTable {
        let mut aliases = AliasTable::new();
        aliases.insert("chronic-conditions".to_string(), SectionId::new("patients"));
        aliases.insert("medication-refills".to_string(), SectionId::new("patients"));
        aliases.insert("patient".to_string(), SectionId::new("patients"));
        aliases
    }

    pub fn practice_resolver() -> ActiveSectionResolver {
        ActiveSectionResolver {
            default_section: SectionId::home(),
            aliases: practice_aliases(),
        }
    }

    /// Standard layout session with the messages badge tracking unread items.
    pub fn practice_session() -> DeskSession {
        let nav = NavTree::new(standard_sections()).expect("standard sections are valid");
        DeskSession::new(nav, practice_resolver()).with_inbox_section(SectionId::new("messages"))
    }

    /// Four conversations: two unread, one open, one resolved.
    pub fn sample_snapshot() -> Vec<TriageItem> {
        vec![
            TriageItem::new(ItemId::new(101), "Anna Smith", fixture_time(10)),
            TriageItem::new(ItemId::new(102), "Ben Ortiz", fixture_time(20)).with_unread(true),
            TriageItem::new(ItemId::new(103), "Cara Lee", fixture_time(30)).with_active(false),
            TriageItem::new(ItemId::new(104), "Dan Webb", fixture_time(40))
                .with_unread(true)
                .with_active(false),
        ]
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Invariant checks shared by unit and integration tests.

    use super::*;
    use std::collections::BTreeSet;

    /// Selection, when present, names an item in one of the partitions.
    #[track_caller]
    pub fn assert_selection_valid(state: &TriageQueueState) {
        if let Some(id) = state.selected_id() {
            assert!(
                state.contains(id),
                "selected id {} not in either partition",
                id
            );
        }
    }

    /// Each id appears once and hidden items carry no attention flags.
    ///
    /// Active items are not checked: opening one clears its unread flag but
    /// it stays active until completed.
    #[track_caller]
    pub fn assert_partitions_consistent(state: &TriageQueueState) {
        let mut seen = BTreeSet::new();
        for item in state.active_items().iter().chain(state.hidden_items()) {
            assert!(seen.insert(item.id), "item {} appears twice", item.id);
        }
        for item in state.hidden_items() {
            assert!(!item.is_active && !item.has_unread, "hidden item {} still flagged", item.id);
        }
    }
}
