//! Navigation tree: sections, badge counts, and sidebar row projection.

use crate::{ExpandState, NavResult, NavTreeError, SectionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A navigation entry, optionally carrying a submenu of child sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavSection {
    pub id: SectionId,
    pub label: String,
    pub path: String,
    #[serde(default)]
    pub badge_count: u32,
    #[serde(default)]
    pub has_submenu: bool,
    #[serde(default)]
    pub children: Vec<NavSection>,
}

impl NavSection {
    /// A section without a submenu.
    pub fn leaf(id: impl Into<SectionId>, label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            path: path.into(),
            badge_count: 0,
            has_submenu: false,
            children: Vec::new(),
        }
    }

    /// A section with a submenu of `children`.
    pub fn group(
        id: impl Into<SectionId>,
        label: impl Into<String>,
        path: impl Into<String>,
        children: Vec<NavSection>,
    ) -> Self {
        Self {
            has_submenu: true,
            children,
            ..Self::leaf(id, label, path)
        }
    }

    pub fn with_badge(mut self, count: u32) -> Self {
        self.badge_count = count;
        self
    }

    /// Own badge plus every descendant's badge.
    pub fn total_badge(&self) -> u32 {
        self.children
            .iter()
            .fold(self.badge_count, |acc, child| acc.saturating_add(child.total_badge()))
    }

    /// Path without its leading slash, as matched against path segments.
    pub fn route_key(&self) -> &str {
        self.path.strip_prefix('/').unwrap_or(&self.path)
    }

    fn find(&self, id: &str) -> Option<&NavSection> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut NavSection> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }
}

/// One visible line of a sidebar, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRow {
    pub id: SectionId,
    pub label: String,
    pub path: String,
    pub depth: usize,
    pub has_submenu: bool,
    pub expanded: bool,
    /// Aggregate count while collapsed, own count while expanded.
    pub badge: u32,
    pub active: bool,
}

/// Validated navigation tree.
///
/// Section ids are unique across the whole tree and only sections with
/// `has_submenu` carry children. The shape never changes after construction;
/// only badge counts do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTree {
    sections: Vec<NavSection>,
}

impl NavTree {
    pub fn new(sections: Vec<NavSection>) -> NavResult<Self> {
        validate(&sections)?;
        Ok(Self { sections })
    }

    /// Top-level sections in display order.
    pub fn sections(&self) -> &[NavSection] {
        &self.sections
    }

    pub fn find(&self, id: &str) -> Option<&NavSection> {
        self.sections.iter().find_map(|section| section.find(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Id of the top-level section that is, or contains, `id`.
    pub fn top_level_of(&self, id: &str) -> Option<&SectionId> {
        self.sections
            .iter()
            .find(|section| section.find(id).is_some())
            .map(|section| &section.id)
    }

    /// Set one section's badge. Returns false when the id is unknown.
    pub fn set_badge(&mut self, id: &str, count: u32) -> bool {
        match self.sections.iter_mut().find_map(|section| section.find_mut(id)) {
            Some(section) => {
                section.badge_count = count;
                true
            }
            None => false,
        }
    }

    /// Apply a notification-count refresh.
    ///
    /// Sections not listed keep their count. Ids not in the tree are skipped
    /// and returned so the caller can report them.
    pub fn apply_badge_counts(&mut self, counts: &BTreeMap<SectionId, u32>) -> Vec<SectionId> {
        let mut unknown = Vec::new();
        for (id, count) in counts {
            if !self.set_badge(id.as_str(), *count) {
                unknown.push(id.clone());
            }
        }
        unknown
    }

    /// Badge a collapsed section shows: own count plus all descendants.
    pub fn aggregate_badge(&self, id: &str) -> Option<u32> {
        self.find(id).map(NavSection::total_badge)
    }

    /// Flatten the tree into sidebar rows, depth first. Children appear only
    /// beneath expanded parents.
    pub fn visible_rows(&self, expand: &ExpandState, active: Option<&SectionId>) -> Vec<NavRow> {
        let mut rows = Vec::new();
        for section in &self.sections {
            push_rows(section, 0, expand, active, &mut rows);
        }
        rows
    }
}

fn push_rows(
    section: &NavSection,
    depth: usize,
    expand: &ExpandState,
    active: Option<&SectionId>,
    rows: &mut Vec<NavRow>,
) {
    let expanded = section.has_submenu && expand.is_expanded(section.id.as_str());
    let badge = if section.has_submenu && !expanded {
        section.total_badge()
    } else {
        section.badge_count
    };
    rows.push(NavRow {
        id: section.id.clone(),
        label: section.label.clone(),
        path: section.path.clone(),
        depth,
        has_submenu: section.has_submenu,
        expanded,
        badge,
        active: active == Some(&section.id),
    });
    if expanded {
        for child in &section.children {
            push_rows(child, depth + 1, expand, active, rows);
        }
    }
}

fn validate(sections: &[NavSection]) -> NavResult<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&NavSection> = sections.iter().rev().collect();
    while let Some(section) = stack.pop() {
        if section.id.as_str().trim().is_empty() {
            return Err(NavTreeError::EmptyId {
                label: section.label.clone(),
            });
        }
        if !seen.insert(section.id.as_str()) {
            return Err(NavTreeError::DuplicateId {
                id: section.id.clone(),
            });
        }
        if !section.has_submenu && !section.children.is_empty() {
            return Err(NavTreeError::ChildrenWithoutSubmenu {
                id: section.id.clone(),
            });
        }
        stack.extend(section.children.iter().rev());
    }
    Ok(())
}
