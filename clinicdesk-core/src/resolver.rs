//! Path → active section resolution.
//!
//! Several routes can belong to one logical section (`/chronic-conditions`
//! and `/medication-refills` both highlight `patients`). Resolution is pure
//! and total: anything unrecognised lands on the default section.

use crate::{NavSection, SectionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Route segment → section id overrides, checked before the section table.
pub type AliasTable = BTreeMap<String, SectionId>;

/// Resolve `path` against `aliases` then `sections`, falling back to `"home"`.
pub fn resolve_active_section(
    path: &str,
    aliases: &AliasTable,
    sections: &[NavSection],
) -> SectionId {
    resolve_with_default(path, aliases, sections, &SectionId::home())
}

/// First segment of a browser path: query and fragment dropped, leading
/// slashes stripped.
pub fn first_segment(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_start_matches('/');
    trimmed.split('/').next().unwrap_or("")
}

fn resolve_with_default(
    path: &str,
    aliases: &AliasTable,
    sections: &[NavSection],
    default: &SectionId,
) -> SectionId {
    let segment = first_segment(path);

    if let Some(id) = aliases.get(segment) {
        return id.clone();
    }

    if let Some(section) = sections.iter().find(|s| s.route_key() == segment) {
        return section.id.clone();
    }

    // A child route highlights its top-level parent.
    sections
        .iter()
        .find(|top| top.children.iter().any(|child| has_route(child, segment)))
        .map(|top| top.id.clone())
        .unwrap_or_else(|| default.clone())
}

fn has_route(section: &NavSection, segment: &str) -> bool {
    section.route_key() == segment
        || section.children.iter().any(|child| has_route(child, segment))
}

/// Alias table plus fallback id, as loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActiveSectionResolver {
    pub default_section: SectionId,
    #[serde(default)]
    pub aliases: AliasTable,
}

impl Default for ActiveSectionResolver {
    fn default() -> Self {
        Self {
            default_section: SectionId::home(),
            aliases: AliasTable::new(),
        }
    }
}

impl ActiveSectionResolver {
    pub fn new(default_section: impl Into<SectionId>) -> Self {
        Self {
            default_section: default_section.into(),
            aliases: AliasTable::new(),
        }
    }

    pub fn with_alias(mut self, segment: impl Into<String>, section: impl Into<SectionId>) -> Self {
        self.aliases.insert(segment.into(), section.into());
        self
    }

    pub fn resolve(&self, path: &str, sections: &[NavSection]) -> SectionId {
        resolve_with_default(path, &self.aliases, sections, &self.default_section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<NavSection> {
        vec![
            NavSection::leaf("home", "Home", "/"),
            NavSection::group(
                "patients",
                "Patients",
                "/patients",
                vec![NavSection::leaf("intake", "Intake Forms", "/intake")],
            ),
            NavSection::leaf("billing", "Billing", "/billing"),
        ]
    }

    fn aliases() -> AliasTable {
        let mut table = AliasTable::new();
        table.insert("medication-refills".to_string(), SectionId::new("patients"));
        table.insert("chronic-conditions".to_string(), SectionId::new("patients"));
        table
    }

    #[test]
    fn test_alias_resolves_to_mapped_section() {
        let id = resolve_active_section("/medication-refills", &aliases(), &sections());
        assert_eq!(id, "patients");
    }

    #[test]
    fn test_exact_section_path_match() {
        let id = resolve_active_section("/billing", &aliases(), &sections());
        assert_eq!(id, "billing");
    }

    #[test]
    fn test_only_first_segment_counts() {
        let id = resolve_active_section("/billing/invoices/12?tab=open", &aliases(), &sections());
        assert_eq!(id, "billing");
    }

    #[test]
    fn test_child_route_highlights_parent() {
        let id = resolve_active_section("/intake", &AliasTable::new(), &sections());
        assert_eq!(id, "patients");
    }

    #[test]
    fn test_root_path_matches_home_section() {
        assert_eq!(resolve_active_section("/", &aliases(), &sections()), "home");
        assert_eq!(resolve_active_section("", &aliases(), &sections()), "home");
    }

    #[test]
    fn test_unknown_path_falls_back_to_home() {
        let id = resolve_active_section("/definitely-not-a-page", &aliases(), &[]);
        assert_eq!(id, SectionId::home());
    }

    #[test]
    fn test_alias_wins_over_section_path() {
        let mut table = AliasTable::new();
        table.insert("billing".to_string(), SectionId::new("home"));
        assert_eq!(resolve_active_section("/billing", &table, &sections()), "home");
    }

    #[test]
    fn test_first_segment_edge_cases() {
        assert_eq!(first_segment("/a/b"), "a");
        assert_eq!(first_segment("a"), "a");
        assert_eq!(first_segment("//a"), "a");
        assert_eq!(first_segment("/#top"), "");
        assert_eq!(first_segment("/patients?id=4"), "patients");
    }

    #[test]
    fn test_resolver_uses_configured_default() {
        let resolver = ActiveSectionResolver::new("dashboard").with_alias("refills", "patients");
        assert_eq!(resolver.resolve("/refills", &sections()), "patients");
        assert_eq!(resolver.resolve("/unknown", &sections()), "dashboard");
    }
}
