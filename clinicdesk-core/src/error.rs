//! Error types for ClinicDesk state construction.
//!
//! State transitions never fail: operations that reference an unknown id are
//! no-ops. The only error surface is building a navigation tree from
//! configuration that breaks the tree invariants.

use crate::SectionId;
use thiserror::Error;

/// Invariant violations found while building a [`crate::NavTree`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavTreeError {
    #[error("Duplicate section id: {id}")]
    DuplicateId { id: SectionId },

    #[error("Section {id} has children but has_submenu is false")]
    ChildrenWithoutSubmenu { id: SectionId },

    #[error("Section id must not be empty (label {label:?})")]
    EmptyId { label: String },
}

/// Result type for navigation tree construction.
pub type NavResult<T> = Result<T, NavTreeError>;
