//! ClinicDesk Core - navigation and triage-queue state
//!
//! Framework-free state model for a practice console sidebar and its
//! conversation triage queue. Everything here is synchronous value
//! transformation: no I/O, no clocks, no locking. Renderers read the state
//! and feed interactions back as operations.

pub mod error;
pub mod expand;
pub mod identity;
pub mod nav;
pub mod resolver;
pub mod session;
pub mod triage;

pub use error::{NavResult, NavTreeError};
pub use expand::{toggle_section_expanded, ExpandState};
pub use identity::{ItemId, SectionId, Timestamp, DEFAULT_SECTION_ID};
pub use nav::{NavRow, NavSection, NavTree};
pub use resolver::{first_segment, resolve_active_section, ActiveSectionResolver, AliasTable};
pub use session::{DeskSession, SessionEvent};
pub use triage::{FilteredItems, TriageCounts, TriageItem, TriageQueueState};
