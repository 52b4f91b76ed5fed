//! Persistence for console preferences between runs.
//!
//! Only the sidebar position and which submenus are open survive a restart.
//! Triage data always comes fresh from the snapshot feed.

use clinicdesk_core::{DeskSession, ExpandState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub current_path: String,
    pub expand: ExpandState,
    #[serde(default)]
    pub show_hidden: bool,
}

impl PersistedState {
    pub fn capture(session: &DeskSession, show_hidden: bool) -> Self {
        Self {
            current_path: session.current_path().to_string(),
            expand: session.expand_state().clone(),
            show_hidden,
        }
    }

    /// Reapply saved preferences on top of a freshly built session.
    pub fn restore_into(self, session: DeskSession) -> DeskSession {
        session
            .with_path(self.current_path)
            .with_expand_state(self.expand)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub fn load(path: &Path) -> Result<Option<PersistedState>, PersistenceError> {
    if !path.exists() {
        debug!(path = %path.display(), "no saved preferences");
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let state = serde_json::from_str::<PersistedState>(&contents)?;
    Ok(Some(state))
}

/// Writes to a sibling temp file, then renames over `path`.
pub fn save(path: &Path, state: &PersistedState) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "saved preferences");
    Ok(())
}
