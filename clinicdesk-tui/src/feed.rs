//! File-backed snapshot feed.
//!
//! The upstream system drops a JSON document at `snapshot_path`:
//!
//! ```json
//! { "items": [ { "id": 7, "has_unread": true, "is_active": true,
//!                "last_activity": "2024-03-01T09:30:00Z",
//!                "display_name": "Anna Smith" } ],
//!   "badges": { "chronic-conditions": 3 } }
//! ```
//!
//! A background task re-reads it on an interval and forwards each changed
//! document to the event loop. Every document is a full snapshot.

use crate::events::TuiEvent;
use clinicdesk_core::{SectionId, SessionEvent, TriageItem};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    pub items: Vec<TriageItem>,
    #[serde(default)]
    pub badges: BTreeMap<SectionId, u32>,
}

impl Snapshot {
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Session events that apply this snapshot. Badges are skipped when the
    /// document carries none so earlier counts stay in place.
    pub fn into_events(self) -> Vec<SessionEvent> {
        let mut events = vec![SessionEvent::ItemsRefreshed(self.items)];
        if !self.badges.is_empty() {
            events.push(SessionEvent::BadgeCountsRefreshed(self.badges));
        }
        events
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode snapshot {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub async fn load_snapshot(path: &Path) -> Result<Snapshot, FeedError> {
    let contents = read(path).await?;
    decode(path, &contents)
}

async fn read(path: &Path) -> Result<String, FeedError> {
    tokio::fs::read_to_string(path).await.map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn decode(path: &Path, contents: &str) -> Result<Snapshot, FeedError> {
    Snapshot::parse(contents).map_err(|source| FeedError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Poll `path` every `interval`, sending snapshots whose bytes changed.
///
/// A failure is reported once until the feed recovers. The first good read
/// after a failure is always sent, even if its bytes match the last snapshot. The task ends when the
/// receiving side of `sender` is dropped.
pub fn spawn_snapshot_feed(
    path: PathBuf,
    interval: Duration,
    sender: mpsc::Sender<TuiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        let mut last_contents: Option<String> = None;
        let mut failing = false;

        loop {
            ticker.tick().await;

            let result = match read(&path).await {
                Ok(contents) if !failing && last_contents.as_deref() == Some(contents.as_str()) => {
                    continue
                }
                Ok(contents) => decode(&path, &contents).map(|snapshot| (contents, snapshot)),
                Err(err) => Err(err),
            };

            let event = match result {
                Ok((contents, snapshot)) => {
                    debug!(items = snapshot.items.len(), "snapshot changed");
                    last_contents = Some(contents);
                    failing = false;
                    TuiEvent::Snapshot(Box::new(snapshot))
                }
                Err(err) if failing => {
                    debug!(error = %err, "snapshot feed still failing");
                    continue;
                }
                Err(err) => {
                    warn!(error = %err, "snapshot feed failed");
                    failing = true;
                    TuiEvent::FeedError(err.to_string())
                }
            };

            if sender.send(event).await.is_err() {
                debug!("event loop closed, stopping snapshot feed");
                break;
            }
        }
    })
}
