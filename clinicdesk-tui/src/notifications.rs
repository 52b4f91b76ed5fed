//! Footer notifications.

use chrono::{DateTime, Utc};

/// Older entries are dropped past this many.
pub const MAX_NOTIFICATIONS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn push(&mut self, notification: Notification) {
        self.entries.push(notification);
        if self.entries.len() > MAX_NOTIFICATIONS {
            let excess = self.entries.len() - MAX_NOTIFICATIONS;
            self.entries.drain(..excess);
        }
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.last()
    }

    pub fn dismiss_latest(&mut self) -> Option<Notification> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
