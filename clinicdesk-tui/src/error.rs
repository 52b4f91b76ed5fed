//! Error types for the console.

use crate::config::ConfigError;
use crate::feed::FeedError;
use crate::persistence::PersistenceError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("Failed to install log subscriber: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}
