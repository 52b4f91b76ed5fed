//! Event types for the console event loop.

use crate::feed::Snapshot;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    Snapshot(Box<Snapshot>),
    FeedError(String),
}
