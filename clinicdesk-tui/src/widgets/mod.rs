//! Reusable widget components.

pub mod detail;
pub mod filter;
pub mod tree;

pub use detail::DetailPanel;
pub use filter::{QueueTab, SearchBar};
pub use tree::{SidebarStyle, SidebarTree};
