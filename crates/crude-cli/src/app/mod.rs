//! Application state for the interactive TUI.

mod state;

pub use state::{App, Focus, HOME};
