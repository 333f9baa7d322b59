//! crude CLI Library
//!
//! Terminal front end for a crude admin backend: a command palette with
//! instant navigation matches and debounced remote entry search, quick keys,
//! and a related-entry tag field. Provides both TUI (ratatui) and headless
//! modes.

pub mod app;
pub mod headless;
pub mod tui;
pub mod ui;
