//! `crude` Core Library
//!
//! Shared functionality for `crude` front ends:
//! - Command palette state machine (navigation matching, debounced remote
//!   search, grouped results, keyboard selection)
//! - Entry search client for the backend regex/prefix/full-text endpoints
//! - Quick keys and the related-entry tag completer
//! - Configuration resolution and common error types

pub mod config;
pub mod error;
pub mod palette;
pub mod quickkeys;
pub mod search;
pub mod tags;
pub mod tracing_init;

pub use config::Config;
pub use error::{Error, Result};
pub use palette::{Commit, FieldTarget, Palette, Row, SearchEntry};
pub use search::{HttpSearchClient, SearchBackend, SearchError};
