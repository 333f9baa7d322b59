//! Error types for the `crude` core library.

use thiserror::Error;

/// Result type alias using `crude` Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for `crude` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
