//! Headless (non-interactive) mode.
//!
//! Runs one palette query to completion and prints the grouped rows to
//! stdout: navigation matches first, then one group per model.

use std::io::Write;
use std::time::Duration;

use crude_core::palette::{Palette, Row, SearchUpdate};
use crude_core::search::SearchBackend;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tracing::{info, warn};

/// Headless mode configuration.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Palette input to evaluate.
    pub query: String,
    /// Upper bound on waiting for remote results.
    pub timeout: Duration,
}

/// Run headless mode, writing results to `out`.
pub async fn run<B: SearchBackend, W: Write>(
    palette: &mut Palette<B>,
    updates: &mut UnboundedReceiver<SearchUpdate>,
    config: HeadlessConfig,
    out: &mut W,
) -> Result<(), HeadlessError> {
    let query = config.query.trim();
    let min = palette.min_query_chars() + 1;
    if query.chars().count() < min {
        return Err(HeadlessError::QueryTooShort { min });
    }

    palette.on_key_up(query, Instant::now());
    palette.database_search(query);
    let batch = palette.active_batch();

    let deadline = Instant::now() + config.timeout;
    let mut pending = palette.models().len();
    while pending > 0 {
        match tokio::time::timeout_at(deadline, updates.recv()).await {
            Ok(Some(update)) => {
                if Some(update.batch) == batch {
                    pending -= 1;
                }
                palette.apply_update(update);
            }
            Ok(None) => return Err(HeadlessError::StreamClosed),
            Err(_) => {
                warn!(pending, "Timed out waiting for search results");
                break;
            }
        }
    }
    info!(rows = palette.rows().len(), "Search finished");

    write_rows(out, palette.rows())?;
    palette.hide();
    Ok(())
}

/// Print rows as `== group ==` headers followed by `label<TAB>url` lines.
pub fn write_rows<W: Write>(out: &mut W, rows: &[Row]) -> std::io::Result<()> {
    for row in rows {
        match row {
            Row::Separator(name) => writeln!(out, "== {name} ==")?,
            Row::Entry(entry) => writeln!(out, "{}\t{}", entry.label, entry.url)?,
        }
    }
    out.flush()
}

/// Headless mode errors.
#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error("Query must be at least {min} characters")]
    QueryTooShort { min: usize },

    #[error("Search result stream closed unexpectedly")]
    StreamClosed,

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
