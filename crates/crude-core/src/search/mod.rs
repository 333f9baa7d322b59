//! Entry search against the crude backend.
//!
//! Provides the [`SearchBackend`] seam used by the palette and tag completer,
//! and a reqwest-based implementation for the `/entries/search/*` endpoints.

mod client;
pub mod types;


use std::future::Future;

pub use client::{HttpSearchClient, SearchError};
pub use types::{ObjectId, RemoteEntry, SearchKind, SearchResponse, parse_search_response};

/// Something that can search one model's entries for a query.
///
/// Implementations must be cheap to share: the palette holds one behind an
/// `Arc` and issues one call per model for every search batch.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(
        &self,
        model: &str,
        query: &str,
    ) -> impl Future<Output = Result<Vec<RemoteEntry>, SearchError>> + Send;
}

impl SearchBackend for HttpSearchClient {
    fn search(
        &self,
        model: &str,
        query: &str,
    ) -> impl Future<Output = Result<Vec<RemoteEntry>, SearchError>> + Send {
        self.search_entries(model, query)
    }
}
