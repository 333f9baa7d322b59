//! Entry search REST client.
//!
//! Uses reqwest to call `/entries/search/{kind}/{model}?q=...` with the
//! CSRF header and session cookie the backend's auth layer expects.

use reqwest::header::{COOKIE, HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;
use tracing::debug;

use super::types::{RemoteEntry, SearchKind, parse_search_response};
use crate::config::ServerConfig;

const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrftoken");

/// Search client errors.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Search endpoint reported failure")]
    Unsuccessful,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// REST client for the backend's entry search endpoints.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    http: reqwest::Client,
    base_url: String,
    kind: SearchKind,
}

impl HttpSearchClient {
    /// Create a client from the server section of the configuration.
    pub fn new(config: &ServerConfig) -> Result<Self, SearchError> {
        Self::with_builder(config, reqwest::Client::builder())
    }

    /// Like [`HttpSearchClient::new`], starting from a caller-supplied builder.
    pub fn with_builder(
        config: &ServerConfig,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, SearchError> {
        if config.base_url.trim().is_empty() {
            return Err(SearchError::Config("base_url is empty".into()));
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = config.csrf_token.as_deref() {
            let value = HeaderValue::from_str(token)
                .map_err(|_| SearchError::Config("Invalid CSRF token format".into()))?;
            headers.insert(CSRF_HEADER, value);
        }
        if let Some(session) = config.session_cookie.as_deref() {
            let value = HeaderValue::from_str(&format!("session={session}"))
                .map_err(|_| SearchError::Config("Invalid session cookie format".into()))?;
            headers.insert(COOKIE, value);
        }

        // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
        // The `Err` case just means it was already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = builder.default_headers(headers).build()?;
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            kind: SearchKind::default(),
        })
    }

    /// Switch the search strategy used by [`HttpSearchClient::search_entries`].
    #[must_use]
    pub const fn with_kind(mut self, kind: SearchKind) -> Self {
        self.kind = kind;
        self
    }

    pub const fn kind(&self) -> SearchKind {
        self.kind
    }

    /// Endpoint URL for one model, without the query string.
    pub(crate) fn search_url(&self, model: &str) -> String {
        format!(
            "{}/entries/search/{}/{}",
            self.base_url,
            self.kind.path_segment(),
            model
        )
    }

    /// Check HTTP response status, returning error for non-success codes.
    fn check_status(resp: &reqwest::Response) -> Result<(), SearchError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").into(),
            });
        }
        Ok(())
    }

    /// Search `model` for `query`, returning entries in backend order.
    pub async fn search_entries(
        &self,
        model: &str,
        query: &str,
    ) -> Result<Vec<RemoteEntry>, SearchError> {
        let url = reqwest::Url::parse_with_params(&self.search_url(model), &[("q", query)])
            .map_err(|e| SearchError::Config(format!("Invalid search URL: {e}")))?;
        debug!(%url, "Searching entries");
        let resp = self.http.get(url).send().await?;
        Self::check_status(&resp)?;
        let body = resp.bytes().await?;
        parse_search_response(&body)
    }
}
