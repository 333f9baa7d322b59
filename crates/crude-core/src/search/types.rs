//! Wire types for the entry search endpoints.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SearchError;

/// Which backend search strategy to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchKind {
    /// Case-insensitive regex over the model's search fields.
    #[default]
    Regex,
    /// Anchored prefix match.
    Prefix,
    /// Text-index search.
    FullText,
}

impl SearchKind {
    /// Path segment under `/entries/search/`.
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Regex => "regex",
            Self::Prefix => "prefix",
            Self::FullText => "full-text",
        }
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regex" => Ok(Self::Regex),
            "prefix" => Ok(Self::Prefix),
            "full-text" | "fulltext" => Ok(Self::FullText),
            other => Err(format!(
                "unknown search kind '{other}' (expected regex, prefix or full-text)"
            )),
        }
    }
}

/// Extended-JSON object id (`{"$oid": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectId {
    #[serde(rename = "$oid")]
    pub oid: String,
}

/// One entry as returned by the backend. Fields beyond the id and the
/// rendered display string are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteEntry {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "_to_string")]
    pub display: String,
}

impl RemoteEntry {
    /// `{model}/{oid}`, the id form used by related-entry fields.
    pub fn compound_id(&self, model: &str) -> String {
        format!("{model}/{}", self.id.oid)
    }
}

/// Response body of `GET /entries/search/{kind}/{model}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Absent means success; only an explicit `false` is a failure.
    #[serde(default = "succeeded")]
    pub success: bool,
    pub entries: Vec<RemoteEntry>,
}

/// Decode a search response body.
pub fn parse_search_response(body: &[u8]) -> Result<Vec<RemoteEntry>, SearchError> {
    let response: SearchResponse = serde_json::from_slice(body)?;
    if !response.success {
        return Err(SearchError::Unsuccessful);
    }
    Ok(response.entries)
}

const fn succeeded() -> bool {
    true
}
