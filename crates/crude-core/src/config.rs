//! Configuration resolution for crude.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/crude/settings.json)
//! 3. Environment variables
//! 4. CLI arguments (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::search::SearchKind;

/// Complete crude configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    /// Single-key shortcuts, key -> target url.
    #[serde(default)]
    pub quick_keys: BTreeMap<String, String>,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    /// Sent as `X-CSRFToken` on every search request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    /// Value of the backend `session` cookie from a completed wallet login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
}

impl ServerConfig {
    /// True when no usable CSRF token is configured. The backend rejects
    /// searches without one, but the client still builds.
    pub fn csrf_token_missing(&self) -> bool {
        self.csrf_token
            .as_deref()
            .is_none_or(|token| token.trim().is_empty())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            csrf_token: None,
            session_cookie: None,
        }
    }
}

/// Command palette tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Model names searched by the palette.
    pub models: Vec<String>,
    /// Quiet period before a remote search fires.
    pub debounce_ms: u64,
    /// Queries of this many characters or fewer (after trim) never search.
    pub min_query_chars: usize,
    /// Backend search strategy (`regex`, `prefix` or `full-text`).
    pub search_kind: SearchKind,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            debounce_ms: 250,
            min_query_chars: 2,
            search_kind: SearchKind::default(),
        }
    }
}

/// Load configuration with hierarchical resolution.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_config_path()
        && global_path.exists()
    {
        config = load_config_file(&global_path)?;
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Global config file path: `<config dir>/crude/settings.json`, where the
/// config dir honours `XDG_CONFIG_HOME` on Linux.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("crude").join("settings.json"))
}

/// Read and parse a single config file.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

/// Apply `CRUDE_*` overrides. `lookup` abstracts the environment.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("CRUDE_BASE_URL") {
        config.server.base_url = val;
    }
    if let Some(val) = lookup("CRUDE_CSRF_TOKEN") {
        config.server.csrf_token = Some(val);
    }
    if let Some(val) = lookup("CRUDE_SESSION") {
        config.server.session_cookie = Some(val);
    }
    if let Some(val) = lookup("CRUDE_DEBOUNCE_MS") {
        match val.parse() {
            Ok(ms) => config.palette.debounce_ms = ms,
            Err(_) => tracing::warn!(value = %val, "Ignoring invalid CRUDE_DEBOUNCE_MS"),
        }
    }
    if let Some(val) = lookup("CRUDE_SEARCH_KIND") {
        match val.parse() {
            Ok(kind) => config.palette.search_kind = kind,
            Err(e) => tracing::warn!(error = %e, "Ignoring invalid CRUDE_SEARCH_KIND"),
        }
    }
}
