//! crude CLI
//!
//! Terminal command palette for a crude admin backend.
//! Provides both TUI (ratatui) and headless modes.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use crude_cli::app::App;
use crude_cli::headless::{self, HeadlessConfig};
use crude_cli::tui;
use crude_core::config::{self, Config};
use crude_core::palette::{Palette, PaletteSettings};
use crude_core::quickkeys::QuickKeys;
use crude_core::search::{HttpSearchClient, SearchKind};
use crude_core::tags::TagCompleter;
use crude_core::tracing_init::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "crude")]
#[command(version, about = "Command palette for a crude admin backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config and CRUDE_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// CSRF token sent as X-CSRFToken
    #[arg(long, env = "CRUDE_CSRF_TOKEN", hide_env_values = true)]
    csrf_token: Option<String>,

    /// Session cookie value of a logged-in user
    #[arg(long, env = "CRUDE_SESSION", hide_env_values = true)]
    session: Option<String>,

    /// Model to search (repeatable; replaces the configured list)
    #[arg(short, long = "model")]
    models: Vec<String>,

    /// Backend search strategy: regex, prefix or full-text
    #[arg(long)]
    search_kind: Option<SearchKind>,

    /// Model referenced by the form field's tag completer
    #[arg(long)]
    related_model: Option<String>,

    /// Evaluate one palette query, print the grouped rows and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Seconds to wait for remote results in headless mode
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    /// Flags take precedence over file and environment settings.
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.base_url {
            config.server.base_url.clone_from(url);
        }
        if let Some(token) = &self.csrf_token {
            config.server.csrf_token = Some(token.clone());
        }
        if let Some(session) = &self.session {
            config.server.session_cookie = Some(session.clone());
        }
        if !self.models.is_empty() {
            config.palette.models.clone_from(&self.models);
        }
        if let Some(kind) = self.search_kind {
            config.palette.search_kind = kind;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Keep TUI logs quiet so they do not overwrite the screen
    let default_filter = if cli.query.is_some() {
        "crude=info,crude_cli=info,crude_core=info"
    } else {
        "crude=warn,crude_cli=warn,crude_core=warn"
    };
    init_tracing(default_filter, cli.log_json);

    let mut config = config::load_config().context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.server.base_url,
        models = config.palette.models.len(),
        "Starting crude CLI"
    );

    if config.server.csrf_token_missing() {
        warn!("No CSRF token configured; the backend will likely reject searches");
    }

    let client = HttpSearchClient::new(&config.server)
        .context("Failed to build search client")?
        .with_kind(config.palette.search_kind);
    let backend = Arc::new(client);
    let settings = PaletteSettings::from(&config.palette);
    let (palette, search_rx) =
        Palette::new(Arc::clone(&backend), config.palette.models.clone(), settings);

    if let Some(query) = cli.query {
        let mut palette = palette;
        let mut search_rx = search_rx;
        let headless_config = HeadlessConfig {
            query,
            timeout: Duration::from_secs(cli.timeout),
        };
        let mut stdout = io::stdout().lock();
        headless::run(&mut palette, &mut search_rx, headless_config, &mut stdout).await?;
        return Ok(());
    }

    let quick_keys = QuickKeys::from_config(&config.quick_keys);
    let palette = palette.with_suspender(Box::new(quick_keys.suspender()));
    let (tags, tag_rx) = match cli.related_model {
        Some(model) => {
            let (tags, rx) = TagCompleter::new(backend, model, settings.debounce);
            (Some(tags), Some(rx))
        }
        None => (None, None),
    };

    let app = App::new(palette, quick_keys, tags);
    tui::run(app, search_rx, tag_rx).await
}
