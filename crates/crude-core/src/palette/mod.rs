//! Command palette state machine.
//!
//! The palette combines two sources of suggestions in one grouped list:
//! instant local navigation matches (action/model pairs) and debounced remote
//! searches, one request per model. Remote requests run as tokio tasks and
//! report back through the channel returned by [`Palette::new`]; the host's
//! event loop feeds those updates into [`Palette::apply_update`] and drives
//! the debounce timer through [`Palette::next_deadline`] and
//! [`Palette::fire_due`]. All state lives on the host's single logical flow.

pub mod batch;
pub mod debounce;
pub mod navigation;
pub mod results;
pub mod selection;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::PaletteConfig;
use crate::quickkeys::ShortcutSuspender;
use crate::search::{RemoteEntry, SearchBackend, SearchError};
use batch::SearchBatch;
use debounce::Debouncer;

pub use navigation::{Action, navigation_entries};
pub use results::{GroupKey, ResultGroups, Row, SearchEntry};

/// Which input the palette was opened over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldTarget {
    /// The palette's own command line.
    #[default]
    Foreground,
    /// Another input had focus when the palette opened; committing an entry
    /// with an id inserts a reference into that input.
    Background,
}

/// Outcome of committing the selected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// Go to the entry's url.
    Navigate { url: String },
    /// Append `text` to the background input.
    Insert { text: String },
}

/// Result of one remote request of a batch.
#[derive(Debug)]
pub struct SearchUpdate {
    pub batch: u64,
    pub model: String,
    pub query: String,
    pub result: Result<Vec<RemoteEntry>, SearchError>,
}

/// Timing knobs.
#[derive(Debug, Clone, Copy)]
pub struct PaletteSettings {
    pub debounce: Duration,
    pub min_query_chars: usize,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self::from(&PaletteConfig::default())
    }
}

impl From<&PaletteConfig> for PaletteSettings {
    fn from(config: &PaletteConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_chars: config.min_query_chars,
        }
    }
}

/// Command palette over a [`SearchBackend`].
pub struct Palette<B: SearchBackend> {
    backend: Arc<B>,
    models: Vec<String>,
    actions: Vec<Action>,
    settings: PaletteSettings,
    suspender: Option<Box<dyn ShortcutSuspender>>,
    updates: mpsc::UnboundedSender<SearchUpdate>,

    visible: bool,
    list_visible: bool,
    target: FieldTarget,
    field_value: String,
    last_search_term: Option<String>,
    last_navigation_term: Option<String>,
    selected: Option<usize>,
    results: ResultGroups,
    rows: Vec<Row>,
    debounce: Debouncer,
    batch: Option<SearchBatch>,
    next_batch_id: u64,
}

impl<B: SearchBackend> Palette<B> {
    /// Create a hidden palette searching `models`. The receiver yields the
    /// results of remote requests and must be drained into
    /// [`Palette::apply_update`].
    pub fn new(
        backend: Arc<B>,
        models: Vec<String>,
        settings: PaletteSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SearchUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let palette = Self {
            backend,
            models,
            actions: Action::ALL.to_vec(),
            settings,
            suspender: None,
            updates,
            visible: false,
            list_visible: false,
            target: FieldTarget::Foreground,
            field_value: String::new(),
            last_search_term: None,
            last_navigation_term: None,
            selected: None,
            results: ResultGroups::default(),
            rows: Vec::new(),
            debounce: Debouncer::default(),
            batch: None,
            next_batch_id: 0,
        };
        (palette, rx)
    }

    /// Suspend `suspender`'s shortcuts whenever the palette is open.
    #[must_use]
    pub fn with_suspender(mut self, suspender: Box<dyn ShortcutSuspender>) -> Self {
        self.suspender = Some(suspender);
        self
    }

    // ---- lifecycle -------------------------------------------------------

    pub fn show(&mut self, target: FieldTarget) {
        if let Some(s) = self.suspender.as_mut() {
            s.suspend();
        }
        self.visible = true;
        self.target = target;
    }

    /// Close the palette, cancel pending work, and reset all state.
    pub fn hide(&mut self) {
        self.hide_match_list();
        self.visible = false;
        self.target = FieldTarget::Foreground;
        self.field_value.clear();
        if let Some(s) = self.suspender.as_mut() {
            s.resume();
        }
    }

    /// Open over `target` if hidden, otherwise close.
    pub fn toggle(&mut self, target: FieldTarget) {
        if self.visible {
            self.hide();
        } else {
            self.show(target);
        }
    }

    fn hide_match_list(&mut self) {
        self.debounce.cancel();
        self.batch = None;
        self.last_search_term = None;
        self.last_navigation_term = None;
        self.selected = None;
        self.results.clear();
        self.rows.clear();
        self.list_visible = false;
    }

    // ---- input -----------------------------------------------------------

    /// Handle the command line's value after a keystroke.
    pub fn on_key_up(&mut self, text: &str, now: Instant) {
        self.field_value = text.to_string();
        let query = text.trim();
        if query.chars().count() <= self.settings.min_query_chars {
            self.hide_match_list();
            return;
        }
        let query = query.to_string();
        self.debounce.schedule(query.clone(), now + self.settings.debounce);
        self.match_navigation(&query);
    }

    /// Deadline of the pending debounced search, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Start the debounced search if its quiet period has elapsed.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.debounce.take_due(now) {
            Some(query) => {
                self.database_search(&query);
                true
            }
            None => false,
        }
    }

    /// Recompute the navigation group for `text`.
    pub fn match_navigation(&mut self, text: &str) {
        if self.last_navigation_term.as_deref() == Some(text) {
            return;
        }
        self.last_navigation_term = Some(text.to_string());
        let entries = navigation_entries(text, &self.models, &self.actions);
        let matched = !entries.is_empty();
        self.results.set(GroupKey::Navigation, entries);
        if matched || self.list_visible {
            self.render();
        }
    }

    /// Start a new remote search batch for `text`, cancelling the previous one.
    pub fn database_search(&mut self, text: &str) {
        if self.last_search_term.as_deref() == Some(text) {
            return;
        }
        let batch = SearchBatch::new(self.next_batch_id);
        self.next_batch_id += 1;
        self.last_search_term = Some(text.to_string());
        debug!(
            batch = batch.id(),
            query = text,
            models = self.models.len(),
            "Starting search batch"
        );

        for model in &self.models {
            self.results.set(GroupKey::Model(model.clone()), Vec::new());
            self.spawn_request(&batch, model.clone(), text.to_string());
        }
        self.batch = Some(batch);
        self.render();
    }

    fn spawn_request(&self, batch: &SearchBatch, model: String, query: String) {
        let backend = Arc::clone(&self.backend);
        let token = batch.token();
        let updates = self.updates.clone();
        let batch_id = batch.id();
        tokio::spawn(async move {
            let result = tokio::select! {
                () = token.cancelled() => {
                    debug!(batch = batch_id, %model, "Search request cancelled");
                    return;
                }
                result = backend.search(&model, &query) => result,
            };
            let _ = updates.send(SearchUpdate {
                batch: batch_id,
                model,
                query,
                result,
            });
        });
    }

    /// Merge one remote result. Returns `true` when the rows changed.
    pub fn apply_update(&mut self, update: SearchUpdate) -> bool {
        let current = self
            .batch
            .as_ref()
            .filter(|b| b.id() == update.batch && !b.is_cancelled());
        if current.is_none() {
            debug!(batch = update.batch, model = %update.model, "Dropping result of a stale batch");
            return false;
        }

        match update.result {
            Err(e) => {
                warn!(model = %update.model, error = %e, "Entry search failed");
                false
            }
            Ok(entries) => {
                let group = if update.query == self.field_value.trim() {
                    entries
                        .iter()
                        .map(|entry| SearchEntry::from_remote(&update.model, entry))
                        .collect()
                } else {
                    Vec::new()
                };
                self.results.set(GroupKey::Model(update.model), group);
                self.render();
                true
            }
        }
    }

    // ---- rendering & selection --------------------------------------------

    /// Rebuild rows from the result groups, keeping the selected entry
    /// selected if it is still present.
    pub fn render(&mut self) {
        // Equal entries can repeat, so remember which copy was selected.
        let previous = self.selected.and_then(|i| {
            let entry = self.rows.get(i).and_then(Row::entry)?.clone();
            let occurrence = self.rows[..i]
                .iter()
                .filter(|row| row.entry() == Some(&entry))
                .count();
            Some((entry, occurrence))
        });
        self.rows = self.results.rows();
        self.selected = previous.and_then(|(entry, occurrence)| {
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.entry() == Some(&entry))
                .nth(occurrence)
                .map(|(i, _)| i)
        });
        self.list_visible = true;
    }

    pub fn selection_down(&mut self) {
        if self.list_visible {
            self.selected = selection::next_entry_row(&self.rows, self.selected);
        }
    }

    pub fn selection_up(&mut self) {
        if self.list_visible {
            self.selected = selection::previous_entry_row(&self.rows, self.selected);
        }
    }

    pub fn selected_entry(&self) -> Option<&SearchEntry> {
        self.selected.and_then(|i| self.rows.get(i)).and_then(Row::entry)
    }

    /// Commit the selected row and close the palette.
    pub fn commit(&mut self) -> Option<Commit> {
        if !self.list_visible {
            return None;
        }
        let entry = self.selected_entry()?.clone();
        let commit = match (self.target, entry.id) {
            (FieldTarget::Background, Some(id)) => Commit::Insert {
                text: format!("{id}({})", entry.label),
            },
            _ => Commit::Navigate { url: entry.url },
        };
        self.hide();
        Some(commit)
    }

    // ---- accessors --------------------------------------------------------

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub const fn is_list_visible(&self) -> bool {
        self.list_visible
    }

    pub const fn target(&self) -> FieldTarget {
        self.target
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub const fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub const fn results(&self) -> &ResultGroups {
        &self.results
    }

    pub fn field_value(&self) -> &str {
        &self.field_value
    }

    pub const fn min_query_chars(&self) -> usize {
        self.settings.min_query_chars
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn last_search_term(&self) -> Option<&str> {
        self.last_search_term.as_deref()
    }

    /// Id of the batch whose results are currently accepted.
    pub fn active_batch(&self) -> Option<u64> {
        self.batch.as_ref().map(SearchBatch::id)
    }
}
