//! Autocompletion for a form field that references entries of another model.
//!
//! Each keystroke restarts a quiet-period timer; when it fires, one regex
//! search of the related model replaces the whitelist of admissible tags.
//! Only whitelisted values can be accepted as tags.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::palette::batch::SearchBatch;
use crate::palette::debounce::Debouncer;
use crate::search::{RemoteEntry, SearchBackend, SearchError};

/// One admissible tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSuggestion {
    /// Text shown and matched against (the entry's display string).
    pub search_by: String,
    /// Compound `{model}/{oid}` id stored when the tag is accepted.
    pub value: String,
}

impl TagSuggestion {
    fn from_remote(model: &str, entry: &RemoteEntry) -> Self {
        Self {
            search_by: entry.display.clone(),
            value: entry.compound_id(model),
        }
    }
}

/// Result of one completion request.
#[derive(Debug)]
pub struct TagUpdate {
    pub generation: u64,
    pub query: String,
    pub result: Result<Vec<RemoteEntry>, SearchError>,
}

pub struct TagCompleter<B: SearchBackend> {
    backend: Arc<B>,
    model: String,
    delay: Duration,
    updates: mpsc::UnboundedSender<TagUpdate>,

    input: String,
    debounce: Debouncer,
    request: Option<SearchBatch>,
    generation: u64,
    whitelist: Vec<TagSuggestion>,
    loading: bool,
    tags: Vec<TagSuggestion>,
}

impl<B: SearchBackend> TagCompleter<B> {
    /// Completer for a field related to `model`. Results arrive on the
    /// returned receiver and must be passed to [`TagCompleter::apply_update`].
    pub fn new(
        backend: Arc<B>,
        model: impl Into<String>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<TagUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let completer = Self {
            backend,
            model: model.into(),
            delay,
            updates,
            input: String::new(),
            debounce: Debouncer::default(),
            request: None,
            generation: 0,
            whitelist: Vec::new(),
            loading: false,
            tags: Vec::new(),
        };
        (completer, rx)
    }

    /// Handle the field's pending text after a keystroke.
    pub fn on_input(&mut self, text: &str, now: Instant) {
        self.input = text.to_string();
        let query = text.trim();
        if query.is_empty() {
            self.debounce.cancel();
            return;
        }
        self.debounce.schedule(query.to_string(), now + self.delay);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Start the pending search if its quiet period has elapsed.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.debounce.take_due(now) {
            Some(query) => {
                self.search(query);
                true
            }
            None => false,
        }
    }

    fn search(&mut self, query: String) {
        self.generation += 1;
        // Replacing the request drops the previous one, which cancels it.
        let request = SearchBatch::new(self.generation);
        self.whitelist.clear();
        self.loading = true;
        debug!(model = %self.model, query = %query, generation = self.generation, "Tag search");

        let backend = Arc::clone(&self.backend);
        let token = request.token();
        let updates = self.updates.clone();
        let model = self.model.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = tokio::select! {
                () = token.cancelled() => return,
                result = backend.search(&model, &query) => result,
            };
            let _ = updates.send(TagUpdate {
                generation,
                query,
                result,
            });
        });
        self.request = Some(request);
    }

    /// Install a search result as the whitelist. Returns `true` when the
    /// whitelist changed.
    pub fn apply_update(&mut self, update: TagUpdate) -> bool {
        if update.generation != self.generation
            || self.request.as_ref().is_none_or(SearchBatch::is_cancelled)
        {
            debug!(generation = update.generation, "Dropping stale tag result");
            return false;
        }
        self.request = None;
        self.loading = false;
        match update.result {
            Err(e) => {
                warn!(model = %self.model, error = %e, "Tag search failed");
                false
            }
            Ok(entries) => {
                self.whitelist = entries
                    .iter()
                    .map(|entry| TagSuggestion::from_remote(&self.model, entry))
                    .collect();
                true
            }
        }
    }

    /// Add the whitelisted suggestion whose value is `value`. Duplicates and
    /// values outside the whitelist are refused.
    pub fn accept(&mut self, value: &str) -> bool {
        let Some(suggestion) = self.whitelist.iter().find(|s| s.value == value) else {
            return false;
        };
        if self.tags.iter().any(|t| t.value == value) {
            return false;
        }
        self.tags.push(suggestion.clone());
        self.input.clear();
        self.debounce.cancel();
        true
    }

    /// Accept the first suggestion, if any.
    pub fn accept_first(&mut self) -> Option<&TagSuggestion> {
        let value = self.whitelist.first()?.value.clone();
        if self.accept(&value) {
            self.tags.last()
        } else {
            None
        }
    }

    pub fn remove_last(&mut self) -> Option<TagSuggestion> {
        self.tags.pop()
    }

    pub fn whitelist(&self) -> &[TagSuggestion] {
        &self.whitelist
    }

    pub fn tags(&self) -> &[TagSuggestion] {
        &self.tags
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }
}
