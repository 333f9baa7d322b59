//! Application state and types.

use crude_core::palette::{Commit, FieldTarget, Palette, SearchUpdate};
use crude_core::quickkeys::QuickKeys;
use crude_core::search::{HttpSearchClient, SearchBackend};
use crude_core::tags::{TagCompleter, TagUpdate};
use tokio::time::Instant;
use tracing::info;

/// Start page shown before any navigation.
pub const HOME: &str = "/";

/// Which pane receives plain key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The current location; quick keys are live here.
    Location,
    /// The form field, optionally backed by a tag completer.
    Field,
}

/// TUI application state.
pub struct App<B: SearchBackend = HttpSearchClient> {
    pub focus: Focus,
    pub location: String,
    pub history: Vec<String>,
    pub palette: Palette<B>,
    pub quick_keys: QuickKeys,
    pub tags: Option<TagCompleter<B>>,
    /// Text of the form field.
    pub field: String,
    pub status: String,
    pub should_quit: bool,
}

impl<B: SearchBackend> App<B> {
    pub fn new(palette: Palette<B>, quick_keys: QuickKeys, tags: Option<TagCompleter<B>>) -> Self {
        Self {
            focus: Focus::Location,
            location: HOME.to_string(),
            history: Vec::new(),
            palette,
            quick_keys,
            tags,
            field: String::new(),
            status: "Ctrl+Space: palette | Tab: switch focus | Ctrl+C: quit".to_string(),
            should_quit: false,
        }
    }

    /// Go to `url`, remembering the current location.
    pub fn navigate(&mut self, url: &str) {
        if self.location == url {
            return;
        }
        info!(from = %self.location, to = %url, "Navigate");
        let previous = std::mem::replace(&mut self.location, url.to_string());
        self.history.push(previous);
        self.status = format!("Opened {url}");
    }

    /// Return to the previous location, if any.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.location = previous;
                self.status = format!("Back to {}", self.location);
                true
            }
            None => false,
        }
    }

    /// Carry out a committed palette row.
    pub fn apply_commit(&mut self, commit: Commit) {
        match commit {
            Commit::Navigate { url } => self.navigate(&url),
            Commit::Insert { text } => {
                self.field.push_str(&text);
                self.status = format!("Inserted {text}");
            }
        }
    }

    /// Open or close the palette over whatever has focus.
    pub fn toggle_palette(&mut self) {
        let target = match self.focus {
            Focus::Location => FieldTarget::Foreground,
            Focus::Field => FieldTarget::Background,
        };
        self.palette.toggle(target);
    }

    pub const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Location => Focus::Field,
            Focus::Field => Focus::Location,
        };
    }

    /// Feed the form field's text to the tag completer, if there is one.
    pub fn field_changed(&mut self, now: Instant) {
        if let Some(tags) = self.tags.as_mut() {
            tags.on_input(&self.field, now);
        }
    }

    /// Accept the first tag suggestion. Returns `false` when there was none.
    pub fn accept_tag(&mut self) -> bool {
        let Some(tags) = self.tags.as_mut() else {
            return false;
        };
        match tags.accept_first() {
            Some(tag) => {
                self.status = format!("Tagged {}", tag.value);
                self.field.clear();
                true
            }
            None => false,
        }
    }

    pub fn has_tag_suggestions(&self) -> bool {
        self.tags.as_ref().is_some_and(|t| !t.whitelist().is_empty())
    }

    /// Earliest pending debounce deadline across palette and tag field.
    pub fn next_deadline(&self) -> Option<Instant> {
        let tags = self.tags.as_ref().and_then(TagCompleter::next_deadline);
        match (self.palette.next_deadline(), tags) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fire whichever debounced searches are due.
    pub fn fire_due(&mut self, now: Instant) {
        self.palette.fire_due(now);
        if let Some(tags) = self.tags.as_mut() {
            tags.fire_due(now);
        }
    }

    pub fn handle_search_update(&mut self, update: SearchUpdate) {
        self.palette.apply_update(update);
    }

    pub fn handle_tag_update(&mut self, update: TagUpdate) {
        if let Some(tags) = self.tags.as_mut() {
            tags.apply_update(update);
        }
    }
}
