//! Single-key navigation shortcuts.
//!
//! Quick keys map a bare key press to a target url. They are active by
//! default and are suspended while the command palette is open, through the
//! [`ShortcutSuspender`] handle the palette receives at construction.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

/// Capability to pause and resume page-level keyboard shortcuts.
pub trait ShortcutSuspender: Send {
    fn suspend(&mut self);
    fn resume(&mut self);
}

/// Key -> url bindings plus an attached flag.
///
/// Clones share the attached flag, so detaching one detaches all of them.
#[derive(Debug, Clone)]
pub struct QuickKeys {
    bindings: BTreeMap<char, String>,
    attached: Arc<AtomicBool>,
}

impl Default for QuickKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl QuickKeys {
    /// Empty, attached bindings.
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Build from the `quick_keys` config section. Keys must be a single
    /// character; anything else is skipped with a warning.
    pub fn from_config(section: &BTreeMap<String, String>) -> Self {
        let mut keys = Self::new();
        for (key, url) in section {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => keys.on_key_goto(c, url.clone()),
                _ => warn!(key = %key, "Ignoring quick key that is not a single character"),
            }
        }
        keys
    }

    /// Bind `key` to `url`, replacing an earlier binding.
    pub fn on_key_goto(&mut self, key: char, url: String) {
        self.bindings.insert(key, url);
    }

    /// Target url for `key`, if attached and bound.
    pub fn handle_key(&self, key: char) -> Option<&str> {
        if !self.is_attached() {
            return None;
        }
        self.bindings.get(&key).map(String::as_str)
    }

    pub fn attach(&self) {
        self.attached.store(true, Ordering::Relaxed);
    }

    pub fn detach(&self) {
        self.attached.store(false, Ordering::Relaxed);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Relaxed)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (char, &str)> {
        self.bindings.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Handle that detaches/attaches these bindings.
    pub fn suspender(&self) -> QuickKeysSuspender {
        QuickKeysSuspender { keys: self.clone() }
    }
}

/// [`ShortcutSuspender`] over a clone of a [`QuickKeys`].
#[derive(Debug, Clone)]
pub struct QuickKeysSuspender {
    keys: QuickKeys,
}

impl ShortcutSuspender for QuickKeysSuspender {
    fn suspend(&mut self) {
        self.keys.detach();
    }

    fn resume(&mut self) {
        self.keys.attach();
    }
}
