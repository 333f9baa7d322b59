//! Single-slot debounce timer.
//!
//! Holds at most one pending `(deadline, text)`. The owner's event loop sleeps
//! until [`Debouncer::deadline`] and then drains it with
//! [`Debouncer::take_due`].

use tokio::time::Instant;

#[derive(Debug)]
struct Pending {
    deadline: Instant,
    text: String,
}

#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<Pending>,
}

impl Debouncer {
    /// Schedule `text` to fire at `deadline`, replacing any pending timer.
    pub fn schedule(&mut self, text: String, deadline: Instant) {
        self.pending = Some(Pending { deadline, text });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Take the pending text if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref().is_some_and(|p| p.deadline <= now) {
            self.pending.take().map(|p| p.text)
        } else {
            None
        }
    }
}
