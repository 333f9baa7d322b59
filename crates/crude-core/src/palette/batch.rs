//! Cancellation scope for one batch of in-flight search requests.

use tokio_util::sync::{CancellationToken, DropGuard};

/// Owns the cancellation token shared by every request of a batch.
///
/// Dropping the batch cancels the token, so replacing the active batch (or
/// dropping its owner) stops all of its requests.
#[derive(Debug)]
pub struct SearchBatch {
    id: u64,
    token: CancellationToken,
    _guard: DropGuard,
}

impl SearchBatch {
    pub fn new(id: u64) -> Self {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        Self {
            id,
            token,
            _guard: guard,
        }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Token handed to request tasks.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_batch_cancels_its_token() {
        let batch = SearchBatch::new(7);
        let token = batch.token();
        assert_eq!(batch.id(), 7);
        assert!(!token.is_cancelled());
        drop(batch);
        assert!(token.is_cancelled());
    }

    #[test]
    fn replacing_batch_cancels_previous() {
        let mut slot = Some(SearchBatch::new(1));
        let first = slot.as_ref().map(SearchBatch::token);
        slot = Some(SearchBatch::new(2));
        assert!(first.is_some_and(|t| t.is_cancelled()));
        assert!(slot.is_some_and(|b| !b.is_cancelled()));
    }
}
