//! Cooperative cancellation for long-running searches.
//!
//! The scale sweep and the match selector poll the token between iterations;
//! once cancelled, they return [`NccMatchError::Cancelled`] at the next check.

use crate::util::{NccMatchError, NccMatchResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag. Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the non-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation for every holder of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns `Err(Cancelled)` if cancellation was requested.
    pub fn check(&self) -> NccMatchResult<()> {
        if self.is_cancelled() {
            Err(NccMatchError::Cancelled)
        } else {
            Ok(())
        }
    }
}

pub(crate) fn check_opt(token: Option<&CancelToken>) -> NccMatchResult<()> {
    match token {
        Some(token) => token.check(),
        None => Ok(()),
    }
}
