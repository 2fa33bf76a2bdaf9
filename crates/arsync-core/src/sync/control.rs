//! Cancellation for a sync run.
//!
//! The engine checks the token between files; a set token stops the run
//! before the next file is touched, so no store write is left half-done.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Error-free stop signal shared between the engine and e.g. a Ctrl-C handler.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
