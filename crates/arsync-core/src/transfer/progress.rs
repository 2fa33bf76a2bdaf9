//! Progress reporting for downloads.
//!
//! The engine forwards cumulative byte counts here; nothing in a reporter
//! affects whether a transfer succeeds.

/// Receives progress for artifact downloads.
pub trait ProgressReporter: Send + Sync {
    /// Cumulative bytes received so far for `name`.
    fn on_progress(&self, name: &str, bytes: u64);

    /// Download of `name` completed with `bytes` total.
    fn on_finish(&self, _name: &str, _bytes: u64) {}
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn on_progress(&self, _name: &str, _bytes: u64) {}
}
