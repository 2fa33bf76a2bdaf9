//! Console progress for downloads, throttled to one line every half second.

use arsync_core::transfer::ProgressReporter;
use std::io::Write;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Default)]
pub struct ConsoleProgress {
    last_print: Mutex<Option<Instant>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / 1_048_576.0
}

impl ProgressReporter for ConsoleProgress {
    fn on_progress(&self, name: &str, bytes: u64) {
        let Ok(mut last) = self.last_print.lock() else {
            return;
        };
        let now = Instant::now();
        if last.is_some_and(|t| now.duration_since(t) < PROGRESS_INTERVAL) {
            return;
        }
        *last = Some(now);
        print!("\r  {}  {:.1} MiB  ", name, mib(bytes));
        let _ = std::io::stdout().flush();
    }

    fn on_finish(&self, name: &str, bytes: u64) {
        if let Ok(mut last) = self.last_print.lock() {
            *last = None;
        }
        println!("\r  {}  {:.1} MiB  done", name, mib(bytes));
    }
}
