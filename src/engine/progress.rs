//! Progress tracking and callback system for the copy loop

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Width of the bar in cells
pub const BAR_CELLS: usize = 20;
/// Percentage covered by one bar cell
pub const BAR_STEP: f64 = 100.0 / BAR_CELLS as f64;

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";

/// Progress callback trait for the streaming copier
pub trait ProgressCallback {
    /// Called once before the first chunk is read
    fn on_start(&self, _expected: u64) {}

    /// Called after every chunk write with the cumulative byte count
    fn on_progress(&self, written: u64, expected: u64);

    /// Called once the source is exhausted
    fn on_complete(&self, _written: u64) {}
}

/// Percentage of `expected` covered by `written`; 0 when nothing is expected
pub fn percent(written: u64, expected: u64) -> f64 {
    if expected == 0 {
        0.0
    } else {
        written as f64 / expected as f64 * 100.0
    }
}

/// Bar of `#` and spaces, one cell filled per started 5%
pub fn render_bar(percent: f64) -> String {
    let filled = ((percent / BAR_STEP).ceil().max(0.0) as usize).min(BAR_CELLS);
    format!("[{}{}]", "#".repeat(filled), " ".repeat(BAR_CELLS - filled))
}

/// Full progress line, rewritten in place by a leading carriage return
pub fn render_line(written: u64, expected: u64) -> String {
    let pct = percent(written, expected);
    format!("\r{:.0}% {} ({})", pct, render_bar(pct), written)
}

/// In-place terminal progress bar on stdout
pub struct TerminalProgress {
    cursor_hidden: AtomicBool,
}

impl TerminalProgress {
    /// Create a new terminal progress bar
    pub fn new() -> Self {
        Self {
            cursor_hidden: AtomicBool::new(false),
        }
    }

    fn restore_cursor(&self) {
        if self.cursor_hidden.swap(false, Ordering::SeqCst) {
            let mut out = io::stdout().lock();
            let _ = write!(out, "{}", SHOW_CURSOR);
            let _ = out.flush();
        }
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_start(&self, _expected: u64) {
        let mut out = io::stdout().lock();
        let _ = write!(out, "{}", HIDE_CURSOR);
        let _ = out.flush();
        self.cursor_hidden.store(true, Ordering::SeqCst);
    }

    fn on_progress(&self, written: u64, expected: u64) {
        let mut out = io::stdout().lock();
        let _ = write!(out, "{}", render_line(written, expected));
        let _ = out.flush();
    }

    fn on_complete(&self, _written: u64) {
        let _ = writeln!(io::stdout().lock());
        self.restore_cursor();
    }
}

impl Drop for TerminalProgress {
    // A failed copy never reaches on_complete
    fn drop(&mut self) {
        self.restore_cursor();
    }
}

/// Observer that renders nothing
#[derive(Debug, Default)]
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_progress(&self, _written: u64, _expected: u64) {}
}

/// Observer that keeps every reported byte count
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<(u64, u64)>>,
    completed: Mutex<Option<u64>>,
}

impl RecordingProgress {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports seen so far as `(written, expected)` pairs
    pub fn events(&self) -> Vec<(u64, u64)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Total passed to `on_complete`, if it was called
    pub fn completed(&self) -> Option<u64> {
        self.completed.lock().ok().and_then(|c| *c)
    }
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, written: u64, expected: u64) {
        if let Ok(mut events) = self.events.lock() {
            events.push((written, expected));
        }
    }

    fn on_complete(&self, written: u64) {
        if let Ok(mut completed) = self.completed.lock() {
            *completed = Some(written);
        }
    }
}
