//! Status reporting for restore operations.
//!
//! The fetcher and materializer emit progress lines through an injected
//! [`Report`] capability instead of writing to the console directly, so
//! both stay testable without real terminal output.

use std::io::Write;
use std::sync::Mutex;

use console::Term;

/// Sink for human-readable status lines.
pub trait Report: Send + Sync {
    /// Write a single status line.
    fn writeln(&self, message: &str);
}

/// Report sink writing to stderr.
pub struct ConsoleReport {
    term: Term,
}

impl ConsoleReport {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for ConsoleReport {
    fn default() -> Self {
        Self::new()
    }
}

impl Report for ConsoleReport {
    fn writeln(&self, message: &str) {
        let _ = writeln!(&self.term, "{}", message);
    }
}

/// Report sink that discards everything.
pub struct NullReport;

impl Report for NullReport {
    fn writeln(&self, _message: &str) {}
}

/// Report sink that collects lines in memory.
pub struct MemoryReport {
    lines: Mutex<Vec<String>>,
}

impl MemoryReport {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Default for MemoryReport {
    fn default() -> Self {
        Self::new()
    }
}

impl Report for MemoryReport {
    fn writeln(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}
