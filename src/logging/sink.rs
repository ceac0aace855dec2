//! Trace sink for job decisions
//!
//! Every decision made by the resolution engine and the export orchestrator is
//! appended to a [`TraceSink`] as one line of text. The sink is injected, so
//! tests can capture the exact trace with [`MemorySink`] while the binary uses
//! [`TracingSink`] to forward lines to the tracing subscriber.

use std::sync::Mutex;

/// Append-only stream of trace lines
pub trait TraceSink {
    /// Appends one line
    fn trace(&self, line: &str);
}

impl<T: TraceSink + ?Sized> TraceSink for &T {
    fn trace(&self, line: &str) {
        (**self).trace(line);
    }
}

/// Forwards trace lines to `tracing` under the `dwgbatch::trace` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn trace(&self, line: &str) {
        tracing::info!(target: "dwgbatch::trace", "{line}");
    }
}

/// Collects trace lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Returns true if any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl TraceSink for MemorySink {
    fn trace(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}
