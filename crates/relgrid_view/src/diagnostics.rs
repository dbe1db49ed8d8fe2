//! Diagnostic sinks handed to the engine.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Per-event tracing
    Debug,
    /// Noteworthy but expected
    Info,
    /// Suspicious input or incomplete result
    Warn,
}

/// One diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity
    pub level: DiagnosticLevel,
    /// Message text
    pub message: String,
}

impl Diagnostic {
    /// Debug-level diagnostic
    #[must_use]
    pub fn debug(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Debug,
            message: message.into(),
        }
    }

    /// Info-level diagnostic
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            message: message.into(),
        }
    }

    /// Warn-level diagnostic
    #[must_use]
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warn,
            message: message.into(),
        }
    }
}

/// Receiver of engine diagnostics
pub trait DiagnosticSink: Send + Sync {
    /// Record a diagnostic
    fn record(&self, diagnostic: Diagnostic);
}

/// Sink forwarding to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        match diagnostic.level {
            DiagnosticLevel::Debug => tracing::debug!(target: "relgrid::engine", "{}", diagnostic.message),
            DiagnosticLevel::Info => tracing::info!(target: "relgrid::engine", "{}", diagnostic.message),
            DiagnosticLevel::Warn => tracing::warn!(target: "relgrid::engine", "{}", diagnostic.message),
        }
    }
}

/// Sink keeping every diagnostic in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics recorded so far
    #[must_use]
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Diagnostics at or above a level
    #[must_use]
    pub fn at_least(&self, level: DiagnosticLevel) -> Vec<Diagnostic> {
        self.entries()
            .into_iter()
            .filter(|d| d.level >= level)
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records() {
        let sink = MemorySink::new();
        sink.record(Diagnostic::debug("one"));
        sink.record(Diagnostic::warn("two"));
        assert_eq!(sink.entries().len(), 2);
        assert_eq!(sink.at_least(DiagnosticLevel::Warn), vec![Diagnostic::warn("two")]);
    }

    #[test]
    fn test_level_ordering() {
        assert!(DiagnosticLevel::Warn > DiagnosticLevel::Info);
        assert!(DiagnosticLevel::Info > DiagnosticLevel::Debug);
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        TracingSink.record(Diagnostic::info("no subscriber installed"));
    }
}
