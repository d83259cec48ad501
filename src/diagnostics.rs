//! Structured diagnostic sink.
//!
//! Components never print or log directly when something degrades; they
//! hand a `Diagnostic` to the sink they were given. Binaries pass a
//! `LogSink` (forwards to the `log` facade), tests pass a `MemorySink`.

use std::fmt;

use parking_lot::Mutex;

/// A single degradation event raised while fetching or rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A list-shaped field decoded to some other JSON type.
    FieldNotList { found: String, preview: String },
    /// A list-shaped field could not be decoded at all.
    FieldUnparsable { error: String, preview: String },
    /// One query in a settled batch failed.
    SourceFailed { label: String, reason: String },
    /// One item of a sequential loop (e.g. a meeting brief) failed.
    ItemFailed { item: String, reason: String },
}

impl Diagnostic {
    /// Whether this diagnostic describes a failed remote operation rather
    /// than a recovered data-shape problem.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Diagnostic::SourceFailed { .. } | Diagnostic::ItemFailed { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FieldNotList { found, preview } => write!(
                f,
                "Expected array but got {}. Raw value: \"{}\"",
                found, preview
            ),
            Diagnostic::FieldUnparsable { error, preview } => write!(
                f,
                "Failed to parse array field. Raw value: \"{}\". Error: {}",
                preview, error
            ),
            Diagnostic::SourceFailed { label, reason } => {
                write!(f, "Failed to {}: {}", label, reason)
            }
            Diagnostic::ItemFailed { item, reason } => {
                write!(f, "Failed to prep \"{}\": {}", item, reason)
            }
        }
    }
}

/// Append-only destination for diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade: data-shape problems as
/// warnings, failed operations as errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, diagnostic: Diagnostic) {
        if diagnostic.is_failure() {
            log::error!("{}", diagnostic);
        } else {
            log::warn!("{}", diagnostic);
        }
    }
}

/// Collects diagnostics in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.emit(Diagnostic::SourceFailed {
            label: "fetch calendar events".to_string(),
            reason: "boom".to_string(),
        });
        sink.emit(Diagnostic::FieldNotList {
            found: "object".to_string(),
            preview: "{}".to_string(),
        });

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_failure());
        assert!(!entries[1].is_failure());
    }

    #[test]
    fn test_source_failed_display() {
        let d = Diagnostic::SourceFailed {
            label: "search recent threads".to_string(),
            reason: "HTTP 500".to_string(),
        };
        assert_eq!(d.to_string(), "Failed to search recent threads: HTTP 500");
    }
}
