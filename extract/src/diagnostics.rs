//! Non-fatal diagnostics collected while rows are formatted and aggregated.
//!
//! Every entry is also emitted as a `tracing` event, so callers that only
//! install a subscriber still see them, while tests and embedding code can
//! inspect the collected list directly.

use std::fmt;

/// Kind of a non-fatal diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An optional query variable did not match; the cell degrades to "".
    Unbound,
    /// A cell carried a term kind the formatter does not know (blank node, ...).
    UnrecognizedTerm,
    /// A row had no label; it was folded into the empty-label entity.
    MissingLabel,
    /// Two distinct source IRIs produced the same label and were merged.
    LabelCollision,
}

impl DiagnosticKind {
    /// Returns the short tag printed in diagnostic summaries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::Unbound => "unbound",
            DiagnosticKind::UnrecognizedTerm => "unrecognized-term",
            DiagnosticKind::MissingLabel => "missing-label",
            DiagnosticKind::LabelCollision => "label-collision",
        }
    }
}

/// A single warning raised during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Query variable (column) the value came from.
    pub column: String,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ?{}: {}", self.kind.as_str(), self.column, self.message)
    }
}

/// Collector for [`Diagnostic`]s.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and emits it through `tracing`.
    pub fn warn(&mut self, kind: DiagnosticKind, column: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = kind.as_str(), column, "{message}");
        self.entries.push(Diagnostic {
            kind,
            column: column.to_string(),
            message,
        });
    }

    /// All recorded entries, in the order they were raised.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
