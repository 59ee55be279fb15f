//! Injected collectors for non-fatal parse and resolution events.
//!
//! Parsers never abort on a malformed line. They call
//! [`DiagnosticSink::record`] and keep going, so callers decide whether a
//! warning is printed, traced, or asserted on in a test.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a recorded diagnostic is.
///
/// # Examples
///
/// ```
/// use gitdelta_core::Severity;
///
/// assert!(Severity::Error > Severity::Warning);
/// assert_eq!(Severity::Warning.to_string(), "warning");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Tolerated deviation from the expected format.
    Info,
    /// Input that was skipped or reinterpreted.
    Warning,
    /// A failure that left part of the result incomplete.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Receiver for "log and continue" events.
pub trait DiagnosticSink {
    fn record(&mut self, severity: Severity, message: String);

    fn warn(&mut self, message: String) {
        self.record(Severity::Warning, message);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, severity: Severity, message: String) {
        (**self).record(severity, message);
    }
}

/// A sink that keeps every diagnostic in memory.
///
/// # Examples
///
/// ```
/// use gitdelta_core::{DiagnosticSink, Diagnostics, Severity};
///
/// let mut diagnostics = Diagnostics::default();
/// diagnostics.warn("unexpected line".into());
/// diagnostics.record(Severity::Info, "no date".into());
/// assert_eq!(diagnostics.warnings().count(), 1);
/// assert_eq!(diagnostics.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Diagnostics at [`Severity::Warning`] or above.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity >= Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if some diagnostic message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|d| d.message.contains(needle))
    }
}

impl DiagnosticSink for Diagnostics {
    fn record(&mut self, severity: Severity, message: String) {
        self.entries.push(Diagnostic { severity, message });
    }
}

/// A sink that forwards every diagnostic to `tracing`, tagged with a source.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    source: &'static str,
}

impl TracingSink {
    pub fn new(source: &'static str) -> Self {
        Self { source }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new("gitdelta")
    }
}

impl DiagnosticSink for TracingSink {
    fn record(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Info => tracing::info!(source = self.source, "{message}"),
            Severity::Warning => tracing::warn!(source = self.source, "{message}"),
            Severity::Error => tracing::error!(source = self.source, "{message}"),
        }
    }
}
