//! Collector for accumulating diagnostics during a processing phase.
//!
//! The [`DiagnosticCollector`] lets phases report every problem they find
//! instead of failing on the first one.

use crate::error::{Diagnostic, ParseError};

#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    ///
    /// If it is an error, the collector is marked as having errors.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Emit every diagnostic from an iterator, in order.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Consume the collector, returning everything emitted so far.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Finish collection and return a result.
    ///
    /// - If there are errors, returns `Err(ParseError)` with the error diagnostics.
    /// - If there are none, returns `Ok(())`; warnings are discarded.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            Err(ParseError::new(
                self.diagnostics
                    .into_iter()
                    .filter(|d| d.severity().is_error())
                    .collect(),
            ))
        } else {
            Ok(())
        }
    }
}
