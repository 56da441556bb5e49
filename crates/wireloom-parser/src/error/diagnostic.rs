//! The core diagnostic type for the Wireloom error system.
//!
//! A [`Diagnostic`] is a single error or warning with a wire-stable code, the
//! phase that produced it, and the source range it points at.

use std::fmt;

use serde::Serialize;

use crate::{
    error::{ErrorCode, Phase, Severity},
    span::{CodeRange, Span},
};

/// A diagnostic message with source location information.
///
/// Serialises to the wire shape consumed by editor tooling:
///
/// ```text
/// { message, severity, phase, code, range: { start, end }, nodeId?, suggestion?, file? }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    message: String,
    severity: Severity,
    phase: Phase,
    code: ErrorCode,
    range: CodeRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic. The phase is taken from the code.
    ///
    /// # Example
    ///
    /// ```
    /// # use wireloom_parser::error::{Diagnostic, ErrorCode, Phase};
    /// let diag = Diagnostic::error(ErrorCode::DefinitionCycle, "circular definition: A → A");
    /// assert!(diag.severity().is_error());
    /// assert_eq!(diag.phase(), Phase::Semantic);
    /// ```
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a warning diagnostic. The phase is taken from the code.
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> CodeRange {
        self.range
    }

    /// Byte span of the range, for renderers that label source snippets.
    pub fn span(&self) -> Span {
        self.range.span()
    }

    /// Source-map identifier of the node this diagnostic is about, if any.
    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Logical file path the diagnostic was stamped with.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn with_range(mut self, range: CodeRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    fn new(severity: Severity, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            phase: code.phase(),
            code,
            range: CodeRange::start_of_input(),
            node_id: None,
            suggestion: None,
            file: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[LAYOUT_EMPTY]: message"
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

impl std::error::Error for Diagnostic {}
