//! Error and diagnostic system for the Wireloom parser.
//!
//! This module provides:
//! - Wire-stable error codes, one per distinct check
//! - Severity levels and the phase that produced a diagnostic
//! - A diagnostic collector for accumulating multiple errors per phase
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning anchored to a [`CodeRange`](crate::CodeRange).
//! Multiple diagnostics are wrapped in [`ParseError`] when the strict entry
//! point fails.
//!
//! # Example
//!
//! ```
//! # use wireloom_parser::error::{Diagnostic, ErrorCode};
//! let diag = Diagnostic::error(
//!     ErrorCode::LayoutSplitSideConflict,
//!     "split layout declares both `left` and `right`",
//! )
//! .with_node_id("layout-split-0")
//! .with_suggestion("keep only one of `left` or `right`");
//!
//! assert_eq!(diag.code().as_str(), "LAYOUT_SPLIT_SIDE_CONFLICT");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod parse_error;
mod phase;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
pub use phase::Phase;
pub use severity::Severity;
