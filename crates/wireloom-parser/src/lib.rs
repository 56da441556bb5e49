//! # Wireloom Parser
//!
//! Front end for the Wireloom wireframe language: source text goes through
//! the lexer and the grammar parser, is lowered into the
//! [`wireloom_core::ast`] tree together with a [`SourceMap`], and is then
//! checked by the semantic [`validate`] pass.
//!
//! Two entry points are provided:
//!
//! - [`parse`] is strict and fails on the first phase that reports errors.
//! - [`parse_with_diagnostics`] is tolerant and returns whatever could be
//!   built alongside every diagnostic, for editor tooling.
//!
//! ## Usage
//!
//! ```
//! # use wireloom_parser::{parse, parse_with_diagnostics, ParseError, ParseOptions};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         project "Demo" {
//!             screen Main {
//!                 layout stack { component Button text: "Go" }
//!             }
//!         }
//!     "#;
//!
//!     let project = parse(source)?;
//!     assert_eq!(project.screens.len(), 1);
//!
//!     let outcome = parse_with_diagnostics(source, Some("demo.wl"), ParseOptions::default())?;
//!     let resolver = outcome.resolver().expect("source map");
//!     let button = resolver.get_node_by_id("component-button-0").expect("button");
//!     assert_eq!(button.parent_id.as_deref(), Some("layout-stack-0"));
//!     Ok(())
//! }
//! ```

mod cst;
pub mod error;
mod lexer;
mod lower;
mod parser;
#[cfg(test)]
mod parser_tests;
pub mod source_map;
pub mod span;
pub mod tokens;
pub mod validate;

pub use error::{Diagnostic, ErrorCode, ParseError, Phase, Severity};
pub use lexer::{tokenize, tokenize_recovering};
pub use source_map::{
    InsertionPoint, NodeId, PropertySourceMap, SourceMap, SourceMapEntry, SourceNodeType,
    resolver::{SourceMapResolver, SourceMapStats},
};
pub use span::{CodeRange, Position, Span};

use log::{debug, info};
use serde::Serialize;

use wireloom_core::ast::Project;

use error::DiagnosticCollector;

/// Options for [`parse_with_diagnostics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Return `Err` when any error-severity diagnostic was produced.
    pub throw_on_error: bool,
    /// Keep semantic warnings. Semantic errors are always kept.
    pub include_semantic_warnings: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            throw_on_error: false,
            include_semantic_warnings: true,
        }
    }
}

/// Everything a tolerant parse produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    /// The AST, annotated with source-map ids. `None` when the grammar
    /// parser failed.
    pub ast: Option<Project>,
    pub source_map: Option<SourceMap>,
    /// All diagnostics, in the order the phases produced them.
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ParseOutcome {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity().is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity().is_warning())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Index the source map for queries, when one was built.
    pub fn resolver(&self) -> Option<SourceMapResolver<'_>> {
        self.source_map.as_ref().map(SourceMapResolver::new)
    }
}

/// Parse source text into a project, strictly.
///
/// The pipeline stops at the first phase that reports errors:
///
/// 1. **Tokenize** - every lexer error
/// 2. **Parse** - the grammar error, or a project without screens
/// 3. **Lower** - build the AST and source map
/// 4. **Validate** - every semantic error, including definition cycles
///
/// Semantic warnings never cause a failure. The returned AST carries no
/// source-map ids.
pub fn parse(source: &str) -> Result<Project, ParseError> {
    let tokens = lexer::tokenize(source)?;

    let cst = parser::build_project(&tokens)?;
    if cst.screens.is_empty() {
        return Err(parser::missing_screen(&cst).into());
    }

    let (mut project, source_map) = lower::lower(&cst, Some(source));

    let mut collector = DiagnosticCollector::new();
    collector.extend(validate::validate(&project, &source_map));
    collector.finish()?;

    project.clear_source_map_ids();
    info!(screens = project.screens.len(); "Parsed project");
    Ok(project)
}

/// Parse source text, collecting diagnostics instead of failing.
///
/// Parsing continues over the tokens the lexer could recover, so a stray
/// character does not hide grammar or semantic problems further on. When
/// the grammar parser fails, `ast` and `source_map` are `None`.
///
/// `path` only labels the diagnostics; it is never opened.
///
/// # Errors
///
/// Only when `options.throw_on_error` is set and at least one error was
/// found; the [`ParseError`] then holds the error diagnostics.
pub fn parse_with_diagnostics(
    source: &str,
    path: Option<&str>,
    options: ParseOptions,
) -> Result<ParseOutcome, ParseError> {
    let mut collector = DiagnosticCollector::new();

    let (tokens, lexer_diagnostics) = lexer::tokenize_recovering(source);
    collector.extend(lexer_diagnostics);

    let (ast, source_map) = match parser::build_project(&tokens) {
        Ok(cst) => {
            if cst.screens.is_empty() {
                collector.emit(parser::missing_screen(&cst));
            }
            let (project, source_map) = lower::lower(&cst, Some(source));
            let semantic = validate::validate(&project, &source_map);
            collector.extend(
                semantic
                    .into_iter()
                    .filter(|d| options.include_semantic_warnings || d.severity().is_error()),
            );
            (Some(project), Some(source_map))
        }
        Err(diagnostic) => {
            debug!(code = diagnostic.code().as_str(); "Grammar parse failed");
            collector.emit(diagnostic);
            (None, None)
        }
    };

    let has_errors = collector.has_errors();
    let mut diagnostics = collector.into_diagnostics();
    if let Some(path) = path {
        diagnostics = diagnostics
            .into_iter()
            .map(|diagnostic| diagnostic.with_file(path))
            .collect();
    }

    info!(
        diagnostics = diagnostics.len(),
        has_errors = has_errors;
        "Parsed with diagnostics"
    );

    if options.throw_on_error && has_errors {
        return Err(ParseError::new(
            diagnostics
                .into_iter()
                .filter(|d| d.severity().is_error())
                .collect(),
        ));
    }

    Ok(ParseOutcome {
        ast,
        source_map,
        diagnostics,
        path: path.map(str::to_string),
    })
}
