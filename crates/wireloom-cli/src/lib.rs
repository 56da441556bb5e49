//! CLI logic for the Wireloom diagnostics checker.
//!
//! Reads one wireframe file, runs the tolerant parser over it and renders
//! the diagnostics as annotated snippets or as JSON.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::Args;
pub use config::{AppConfig, OutputFormat};
pub use error::CliError;

use std::{fmt, fs};

use log::{debug, info};

use wireloom_parser::{ParseOptions, parse_with_diagnostics};

/// Result of checking one file.
#[derive(Debug)]
pub struct Report {
    /// Text to print on stdout.
    pub output: String,
    pub errors: usize,
    pub warnings: usize,
    /// Whether the check failed: any error, or any warning when warnings
    /// are denied.
    pub failed: bool,
}

/// Run the Wireloom CLI application
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parse errors in `--strict` mode
/// - JSON serialization errors
pub fn run(args: &Args) -> Result<Report, CliError> {
    info!(input_path = args.input; "Checking wireframe");

    let app_config = config::load_config(args.config.as_ref())?;
    debug!(app_config:?; "Loaded configuration");

    let format = args.format.unwrap_or(app_config.output.format);
    let deny_warnings = args.deny_warnings || app_config.diagnostics.deny_warnings;
    let options = ParseOptions {
        throw_on_error: args.strict,
        include_semantic_warnings: app_config.diagnostics.include_semantic_warnings,
    };

    let source = fs::read_to_string(&args.input)?;

    let outcome = match parse_with_diagnostics(&source, Some(&args.input), options) {
        Ok(outcome) => outcome,
        Err(err) => return Err(CliError::new_parse_error(err, source)),
    };

    if let Some(path) = &args.source_map {
        let json = serde_json::to_string_pretty(&outcome.source_map)?;
        fs::write(path, json)?;
        info!(output_file = path; "Source map written");
    }

    let errors = outcome.errors().count();
    let warnings = outcome.warnings().count();
    let failed = errors > 0 || (deny_warnings && warnings > 0);

    let output = match format {
        OutputFormat::Human => error_adapter::render_diagnostics(&outcome.diagnostics, &source)
            .map_err(render_failed)?,
        OutputFormat::Json => serde_json::to_string_pretty(&outcome)?,
    };

    info!(errors, warnings, failed; "Check finished");

    Ok(Report {
        output,
        errors,
        warnings,
        failed,
    })
}

fn render_failed(_: fmt::Error) -> CliError {
    CliError::Io(std::io::Error::other("failed to render diagnostics"))
}
