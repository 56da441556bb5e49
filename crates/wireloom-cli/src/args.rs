//! Command-line argument definitions for the Wireloom CLI.
//!
//! Flags given here override the matching configuration file values.

use clap::Parser;

use crate::config::OutputFormat;

/// Check a Wireloom wireframe and report its diagnostics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input Wireloom file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Report format; overrides `[output] format`
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the source map as JSON to this path
    #[arg(long)]
    pub source_map: Option<String>,

    /// Fail when any warning is reported
    #[arg(long)]
    pub deny_warnings: bool,

    /// Stop at the first failing phase instead of collecting everything
    #[arg(long)]
    pub strict: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
