//! Wireloom CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use wireloom_cli::{Args, error_adapter::to_reportables};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Wireloom");
    debug!(args:?; "Parsed arguments");

    match wireloom_cli::run(&args) {
        Ok(report) => {
            print!("{}", report.output);
            if report.failed {
                eprintln!(
                    "{} error(s), {} warning(s)",
                    report.errors, report.warnings
                );
                process::exit(1);
            }
        }
        Err(err) => {
            let reporter = miette::GraphicalReportHandler::new();

            // Render each diagnostic independently
            for reportable in to_reportables(&err) {
                let mut writer = String::new();
                if reporter.render_report(&mut writer, &reportable).is_err() {
                    writer = reportable.to_string();
                }
                error!("{writer}");
            }

            process::exit(1);
        }
    }

    info!("Completed successfully");
}
