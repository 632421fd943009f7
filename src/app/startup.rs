//! Application startup: arguments, configuration, logging, then the pipeline

use super::cli::args::{Args, OutputFormat};
use super::pipeline::{self, PipelineReport};
use crate::core::error_handling::{fatal_message, log_error_with_context};
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::version::long_version;
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

/// Exit status when the run was cut short by a signal
pub const EXIT_INTERRUPTED: i32 = 130;

/// Run the application and return the process exit status
pub async fn startup() -> i32 {
    let mut args = Args::parse();

    // Logging is configured from the merged settings, so report these directly
    if let Err(e) = args.load_config_file().await {
        eprintln!("Error: {}", e);
        return 1;
    }

    let use_color = args.use_color();
    colored::control::set_override(use_color);
    if let Err(e) = crate::core::logging::init_logging(
        args.log_level.as_deref(),
        args.log_format(),
        args.log_file(),
        use_color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return 1;
    }

    log::info!("reorder {} starting", long_version());
    log::debug!("Final arguments: {:?}", args);

    let config = match args.pipeline_config() {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Resolving pipeline configuration");
            eprintln!("{}", fatal_message(&e, "Resolving pipeline configuration"));
            return 1;
        }
    };

    let coordinator = Arc::new(ShutdownCoordinator::new());
    coordinator.install_signal_handlers();

    let report = match pipeline::run(&config, &coordinator).await {
        Ok(report) => report,
        Err(e) => {
            log_error_with_context(&e, "Running pipeline");
            eprintln!("{}", fatal_message(&e, "Running pipeline"));
            return 1;
        }
    };

    match args.output.unwrap_or_default() {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {}", e);
                return 1;
            }
        },
        OutputFormat::Text => println!("{}", render_report(&report)),
    }

    exit_status(&report)
}

/// Exit status for a finished run
pub fn exit_status(report: &PipelineReport) -> i32 {
    if report.interrupted {
        EXIT_INTERRUPTED
    } else if report.is_complete() {
        0
    } else {
        1
    }
}

/// Human-readable summary of a run
pub fn render_report(report: &PipelineReport) -> String {
    let status = if report.is_complete() {
        "complete".green().bold()
    } else if report.interrupted {
        "interrupted".yellow().bold()
    } else {
        "failed".red().bold()
    };

    let mut text = format!(
        "{}: {}/{} items delivered in {} ms",
        status, report.delivered, report.expected, report.elapsed_ms
    );
    if !report.in_order {
        text.push_str(&format!("\n{}", "items were delivered out of order".red()));
    }
    if let Some(reason) = &report.close_reason {
        text.push_str(&format!("\nchannel closed: {}", reason));
    }
    text
}
