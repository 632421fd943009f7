//! Command-line arguments for the reorder demo
//!
//! Every tunable is optional here so that values from the configuration
//! file can fill whatever the command line leaves unset.

use crate::core::logging::LogFormat;
use crate::core::validation::{validate_positive_int, LOG_LEVELS};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "reorder")]
#[command(about = "Run parallel out-of-order work and deliver the results in order")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Args {
    /// Number of concurrent workers
    #[arg(short = 'w', long = "workers", value_name = "COUNT", value_parser = validate_positive_int)]
    pub workers: Option<usize>,

    /// Number of items to process
    #[arg(short = 'n', long = "items", value_name = "COUNT", value_parser = validate_positive_int)]
    pub items: Option<usize>,

    /// Reorder window size (items buffered ahead of the consumer)
    #[arg(short = 'c', long = "capacity", value_name = "COUNT", value_parser = validate_positive_int)]
    pub capacity: Option<usize>,

    /// Index already consumed before the run starts
    #[arg(short = 'b', long = "baseline", value_name = "INDEX")]
    pub baseline: Option<u64>,

    /// Upper bound of the simulated per-item work time
    #[arg(short = 'd', long = "max-delay-ms", value_name = "MILLIS")]
    pub max_delay_ms: Option<u64>,

    /// Configuration file path
    #[arg(long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Print each item as it is delivered
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Report format
    #[arg(short = 'o', long = "output", value_enum)]
    pub output: Option<OutputFormat>,

    /// Force colored output
    #[arg(long = "color", conflicts_with = "no_color", action = ArgAction::SetTrue)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = LOG_LEVELS)]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,
}

impl Args {
    /// Parsed log format, `text` when unset
    pub fn log_format(&self) -> LogFormat {
        self.log_format
            .as_deref()
            .and_then(|f| f.parse().ok())
            .unwrap_or_default()
    }

    /// Log file unless disabled with `none` or `-`
    pub fn log_file(&self) -> Option<&std::path::Path> {
        match self.log_file.as_deref() {
            Some(path) if path.as_os_str() == "none" || path.as_os_str() == "-" => None,
            other => other,
        }
    }

    /// Whether to color output: explicit flags win, otherwise only on a terminal
    pub fn use_color(&self) -> bool {
        use std::io::IsTerminal;

        if self.no_color {
            false
        } else if self.color {
            true
        } else {
            std::io::stdout().is_terminal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_everything_unset() {
        let args = Args::try_parse_from(["reorder"]).unwrap();

        assert_eq!(args.workers, None);
        assert_eq!(args.capacity, None);
        assert_eq!(args.output, None);
        assert_eq!(args.log_format(), LogFormat::Text);
        assert!(!args.verbose);
    }

    #[test]
    fn test_zero_capacity_rejected_at_parse_time() {
        let result = Args::try_parse_from(["reorder", "--capacity", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_color_flags_conflict() {
        assert!(Args::try_parse_from(["reorder", "--color", "--no-color"]).is_err());

        let args = Args::try_parse_from(["reorder", "--no-color"]).unwrap();
        assert!(!args.use_color());
    }

    #[test]
    fn test_log_file_none_disables_file_logging() {
        let args = Args::try_parse_from(["reorder", "--log-file", "none"]).unwrap();
        assert!(args.log_file().is_none());

        let args = Args::try_parse_from(["reorder", "--log-file", "run.log"]).unwrap();
        assert_eq!(args.log_file(), Some(std::path::Path::new("run.log")));
    }
}
