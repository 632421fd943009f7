//! CLI argument parsing tests

use clap::Parser;
use reorder::app::cli::args::*;
use reorder::core::logging::LogFormat;
use std::path::PathBuf;

#[test]
fn test_all_pipeline_options() {
    let args = Args::try_parse_from([
        "reorder",
        "--workers",
        "6",
        "--items",
        "500",
        "--capacity",
        "12",
        "--baseline",
        "99",
        "--max-delay-ms",
        "0",
    ])
    .unwrap();

    assert_eq!(args.workers, Some(6));
    assert_eq!(args.items, Some(500));
    assert_eq!(args.capacity, Some(12));
    assert_eq!(args.baseline, Some(99));
    assert_eq!(args.max_delay_ms, Some(0));
}

#[test]
fn test_short_flags() {
    let args =
        Args::try_parse_from(["reorder", "-w", "2", "-n", "10", "-c", "3", "-v", "-o", "json"])
            .unwrap();

    assert_eq!(args.workers, Some(2));
    assert_eq!(args.items, Some(10));
    assert_eq!(args.capacity, Some(3));
    assert!(args.verbose);
    assert_eq!(args.output, Some(OutputFormat::Json));
}

#[test]
fn test_zero_or_negative_counts_rejected() {
    for flag in ["--workers", "--items", "--capacity"] {
        assert!(
            Args::try_parse_from(["reorder", flag, "0"]).is_err(),
            "{} 0 should be rejected",
            flag
        );
        assert!(Args::try_parse_from(["reorder", flag, "-3"]).is_err());
    }
}

#[test]
fn test_negative_baseline_rejected() {
    assert!(Args::try_parse_from(["reorder", "--baseline", "-1"]).is_err());
}

#[test]
fn test_logging_options() {
    let args = Args::try_parse_from([
        "reorder",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--log-file",
        "/tmp/reorder.log",
    ])
    .unwrap();

    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format(), LogFormat::Json);
    assert_eq!(args.log_file, Some(PathBuf::from("/tmp/reorder.log")));
}

#[test]
fn test_invalid_log_values_rejected() {
    assert!(Args::try_parse_from(["reorder", "--log-level", "loud"]).is_err());
    assert!(Args::try_parse_from(["reorder", "--log-format", "xml"]).is_err());
    assert!(Args::try_parse_from(["reorder", "--output", "yaml"]).is_err());
}

#[test]
fn test_config_file_option() {
    let args = Args::try_parse_from(["reorder", "--config-file", "custom.toml"]).unwrap();
    assert_eq!(args.config_file, Some(PathBuf::from("custom.toml")));
}
