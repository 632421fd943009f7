//! CLI TOML configuration tests

use clap::Parser;
use reorder::app::cli::args::*;
use reorder::app::cli::config::{ConfigError, DEFAULT_CAPACITY};
use std::io::Write;
use tempfile::NamedTempFile;
use toml::Table;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_toml_values_applied_to_unset_args() {
    let mut args = Args::default();
    let mut config = Table::new();
    config.insert("items".to_string(), toml::Value::Integer(250));
    config.insert("baseline".to_string(), toml::Value::Integer(10));
    config.insert("output".to_string(), toml::Value::String("json".to_string()));
    config.insert("log-format".to_string(), toml::Value::String("ext".to_string()));

    Args::apply_toml_values(&mut args, &config).unwrap();

    assert_eq!(args.items, Some(250));
    assert_eq!(args.baseline, Some(10));
    assert_eq!(args.output, Some(OutputFormat::Json));
    assert_eq!(args.log_format.as_deref(), Some("ext"));
}

#[test]
fn test_cli_overrides_toml() {
    let mut args = Args::try_parse_from(["reorder", "--capacity", "2", "--output", "text"]).unwrap();
    let config: Table = toml::from_str("capacity = 64\noutput = \"json\"\n").unwrap();

    Args::apply_toml_values(&mut args, &config).unwrap();

    assert_eq!(args.capacity, Some(2));
    assert_eq!(args.output, Some(OutputFormat::Text));
}

#[test]
fn test_toml_type_errors() {
    let mut args = Args::default();
    let config: Table = toml::from_str("workers = \"four\"").unwrap();
    let err = Args::apply_toml_values(&mut args, &config).unwrap_err();
    assert!(err.to_string().contains("must be an integer"));

    let config: Table = toml::from_str("baseline = -5").unwrap();
    assert!(Args::apply_toml_values(&mut args, &config).is_err());

    let config: Table = toml::from_str("log-format = \"xml\"").unwrap();
    assert!(Args::apply_toml_values(&mut args, &config).is_err());

    let config: Table = toml::from_str("log-level = \"loud\"").unwrap();
    let err = Args::apply_toml_values(&mut args, &config).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
    assert!(err.to_string().contains("log-level"));
    assert_eq!(args.log_level, None);
}

#[tokio::test]
async fn test_load_explicit_config_file() {
    let file = write_config("workers = 3\nitems = 40\nverbose = true\n");
    let mut args = Args::try_parse_from([
        "reorder",
        "--config-file",
        file.path().to_str().unwrap(),
    ])
    .unwrap();

    let loaded = args.load_config_file().await.unwrap();

    assert_eq!(loaded.as_deref(), Some(file.path()));
    assert_eq!(args.workers, Some(3));
    assert_eq!(args.items, Some(40));
    assert!(args.verbose);

    let config = args.pipeline_config().unwrap();
    assert_eq!(config.capacity, DEFAULT_CAPACITY);
}

#[tokio::test]
async fn test_missing_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let mut args = Args {
        config_file: Some(missing.clone()),
        ..Args::default()
    };

    let err = args.load_config_file().await.unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { ref path } if *path == missing));
}

#[tokio::test]
async fn test_malformed_config_file() {
    let file = write_config("workers = = 3");
    let mut args = Args {
        config_file: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let err = args.load_config_file().await.unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
