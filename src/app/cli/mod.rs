//! Command-line interface: argument parsing and configuration files

pub mod args;
pub mod config;

pub use args::{Args, OutputFormat};
pub use config::ConfigError;
