//! CLI Integration Test Modules

pub mod argument_parsing;
pub mod pipeline_run;
pub mod toml_config;
