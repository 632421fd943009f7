//! Validation utilities for CLI arguments and configuration values

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate an integer taken from a TOML table
pub fn validate_positive_toml(key: &str, value: &toml::Value) -> Result<usize, String> {
    match value {
        toml::Value::Integer(n) if *n > 0 => usize::try_from(*n)
            .map_err(|_| format!("'{}' is too large: {}", key, n)),
        toml::Value::Integer(n) => Err(format!("'{}' must be greater than 0, got {}", key, n)),
        other => Err(format!(
            "'{}' must be an integer, got {}",
            key,
            other.type_str()
        )),
    }
}

/// Validate a non-negative integer taken from a TOML table
pub fn validate_non_negative_toml(key: &str, value: &toml::Value) -> Result<u64, String> {
    match value {
        toml::Value::Integer(n) => {
            u64::try_from(*n).map_err(|_| format!("'{}' must not be negative, got {}", key, n))
        }
        other => Err(format!(
            "'{}' must be an integer, got {}",
            key,
            other.type_str()
        )),
    }
}

/// Log levels accepted on the command line and in the config file
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Validate a plain log level name
pub fn validate_log_level(value: &str) -> Result<&str, String> {
    if LOG_LEVELS.contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "'log-level' must be one of {}; got \"{}\"",
            LOG_LEVELS.join(", "),
            value
        ))
    }
}

/// The last index of a run must stay representable
pub fn validate_index_range(baseline: u64, items: usize) -> Result<(), String> {
    match baseline.checked_add(items as u64) {
        Some(_) => Ok(()),
        None => Err(format!(
            "Baseline {} plus {} items overflows the index range",
            baseline, items
        )),
    }
}
