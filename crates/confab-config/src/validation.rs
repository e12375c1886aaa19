//! Configuration validation.
//!
//! Checks numeric ranges and endpoint shape, collecting all problems
//! into a single `ConfigError`.

use crate::errors::ConfigError;
use crate::schema::ConfabConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ConfabConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.api.model.trim().is_empty() {
        errors.push("api.model must not be empty".into());
    }
    if let Some(base) = &config.api.api_base {
        if !base.starts_with("http://") && !base.starts_with("https://") {
            errors.push(format!("api.api_base must be an http(s) URL, got '{base}'"));
        }
    }
    validate_range_u64(&mut errors, "api.max_tokens", config.api.max_tokens as u64, 1, 1_000_000);
    validate_range_f64(&mut errors, "api.temperature", config.api.temperature, 0.0, 2.0);
    validate_range_u64(&mut errors, "api.timeout_secs", config.api.timeout_secs, 1, 3600);
    validate_range_u64(
        &mut errors,
        "chat.history_window",
        config.chat.history_window as u64,
        1,
        100,
    );
    if config.storage.key.trim().is_empty() {
        errors.push("storage.key must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range_u64(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} must be in {min}-{max}, got {value}"));
    }
}

fn validate_range_f64(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if !value.is_finite() || value < min || value > max {
        errors.push(format!("{name} must be in {min}-{max}, got {value}"));
    }
}
