//! TOML config file loading and creation.

use std::path::Path;

use tracing::{info, warn};

use crate::errors::ConfigError;
use crate::schema::ConfabConfig;
use crate::validation;

/// Load config from a specific TOML file path.
///
/// Missing fields take serde defaults. If the loaded config fails
/// validation, a warning is logged and defaults are returned.
pub fn load_from_path(path: &Path) -> Result<ConfabConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: ConfabConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(ConfabConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// If the file does not exist, creates a default config file and
/// returns defaults.
pub fn load_default() -> Result<ConfabConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(ConfabConfig::default());
    }

    load_from_path(&path)
}

/// Platform-specific default config file path, e.g.
/// `~/.config/confab/config.toml` on Linux.
pub fn default_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("confab").join("config.toml"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

/// Generate the default TOML config content with comments.
fn default_config_toml() -> String {
    r##"# Confab configuration
# Only override what you want to change -- missing fields use defaults.
# The API key is read from the GEMINI_API_KEY environment variable,
# never from this file.

[api]
# model = "gemini-2.0-flash"
# api_base = "https://generativelanguage.googleapis.com/v1beta/models"
# max_tokens = 4096
# temperature = 0.7    # 0.0-2.0
# timeout_secs = 120   # 1-3600

[chat]
# history_window = 5   # prior messages sent as context (1-100)

[storage]
# dir = "/path/to/logs"  # default: platform data dir
# key = "messages"
# persist = true
"##
    .to_string()
}
