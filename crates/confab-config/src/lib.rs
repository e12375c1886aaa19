//! Confab configuration system.
//!
//! TOML-based configuration with serde defaults per section, so partial
//! configs work out of the box. A missing config file is created with a
//! commented default on first run.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! let config = confab_config::load_config().expect("failed to load config");
//! println!("{}", config.api.model);
//! ```

pub mod errors;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use errors::ConfigError;
pub use schema::{ApiConfig, ChatConfig, ConfabConfig, StorageConfig};
pub use toml_loader::{default_config_path, load_from_path};

/// Convenience function to load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creating a default
/// file if none exists, and validates the result.
pub fn load_config() -> Result<ConfabConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}
