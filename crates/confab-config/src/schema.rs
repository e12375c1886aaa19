//! Configuration schema types for Confab.
//!
//! All structs use `serde(default)` so partial configs work correctly;
//! only override what you want to change.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for Confab.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfabConfig {
    pub api: ApiConfig,
    pub chat: ChatConfig,
    pub storage: StorageConfig,
}

/// Generation endpoint settings. The credential itself never lives in
/// the config file; it comes from the `GEMINI_API_KEY` environment
/// variable (or a `.env` file next to the binary).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub model: String,
    /// Endpoint base URL override; unset means the public Gemini API.
    pub api_base: Option<String>,
    /// Maximum tokens the model may generate per reply (valid: >= 1).
    pub max_tokens: u32,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Overall per-request deadline in seconds, streaming reads
    /// included (valid range: 1-3600).
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".into(),
            api_base: None,
            max_tokens: 4096,
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

/// Conversation behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// How many prior messages are sent as context with each request
    /// (valid range: 1-100).
    pub history_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { history_window: 5 }
    }
}

/// Conversation log persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the log file; unset means the platform data dir.
    pub dir: Option<PathBuf>,
    /// Key (file stem) the log is stored under.
    pub key: String,
    /// Disable to keep the conversation in memory only.
    pub persist: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: "messages".into(),
            persist: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ConfabConfig::default();
        assert_eq!(config.api.model, "gemini-2.0-flash");
        assert!(config.api.api_base.is_none());
        assert_eq!(config.api.max_tokens, 4096);
        assert!((config.api.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.api.timeout_secs, 120);
        assert_eq!(config.chat.history_window, 5);
        assert!(config.storage.dir.is_none());
        assert_eq!(config.storage.key, "messages");
        assert!(config.storage.persist);
    }

    #[test]
    fn partial_toml_fills_missing_sections() {
        let config: ConfabConfig = toml::from_str(
            r#"
[chat]
history_window = 12
"#,
        )
        .unwrap();
        assert_eq!(config.chat.history_window, 12);
        assert_eq!(config.api.model, "gemini-2.0-flash");
        assert_eq!(config.storage.key, "messages");
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: ConfabConfig = toml::from_str("").unwrap();
        assert_eq!(config.chat.history_window, 5);
    }
}
