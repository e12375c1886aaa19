//! Gemini API client configuration.

use std::time::Duration;

use crate::ChatError;

/// Gemini API client configuration.
///
/// Carries the endpoint and credential explicitly so no process-wide
/// state holds the key; construct one and hand it to [`super::GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL up to (and excluding) the model segment.
    pub api_base: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Overall per-request deadline, streaming reads included.
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub const DEFAULT_API_BASE: &'static str =
        "https://generativelanguage.googleapis.com/v1beta/models";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gemini-2.0-flash".to_string(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            timeout: Duration::from_secs(120),
        }
    }

    /// Create config from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, ChatError> {
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(ChatError::Api(
                "Gemini API not configured. Set GEMINI_API_KEY.".into(),
            )),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let config = GeminiConfig::new("secret-key");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn builder_overrides() {
        let config = GeminiConfig::new("k")
            .with_model("gemini-pro")
            .with_api_base("http://localhost:9090/v1beta/models")
            .with_max_tokens(512)
            .with_temperature(0.2)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.api_base, "http://localhost:9090/v1beta/models");
        assert_eq!(config.max_tokens, 512);
        assert!((config.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
