//! Gemini API client struct and request building.

use crate::Message;

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { config, http }
    }

    pub(crate) fn stream_url(&self) -> String {
        format!(
            "{}/{}:streamGenerateContent?alt=sse",
            self.config.api_base, self.config.model
        )
    }

    /// Build the JSON request body: prior history followed by the current
    /// message as the final user turn.
    pub(crate) fn build_request_body(
        &self,
        message: &str,
        history: &[Message],
    ) -> serde_json::Value {
        let mut contents: Vec<serde_json::Value> = history
            .iter()
            .map(|msg| serde_json::json!({ "role": msg.role, "parts": msg.parts }))
            .collect();
        contents.push(serde_json::json!({
            "role": "user",
            "parts": [{ "text": message }]
        }));

        serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(GeminiConfig::new("k").with_model("gemini-2.0-flash"))
    }

    #[test]
    fn stream_url_targets_sse() {
        assert_eq!(
            client().stream_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn body_appends_message_after_history() {
        let history = vec![Message::user("Hi"), Message::model("Hello there!")];
        let body = client().build_request_body("How are you?", &history);

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "Hi");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "Hello there!");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "How are you?");
    }

    #[test]
    fn body_carries_generation_config() {
        let body = client().build_request_body("x", &[]);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 4096);
        assert!(
            (body["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn empty_history_sends_single_turn() {
        let body = client().build_request_body("Hi", &[]);
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["role"], "user");
    }
}
