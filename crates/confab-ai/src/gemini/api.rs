//! GenerativeClient trait implementation for GeminiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::streaming::fragment_stream;
use crate::{ChatError, GenerativeClient, Message, ReplyStream};

use super::client::GeminiClient;

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn stream_reply(
        &self,
        message: &str,
        history: &[Message],
    ) -> Result<ReplyStream, ChatError> {
        let body = self.build_request_body(message, history);
        let url = self.stream_url();

        debug!(model = %self.config.model, history = history.len(), "Gemini streaming request");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Timeout
                } else {
                    ChatError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ChatError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Api(format!("HTTP {status}: {text}")));
        }

        Ok(fragment_stream(response, |event| {
            extract_fragment(&event.data)
        }))
    }
}

/// Pull the text fragment out of one streamed response chunk.
///
/// Chunks that decode but carry no text (safety metadata, usage counts)
/// yield `Ok(None)`; they are not errors. Undecodable chunk data is a
/// malformed stream.
fn extract_fragment(data: &str) -> Result<Option<String>, ChatError> {
    let json: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| ChatError::Parse(format!("malformed stream chunk: {e}")))?;
    let candidates = match json["candidates"].as_array() {
        Some(candidates) => candidates,
        None => return Ok(None),
    };

    let mut fragment = String::new();
    for candidate in candidates {
        if let Some(parts) = candidate["content"]["parts"].as_array() {
            for part in parts {
                if let Some(text) = part["text"].as_str() {
                    fragment.push_str(text);
                }
            }
        }
    }

    if fragment.is_empty() {
        Ok(None)
    } else {
        Ok(Some(fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_from_chunk() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"Hello"}],"role":"model"}}]}"#;
        assert_eq!(extract_fragment(data).unwrap().as_deref(), Some("Hello"));
    }

    #[test]
    fn concatenates_multiple_parts() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#;
        assert_eq!(extract_fragment(data).unwrap().as_deref(), Some("Hello"));
    }

    #[test]
    fn textless_chunk_is_not_an_error() {
        let data = r#"{"candidates":[{"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":7}}"#;
        assert_eq!(extract_fragment(data).unwrap(), None);
        assert_eq!(extract_fragment("{}").unwrap(), None);
    }

    #[test]
    fn undecodable_chunk_is_a_parse_error() {
        let err = extract_fragment("not json").unwrap_err();
        assert!(matches!(err, ChatError::Parse(_)));
    }
}
