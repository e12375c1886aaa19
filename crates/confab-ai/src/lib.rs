//! Conversation engine for Confab.
//!
//! Provides the streaming chat core:
//! - Gemini API client with SSE streaming
//! - Conversation session management with persistence
//! - History windowing for request context
//! - Transcript (voice input) event interface

pub mod gemini;
pub mod session;
pub mod streaming;
pub mod voice;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

pub use gemini::{GeminiClient, GeminiConfig};
pub use session::{
    ConversationSession, FileStore, LogStore, MemoryStore, CONNECT_FAILURE_NOTICE, TIMEOUT_NOTICE,
};
pub use voice::{TranscriptAccumulator, TranscriptFeed, TranscriptUpdate};

/// A lazy, finite sequence of reply text fragments.
///
/// Fragments are UTF-8 text, concatenation-order-significant; fragment
/// boundaries carry no semantic meaning. The stream ends on normal
/// completion or after yielding a single `Err` item.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>;

/// A remote text-generation endpoint that answers one message at a time,
/// seeded with a window of prior conversation.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Open a streaming reply for `message`. `history` is the prior
    /// conversation context; the current message travels separately.
    async fn stream_reply(
        &self,
        message: &str,
        history: &[Message],
    ) -> Result<ReplyStream, ChatError>;
}

/// One entry in a conversation log.
///
/// The wire and storage shape (`{role, parts: [{text}]}`) matches the
/// Gemini content format, so logs serialize directly into request bodies.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One content segment of a message. Kept as a sequence for forward
/// compatibility with multi-segment content (text + attachments).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Part {
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// Full text of the message, all parts concatenated.
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }

    /// Append a streamed fragment to the first part, in arrival order.
    pub(crate) fn append_text(&mut self, fragment: &str) {
        match self.parts.first_mut() {
            Some(part) => part.text.push_str(fragment),
            None => self.parts.push(Part {
                text: fragment.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("API error: {0}")]
    Api(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("rate limited")]
    RateLimited,
    #[error("request timed out")]
    Timeout,
    #[error("a reply is already streaming")]
    Busy,
}
