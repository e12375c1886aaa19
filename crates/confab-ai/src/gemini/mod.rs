//! Google Gemini API client.
//!
//! Implements [`crate::GenerativeClient`] over the
//! `streamGenerateContent` SSE endpoint.

mod api;
mod client;
mod config;

pub use client::GeminiClient;
pub use config::GeminiConfig;
