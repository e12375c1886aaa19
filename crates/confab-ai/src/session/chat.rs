//! Async submit methods for ConversationSession.

use futures_util::StreamExt;
use tracing::warn;

use crate::{ChatError, GenerativeClient};

use super::manager::ConversationSession;
use super::types::{notice_for, StreamGuard};

impl ConversationSession {
    /// Submit a user utterance and stream the model's reply into the log.
    ///
    /// Empty or whitespace-only input is a documented no-op, returning an
    /// empty reply. A call made while another reply is streaming is
    /// rejected with [`ChatError::Busy`] and leaves the log untouched.
    ///
    /// On transport failure the log is recovered in place (the partial
    /// reply stays, followed by a notice entry) and the error is returned
    /// for diagnostics.
    pub async fn submit(
        &self,
        client: &dyn GenerativeClient,
        text: &str,
    ) -> Result<String, ChatError> {
        self.submit_with(client, text, &|_| {}).await
    }

    /// Like [`Self::submit`], invoking `on_fragment` for every fragment
    /// applied to the log, so display layers can render partial replies
    /// as they arrive.
    pub async fn submit_with(
        &self,
        client: &dyn GenerativeClient,
        text: &str,
        on_fragment: &(dyn Fn(&str) + Sync),
    ) -> Result<String, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(String::new());
        }
        self.run_turn(client, text, text, on_fragment).await
    }

    /// Submit an uploaded file: the log records `Uploaded file: <name>`
    /// while the file's text content is sent as the actual prompt body.
    pub async fn submit_file(
        &self,
        client: &dyn GenerativeClient,
        name: &str,
        content: &str,
    ) -> Result<String, ChatError> {
        if content.trim().is_empty() {
            return Ok(String::new());
        }
        let label = format!("Uploaded file: {name}");
        self.run_turn(client, &label, content, &|_| {}).await
    }

    async fn run_turn(
        &self,
        client: &dyn GenerativeClient,
        log_text: &str,
        prompt: &str,
        on_fragment: &(dyn Fn(&str) + Sync),
    ) -> Result<String, ChatError> {
        let turn = self.begin_turn(log_text)?;
        let guard = StreamGuard::arm(self);

        let mut stream = match client.stream_reply(prompt, &turn.window).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("failed to open reply stream: {e}");
                self.fail_turn(turn.epoch, notice_for(&e));
                guard.disarm();
                return Err(e);
            }
        };

        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    if self.apply_fragment(turn.epoch, &fragment) {
                        on_fragment(&fragment);
                    }
                }
                Err(e) => {
                    warn!("reply stream failed: {e}");
                    self.fail_turn(turn.epoch, notice_for(&e));
                    guard.disarm();
                    return Err(e);
                }
            }
        }

        let reply = self.finish_turn(turn.epoch).unwrap_or_default();
        guard.disarm();
        Ok(reply)
    }
}
