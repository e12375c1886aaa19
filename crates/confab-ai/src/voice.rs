//! Speech-capture event interface.
//!
//! Capture pipelines (platform speech APIs, transcription services) are
//! external to this crate; they publish [`TranscriptUpdate`]s into a
//! [`TranscriptFeed`], and input surfaces fold them with a
//! [`TranscriptAccumulator`]. Only committed (final) text is ever
//! submitted to a session; interim guesses are a display concern.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// One incremental transcription result from a capture pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptUpdate {
    pub text: String,
    /// Final results are committed; non-final results are interim
    /// guesses that later updates replace.
    pub is_final: bool,
}

impl TranscriptUpdate {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn committed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Fan-out point between a capture pipeline and any number of
/// listeners. Dropping a receiver unsubscribes it.
pub struct TranscriptFeed {
    sender: broadcast::Sender<TranscriptUpdate>,
}

impl TranscriptFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TranscriptUpdate> {
        self.sender.subscribe()
    }

    /// Publish an update; returns how many subscribers received it.
    pub fn publish(&self, update: TranscriptUpdate) -> usize {
        self.sender.send(update).unwrap_or(0)
    }
}

impl Default for TranscriptFeed {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Folds a stream of transcript updates into dictated input.
///
/// Committed text grows monotonically; each interim update replaces the
/// previous guess. [`Self::take_committed`] drains the committed text
/// for submission and resets the accumulator for the next utterance.
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    committed: String,
    interim: String,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, update: &TranscriptUpdate) {
        if update.is_final {
            self.committed.push_str(&update.text);
            self.interim.clear();
        } else {
            self.interim = update.text.clone();
        }
    }

    /// Committed text plus the current interim guess, for display while
    /// dictation is in progress.
    pub fn display_text(&self) -> String {
        format!("{}{}", self.committed, self.interim)
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// Drain the committed transcript for submission.
    pub fn take_committed(&mut self) -> String {
        self.interim.clear();
        std::mem::take(&mut self.committed)
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.interim.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interim_updates_replace_each_other() {
        let mut acc = TranscriptAccumulator::new();
        acc.apply(&TranscriptUpdate::interim("hel"));
        acc.apply(&TranscriptUpdate::interim("hello wor"));
        assert_eq!(acc.display_text(), "hello wor");
        assert_eq!(acc.committed(), "");
    }

    #[test]
    fn committed_text_grows_monotonically() {
        let mut acc = TranscriptAccumulator::new();
        acc.apply(&TranscriptUpdate::committed("hello "));
        acc.apply(&TranscriptUpdate::interim("wor"));
        acc.apply(&TranscriptUpdate::committed("world"));
        assert_eq!(acc.committed(), "hello world");
        assert_eq!(acc.display_text(), "hello world");
    }

    #[test]
    fn display_combines_committed_and_interim() {
        let mut acc = TranscriptAccumulator::new();
        acc.apply(&TranscriptUpdate::committed("hello "));
        acc.apply(&TranscriptUpdate::interim("there"));
        assert_eq!(acc.display_text(), "hello there");
    }

    #[test]
    fn take_committed_drains_and_resets() {
        let mut acc = TranscriptAccumulator::new();
        acc.apply(&TranscriptUpdate::committed("send this"));
        acc.apply(&TranscriptUpdate::interim("not this"));

        assert_eq!(acc.take_committed(), "send this");
        assert!(acc.is_empty());

        // The next utterance starts clean
        acc.apply(&TranscriptUpdate::committed("fresh"));
        assert_eq!(acc.committed(), "fresh");
    }

    #[tokio::test]
    async fn feed_delivers_to_subscribers() {
        let feed = TranscriptFeed::new(8);
        let mut rx = feed.subscribe();

        let delivered = feed.publish(TranscriptUpdate::committed("hi"));
        assert_eq!(delivered, 1);

        let update = rx.recv().await.unwrap();
        assert!(update.is_final);
        assert_eq!(update.text, "hi");
    }

    #[tokio::test]
    async fn dropped_receiver_unsubscribes() {
        let feed = TranscriptFeed::new(8);
        let rx = feed.subscribe();
        drop(rx);
        assert_eq!(feed.publish(TranscriptUpdate::interim("x")), 0);
    }
}
