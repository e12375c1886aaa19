//! Session struct, log mutation, and history windowing.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::{ChatError, Message};

use super::store::LogStore;

/// Key under which the log is persisted (the original web client's
/// storage key, kept for blob compatibility).
pub const DEFAULT_STORAGE_KEY: &str = "messages";

/// Default number of prior messages sent as request context.
pub const DEFAULT_HISTORY_WINDOW: usize = 5;

struct LogState {
    log: Vec<Message>,
    /// True while a model reply is being streamed into the log.
    streaming: bool,
    /// Bumped by every turn and every clear; fragments stamped with an
    /// older epoch belong to an abandoned stream and are dropped.
    epoch: u64,
}

/// Owns the ordered message log, drives streamed replies into it, and
/// persists after every mutation.
///
/// All state sits behind an internal lock that is never held across an
/// await, so `clear()` can be issued from another task while a reply is
/// streaming.
pub struct ConversationSession {
    state: Mutex<LogState>,
    store: Box<dyn LogStore>,
    storage_key: String,
    history_window: usize,
}

impl ConversationSession {
    /// Create a session hydrated from `store`. Absent or unparsable
    /// data starts an empty log.
    pub fn initialize(store: Box<dyn LogStore>) -> Self {
        Self::with_options(store, DEFAULT_STORAGE_KEY, DEFAULT_HISTORY_WINDOW)
    }

    pub fn with_options(
        store: Box<dyn LogStore>,
        storage_key: impl Into<String>,
        history_window: usize,
    ) -> Self {
        let storage_key = storage_key.into();
        let log = match store.get(&storage_key) {
            Some(blob) => match serde_json::from_str::<Vec<Message>>(&blob) {
                Ok(log) => log,
                Err(e) => {
                    warn!("discarding unparsable conversation log: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!(messages = log.len(), "session initialized");

        Self {
            state: Mutex::new(LogState {
                log,
                streaming: false,
                epoch: 0,
            }),
            store,
            storage_key,
            history_window,
        }
    }

    /// Snapshot of the log, insertion order = display order.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().log.clone()
    }

    pub fn message_count(&self) -> usize {
        self.lock().log.len()
    }

    pub fn is_streaming(&self) -> bool {
        self.lock().streaming
    }

    /// Empty the log, persist the empty state, and invalidate any
    /// in-flight stream. Idempotent.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.log.clear();
        state.epoch += 1;
        self.persist(&state.log);
        debug!("conversation cleared");
    }

    /// Start a turn: append the user entry and the empty model
    /// placeholder (persisting after each), mark the session streaming,
    /// and capture the history window as it stood before this turn.
    pub(super) fn begin_turn(&self, text: &str) -> Result<Turn, ChatError> {
        let mut state = self.lock();
        if state.streaming {
            return Err(ChatError::Busy);
        }

        let start = state.log.len().saturating_sub(self.history_window);
        let window = state.log[start..].to_vec();

        state.log.push(Message::user(text));
        self.persist(&state.log);

        state.log.push(Message::model(""));
        state.streaming = true;
        state.epoch += 1;
        self.persist(&state.log);

        Ok(Turn {
            epoch: state.epoch,
            window,
        })
    }

    /// Append a fragment to the open placeholder and persist. Returns
    /// false when the turn has been superseded; stale fragments are
    /// dropped without touching the log.
    pub(super) fn apply_fragment(&self, epoch: u64, fragment: &str) -> bool {
        let mut state = self.lock();
        if state.epoch != epoch {
            debug!("dropping fragment for superseded stream");
            return false;
        }
        if let Some(last) = state.log.last_mut() {
            last.append_text(fragment);
        }
        self.persist(&state.log);
        true
    }

    /// Close a turn normally. Returns the accumulated reply, or `None`
    /// when the turn was superseded (the streaming flag is released
    /// either way).
    pub(super) fn finish_turn(&self, epoch: u64) -> Option<String> {
        let mut state = self.lock();
        state.streaming = false;
        if state.epoch != epoch {
            return None;
        }
        let reply = state.log.last().map(Message::text).unwrap_or_default();
        self.persist(&state.log);
        Some(reply)
    }

    /// Close a turn after a failure: keep whatever partial reply the
    /// placeholder holds and append `notice` as a separate model entry.
    /// A superseded turn leaves the log alone.
    pub(super) fn fail_turn(&self, epoch: u64, notice: &str) {
        let mut state = self.lock();
        state.streaming = false;
        if state.epoch != epoch {
            return;
        }
        state.log.push(Message::model(notice));
        self.persist(&state.log);
    }

    /// Used by the drop guard when a turn future is cancelled.
    pub(super) fn release_streaming(&self) {
        self.lock().streaming = false;
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Best-effort persistence; failures are logged and swallowed.
    fn persist(&self, log: &[Message]) {
        let blob = match serde_json::to_string(log) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("failed to serialize conversation log: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.storage_key, &blob) {
            warn!("failed to persist conversation log: {e}");
        }
    }
}

/// A begun turn: its epoch stamp and the history window captured for
/// the request. Exists only for the duration of one submit call.
pub(super) struct Turn {
    pub(super) epoch: u64,
    pub(super) window: Vec<Message>,
}
