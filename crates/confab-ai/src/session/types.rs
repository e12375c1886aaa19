//! Session notices and the streaming-state drop guard.

use crate::ChatError;

use super::manager::ConversationSession;

/// Notice appended to the log when the remote call fails.
pub const CONNECT_FAILURE_NOTICE: &str =
    "I'm having trouble connecting to the server. Please try again later.";

/// Notice appended when the remote call exceeds its deadline.
pub const TIMEOUT_NOTICE: &str = "The server took too long to respond. Please try again.";

/// Pick the user-facing notice for a failed turn.
pub(super) fn notice_for(error: &ChatError) -> &'static str {
    match error {
        ChatError::Timeout => TIMEOUT_NOTICE,
        _ => CONNECT_FAILURE_NOTICE,
    }
}

/// Releases the session's streaming flag when a turn ends, including
/// when the submit future is cancelled mid-stream. Without this a
/// dropped turn would leave the session rejecting submissions forever.
pub(super) struct StreamGuard<'a> {
    session: &'a ConversationSession,
    armed: bool,
}

impl<'a> StreamGuard<'a> {
    pub(super) fn arm(session: &'a ConversationSession) -> Self {
        Self {
            session,
            armed: true,
        }
    }

    /// The turn reached an orderly end; the flag was already released.
    pub(super) fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for StreamGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.release_streaming();
        }
    }
}
