//! Conversation session management.
//!
//! A [`ConversationSession`] owns the ordered message log, opens a
//! streaming call per user submission, folds the streamed fragments into
//! an in-place placeholder reply, and persists the log after every
//! mutation. At most one reply streams at a time; submissions made
//! meanwhile are rejected, and a cleared conversation invalidates any
//! stream still in flight.

mod chat;
mod manager;
mod store;
mod types;


pub use manager::{ConversationSession, DEFAULT_HISTORY_WINDOW, DEFAULT_STORAGE_KEY};
pub use store::{FileStore, LogStore, MemoryStore, StoreError};
pub use types::{CONNECT_FAILURE_NOTICE, TIMEOUT_NOTICE};
