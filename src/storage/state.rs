//! Persisted notification state

use std::path::PathBuf;
use tokio::sync::Mutex;

use super::{JsonFile, StorageResult};
use crate::models::NotificationState;

/// Owner of `state.json`
///
/// Mutations are read-modify-write under a lock, so `/setchat` and the
/// daily job cannot clobber each other's fields.
pub struct StateStore {
    file: JsonFile,
    default_target: String,
    lock: Mutex<()>,
}

impl StateStore {
    /// `default_target` fills an empty `targetChatId` on load
    pub fn new(path: impl Into<PathBuf>, default_target: impl Into<String>) -> Self {
        Self {
            file: JsonFile::new(path),
            default_target: default_target.into(),
            lock: Mutex::new(()),
        }
    }

    /// Current state; missing or unreadable files give the defaults
    pub async fn load(&self) -> NotificationState {
        let mut state: NotificationState = self.file.load_or_default().await;
        if state.target_chat_id.is_empty() {
            state.target_chat_id = self.default_target.clone();
        }
        state
    }

    /// Apply `change` and persist the result
    pub async fn update<F>(&self, change: F) -> StorageResult<NotificationState>
    where
        F: FnOnce(&mut NotificationState),
    {
        let _guard = self.lock.lock().await;
        let mut state = self.load().await;
        change(&mut state);
        self.file.save(&state).await?;
        Ok(state)
    }

    /// Store the chat that receives daily greetings
    pub async fn set_target_chat(&self, chat_id: &str) -> StorageResult<NotificationState> {
        let chat_id = chat_id.to_string();
        self.update(move |s| s.target_chat_id = chat_id).await
    }

    /// Record that today's notification went out
    pub async fn mark_sent(&self, date: &str) -> StorageResult<NotificationState> {
        let date = date.to_string();
        self.update(move |s| s.last_sent_date = date).await
    }
}
