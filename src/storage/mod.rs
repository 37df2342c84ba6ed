//! Session Chat Store
//!
//! Information Hiding:
//! - Which transport backs the session is hidden behind `TransportBackend`
//! - Transport failures are absorbed here: reads degrade to an empty history,
//!   writes and clears degrade to a no-op
//! - No caching: the backend is the source of truth

use crate::core::Message;
use crate::transport::TransportBackend;
use async_trait::async_trait;
use std::sync::Arc;

/// Message history of one conversation
///
/// Operations cannot fail from the caller's point of view; memory is best-effort.
#[async_trait]
pub trait ChatMessageHistory: Send + Sync {
    /// Full history, oldest first
    async fn get_messages(&self) -> Vec<Message>;

    async fn add_message(&self, message: Message);

    /// Appends one at a time, each awaited before the next, so the backend sees
    /// the caller's order. A failed append does not stop the rest.
    async fn add_messages(&self, messages: Vec<Message>) {
        for message in messages {
            self.add_message(message).await;
        }
    }

    async fn clear(&self);
}

/// History of a single session stored through a transport backend
pub struct SessionChatStore {
    backend: Arc<dyn TransportBackend>,
    session_id: String,
}

impl SessionChatStore {
    pub fn new(backend: Arc<dyn TransportBackend>, session_id: impl Into<String>) -> Self {
        Self {
            backend,
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[async_trait]
impl ChatMessageHistory for SessionChatStore {
    async fn get_messages(&self) -> Vec<Message> {
        tracing::debug!("[SessionChatStore] getMessages for session '{}'", self.session_id);
        match self.backend.fetch_all(&self.session_id).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!(
                    "[SessionChatStore] getMessages via {} failed for session '{}': {}",
                    self.backend.name(),
                    self.session_id,
                    e
                );
                Vec::new()
            }
        }
    }

    async fn add_message(&self, message: Message) {
        tracing::debug!("[SessionChatStore] addMessage for session '{}'", self.session_id);
        if let Err(e) = self.backend.append_one(&self.session_id, &message).await {
            tracing::error!(
                "[SessionChatStore] addMessage via {} failed for session '{}': {}",
                self.backend.name(),
                self.session_id,
                e
            );
        }
    }

    async fn clear(&self) {
        tracing::debug!("[SessionChatStore] clear for session '{}'", self.session_id);
        if let Err(e) = self.backend.clear_all(&self.session_id).await {
            tracing::error!(
                "[SessionChatStore] clear via {} failed for session '{}': {}",
                self.backend.name(),
                self.session_id,
                e
            );
        }
    }
}
