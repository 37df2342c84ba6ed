//! In-Memory Memory Backend
//!
//! Information Hiding:
//! - HashMap storage structure hidden from users
//! - Thread-safe access via RwLock hidden behind async interface
//! - Answers the same wire protocol a remote memory API would
//! - Suitable for testing and ephemeral sessions

use super::protocol::{Action, MemoryRequest, WireMessage};
use super::TransportBackend;
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local backend keyed by session id
/// Data is lost when process terminates
#[derive(Clone)]
pub struct InMemoryBackend {
    sessions: Arc<RwLock<HashMap<String, Vec<WireMessage>>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransportBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "InMemoryBackend"
    }

    async fn dispatch(&self, request: &MemoryRequest) -> Result<Value, TransportError> {
        match request.action {
            Action::Get => {
                let sessions = self.sessions.read().await;
                let messages = sessions
                    .get(&request.session_id)
                    .cloned()
                    .unwrap_or_default();
                Ok(json!({ "messages": messages }))
            }
            Action::Add => {
                let message = request.message.clone().ok_or_else(|| {
                    TransportError::InvalidRequest("add request without a message".to_string())
                })?;
                let mut sessions = self.sessions.write().await;
                sessions
                    .entry(request.session_id.clone())
                    .or_default()
                    .push(message);
                Ok(Value::Null)
            }
            Action::Clear => {
                let mut sessions = self.sessions.write().await;
                sessions.remove(&request.session_id);
                Ok(Value::Null)
            }
        }
    }
}
