//! Transport Backends
//!
//! Information Hiding:
//! - How a request reaches the external store (HTTP call, sub-workflow run) is hidden
//!   behind `TransportBackend::dispatch`
//! - Message mapping between `Message` and the wire format lives in one place
//! - Callers never learn which transport is in effect

use crate::core::Message;
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;

pub mod http;
pub mod memory;
pub mod protocol;
pub mod workflow;

pub use http::HttpBackend;
pub use memory::InMemoryBackend;
pub use protocol::{Action, MemoryRequest, MemoryResponse, WireMessage};
pub use workflow::{ExecutionResult, ProcessRunner, StepRun, WorkflowBackend, WorkflowRunner};

/// Raw storage operations against an external system
///
/// Implementations only need `dispatch`; the three operations are built on it so
/// every backend maps messages identically.
#[async_trait]
pub trait TransportBackend: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Deliver one request and return the raw response record
    /// (`Value::Null` when there is nothing to read)
    async fn dispatch(&self, request: &MemoryRequest) -> Result<Value, TransportError>;

    /// Fetch the whole history of a session, oldest first
    async fn fetch_all(&self, session_id: &str) -> Result<Vec<Message>, TransportError> {
        let raw = self.dispatch(&MemoryRequest::get(session_id)).await?;
        let messages = MemoryResponse::from_value(raw)?.into_messages();
        tracing::debug!(
            "[{}] Got {} messages for session '{}'",
            self.name(),
            messages.len(),
            session_id
        );
        Ok(messages)
    }

    /// Append a single message to a session
    async fn append_one(&self, session_id: &str, message: &Message) -> Result<(), TransportError> {
        self.dispatch(&MemoryRequest::add(session_id, message))
            .await?;
        tracing::debug!("[{}] Message added for session '{}'", self.name(), session_id);
        Ok(())
    }

    /// Remove every message of a session
    async fn clear_all(&self, session_id: &str) -> Result<(), TransportError> {
        self.dispatch(&MemoryRequest::clear(session_id)).await?;
        tracing::debug!("[{}] Cleared session '{}'", self.name(), session_id);
        Ok(())
    }
}
