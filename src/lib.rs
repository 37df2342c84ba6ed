//! Memlink - Externally-backed windowed conversation memory
//!
//! This library keeps an agent's chat history in an external store (a remote
//! HTTP memory API or a delegated sub-workflow) and surfaces a fixed-size
//! trailing window of it to the orchestration layer. Storage is best-effort:
//! transport failures are logged and never break the calling agent.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod memory;
pub mod storage;
pub mod transport;
pub mod utils;

pub use api::{resolve_session_id, supply_memory, supply_workflow_memory};
pub use config::Settings;
pub use core::{Message, Role};
pub use error::{MemoryError, TransportError};
pub use memory::{Memory, WindowMemory, WindowOptions};
pub use storage::{ChatMessageHistory, SessionChatStore};
pub use transport::TransportBackend;
