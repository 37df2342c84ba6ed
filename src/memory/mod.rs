//! Memory consumed by an orchestration layer
//!
//! A memory exposes named variables (e.g. `chat_history`) to put in front of the
//! LLM, and takes each finished turn back to commit it.

use crate::error::MemoryError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

pub mod window;

pub use window::{trailing_window, WindowMemory, WindowOptions, DEFAULT_WINDOW_SIZE};

/// Variables handed to the LLM prompt, keyed by memory key
pub type MemoryVariables = HashMap<String, Value>;

#[async_trait]
pub trait Memory: Send + Sync {
    /// Keys this memory fills in `load_memory_variables`
    fn memory_keys(&self) -> Vec<String>;

    async fn load_memory_variables(&self) -> MemoryVariables;

    /// Commit a finished turn
    async fn save_context(
        &self,
        inputs: &HashMap<String, Value>,
        outputs: &HashMap<String, Value>,
    ) -> Result<(), MemoryError>;

    async fn clear(&self);
}
