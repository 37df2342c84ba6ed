//! Error types
//!
//! `TransportError` never leaves the storage layer: `SessionChatStore` absorbs it.
//! `MemoryError` covers caller mistakes (bad configuration, missing turn keys).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Process exited with code {code:?}: {stderr}")]
    ProcessFailed { code: Option<i32>, stderr: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Workflow error: {0}")]
    Workflow(String),
}

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid memory configuration: {0}")]
    InvalidConfig(String),

    #[error("Key '{0}' not found in turn values")]
    MissingKey(String),
}
