//! Memory supply API
//!
//! Turns configuration into a ready-to-use `WindowMemory`:
//! backend → `SessionChatStore` → `WindowMemory`.
//!
//! # Example
//! ```no_run
//! use memlink::api::{supply_memory, BackendConfig, MemoryConfig};
//! use memlink::memory::Memory;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MemoryConfig::new(
//!         BackendConfig::Http {
//!             url: "https://example.com/webhook/memory".to_string(),
//!             api_key: None,
//!         },
//!         "session-42",
//!     );
//!
//!     let memory = supply_memory(&config)?;
//!     let variables = memory.load_memory_variables().await;
//!     println!("{}", variables["chat_history"]);
//!
//!     memory.save_turn("hi", "hello!").await;
//!     Ok(())
//! }
//! ```

use crate::error::MemoryError;
use crate::memory::{WindowMemory, WindowOptions};
use crate::storage::SessionChatStore;
use crate::transport::{
    HttpBackend, InMemoryBackend, TransportBackend, WorkflowBackend, WorkflowRunner,
};
use serde_json::Value;
use std::sync::Arc;

pub use crate::config::{BackendConfig, MemoryConfig};

/// Build the transport backend a configuration asks for
pub fn build_backend(config: &BackendConfig) -> Result<Arc<dyn TransportBackend>, MemoryError> {
    let backend: Arc<dyn TransportBackend> = match config {
        BackendConfig::Http { url, api_key } => {
            let parsed = reqwest::Url::parse(url).map_err(|e| {
                MemoryError::InvalidConfig(format!("invalid API URL '{}': {}", url, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(MemoryError::InvalidConfig(format!(
                    "API URL must be http(s), got '{}'",
                    url
                )));
            }
            Arc::new(HttpBackend::new(url.clone()).with_api_key(api_key.clone()))
        }
        BackendConfig::Workflow { target } => {
            if target.trim().is_empty() {
                return Err(MemoryError::InvalidConfig(
                    "workflow target is required".to_string(),
                ));
            }
            Arc::new(WorkflowBackend::process(target.clone()))
        }
        BackendConfig::Memory => Arc::new(InMemoryBackend::new()),
    };
    Ok(backend)
}

/// Window options carried by a memory configuration
pub fn window_options(config: &MemoryConfig) -> WindowOptions {
    WindowOptions::default()
        .with_context_window_length(config.context_window_length)
        .with_memory_key(config.memory_key.clone())
        .with_input_key(config.input_key.clone())
        .with_output_key(config.output_key.clone())
        .with_return_messages(config.return_messages)
}

/// Wrap any backend in a session store and a window memory
pub fn supply_with_backend(
    backend: Arc<dyn TransportBackend>,
    session_id: &str,
    options: WindowOptions,
) -> Result<WindowMemory, MemoryError> {
    if session_id.trim().is_empty() {
        return Err(MemoryError::InvalidConfig(
            "session id is required".to_string(),
        ));
    }

    tracing::info!(
        "[Memory] Creating memory for session '{}' via {} (window {})",
        session_id,
        backend.name(),
        options.window_size
    );

    let store = SessionChatStore::new(backend, session_id);
    Ok(WindowMemory::new(Arc::new(store), options))
}

/// Build the memory described by `config`
pub fn supply_memory(config: &MemoryConfig) -> Result<WindowMemory, MemoryError> {
    let backend = build_backend(&config.backend)?;
    supply_with_backend(backend, &config.session_id, window_options(config))
}

/// Memory stored through a host-provided workflow runner
pub fn supply_workflow_memory(
    runner: Arc<dyn WorkflowRunner>,
    target: impl Into<String>,
    session_id: &str,
    options: WindowOptions,
) -> Result<WindowMemory, MemoryError> {
    let target = target.into();
    if target.trim().is_empty() {
        return Err(MemoryError::InvalidConfig(
            "workflow target is required".to_string(),
        ));
    }
    supply_with_backend(
        Arc::new(WorkflowBackend::new(runner, target)),
        session_id,
        options,
    )
}

/// Explicit id wins; otherwise the `sessionId` field of the incoming item
pub fn resolve_session_id(explicit: Option<&str>, context: &Value) -> Option<String> {
    explicit
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
        .or_else(|| {
            context
                .get("sessionId")
                .and_then(Value::as_str)
                .filter(|id| !id.trim().is_empty())
                .map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Message;
    use crate::error::TransportError;
    use crate::transport::ExecutionResult;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoHistoryRunner;

    #[async_trait]
    impl WorkflowRunner for EchoHistoryRunner {
        async fn execute(
            &self,
            _target: &str,
            items: Vec<Value>,
        ) -> Result<ExecutionResult, TransportError> {
            let session = items[0]["sessionId"].as_str().unwrap_or_default().to_string();
            Ok(ExecutionResult::single(
                "Respond",
                vec![json!({"messages": [{"type": "human", "content": session}]})],
            ))
        }
    }

    #[test]
    fn test_build_backend_validates() {
        let bad_url = BackendConfig::Http {
            url: "not a url".to_string(),
            api_key: None,
        };
        assert!(matches!(
            build_backend(&bad_url),
            Err(MemoryError::InvalidConfig(_))
        ));

        let ftp = BackendConfig::Http {
            url: "ftp://example.com/memory".to_string(),
            api_key: None,
        };
        assert!(build_backend(&ftp).is_err());

        let empty_target = BackendConfig::Workflow {
            target: "  ".to_string(),
        };
        assert!(build_backend(&empty_target).is_err());

        let http = BackendConfig::Http {
            url: "https://example.com/memory".to_string(),
            api_key: Some("k".to_string()),
        };
        assert_eq!(build_backend(&http).unwrap().name(), "HttpBackend");
        assert_eq!(
            build_backend(&BackendConfig::Memory).unwrap().name(),
            "InMemoryBackend"
        );
    }

    #[test]
    fn test_session_id_is_required() {
        let config = MemoryConfig::new(BackendConfig::Memory, "");
        assert!(matches!(
            supply_memory(&config),
            Err(MemoryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_window_options_from_config() {
        let mut config = MemoryConfig::new(BackendConfig::Memory, "s1");
        config.context_window_length = -1;
        config.memory_key = "history".to_string();
        config.return_messages = false;

        let options = window_options(&config);
        assert_eq!(options.window_size, 0);
        assert_eq!(options.memory_key, "history");
        assert!(!options.return_messages);
    }

    #[tokio::test]
    async fn test_supply_in_memory() {
        let mut config = MemoryConfig::new(BackendConfig::Memory, "s1");
        config.context_window_length = 2;

        let memory = supply_memory(&config).unwrap();
        memory.save_turn("hi", "hello").await;
        memory.save_turn("how are you", "fine").await;

        assert_eq!(
            memory.window().await,
            vec![Message::human("how are you"), Message::ai("fine")]
        );
    }

    #[tokio::test]
    async fn test_supply_workflow_memory_with_host_runner() {
        let memory = supply_workflow_memory(
            Arc::new(EchoHistoryRunner),
            "wf-7",
            "s9",
            WindowOptions::default(),
        )
        .unwrap();

        assert_eq!(memory.window().await, vec![Message::human("s9")]);
    }

    #[test]
    fn test_resolve_session_id() {
        let context = json!({"sessionId": "from-context"});
        assert_eq!(
            resolve_session_id(Some("explicit"), &context),
            Some("explicit".to_string())
        );
        assert_eq!(
            resolve_session_id(Some(""), &context),
            Some("from-context".to_string())
        );
        assert_eq!(
            resolve_session_id(None, &context),
            Some("from-context".to_string())
        );
        assert_eq!(resolve_session_id(None, &json!({"sessionId": 3})), None);
        assert_eq!(resolve_session_id(None, &json!({})), None);
    }
}
