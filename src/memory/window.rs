//! Windowed Memory Adapter
//!
//! Information Hiding:
//! - Truncation happens at read time only; the backend keeps the full history
//! - Prompt variable shape (message list or flat buffer) hidden behind `Memory`
//! - Input/output key resolution for a turn hidden from the orchestration layer

use super::{Memory, MemoryVariables};
use crate::core::{buffer_string, Message};
use crate::error::MemoryError;
use crate::storage::ChatMessageHistory;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_WINDOW_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct WindowOptions {
    /// Number of trailing messages surfaced; 0 surfaces nothing
    pub window_size: usize,
    pub memory_key: String,
    pub input_key: String,
    pub output_key: String,
    /// Message list when true, flat `Human: ..\nAI: ..` string when false
    pub return_messages: bool,
    pub human_prefix: String,
    pub ai_prefix: String,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            memory_key: "chat_history".to_string(),
            input_key: "input".to_string(),
            output_key: "output".to_string(),
            return_messages: true,
            human_prefix: "Human".to_string(),
            ai_prefix: "AI".to_string(),
        }
    }
}

impl WindowOptions {
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Negative lengths surface no history
    pub fn with_context_window_length(self, length: i64) -> Self {
        self.with_window_size(length.max(0) as usize)
    }

    pub fn with_memory_key(mut self, key: impl Into<String>) -> Self {
        self.memory_key = key.into();
        self
    }

    pub fn with_input_key(mut self, key: impl Into<String>) -> Self {
        self.input_key = key.into();
        self
    }

    pub fn with_output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = key.into();
        self
    }

    pub fn with_return_messages(mut self, return_messages: bool) -> Self {
        self.return_messages = return_messages;
        self
    }
}

/// Last `k` messages of `messages`, order preserved
pub fn trailing_window(mut messages: Vec<Message>, k: usize) -> Vec<Message> {
    let start = messages.len().saturating_sub(k);
    messages.split_off(start)
}

/// Surfaces a fixed-size trailing window of a session's history
pub struct WindowMemory {
    history: Arc<dyn ChatMessageHistory>,
    options: WindowOptions,
}

impl WindowMemory {
    pub fn new(history: Arc<dyn ChatMessageHistory>, options: WindowOptions) -> Self {
        Self { history, options }
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub fn chat_history(&self) -> Arc<dyn ChatMessageHistory> {
        Arc::clone(&self.history)
    }

    /// Re-fetches the history and keeps its tail
    pub async fn window(&self) -> Vec<Message> {
        let messages = self.history.get_messages().await;
        let total = messages.len();
        let window = trailing_window(messages, self.options.window_size);
        tracing::debug!(
            "[WindowMemory] Surfacing {} of {} messages",
            window.len(),
            total
        );
        window
    }

    /// Commit a human input and the AI output, in that order
    pub async fn save_turn(&self, input: impl Into<String>, output: impl Into<String>) {
        self.history
            .add_messages(vec![Message::human(input), Message::ai(output)])
            .await;
    }
}

/// Value under `key`, or the only value when the key is absent
fn turn_value(values: &HashMap<String, Value>, key: &str) -> Result<String, MemoryError> {
    let value = match values.get(key) {
        Some(v) => v,
        None if values.len() == 1 => values.values().next().unwrap_or(&Value::Null),
        None => return Err(MemoryError::MissingKey(key.to_string())),
    };

    Ok(match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[async_trait]
impl Memory for WindowMemory {
    fn memory_keys(&self) -> Vec<String> {
        vec![self.options.memory_key.clone()]
    }

    async fn load_memory_variables(&self) -> MemoryVariables {
        let window = self.window().await;

        let value = if self.options.return_messages {
            serde_json::to_value(&window).unwrap_or_else(|_| Value::Array(Vec::new()))
        } else {
            Value::String(buffer_string(
                &window,
                &self.options.human_prefix,
                &self.options.ai_prefix,
            ))
        };

        let mut variables = MemoryVariables::new();
        variables.insert(self.options.memory_key.clone(), value);
        variables
    }

    async fn save_context(
        &self,
        inputs: &HashMap<String, Value>,
        outputs: &HashMap<String, Value>,
    ) -> Result<(), MemoryError> {
        let input = turn_value(inputs, &self.options.input_key)?;
        let output = turn_value(outputs, &self.options.output_key)?;
        self.save_turn(input, output).await;
        Ok(())
    }

    async fn clear(&self) {
        self.history.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SessionChatStore;
    use crate::transport::InMemoryBackend;
    use serde_json::json;

    fn memory(options: WindowOptions) -> WindowMemory {
        let store = SessionChatStore::new(Arc::new(InMemoryBackend::new()), "s1");
        WindowMemory::new(Arc::new(store), options)
    }

    fn conversation() -> Vec<Message> {
        vec![
            Message::human("hi"),
            Message::ai("hello"),
            Message::human("how are you"),
            Message::ai("fine"),
        ]
    }

    #[test]
    fn test_trailing_window() {
        for n in 0..6 {
            let history: Vec<Message> = (0..n).map(|i| Message::human(i.to_string())).collect();
            for k in 0..7 {
                let window = trailing_window(history.clone(), k);
                assert_eq!(window.len(), k.min(n));
                assert_eq!(window[..], history[n - k.min(n)..]);
            }
        }
    }

    #[test]
    fn test_negative_window_length_clamps_to_zero() {
        assert_eq!(WindowOptions::default().with_context_window_length(-3).window_size, 0);
        assert_eq!(WindowOptions::default().with_context_window_length(4).window_size, 4);
        assert_eq!(WindowOptions::default().window_size, 10);
    }

    #[tokio::test]
    async fn test_window_of_two() {
        let memory = memory(WindowOptions::default().with_window_size(2));
        memory.chat_history().add_messages(conversation()).await;

        assert_eq!(memory.chat_history().get_messages().await, conversation());
        assert_eq!(
            memory.window().await,
            vec![Message::human("how are you"), Message::ai("fine")]
        );
    }

    #[tokio::test]
    async fn test_zero_window_surfaces_nothing() {
        let memory = memory(WindowOptions::default().with_window_size(0));
        memory.chat_history().add_messages(conversation()).await;

        assert!(memory.window().await.is_empty());
        assert_eq!(memory.chat_history().get_messages().await.len(), 4);
    }

    #[tokio::test]
    async fn test_load_memory_variables_as_messages() {
        let memory = memory(WindowOptions::default().with_window_size(3));
        memory.chat_history().add_messages(conversation()).await;

        let variables = memory.load_memory_variables().await;
        assert_eq!(memory.memory_keys(), vec!["chat_history".to_string()]);
        assert_eq!(
            variables["chat_history"],
            json!([
                {"role": "ai", "content": "hello"},
                {"role": "human", "content": "how are you"},
                {"role": "ai", "content": "fine"}
            ])
        );
    }

    #[tokio::test]
    async fn test_load_memory_variables_as_buffer() {
        let memory = memory(
            WindowOptions::default()
                .with_window_size(2)
                .with_memory_key("history")
                .with_return_messages(false),
        );
        memory.chat_history().add_messages(conversation()).await;

        let variables = memory.load_memory_variables().await;
        assert_eq!(variables["history"], json!("Human: how are you\nAI: fine"));
    }

    #[tokio::test]
    async fn test_save_context_appends_human_then_ai() {
        let memory = memory(WindowOptions::default());
        let inputs = HashMap::from([
            ("input".to_string(), json!("what is 2+2?")),
            ("extra".to_string(), json!(true)),
        ]);
        let outputs = HashMap::from([("output".to_string(), json!("4"))]);

        memory.save_context(&inputs, &outputs).await.unwrap();

        assert_eq!(
            memory.window().await,
            vec![Message::human("what is 2+2?"), Message::ai("4")]
        );
    }

    #[tokio::test]
    async fn test_save_context_key_resolution() {
        let memory = memory(WindowOptions::default());

        // single entry is used even under another key; non-strings become JSON text
        let inputs = HashMap::from([("question".to_string(), json!("hi"))]);
        let outputs = HashMap::from([("answer".to_string(), json!({"text": "yo"}))]);
        memory.save_context(&inputs, &outputs).await.unwrap();
        assert_eq!(
            memory.window().await,
            vec![Message::human("hi"), Message::ai(r#"{"text":"yo"}"#)]
        );

        let ambiguous = HashMap::from([
            ("a".to_string(), json!("1")),
            ("b".to_string(), json!("2")),
        ]);
        let err = memory.save_context(&ambiguous, &outputs).await.unwrap_err();
        assert!(matches!(err, MemoryError::MissingKey(ref k) if k == "input"));
        assert_eq!(memory.window().await.len(), 2);
    }

    #[tokio::test]
    async fn test_clear() {
        let memory = memory(WindowOptions::default());
        memory.save_turn("hi", "hello").await;
        memory.clear().await;
        assert!(memory.window().await.is_empty());
    }
}
