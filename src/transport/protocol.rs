//! Memory wire protocol
//!
//! One request shape (`action`, `sessionId`, optional `message`) is shared by every
//! backend: it is the HTTP body and the sub-workflow input record alike.

use crate::core::{Message, Role};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Get,
    Add,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

/// Missing and `null` fields both read as `""`
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            kind: message.role.as_wire().to_string(),
            content: message.content.clone(),
        }
    }
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Message::new(Role::from_wire(&wire.kind), wire.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRequest {
    pub action: Action,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<WireMessage>,
}

impl MemoryRequest {
    pub fn get(session_id: &str) -> Self {
        Self {
            action: Action::Get,
            session_id: session_id.to_string(),
            message: None,
        }
    }

    pub fn add(session_id: &str, message: &Message) -> Self {
        Self {
            action: Action::Add,
            session_id: session_id.to_string(),
            message: Some(message.into()),
        }
    }

    pub fn clear(session_id: &str) -> Self {
        Self {
            action: Action::Clear,
            session_id: session_id.to_string(),
            message: None,
        }
    }
}

/// Response to a `get`. A missing or null `messages` field means no history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryResponse {
    #[serde(default)]
    pub messages: Option<Vec<WireMessage>>,
}

impl MemoryResponse {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
            .unwrap_or_default()
            .into_iter()
            .map(Message::from)
            .collect()
    }
}
