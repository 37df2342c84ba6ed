use serde::{Deserialize, Serialize};

/// Who produced a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
}

impl Role {
    /// Tag used on the wire (`"human"` or `"ai"`)
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::Human => "human",
            Role::Ai => "ai",
        }
    }

    /// Anything that is not exactly `"human"` is treated as an AI message
    pub fn from_wire(tag: &str) -> Self {
        if tag == "human" {
            Role::Human
        } else {
            Role::Ai
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Role::Human, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(Role::Ai, content)
    }
}

/// Render messages as `"<prefix>: <content>"` lines
pub fn buffer_string(messages: &[Message], human_prefix: &str, ai_prefix: &str) -> String {
    messages
        .iter()
        .map(|m| {
            let prefix = match m.role {
                Role::Human => human_prefix,
                Role::Ai => ai_prefix,
            };
            format!("{}: {}", prefix, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_wire() {
        assert_eq!(Role::from_wire("human"), Role::Human);
        assert_eq!(Role::from_wire("ai"), Role::Ai);
        assert_eq!(Role::from_wire("system"), Role::Ai);
        assert_eq!(Role::from_wire("Human"), Role::Ai);
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let value = serde_json::to_value(Message::human("hi")).unwrap();
        assert_eq!(value["role"], "human");
        assert_eq!(value["content"], "hi");
    }

    #[test]
    fn test_buffer_string() {
        let messages = vec![Message::human("hi"), Message::ai("hello")];
        assert_eq!(buffer_string(&messages, "Human", "AI"), "Human: hi\nAI: hello");
        assert_eq!(buffer_string(&[], "Human", "AI"), "");
    }
}
