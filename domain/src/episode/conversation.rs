//! Conversation records exchanged with the model.

use serde::{Deserialize, Serialize};

/// Speaker of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Annotation attached to a turn record describing what produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnTag {
    TaskPrompt,
    ModelResponse,
    SearchResults,
    ToolInfo,
    ToolResults,
    FormatFeedback,
    Continuation,
}

/// One entry of the episode's conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub role: Role,
    pub content: String,
    /// Turn index (1-based); 0 for the opening task prompt
    pub turn: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TurnTag>,
}

impl TurnRecord {
    pub fn new(role: Role, content: impl Into<String>, turn: usize) -> Self {
        Self {
            role,
            content: content.into(),
            turn,
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: TurnTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn has_tag(&self, tag: TurnTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn to_message(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}
