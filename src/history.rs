//! Conversation history for multi-turn dialogue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Capitalised label used when rendering history.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only, ordered message log. Never pruned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        let content = content.into();
        debug!("Added to history: {} ({} chars)", role, content.len());
        self.messages.push(Message {
            role,
            content,
            created_at: Utc::now(),
        });
    }

    /// `"{Role}: {content}"` lines in append order, joined by newlines.
    pub fn render_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.label(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_history() {
        let mut history = ConversationHistory::new();
        history.append(Role::User, "Hello");
        history.append(Role::Assistant, "Hi there!");

        let text = history.render_text();
        assert_eq!(text, "User: Hello\nAssistant: Hi there!");

        let user = text.find("User: Hello").unwrap();
        let assistant = text.find("Assistant: Hi there!").unwrap();
        assert!(user < assistant);
    }

    #[test]
    fn test_empty_history_renders_empty() {
        let history = ConversationHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.render_text(), "");
    }

    #[test]
    fn test_append_preserves_call_order() {
        let mut history = ConversationHistory::new();
        for i in 0..5 {
            history.append(Role::User, format!("m{}", i));
        }
        let contents: Vec<&str> = history.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m0", "m1", "m2", "m3", "m4"]);
        assert_eq!(history.len(), 5);
    }
}
