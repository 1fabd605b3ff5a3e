//! Message types for agent state.
//!
//! Roles: System, User, Assistant. Tool results are folded back into the
//! conversation as User messages by `ObserveNode`, so no separate Tool role exists.

use serde::{Deserialize, Serialize};

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// System prompt or system note (e.g. "customer verified").
    System(String),
    /// User input.
    User(String),
    /// Model/agent reply.
    Assistant(String),
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }

    /// Builds a message from a wire role name (`system`, `user`/`human`, `assistant`/`ai`).
    ///
    /// Returns `None` for unknown roles.
    pub fn from_role(role: &str, content: impl Into<String>) -> Option<Self> {
        match role.to_ascii_lowercase().as_str() {
            "system" => Some(Self::system(content)),
            "user" | "human" => Some(Self::user(content)),
            "assistant" | "ai" => Some(Self::assistant(content)),
            _ => None,
        }
    }

    /// Wire role name for this message.
    pub fn role(&self) -> &'static str {
        match self {
            Self::System(_) => "system",
            Self::User(_) => "user",
            Self::Assistant(_) => "assistant",
        }
    }

    /// Message text regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Self::System(s) | Self::User(s) | Self::Assistant(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: system/user/assistant constructors produce the correct variant with content.
    #[test]
    fn message_system_user_assistant_constructors() {
        let sys = Message::system("s");
        assert!(matches!(&sys, Message::System(c) if c == "s"));
        let usr = Message::user("u");
        assert!(matches!(&usr, Message::User(c) if c == "u"));
        let ast = Message::assistant("a");
        assert!(matches!(&ast, Message::Assistant(c) if c == "a"));
    }

    #[test]
    fn from_role_accepts_aliases_and_rejects_unknown() {
        assert_eq!(Message::from_role("human", "hi"), Some(Message::user("hi")));
        assert_eq!(Message::from_role("AI", "yo"), Some(Message::assistant("yo")));
        assert_eq!(Message::from_role("tool", "x"), None);
    }

    #[test]
    fn role_and_content_accessors() {
        let m = Message::assistant("done");
        assert_eq!(m.role(), "assistant");
        assert_eq!(m.content(), "done");
    }
}
