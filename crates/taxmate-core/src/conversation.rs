//! Conversation log for a single chat session.
//!
//! A conversation is an ordered, append-only sequence of messages. Messages
//! are identified by position; once appended they are never edited, removed,
//! or reordered.

use std::fmt;

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Message typed by the person using the client.
    User,
    /// Reply from the assistant service (or the local fallback text).
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Role of the message author.
    pub role: Role,
    /// Message content. User content is kept exactly as typed.
    pub content: String,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An ordered, append-only message log.
///
/// [`Conversation::append`] is the only mutator. The sequence grows at the
/// end and existing entries stay put, so a message index observed once stays
/// valid for the life of the session.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the end of the log.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the conversation has no messages yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user_msg = Message::user("Hello");
        assert_eq!(user_msg.role, Role::User);
        assert_eq!(user_msg.content, "Hello");

        let assistant_msg = Message::assistant("Hi there!");
        assert_eq!(assistant_msg.role, Role::Assistant);
        assert_eq!(assistant_msg.content, "Hi there!");
    }

    #[test]
    fn test_append_preserves_order() {
        let mut conversation = Conversation::new();
        assert!(conversation.is_empty());

        conversation.append(Message::user("first"));
        conversation.append(Message::assistant("second"));
        conversation.append(Message::user("third"));

        assert_eq!(conversation.len(), 3);
        let contents: Vec<&str> = conversation
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, ["first", "second", "third"]);
        assert_eq!(conversation.last().map(|m| m.role), Some(Role::User));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
