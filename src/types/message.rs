//! Inbound message types
//!
//! The chat transport converts raw update payloads into [`InboundMessage`]
//! before anything else looks at them, so the dispatcher and parser never see
//! platform-specific JSON. Mention entities are typed as [`Mention`]: rich
//! mentions carry the mentioned user, plain `@name` mentions only signal that
//! a handle token is present in the text.

use super::user::User;

/// Chat identifier replies are sent to
pub type ChatId = i64;

/// Message identifier; doubles as the credit id for `/add` messages
pub type MessageId = i64;

/// A mention entity attached to a message
#[derive(Debug, Clone, PartialEq)]
pub enum Mention {
    /// Rich mention carrying the mentioned user's full record
    Embedded(User),

    /// Plain `@name` token; the handle itself lives in the message text
    Handle,
}

/// A single inbound chat message or group event
///
/// Exactly one inbound message is handled to completion before the next is
/// processed, so handlers may freely mutate the ledger without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Message id, unique within the chat
    pub id: MessageId,

    /// Chat the message was posted in; replies go back here
    pub chat_id: ChatId,

    /// The member who sent the message
    pub sender: User,

    /// Message text; absent for bare group events
    pub text: Option<String>,

    /// Mention entities in document order
    pub mentions: Vec<Mention>,

    /// Set when the message announces a member joining the group
    pub new_member: Option<User>,

    /// Set when the message announces a member leaving the group
    pub left_member: Option<User>,
}

impl InboundMessage {
    /// First mention entity of the message, if any
    pub fn first_mention(&self) -> Option<&Mention> {
        self.mentions.first()
    }

    /// Whether the message text starts with the given command prefix
    pub fn has_command(&self, command: &str) -> bool {
        self.text
            .as_deref()
            .is_some_and(|text| text.starts_with(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_message(text: &str) -> InboundMessage {
        InboundMessage {
            id: 1,
            chat_id: -100,
            sender: User::with_id(1, "Anna"),
            text: Some(text.to_string()),
            mentions: Vec::new(),
            new_member: None,
            left_member: None,
        }
    }

    #[test]
    fn test_has_command_matches_prefix() {
        let msg = text_message("/add @ben 10 pizza");
        assert!(msg.has_command("/add"));
        assert!(!msg.has_command("/undo"));
    }

    #[test]
    fn test_has_command_without_text() {
        let mut msg = text_message("");
        msg.text = None;
        assert!(!msg.has_command("/add"));
    }

    #[test]
    fn test_first_mention_returns_leading_entity() {
        let mut msg = text_message("/add @ben 10 pizza");
        msg.mentions = vec![Mention::Handle, Mention::Embedded(User::with_id(2, "Ben"))];
        assert_eq!(msg.first_mention(), Some(&Mention::Handle));
    }
}
