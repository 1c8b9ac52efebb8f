//! Messages with their referenced entities materialised.

use super::{ChatFile, Conversation, Message};

/// A listed message together with the entities its id lists reference.
///
/// `memories` and `files` are `None` when resolution was not requested and
/// otherwise mirror the order of the message's id lists, minus ids that no
/// longer resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMessage {
    /// The stored message.
    pub message: Message,
    /// Resolved conversations, if requested.
    pub memories: Option<Vec<Conversation>>,
    /// Resolved files, if requested.
    pub files: Option<Vec<ChatFile>>,
}

impl ResolvedMessage {
    /// Wraps a message with nothing resolved.
    #[must_use]
    pub const fn unresolved(message: Message) -> Self {
        Self {
            message,
            memories: None,
            files: None,
        }
    }
}

impl From<Message> for ResolvedMessage {
    fn from(message: Message) -> Self {
        Self::unresolved(message)
    }
}
