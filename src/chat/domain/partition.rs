//! Per-user partition addressing.

use super::UserId;
use crate::store::domain::{CollectionPath, DocumentRef};

const USERS: &str = "users";
const MESSAGES: &str = "messages";
const CONVERSATIONS: &str = "conversations";
const FILES: &str = "files";
const CHAT_SESSIONS: &str = "chat_sessions";

/// The exclusive namespace holding one user's chat data.
///
/// Every store address used by the chat services is derived from a
/// partition, so no operation can reach another user's documents.
///
/// # Examples
///
/// ```
/// use chat_store::chat::domain::{UserId, UserPartition};
///
/// let partition = UserPartition::new(&UserId::new("u1"));
/// assert_eq!(partition.messages().to_string(), "users/u1/messages");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPartition {
    user: DocumentRef,
}

impl UserPartition {
    /// Returns the partition of `uid`.
    #[must_use]
    pub fn new(uid: &UserId) -> Self {
        Self {
            user: CollectionPath::root(USERS).doc(uid.as_str()),
        }
    }

    /// Returns the user document whose existence marks the partition.
    #[must_use]
    pub const fn user_document(&self) -> &DocumentRef {
        &self.user
    }

    /// Returns the messages collection.
    #[must_use]
    pub fn messages(&self) -> CollectionPath {
        self.user.collection(MESSAGES)
    }

    /// Returns the conversations collection.
    #[must_use]
    pub fn conversations(&self) -> CollectionPath {
        self.user.collection(CONVERSATIONS)
    }

    /// Returns the files collection.
    #[must_use]
    pub fn files(&self) -> CollectionPath {
        self.user.collection(FILES)
    }

    /// Returns the chat sessions collection.
    #[must_use]
    pub fn chat_sessions(&self) -> CollectionPath {
        self.user.collection(CHAT_SESSIONS)
    }
}
