//! Chat sessions grouping messages and files for one app.

use super::{FileId, MessageId, SessionId};
use chrono::{DateTime, Utc};
use mockable::Clock;

/// A chat session.
///
/// `message_ids` and `file_ids` behave as sets: they only grow, through
/// duplicate-absorbing union appends. Deleting a session never deletes the
/// messages or files it lists.
///
/// # Examples
///
/// ```
/// use chat_store::chat::domain::{ChatSession, SessionId};
/// use mockable::DefaultClock;
///
/// let session = ChatSession::new(SessionId::new("s1"), Some("p1".to_owned()), &DefaultClock);
/// assert_eq!(session.plugin_id(), Some("p1"));
/// assert!(session.message_ids().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    id: SessionId,
    plugin_id: Option<String>,
    message_ids: Vec<MessageId>,
    file_ids: Vec<FileId>,
    created_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted session.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSessionData {
    /// Session identifier.
    pub id: SessionId,
    /// App scope, if any.
    pub plugin_id: Option<String>,
    /// Member message ids.
    pub message_ids: Vec<MessageId>,
    /// Member file ids.
    pub file_ids: Vec<FileId>,
    /// Creation timestamp, absent on sessions written without one.
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatSession {
    /// Creates an empty session at a caller-chosen id.
    #[must_use]
    pub fn new(id: SessionId, plugin_id: Option<String>, clock: &impl Clock) -> Self {
        Self {
            id,
            plugin_id,
            message_ids: Vec::new(),
            file_ids: Vec::new(),
            created_at: Some(clock.utc()),
        }
    }

    /// Reconstructs a session from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSessionData) -> Self {
        Self {
            id: data.id,
            plugin_id: data.plugin_id,
            message_ids: data.message_ids,
            file_ids: data.file_ids,
            created_at: data.created_at,
        }
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Returns the session id.
    #[must_use]
    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the app scope.
    #[must_use]
    pub fn plugin_id(&self) -> Option<&str> {
        self.plugin_id.as_deref()
    }

    /// Returns the member message ids.
    #[must_use]
    pub fn message_ids(&self) -> &[MessageId] {
        &self.message_ids
    }

    /// Returns the member file ids.
    #[must_use]
    pub fn file_ids(&self) -> &[FileId] {
        &self.file_ids
    }

    /// Returns the creation timestamp, if the session carries one.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}
