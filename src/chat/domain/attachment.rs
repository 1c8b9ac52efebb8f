//! Entities referenced from messages by id: conversations and files.

use super::{ConversationId, FileId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A summarised conversation ("memory") owned outside this crate.
///
/// The record is opaque here: it is looked up by id and attached to messages
/// verbatim, never written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Conversation {
    /// Creates a conversation record.
    #[must_use]
    pub const fn new(id: ConversationId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Returns the conversation id.
    #[must_use]
    pub const fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Returns a field of the opaque record.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns every field except `id`.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// A file uploaded into a chat.
///
/// Only `id` is interpreted; `name` and `mime_type` are surfaced for
/// convenience and any other payload is preserved as-is.
///
/// # Examples
///
/// ```
/// use chat_store::chat::domain::{ChatFile, FileId};
///
/// let file = ChatFile::new(FileId::new("f1"))
///     .with_name("notes.pdf")
///     .with_mime_type("application/pdf");
/// assert_eq!(file.name(), Some("notes.pdf"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatFile {
    id: FileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl ChatFile {
    /// Creates a file record with no payload.
    #[must_use]
    pub fn new(id: FileId) -> Self {
        Self {
            id,
            name: None,
            mime_type: None,
            extra: Map::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Adds an arbitrary payload field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Returns the file id.
    #[must_use]
    pub const fn id(&self) -> &FileId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the MIME type.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Returns an uninterpreted payload field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}
