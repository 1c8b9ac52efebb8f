//! Chat message entity and its construction helpers.

use super::{ConversationId, FileId, MessageId, SessionId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use thiserror::Error;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    /// Written by the user.
    Human,
    /// Written by the assistant or an app acting on its behalf.
    Ai,
}

impl Sender {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Ai => "ai",
        }
    }
}

/// Error returned when parsing an unknown sender.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown message sender: {0}")]
pub struct ParseSenderError(pub String);

impl TryFrom<&str> for Sender {
    type Error = ParseSenderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "ai" => Ok(Self::Ai),
            _ => Err(ParseSenderError(value.to_owned())),
        }
    }
}

/// Kind of message content.
///
/// The set is open. Kinds without a dedicated variant are kept verbatim in
/// [`MessageType::Other`] so they are written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Ordinary chat text.
    #[default]
    Text,
    /// Generated summary of a day's conversations.
    DaySummary,
    /// Any other kind, as stored.
    Other(String),
}

impl MessageType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::DaySummary => "day_summary",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for MessageType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "day_summary" => Self::DaySummary,
            _ => Self::Other(value.to_owned()),
        }
    }
}

/// A chat message owned by one user partition.
///
/// `memories_id` and `files_id` are weak references into the same partition;
/// they are resolved on read and never cascade on delete. The only mutation
/// after persistence is the moderation flag.
///
/// # Examples
///
/// ```
/// use chat_store::chat::domain::{ConversationId, Message, MessageType, Sender};
/// use mockable::DefaultClock;
///
/// let reply = Message::app_reply(
///     "Here is what I found",
///     "weather-app",
///     Some(ConversationId::new("c1")),
///     &DefaultClock,
/// );
/// assert_eq!(reply.sender(), Sender::Ai);
/// assert_eq!(reply.app_id(), Some("weather-app"));
/// assert_eq!(reply.memories_id(), [ConversationId::new("c1")]);
/// assert_eq!(reply.message_type(), &MessageType::Text);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    id: MessageId,
    text: String,
    created_at: DateTime<Utc>,
    sender: Sender,
    app_id: Option<String>,
    message_type: MessageType,
    from_external_integration: bool,
    memories_id: Vec<ConversationId>,
    files_id: Vec<FileId>,
    chat_session_id: Option<SessionId>,
    reported: bool,
    plugin_id: Option<String>,
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedMessageData {
    /// Message identifier.
    pub id: MessageId,
    /// Message body.
    pub text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Author.
    pub sender: Sender,
    /// App scope, if any.
    pub app_id: Option<String>,
    /// Content kind.
    pub message_type: MessageType,
    /// Whether an external integration produced the message.
    pub from_external_integration: bool,
    /// Referenced conversations, in display order.
    pub memories_id: Vec<ConversationId>,
    /// Referenced files, in display order.
    pub files_id: Vec<FileId>,
    /// Owning chat session, if any.
    pub chat_session_id: Option<SessionId>,
    /// Moderation flag.
    pub reported: bool,
    /// Legacy plugin scope, if any.
    pub plugin_id: Option<String>,
}

impl Message {
    /// Creates a text message with a fresh id and the current timestamp.
    #[must_use]
    pub fn new(text: impl Into<String>, sender: Sender, clock: &impl Clock) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            created_at: clock.utc(),
            sender,
            app_id: None,
            message_type: MessageType::Text,
            from_external_integration: false,
            memories_id: Vec::new(),
            files_id: Vec::new(),
            chat_session_id: None,
            reported: false,
            plugin_id: None,
        }
    }

    /// Creates an AI-authored reply scoped to `app_id`, optionally linked to
    /// the conversation that prompted it.
    #[must_use]
    pub fn app_reply(
        text: impl Into<String>,
        app_id: impl Into<String>,
        conversation_id: Option<ConversationId>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            app_id: Some(app_id.into()),
            memories_id: conversation_id.into_iter().collect(),
            ..Self::new(text, Sender::Ai, clock)
        }
    }

    /// Creates an AI-authored day summary outside any app scope.
    #[must_use]
    pub fn day_summary(text: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            message_type: MessageType::DaySummary,
            ..Self::new(text, Sender::Ai, clock)
        }
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            text: data.text,
            created_at: data.created_at,
            sender: data.sender,
            app_id: data.app_id,
            message_type: data.message_type,
            from_external_integration: data.from_external_integration,
            memories_id: data.memories_id,
            files_id: data.files_id,
            chat_session_id: data.chat_session_id,
            reported: data.reported,
            plugin_id: data.plugin_id,
        }
    }

    /// Sets the app scope.
    #[must_use]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Places the message in a chat session.
    #[must_use]
    pub fn with_chat_session(mut self, session_id: SessionId) -> Self {
        self.chat_session_id = Some(session_id);
        self
    }

    /// Sets the referenced conversations.
    #[must_use]
    pub fn with_memories(mut self, memories_id: impl IntoIterator<Item = ConversationId>) -> Self {
        self.memories_id = memories_id.into_iter().collect();
        self
    }

    /// Sets the referenced files.
    #[must_use]
    pub fn with_files(mut self, files_id: impl IntoIterator<Item = FileId>) -> Self {
        self.files_id = files_id.into_iter().collect();
        self
    }

    /// Marks the message as produced by an external integration.
    #[must_use]
    pub const fn from_external_integration(mut self) -> Self {
        self.from_external_integration = true;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the message body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the author.
    #[must_use]
    pub const fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns the app scope.
    #[must_use]
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    /// Returns the content kind.
    #[must_use]
    pub const fn message_type(&self) -> &MessageType {
        &self.message_type
    }

    /// Returns `true` if an external integration produced the message.
    #[must_use]
    pub const fn is_from_external_integration(&self) -> bool {
        self.from_external_integration
    }

    /// Returns the referenced conversation ids.
    #[must_use]
    pub fn memories_id(&self) -> &[ConversationId] {
        &self.memories_id
    }

    /// Returns the referenced file ids.
    #[must_use]
    pub fn files_id(&self) -> &[FileId] {
        &self.files_id
    }

    /// Returns the owning chat session.
    #[must_use]
    pub const fn chat_session_id(&self) -> Option<&SessionId> {
        self.chat_session_id.as_ref()
    }

    /// Returns `true` if the message has been reported.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        self.reported
    }

    /// Returns the legacy plugin scope.
    #[must_use]
    pub fn plugin_id(&self) -> Option<&str> {
        self.plugin_id.as_deref()
    }
}
