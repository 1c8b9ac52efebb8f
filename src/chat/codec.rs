//! Explicit encoding and decoding between store documents and chat entities.
//!
//! Each entity has a private record type describing its persisted shape,
//! including the defaulting rules for fields older documents may lack.
//! Decoding never guesses: a document that does not fit the record yields a
//! [`CodecError`] naming the entity and document.

use crate::chat::domain::{
    ChatFile, ChatSession, Conversation, ConversationId, FileId, Message, MessageId, MessageType,
    PersistedMessageData, PersistedSessionData, Sender, SessionId,
};
use crate::store::domain::{Document, Fields};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

/// Errors converting between documents and entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A stored document does not match the entity's persisted shape.
    #[error("failed to decode {entity} document {document_id}: {reason}")]
    Decode {
        /// Entity kind being decoded.
        entity: &'static str,
        /// Store id of the offending document.
        document_id: String,
        /// Underlying parse failure.
        reason: String,
    },

    /// An entity could not be turned into a field map.
    #[error("failed to encode {entity}: {reason}")]
    Encode {
        /// Entity kind being encoded.
        entity: &'static str,
        /// Underlying serialisation failure.
        reason: String,
    },
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

const MESSAGE: &str = "message";
const CONVERSATION: &str = "conversation";
const FILE: &str = "file";
const SESSION: &str = "chat session";

/// Formats a timestamp the way every chat document stores it.
///
/// The fixed-width, microsecond, `Z`-suffixed form sorts lexically in
/// chronological order, which store-level ordering relies on.
#[must_use]
pub fn encode_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

mod timestamp {
    use chrono::{DateTime, ParseError, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn parse(raw: &str) -> Result<DateTime<Utc>, ParseError> {
        DateTime::parse_from_rfc3339(raw).map(|parsed| parsed.with_timezone(&Utc))
    }

    pub(super) fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_timestamp(*value))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub(super) mod optional {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        #[expect(clippy::ref_option, reason = "signature required by serde `with`")]
        pub(in crate::chat::codec) fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(instant) => super::serialize(instant, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub(in crate::chat::codec) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MessageRecord {
    id: MessageId,
    text: String,
    #[serde(with = "timestamp")]
    created_at: DateTime<Utc>,
    sender: String,
    #[serde(default)]
    app_id: Option<String>,
    #[serde(rename = "type", default)]
    message_type: Option<String>,
    #[serde(default)]
    from_external_integration: bool,
    #[serde(default)]
    memories_id: Vec<ConversationId>,
    #[serde(default)]
    files_id: Vec<FileId>,
    #[serde(default)]
    chat_session_id: Option<SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reported: Option<bool>,
    #[serde(default)]
    plugin_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    id: SessionId,
    #[serde(default)]
    plugin_id: Option<String>,
    #[serde(default)]
    message_ids: Vec<MessageId>,
    #[serde(default)]
    file_ids: Vec<FileId>,
    #[serde(
        default,
        with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    created_at: Option<DateTime<Utc>>,
}

fn to_fields<T: Serialize>(entity: &'static str, value: &T) -> CodecResult<Fields> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(CodecError::Encode {
            entity,
            reason: format!("expected an object, got {other}"),
        }),
        Err(err) => Err(CodecError::Encode {
            entity,
            reason: err.to_string(),
        }),
    }
}

fn from_fields<T: DeserializeOwned>(
    entity: &'static str,
    document_id: &str,
    fields: Fields,
) -> CodecResult<T> {
    serde_json::from_value(Value::Object(fields)).map_err(|err| CodecError::Decode {
        entity,
        document_id: document_id.to_owned(),
        reason: err.to_string(),
    })
}

/// Returns the document's fields with `id` defaulted to the document id.
fn fields_with_id(document: &Document) -> Fields {
    let mut fields = document.fields().clone();
    fields
        .entry("id")
        .or_insert_with(|| Value::String(document.id().to_owned()));
    fields
}

/// Encodes a message for storage.
///
/// `reported` is written only once set, so fresh messages carry no flag.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialisation fails.
pub fn encode_message(message: &Message) -> CodecResult<Fields> {
    let record = MessageRecord {
        id: message.id(),
        text: message.text().to_owned(),
        created_at: message.created_at(),
        sender: message.sender().as_str().to_owned(),
        app_id: message.app_id().map(str::to_owned),
        message_type: Some(message.message_type().as_str().to_owned()),
        from_external_integration: message.is_from_external_integration(),
        memories_id: message.memories_id().to_vec(),
        files_id: message.files_id().to_vec(),
        chat_session_id: message.chat_session_id().cloned(),
        reported: message.is_reported().then_some(true),
        plugin_id: message.plugin_id().map(str::to_owned),
    };
    to_fields(MESSAGE, &record)
}

/// Decodes a stored message.
///
/// Missing id lists decode to empty lists, missing flags to `false` and a
/// missing `type` to [`MessageType::Text`]. Unrecognised types decode to
/// [`MessageType::Other`].
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if a required field is missing, the
/// sender is unknown or any field has the wrong shape.
pub fn decode_message(document: &Document) -> CodecResult<Message> {
    let record: MessageRecord = from_fields(MESSAGE, document.id(), document.fields().clone())?;
    let sender = Sender::try_from(record.sender.as_str()).map_err(|err| CodecError::Decode {
        entity: MESSAGE,
        document_id: document.id().to_owned(),
        reason: err.to_string(),
    })?;
    Ok(Message::from_persisted(PersistedMessageData {
        id: record.id,
        text: record.text,
        created_at: record.created_at,
        sender,
        app_id: record.app_id,
        message_type: record
            .message_type
            .as_deref()
            .map_or(MessageType::Text, MessageType::from),
        from_external_integration: record.from_external_integration,
        memories_id: record.memories_id,
        files_id: record.files_id,
        chat_session_id: record.chat_session_id,
        reported: record.reported.unwrap_or(false),
        plugin_id: record.plugin_id,
    }))
}

/// Decodes a stored conversation.
///
/// The id comes from the body's `id` field, falling back to the document id.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if the `id` field is not a string.
pub fn decode_conversation(document: &Document) -> CodecResult<Conversation> {
    let mut fields = fields_with_id(document);
    match fields.remove("id") {
        Some(Value::String(id)) => Ok(Conversation::new(ConversationId::new(id), fields)),
        other => Err(CodecError::Decode {
            entity: CONVERSATION,
            document_id: document.id().to_owned(),
            reason: format!("expected a string id, got {}", other.unwrap_or(Value::Null)),
        }),
    }
}

/// Encodes a file for storage.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialisation fails.
pub fn encode_file(file: &ChatFile) -> CodecResult<Fields> {
    to_fields(FILE, file)
}

/// Decodes a stored file, defaulting its id to the document id.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if a known field has the wrong shape.
pub fn decode_file(document: &Document) -> CodecResult<ChatFile> {
    from_fields(FILE, document.id(), fields_with_id(document))
}

/// Encodes a session for storage.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialisation fails.
pub fn encode_session(session: &ChatSession) -> CodecResult<Fields> {
    let record = SessionRecord {
        id: session.id().clone(),
        plugin_id: session.plugin_id().map(str::to_owned),
        message_ids: session.message_ids().to_vec(),
        file_ids: session.file_ids().to_vec(),
        created_at: session.created_at(),
    };
    to_fields(SESSION, &record)
}

/// Decodes a stored session.
///
/// A missing `created_at` decodes to `None`.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if `id` is missing or any field has the
/// wrong shape.
pub fn decode_session(document: &Document) -> CodecResult<ChatSession> {
    let record: SessionRecord = from_fields(SESSION, document.id(), document.fields().clone())?;
    Ok(ChatSession::from_persisted(PersistedSessionData {
        id: record.id,
        plugin_id: record.plugin_id,
        message_ids: record.message_ids,
        file_ids: record.file_ids,
        created_at: record.created_at,
    }))
}
