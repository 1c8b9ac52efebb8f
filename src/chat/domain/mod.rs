//! Domain types for the chat subsystem.
//!
//! Pure types with no store dependencies beyond the paths a
//! [`UserPartition`] derives. Persistence shapes live in
//! [`crate::chat::codec`].

mod attachment;
mod ids;
mod message;
mod partition;
mod resolved;
mod session;

pub use attachment::{ChatFile, Conversation};
pub use ids::{ConversationId, FileId, MessageId, SessionId, StorageDocId, UserId};
pub use message::{Message, MessageType, ParseSenderError, PersistedMessageData, Sender};
pub use partition::UserPartition;
pub use resolved::ResolvedMessage;
pub use session::{ChatSession, PersistedSessionData};
