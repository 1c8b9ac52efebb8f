//! Composition root wiring the chat services to one store handle.

use std::sync::Arc;

use mockable::Clock;

use super::{
    config::ChatStoreConfig,
    services::{FileService, MessageService, SessionService},
};
use crate::store::ports::DocumentStore;

/// The chat store: every service sharing one explicitly constructed store
/// handle, clock and configuration.
///
/// The host owns its lifetime; there is no global client.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chat_store::chat::{ChatStore, config::ChatStoreConfig};
/// use chat_store::chat::domain::{SessionId, UserId};
/// use chat_store::store::adapters::memory::InMemoryDocumentStore;
/// use mockable::DefaultClock;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let chat = ChatStore::new(
///     Arc::new(InMemoryDocumentStore::new()),
///     Arc::new(DefaultClock),
///     ChatStoreConfig::default(),
/// );
/// let uid = UserId::new("u1");
/// chat.sessions()
///     .start_session(&uid, SessionId::new("s1"), Some("p1".to_owned()))
///     .await?;
///
/// let session = chat.sessions().get_session(&uid, Some("p1")).await?;
/// assert!(session.is_some());
/// # Ok(())
/// # }
/// ```
pub struct ChatStore<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    messages: MessageService<S, C>,
    files: FileService<S>,
    sessions: SessionService<S, C>,
}

impl<S, C> ChatStore<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    /// Wires every service to `store` and `clock`.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, config: ChatStoreConfig) -> Self {
        Self {
            messages: MessageService::new(Arc::clone(&store), Arc::clone(&clock), config),
            files: FileService::new(Arc::clone(&store)),
            sessions: SessionService::new(store, clock),
        }
    }

    /// Returns the message service.
    #[must_use]
    pub const fn messages(&self) -> &MessageService<S, C> {
        &self.messages
    }

    /// Returns the file service.
    #[must_use]
    pub const fn files(&self) -> &FileService<S> {
        &self.files
    }

    /// Returns the session service.
    #[must_use]
    pub const fn sessions(&self) -> &SessionService<S, C> {
        &self.sessions
    }
}
