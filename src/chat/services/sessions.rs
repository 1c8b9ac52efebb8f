//! Chat session lifecycle.

use std::sync::Arc;

use mockable::Clock;

use crate::chat::{
    codec,
    domain::{ChatSession, FileId, MessageId, SessionId, UserId, UserPartition},
    error::ChatStoreResult,
};
use crate::store::{
    domain::{FieldUpdates, Query},
    ports::DocumentStore,
};

const PLUGIN_ID_FIELD: &str = "plugin_id";
const MESSAGE_IDS_FIELD: &str = "message_ids";
const FILE_IDS_FIELD: &str = "file_ids";

/// Session operations over one store.
///
/// Member lists only grow, through array-union appends, so concurrent
/// appends never lose each other's ids. Creation is the one full overwrite.
#[derive(Clone)]
pub struct SessionService<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> SessionService<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    /// Creates a session service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Writes `session` at its id, replacing any previous state there.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store write fails.
    #[tracing::instrument(skip_all, fields(uid = %uid, session_id = %session.id()))]
    pub async fn create_session(
        &self,
        uid: &UserId,
        session: &ChatSession,
    ) -> ChatStoreResult<ChatSession> {
        let reference = UserPartition::new(uid)
            .chat_sessions()
            .doc(session.id().as_str());
        self.store
            .set(&reference, codec::encode_session(session)?)
            .await?;
        Ok(session.clone())
    }

    /// Creates an empty session stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn start_session(
        &self,
        uid: &UserId,
        session_id: SessionId,
        plugin_id: Option<String>,
    ) -> ChatStoreResult<ChatSession> {
        let session = ChatSession::new(session_id, plugin_id, &*self.clock);
        self.create_session(uid, &session).await
    }

    /// Returns the session for `app_id`, or the session with no app when
    /// `app_id` is `None`.
    ///
    /// If several sessions match, the most recently created one wins.
    /// Sessions stored without a creation time rank below stamped ones, so
    /// they are still found when nothing newer matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a matching document cannot be
    /// decoded.
    #[tracing::instrument(skip_all, fields(uid = %uid, app_id = ?app_id))]
    pub async fn get_session(
        &self,
        uid: &UserId,
        app_id: Option<&str>,
    ) -> ChatStoreResult<Option<ChatSession>> {
        let query =
            Query::new(UserPartition::new(uid).chat_sessions()).where_eq(PLUGIN_ID_FIELD, app_id);
        let documents = self.store.query(&query).await?;
        let sessions = documents
            .iter()
            .map(codec::decode_session)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(matched = sessions.len(), "fetched candidate sessions");
        Ok(sessions.into_iter().max_by_key(ChatSession::created_at))
    }

    /// Deletes a session. Deleting a missing session succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store delete fails.
    #[tracing::instrument(skip_all, fields(uid = %uid, session_id = %session_id))]
    pub async fn delete_session(&self, uid: &UserId, session_id: &SessionId) -> ChatStoreResult<()> {
        let reference = UserPartition::new(uid)
            .chat_sessions()
            .doc(session_id.as_str());
        self.store.delete(&reference).await?;
        Ok(())
    }

    /// Adds a message id to a session's members. Repeats are absorbed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or the update fails.
    #[tracing::instrument(skip_all, fields(uid = %uid, session_id = %session_id))]
    pub async fn append_message_to_session(
        &self,
        uid: &UserId,
        session_id: &SessionId,
        message_id: MessageId,
    ) -> ChatStoreResult<()> {
        let reference = UserPartition::new(uid)
            .chat_sessions()
            .doc(session_id.as_str());
        let updates = FieldUpdates::new().array_union(MESSAGE_IDS_FIELD, [message_id.to_string()]);
        self.store.update(&reference, updates).await?;
        Ok(())
    }

    /// Adds file ids to a session's members. Repeats are absorbed and an
    /// empty list issues no write.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or the update fails.
    #[tracing::instrument(skip_all, fields(uid = %uid, session_id = %session_id, count = file_ids.len()))]
    pub async fn append_files_to_session(
        &self,
        uid: &UserId,
        session_id: &SessionId,
        file_ids: &[FileId],
    ) -> ChatStoreResult<()> {
        if file_ids.is_empty() {
            return Ok(());
        }

        let reference = UserPartition::new(uid)
            .chat_sessions()
            .doc(session_id.as_str());
        let updates = FieldUpdates::new().array_union(
            FILE_IDS_FIELD,
            file_ids.iter().map(|id| id.as_str().to_owned()),
        );
        self.store.update(&reference, updates).await?;
        Ok(())
    }
}
