//! Message persistence, listing, moderation and clearing.

use std::sync::Arc;

use mockable::Clock;

use super::{
    bulk::{self, BulkDeleteReport},
    join::{self, Attachments},
    query::{self, ID_FIELD, MessagePage, MessageScope, REPORTED_FIELD},
};
use crate::chat::{
    codec,
    config::ChatStoreConfig,
    domain::{
        ConversationId, Message, MessageId, ResolvedMessage, StorageDocId, UserId, UserPartition,
    },
    error::ChatStoreResult,
};
use crate::store::{
    domain::{FieldUpdates, Query},
    ports::DocumentStore,
};

/// Result of reporting a message.
///
/// Reporting never fails the request: store errors become
/// [`ReportOutcome::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The moderation flag was set.
    Reported,
    /// The update failed.
    Failed {
        /// Description of the failure.
        message: String,
    },
}

impl ReportOutcome {
    /// Returns the user-facing status message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Reported => "Message reported".to_owned(),
            Self::Failed { message } => format!("Update failed: {message}"),
        }
    }

    /// Returns `true` if the flag was set.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::Reported)
    }
}

/// Result of clearing a chat scope.
///
/// Clearing never fails the request: a missing partition and store errors
/// are both reported as values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearChatOutcome {
    /// The scope is now empty.
    Cleared(BulkDeleteReport),
    /// The user partition does not exist; nothing was done.
    UserNotFound,
    /// A round trip failed part-way; re-running is safe.
    Failed {
        /// Description of the failure.
        message: String,
    },
}

impl ClearChatOutcome {
    /// Returns the user-facing status message, or `None` on success.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Cleared(_) => None,
            Self::UserNotFound => Some("User not found".to_owned()),
            Self::Failed { message } => Some(message.clone()),
        }
    }

    /// Returns the delete summary when the scope was cleared.
    #[must_use]
    pub const fn report(&self) -> Option<&BulkDeleteReport> {
        match self {
            Self::Cleared(report) => Some(report),
            Self::UserNotFound | Self::Failed { .. } => None,
        }
    }
}

/// Message operations over one store.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chat_store::chat::config::ChatStoreConfig;
/// use chat_store::chat::domain::UserId;
/// use chat_store::chat::services::{MessagePage, MessageScope, MessageService};
/// use chat_store::store::adapters::memory::InMemoryDocumentStore;
/// use mockable::DefaultClock;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let service = MessageService::new(
///     Arc::new(InMemoryDocumentStore::new()),
///     Arc::new(DefaultClock),
///     ChatStoreConfig::default(),
/// );
/// let uid = UserId::new("u1");
/// service.add_summary_message(&uid, "A quiet day").await?;
///
/// let page = service
///     .get_messages(&uid, &MessageScope::unscoped(), MessagePage::default(), false)
///     .await?;
/// assert_eq!(page.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MessageService<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: ChatStoreConfig,
}

impl<S, C> MessageService<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    /// Creates a message service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>, config: ChatStoreConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Persists a message under a store-assigned document id.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store write fails.
    #[tracing::instrument(skip_all, fields(uid = %uid, message_id = %message.id()))]
    pub async fn add_message(&self, uid: &UserId, message: &Message) -> ChatStoreResult<StorageDocId> {
        let partition = UserPartition::new(uid);
        let fields = codec::encode_message(message)?;
        let reference = self.store.add(&partition.messages(), fields).await?;
        Ok(StorageDocId::new(reference.id()))
    }

    /// Persists an AI reply scoped to `app_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn add_app_message(
        &self,
        uid: &UserId,
        text: &str,
        app_id: &str,
        conversation_id: Option<ConversationId>,
    ) -> ChatStoreResult<Message> {
        let message = Message::app_reply(text, app_id, conversation_id, &*self.clock);
        self.add_message(uid, &message).await?;
        Ok(message)
    }

    /// Persists an AI day summary outside any app scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn add_summary_message(&self, uid: &UserId, text: &str) -> ChatStoreResult<Message> {
        let message = Message::day_summary(text, &*self.clock);
        self.add_message(uid, &message).await?;
        Ok(message)
    }

    /// Lists one page of messages in `scope`, newest first, excluding
    /// reported messages.
    ///
    /// With `include_conversations`, both referenced conversations and
    /// referenced files are resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if a round trip fails or a document cannot be
    /// decoded.
    #[tracing::instrument(
        skip_all,
        fields(uid = %uid, app_id = ?scope.app_id(), limit = page.limit, offset = page.offset)
    )]
    pub async fn get_messages(
        &self,
        uid: &UserId,
        scope: &MessageScope,
        page: MessagePage,
        include_conversations: bool,
    ) -> ChatStoreResult<Vec<ResolvedMessage>> {
        let attachments = if include_conversations {
            Attachments::ALL
        } else {
            Attachments::NONE
        };
        self.list(uid, scope, page, attachments).await
    }

    /// Lists one page of an app's messages, newest first, excluding reported
    /// messages.
    ///
    /// With `include_conversations`, referenced conversations are resolved;
    /// files are left unresolved.
    ///
    /// # Errors
    ///
    /// Returns an error if a round trip fails or a document cannot be
    /// decoded.
    #[tracing::instrument(skip_all, fields(uid = %uid, app_id = app_id))]
    pub async fn get_app_messages(
        &self,
        uid: &UserId,
        app_id: &str,
        page: MessagePage,
        include_conversations: bool,
    ) -> ChatStoreResult<Vec<ResolvedMessage>> {
        let attachments = if include_conversations {
            Attachments::CONVERSATIONS
        } else {
            Attachments::NONE
        };
        self.list(uid, &MessageScope::app(app_id), page, attachments)
            .await
    }

    async fn list(
        &self,
        uid: &UserId,
        scope: &MessageScope,
        page: MessagePage,
        attachments: Attachments,
    ) -> ChatStoreResult<Vec<ResolvedMessage>> {
        let partition = UserPartition::new(uid);
        let documents = self
            .store
            .query(&query::listing_query(&partition, scope, page))
            .await?;
        let fetched = documents
            .iter()
            .map(codec::decode_message)
            .collect::<Result<Vec<_>, _>>()?;
        let fetched_count = fetched.len();
        let visible = query::without_reported(fetched);
        tracing::debug!(
            fetched = fetched_count,
            visible = visible.len(),
            "fetched message page"
        );

        join::resolve_attachments(&*self.store, &partition, visible, attachments).await
    }

    /// Looks up a message by its `id` field.
    ///
    /// Returns the message together with the id of the document holding it,
    /// or `None` if no document carries that id. Reported messages are still
    /// found.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the document cannot be decoded.
    #[tracing::instrument(skip_all, fields(uid = %uid, message_id = %message_id))]
    pub async fn get_message(
        &self,
        uid: &UserId,
        message_id: MessageId,
    ) -> ChatStoreResult<Option<(Message, StorageDocId)>> {
        let partition = UserPartition::new(uid);
        let query = Query::new(partition.messages())
            .where_eq(ID_FIELD, message_id.to_string())
            .limit(1);
        let documents = self.store.query(&query).await?;
        let Some(document) = documents.first() else {
            return Ok(None);
        };
        let message = codec::decode_message(document)?;
        Ok(Some((message, StorageDocId::new(document.id()))))
    }

    /// Flags a message as reported, hiding it from every listing.
    ///
    /// The document is kept. Failures are returned as
    /// [`ReportOutcome::Failed`] rather than as errors.
    #[tracing::instrument(skip_all, fields(uid = %uid, doc_id = %doc_id))]
    pub async fn report_message(&self, uid: &UserId, doc_id: &StorageDocId) -> ReportOutcome {
        let partition = UserPartition::new(uid);
        let reference = partition.messages().doc(doc_id.as_str());
        let updates = FieldUpdates::new().set(REPORTED_FIELD, true);
        match self.store.update(&reference, updates).await {
            Ok(()) => ReportOutcome::Reported,
            Err(err) => {
                tracing::warn!(error = %err, "reporting message failed");
                ReportOutcome::Failed {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Deletes every message in `scope`, reported ones included.
    ///
    /// Referenced conversations and files are left alone. A missing user
    /// partition and store failures are returned as outcomes rather than as
    /// errors.
    #[tracing::instrument(
        skip_all,
        fields(uid = %uid, app_id = ?scope.app_id(), session = ?scope.chat_session_id())
    )]
    pub async fn clear_chat(&self, uid: &UserId, scope: &MessageScope) -> ClearChatOutcome {
        let partition = UserPartition::new(uid);
        match self.store.get(partition.user_document()).await {
            Ok(Some(_)) => {}
            Ok(None) => return ClearChatOutcome::UserNotFound,
            Err(err) => {
                tracing::warn!(error = %err, "checking user partition failed");
                return ClearChatOutcome::Failed {
                    message: err.to_string(),
                };
            }
        }

        let query = scope.apply(Query::new(partition.messages()));
        match bulk::delete_matching(&*self.store, query, self.config.delete_batch_size).await {
            Ok(report) => {
                tracing::info!(
                    deleted = report.deleted,
                    iterations = report.iterations,
                    "cleared chat messages"
                );
                ClearChatOutcome::Cleared(report)
            }
            Err(err) => {
                tracing::warn!(error = %err, "clearing chat messages failed");
                ClearChatOutcome::Failed {
                    message: err.to_string(),
                }
            }
        }
    }
}
