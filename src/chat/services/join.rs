//! Batch fetch-join of entities referenced by id from listed messages.
//!
//! The store has no joins, so references are resolved in the application:
//! the ids referenced across a whole page are unioned per collection, each
//! collection is read with a single multi-get, and the results are spliced
//! back into every message in the order of its own id list. Ids that do not
//! resolve are dropped.

use std::collections::{BTreeSet, HashMap};

use crate::chat::{
    codec::{self, CodecResult},
    domain::{ChatFile, Conversation, Message, ResolvedMessage, UserPartition},
    error::ChatStoreResult,
};
use crate::store::{
    domain::{CollectionPath, Document, DocumentRef},
    ports::DocumentStore,
};

/// Which referenced entities to materialise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attachments {
    /// Resolve `memories_id` into conversations.
    pub conversations: bool,
    /// Resolve `files_id` into files.
    pub files: bool,
}

impl Attachments {
    /// Resolve nothing.
    pub const NONE: Self = Self {
        conversations: false,
        files: false,
    };

    /// Resolve conversations only.
    pub const CONVERSATIONS: Self = Self {
        conversations: true,
        files: false,
    };

    /// Resolve conversations and files.
    pub const ALL: Self = Self {
        conversations: true,
        files: true,
    };
}

/// Entities fetched for one page, keyed by their own id.
#[derive(Debug)]
pub struct EntityIndex<T> {
    by_id: HashMap<String, T>,
}

impl<T: Clone> EntityIndex<T> {
    fn empty() -> Self {
        Self {
            by_id: HashMap::new(),
        }
    }

    /// Returns the number of resolved entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns `true` if nothing resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Materialises `ids` in order, skipping ids that did not resolve.
    #[must_use]
    pub fn ordered<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Vec<T> {
        ids.into_iter()
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }
}

/// Reads every id in `ids` from `collection` with one multi-get.
///
/// An empty id set issues no store call.
///
/// # Errors
///
/// Returns an error if the multi-get fails or a found document cannot be
/// decoded.
pub async fn fetch_index<S, T>(
    store: &S,
    collection: &CollectionPath,
    ids: &BTreeSet<String>,
    decode: fn(&Document) -> CodecResult<T>,
    key: fn(&T) -> &str,
) -> ChatStoreResult<EntityIndex<T>>
where
    S: DocumentStore + ?Sized,
    T: Clone,
{
    if ids.is_empty() {
        return Ok(EntityIndex::empty());
    }

    let references: Vec<DocumentRef> = ids.iter().map(|id| collection.doc(id.as_str())).collect();
    let documents = store.get_all(&references).await?;

    let mut by_id = HashMap::with_capacity(documents.len());
    for document in documents.iter().flatten() {
        let entity = decode(document)?;
        by_id.insert(key(&entity).to_owned(), entity);
    }
    tracing::debug!(
        collection = %collection,
        requested = ids.len(),
        resolved = by_id.len(),
        "resolved referenced documents"
    );
    Ok(EntityIndex { by_id })
}

fn conversation_key(conversation: &Conversation) -> &str {
    conversation.id().as_str()
}

fn file_key(file: &ChatFile) -> &str {
    file.id().as_str()
}

/// Attaches the requested referenced entities to each message.
///
/// # Errors
///
/// Returns an error if a multi-get fails or a referenced document cannot be
/// decoded.
pub async fn resolve_attachments<S>(
    store: &S,
    partition: &UserPartition,
    messages: Vec<Message>,
    attachments: Attachments,
) -> ChatStoreResult<Vec<ResolvedMessage>>
where
    S: DocumentStore + ?Sized,
{
    let conversations = if attachments.conversations {
        let ids: BTreeSet<String> = messages
            .iter()
            .flat_map(|message| message.memories_id().iter().map(|id| id.as_str().to_owned()))
            .collect();
        Some(
            fetch_index(
                store,
                &partition.conversations(),
                &ids,
                codec::decode_conversation,
                conversation_key,
            )
            .await?,
        )
    } else {
        None
    };

    let files = if attachments.files {
        let ids: BTreeSet<String> = messages
            .iter()
            .flat_map(|message| message.files_id().iter().map(|id| id.as_str().to_owned()))
            .collect();
        Some(fetch_index(store, &partition.files(), &ids, codec::decode_file, file_key).await?)
    } else {
        None
    };

    Ok(messages
        .into_iter()
        .map(|message| {
            let memories = conversations
                .as_ref()
                .map(|index| index.ordered(message.memories_id().iter().map(|id| id.as_str())));
            let attached_files = files
                .as_ref()
                .map(|index| index.ordered(message.files_id().iter().map(|id| id.as_str())));
            ResolvedMessage {
                message,
                memories,
                files: attached_files,
            }
        })
        .collect())
}
