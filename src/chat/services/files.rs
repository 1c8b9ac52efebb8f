//! Chat file uploads and removals.

use std::sync::Arc;

use serde_json::Value;

use super::{bulk, query::ID_FIELD};
use crate::chat::{
    codec,
    domain::{ChatFile, FileId, UserId, UserPartition},
    error::ChatStoreResult,
};
use crate::store::{domain::Query, ports::DocumentStore};

/// File operations over one store.
///
/// Files are written and removed in single atomic batches; each call's list
/// must fit within the store's batch bound.
#[derive(Clone)]
pub struct FileService<S>
where
    S: DocumentStore,
{
    store: Arc<S>,
}

impl<S> FileService<S>
where
    S: DocumentStore,
{
    /// Creates a file service.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stores every file at its own id, overwriting existing records.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the batch commit fails.
    #[tracing::instrument(skip_all, fields(uid = %uid, count = files.len()))]
    pub async fn add_files(&self, uid: &UserId, files: &[ChatFile]) -> ChatStoreResult<()> {
        let collection = UserPartition::new(uid).files();
        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            documents.push((collection.doc(file.id().as_str()), codec::encode_file(file)?));
        }
        bulk::set_all(&*self.store, documents).await?;
        Ok(())
    }

    /// Lists the files with the given ids, or every file when `ids` is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a document cannot be decoded.
    #[tracing::instrument(skip_all, fields(uid = %uid, count = ids.len()))]
    pub async fn get_files(&self, uid: &UserId, ids: &[FileId]) -> ChatStoreResult<Vec<ChatFile>> {
        let collection = UserPartition::new(uid).files();
        let query = if ids.is_empty() {
            Query::new(collection)
        } else {
            let values = ids
                .iter()
                .map(|id| Value::String(id.as_str().to_owned()))
                .collect();
            Query::new(collection).where_in(ID_FIELD, values)
        };

        let documents = self.store.query(&query).await?;
        Ok(documents
            .iter()
            .map(codec::decode_file)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Deletes the files with the given ids. Messages and sessions that
    /// reference them are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch commit fails.
    #[tracing::instrument(skip_all, fields(uid = %uid, count = ids.len()))]
    pub async fn delete_files(&self, uid: &UserId, ids: &[FileId]) -> ChatStoreResult<()> {
        let collection = UserPartition::new(uid).files();
        let references = ids.iter().map(|id| collection.doc(id.as_str())).collect();
        bulk::delete_all(&*self.store, references).await?;
        Ok(())
    }
}
