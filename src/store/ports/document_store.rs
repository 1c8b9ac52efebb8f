//! Capability interface of the underlying document store.
//!
//! The chat core treats the store driver as a black box and only ever talks
//! to it through this trait, so the driver can be swapped for the in-memory
//! adapter in tests.

use crate::store::{
    domain::{CollectionPath, Document, DocumentRef, FieldUpdates, Fields, Query, WriteBatch},
    error::StoreError,
};
use async_trait::async_trait;

/// Result type for store round trips.
pub type StoreResult<T> = Result<T, StoreError>;

/// Port for document store operations.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - `get_all` preserves input order and yields `None` for missing documents
/// - `query` predicates are conjunctive, applied before ordering, then
///   `offset`, then `limit`
/// - `commit` applies every queued operation or none of them
/// - `update` fails with [`StoreError::NotFound`] on a missing document
/// - `delete` of a missing document succeeds
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads a single document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the round trip fails.
    async fn get(&self, reference: &DocumentRef) -> StoreResult<Option<Document>>;

    /// Reads many documents in one round trip.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the round trip fails.
    async fn get_all(&self, references: &[DocumentRef]) -> StoreResult<Vec<Option<Document>>>;

    /// Runs a query.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the round trip fails.
    async fn query(&self, query: &Query) -> StoreResult<Vec<Document>>;

    /// Creates a document under a store-generated id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the round trip fails.
    async fn add(&self, collection: &CollectionPath, fields: Fields) -> StoreResult<DocumentRef>;

    /// Creates or fully overwrites a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the round trip fails.
    async fn set(&self, reference: &DocumentRef, fields: Fields) -> StoreResult<()>;

    /// Applies targeted field updates to an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist.
    async fn update(&self, reference: &DocumentRef, updates: FieldUpdates) -> StoreResult<()>;

    /// Deletes a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the round trip fails.
    async fn delete(&self, reference: &DocumentRef) -> StoreResult<()>;

    /// Commits a write batch atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BatchTooLarge`] if the batch exceeds the store's
    /// bound, or [`StoreError::NotFound`] if a queued update targets a missing
    /// document. Nothing is applied on error.
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;
}
