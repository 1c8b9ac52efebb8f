//! Size-bounded bulk writes.
//!
//! [`delete_matching`] empties an arbitrarily large scope by repeatedly
//! deleting one bounded page at a time. Pages run strictly in sequence: the
//! next page is queried only after the previous batch has committed.
//! Documents inserted into the scope while the loop runs may survive it;
//! re-running simply deletes whatever still matches.
//!
//! [`set_all`] and [`delete_all`] write one caller-supplied list in a single
//! atomic batch. Keeping that list within the store's batch bound is the
//! caller's responsibility.

use std::num::NonZeroUsize;

use crate::store::{
    domain::{DocumentRef, Fields, Query, WriteBatch},
    ports::{DocumentStore, StoreResult},
};

/// Summary of a bulk delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkDeleteReport {
    /// Documents deleted.
    pub deleted: usize,
    /// Pages queried, including the final short or empty page.
    pub iterations: usize,
}

/// Deletes every document matching `query`, `batch_size` documents per
/// atomic batch.
///
/// Any limit on `query` is replaced by `batch_size`; ordering is irrelevant.
///
/// # Errors
///
/// Returns the first failing round trip. Pages committed before the failure
/// stay deleted.
pub async fn delete_matching<S>(
    store: &S,
    query: Query,
    batch_size: NonZeroUsize,
) -> StoreResult<BulkDeleteReport>
where
    S: DocumentStore + ?Sized,
{
    let page_query = query.limit(batch_size.get());
    let mut report = BulkDeleteReport::default();

    loop {
        report.iterations = report.iterations.saturating_add(1);
        let page = store.query(&page_query).await?;
        if page.is_empty() {
            tracing::debug!(iteration = report.iterations, "no more documents to delete");
            break;
        }

        let mut batch = WriteBatch::new();
        for document in &page {
            batch.delete(document.reference().clone());
        }
        store.commit(batch).await?;
        report.deleted = report.deleted.saturating_add(page.len());
        tracing::debug!(
            iteration = report.iterations,
            page_size = page.len(),
            "deleted page of documents"
        );

        if page.len() < batch_size.get() {
            break;
        }
    }

    Ok(report)
}

/// Writes every document in one atomic batch. An empty list writes nothing.
///
/// # Errors
///
/// Returns an error if the commit fails, including when the list exceeds the
/// store's batch bound.
pub async fn set_all<S>(store: &S, documents: Vec<(DocumentRef, Fields)>) -> StoreResult<()>
where
    S: DocumentStore + ?Sized,
{
    if documents.is_empty() {
        return Ok(());
    }

    let mut batch = WriteBatch::new();
    for (reference, fields) in documents {
        batch.set(reference, fields);
    }
    store.commit(batch).await
}

/// Deletes every referenced document in one atomic batch. An empty list
/// deletes nothing.
///
/// # Errors
///
/// Returns an error if the commit fails, including when the list exceeds the
/// store's batch bound.
pub async fn delete_all<S>(store: &S, references: Vec<DocumentRef>) -> StoreResult<()>
where
    S: DocumentStore + ?Sized,
{
    if references.is_empty() {
        return Ok(());
    }

    let mut batch = WriteBatch::new();
    for reference in references {
        batch.delete(reference);
    }
    store.commit(batch).await
}
