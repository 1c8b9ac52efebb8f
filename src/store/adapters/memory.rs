//! In-memory implementation of the `DocumentStore` port.
//!
//! Provides a thread-safe store with the same query, batching and
//! array-union semantics the chat core relies on, without a network driver.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::store::{
    domain::{
        CollectionPath, Direction, Document, DocumentRef, FieldUpdates, Fields, Filter, Query,
        WriteBatch, WriteOp,
    },
    error::StoreError,
    ports::document_store::{DocumentStore, StoreResult},
};

/// Maximum operations accepted by one commit unless configured otherwise.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;

type Collection = BTreeMap<String, Fields>;

/// In-memory implementation of [`DocumentStore`].
///
/// Thread-safe via internal [`RwLock`]. Cloning shares the underlying data.
///
/// # Example
///
/// ```
/// use chat_store::store::adapters::memory::InMemoryDocumentStore;
///
/// let store = InMemoryDocumentStore::with_max_batch_size(10);
/// assert_eq!(store.max_batch_size(), 10);
/// assert_eq!(store.document_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<CollectionPath, Collection>>>,
    max_batch_size: usize,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::with_max_batch_size(DEFAULT_MAX_BATCH_SIZE)
    }
}

impl InMemoryDocumentStore {
    /// Creates an empty store with the default batch bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store accepting at most `max_batch_size` operations
    /// per commit.
    #[must_use]
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            collections: Arc::default(),
            max_batch_size,
        }
    }

    /// Returns the batch bound.
    #[must_use]
    pub const fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Returns the number of documents across all collections.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.collections
            .read()
            .map(|guard| guard.values().map(BTreeMap::len).sum())
            .unwrap_or(0)
    }

    fn lock_err<E: std::fmt::Display>(err: E) -> StoreError {
        StoreError::unavailable(format!("lock poisoned: {err}"))
    }
}

fn snapshot(
    collections: &HashMap<CollectionPath, Collection>,
    reference: &DocumentRef,
) -> Option<Document> {
    collections
        .get(reference.parent())
        .and_then(|docs| docs.get(reference.id()))
        .map(|fields| Document::new(reference.clone(), fields.clone()))
}

fn field_value<'a>(fields: &'a Fields, field: &str) -> &'a Value {
    fields.get(field).unwrap_or(&Value::Null)
}

fn matches(fields: &Fields, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(field, expected) => field_value(fields, field) == expected,
        Filter::In(field, candidates) => candidates.contains(field_value(fields, field)),
    }
}

const fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Orders values by type rank first, then by value within a type.
fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let lhs = a.as_f64().unwrap_or(0.0);
            let rhs = b.as_f64().unwrap_or(0.0);
            lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}

fn apply_op(
    collections: &mut HashMap<CollectionPath, Collection>,
    op: WriteOp,
) -> StoreResult<()> {
    match op {
        WriteOp::Set(reference, fields) => {
            collections
                .entry(reference.parent().clone())
                .or_default()
                .insert(reference.id().to_owned(), fields);
        }
        WriteOp::Update(reference, updates) => {
            let fields = collections
                .get_mut(reference.parent())
                .and_then(|docs| docs.get_mut(reference.id()))
                .ok_or_else(|| StoreError::NotFound(reference.to_string()))?;
            updates.apply_to(fields);
        }
        WriteOp::Delete(reference) => {
            if let Some(docs) = collections.get_mut(reference.parent()) {
                docs.remove(reference.id());
            }
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, reference: &DocumentRef) -> StoreResult<Option<Document>> {
        let guard = self.collections.read().map_err(Self::lock_err)?;
        Ok(snapshot(&guard, reference))
    }

    async fn get_all(&self, references: &[DocumentRef]) -> StoreResult<Vec<Option<Document>>> {
        let guard = self.collections.read().map_err(Self::lock_err)?;
        Ok(references
            .iter()
            .map(|reference| snapshot(&guard, reference))
            .collect())
    }

    async fn query(&self, query: &Query) -> StoreResult<Vec<Document>> {
        if query.limit_value() == Some(0) {
            return Ok(Vec::new());
        }

        let guard = self.collections.read().map_err(Self::lock_err)?;
        let Some(docs) = guard.get(query.collection()) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<(&String, &Fields)> = docs
            .iter()
            .filter(|(_, fields)| query.filters().iter().all(|f| matches(fields, f)))
            .collect();

        // Ties fall back to document id order, which the BTreeMap already gives.
        if let Some(order) = query.ordering() {
            found.sort_by(|(_, a), (_, b)| {
                let ordering =
                    compare_values(field_value(a, &order.field), field_value(b, &order.field));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        let limit = query.limit_value().unwrap_or(usize::MAX);
        Ok(found
            .into_iter()
            .skip(query.offset_value())
            .take(limit)
            .map(|(id, fields)| Document::new(query.collection().doc(id.clone()), fields.clone()))
            .collect())
    }

    async fn add(&self, collection: &CollectionPath, fields: Fields) -> StoreResult<DocumentRef> {
        let reference = collection.doc(Uuid::new_v4().simple().to_string());
        self.set(&reference, fields).await?;
        Ok(reference)
    }

    async fn set(&self, reference: &DocumentRef, fields: Fields) -> StoreResult<()> {
        let mut guard = self.collections.write().map_err(Self::lock_err)?;
        apply_op(&mut guard, WriteOp::Set(reference.clone(), fields))
    }

    async fn update(&self, reference: &DocumentRef, updates: FieldUpdates) -> StoreResult<()> {
        let mut guard = self.collections.write().map_err(Self::lock_err)?;
        apply_op(&mut guard, WriteOp::Update(reference.clone(), updates))
    }

    async fn delete(&self, reference: &DocumentRef) -> StoreResult<()> {
        let mut guard = self.collections.write().map_err(Self::lock_err)?;
        apply_op(&mut guard, WriteOp::Delete(reference.clone()))
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        if batch.len() > self.max_batch_size {
            return Err(StoreError::BatchTooLarge {
                size: batch.len(),
                limit: self.max_batch_size,
            });
        }

        let mut guard = self.collections.write().map_err(Self::lock_err)?;
        // Stage against a copy so a failing update leaves the store untouched.
        let mut staged = guard.clone();
        for op in batch.into_ops() {
            apply_op(&mut staged, op)?;
        }
        *guard = staged;
        Ok(())
    }
}
