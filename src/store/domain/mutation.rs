//! Field mutations and atomic write batches.

use super::{DocumentRef, Fields};
use serde_json::Value;
use std::collections::BTreeMap;

/// Value written to a single field by an update.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationValue {
    /// Replace the field with the value.
    Set(Value),
    /// Merge the values into an array field, skipping ones already present.
    ///
    /// A missing or non-array field is treated as an empty array.
    ArrayUnion(Vec<Value>),
}

impl MutationValue {
    /// Builds an array-union mutation.
    #[must_use]
    pub fn array_union<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::ArrayUnion(values.into_iter().map(Into::into).collect())
    }

    /// Applies the mutation to the current field value.
    #[must_use]
    pub fn apply(&self, current: Option<Value>) -> Value {
        match self {
            Self::Set(value) => value.clone(),
            Self::ArrayUnion(values) => {
                let mut merged = match current {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                for value in values {
                    if !merged.contains(value) {
                        merged.push(value.clone());
                    }
                }
                Value::Array(merged)
            }
        }
    }
}

/// Targeted field updates applied to an existing document.
///
/// # Examples
///
/// ```
/// use chat_store::store::domain::FieldUpdates;
///
/// let updates = FieldUpdates::new()
///     .set("reported", true)
///     .array_union("file_ids", ["f1", "f2"]);
/// assert_eq!(updates.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdates(BTreeMap<String, MutationValue>);

impl FieldUpdates {
    /// Creates an empty update set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces `field` with `value`.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), MutationValue::Set(value.into()));
        self
    }

    /// Merges `values` into the array `field`.
    #[must_use]
    pub fn array_union<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.0
            .insert(field.into(), MutationValue::array_union(values));
        self
    }

    /// Returns the number of updated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing would be updated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the field mutations.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MutationValue)> {
        self.0.iter()
    }

    /// Applies every mutation to `fields` in place.
    pub fn apply_to(&self, fields: &mut Fields) {
        for (field, mutation) in &self.0 {
            let current = fields.remove(field);
            fields.insert(field.clone(), mutation.apply(current));
        }
    }
}

/// A single operation inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or fully overwrite a document.
    Set(DocumentRef, Fields),
    /// Apply targeted updates to an existing document.
    Update(DocumentRef, FieldUpdates),
    /// Remove a document; removing a missing document is a no-op.
    Delete(DocumentRef),
}

/// Writes committed atomically as one unit.
///
/// The store bounds how many operations one batch may hold; exceeding the
/// bound fails the whole commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Begins an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a full overwrite of `reference`.
    pub fn set(&mut self, reference: DocumentRef, fields: Fields) -> &mut Self {
        self.ops.push(WriteOp::Set(reference, fields));
        self
    }

    /// Queues targeted updates to `reference`.
    pub fn update(&mut self, reference: DocumentRef, updates: FieldUpdates) -> &mut Self {
        self.ops.push(WriteOp::Update(reference, updates));
        self
    }

    /// Queues deletion of `reference`.
    pub fn delete(&mut self, reference: DocumentRef) -> &mut Self {
        self.ops.push(WriteOp::Delete(reference));
        self
    }

    /// Returns the number of queued operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns the queued operations.
    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Consumes the batch, returning its operations.
    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}
