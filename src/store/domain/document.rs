//! Stored documents and their untyped field maps.

use super::DocumentRef;
use serde_json::Value;

/// Untyped field map held by a document.
pub type Fields = serde_json::Map<String, Value>;

/// A document read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    reference: DocumentRef,
    fields: Fields,
}

impl Document {
    /// Creates a document snapshot.
    #[must_use]
    pub const fn new(reference: DocumentRef, fields: Fields) -> Self {
        Self { reference, fields }
    }

    /// Returns the store-assigned document id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.reference.id()
    }

    /// Returns the full document address.
    #[must_use]
    pub const fn reference(&self) -> &DocumentRef {
        &self.reference
    }

    /// Returns the document's fields.
    #[must_use]
    pub const fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Returns a single field, treating absence as `None`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Consumes the document, returning its fields.
    #[must_use]
    pub fn into_fields(self) -> Fields {
        self.fields
    }
}
