//! Collection and document addresses within the store hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of a collection: an odd-length chain of path segments.
///
/// Top-level collections have one segment; nested collections hang off a
/// document, as in `users/{uid}/messages`.
///
/// # Examples
///
/// ```
/// use chat_store::store::domain::CollectionPath;
///
/// let messages = CollectionPath::root("users").doc("u1").collection("messages");
/// assert_eq!(messages.to_string(), "users/u1/messages");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectionPath {
    parent: Option<Box<DocumentRef>>,
    name: String,
}

impl CollectionPath {
    /// Creates a top-level collection path.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            parent: None,
            name: name.into(),
        }
    }

    /// Returns the reference of the document `id` inside this collection.
    #[must_use]
    pub fn doc(&self, id: impl Into<String>) -> DocumentRef {
        DocumentRef {
            collection: self.clone(),
            id: id.into(),
        }
    }

    /// Returns the collection's own name (the last path segment).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the document owning this collection, if nested.
    #[must_use]
    pub fn parent(&self) -> Option<&DocumentRef> {
        self.parent.as_deref()
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{parent}/{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Address of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentRef {
    collection: CollectionPath,
    id: String,
}

impl DocumentRef {
    /// Returns the nested collection `name` owned by this document.
    #[must_use]
    pub fn collection(&self, name: impl Into<String>) -> CollectionPath {
        CollectionPath {
            parent: Some(Box::new(self.clone())),
            name: name.into(),
        }
    }

    /// Returns the document id (the last path segment).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the collection containing this document.
    #[must_use]
    pub const fn parent(&self) -> &CollectionPath {
        &self.collection
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}
