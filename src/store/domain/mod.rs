//! Value types describing store addresses, documents, queries and writes.

mod document;
mod mutation;
mod path;
mod query;

pub use document::{Document, Fields};
pub use mutation::{FieldUpdates, MutationValue, WriteBatch, WriteOp};
pub use path::{CollectionPath, DocumentRef};
pub use query::{Direction, Filter, OrderBy, Query};
