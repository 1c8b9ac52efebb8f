//! Port trait definitions for the document store.

pub mod document_store;

pub use document_store::{DocumentStore, StoreResult};

#[cfg(test)]
pub use document_store::MockDocumentStore;
