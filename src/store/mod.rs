//! Hierarchical document store capability consumed by the chat core.
//!
//! The store is schemaless: collections hold documents keyed by id, and
//! documents may own nested collections. It offers conjunctive equality
//! queries, order-preserving multi-get, atomic write batches bounded in size,
//! and an array-union mutation. It offers no joins and no cascading deletes.
//!
//! # Architecture
//!
//! - **Domain**: paths, documents, queries and mutations ([`domain`])
//! - **Ports**: the [`ports::DocumentStore`] trait
//! - **Adapters**: [`adapters::memory::InMemoryDocumentStore`]
//!
//! # Example
//!
//! ```
//! use chat_store::store::adapters::memory::InMemoryDocumentStore;
//! use chat_store::store::domain::{CollectionPath, Fields, Query};
//! use chat_store::store::ports::DocumentStore;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryDocumentStore::new();
//! let notes = CollectionPath::root("notes");
//! let mut fields = Fields::new();
//! fields.insert("title".to_owned(), json!("hello"));
//! store.set(&notes.doc("n1"), fields).await?;
//!
//! let found = store.query(&Query::new(notes)).await?;
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
