//! Adapters implementing the [`DocumentStore`] port.
//!
//! - [`memory::InMemoryDocumentStore`]: thread-safe in-memory storage for
//!   tests and embedding
//!
//! [`DocumentStore`]: crate::store::ports::DocumentStore

pub mod memory;
