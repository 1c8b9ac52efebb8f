//! Per-user conversational message store.
//!
//! Messages, the conversations and files they reference, and the chat
//! sessions grouping them all live in one user's partition of a
//! [`DocumentStore`]. Relations are stored as id lists and resolved on read
//! by batch lookups, since the store has no joins.
//!
//! # Architecture
//!
//! - **Domain**: entities and ids ([`domain`])
//! - **Codec**: explicit document encoding and decoding ([`codec`])
//! - **Services**: query building, fetch-join, bulk writes and the operation
//!   surface ([`services`])
//! - **Composition root**: [`ChatStore`]
//!
//! [`DocumentStore`]: crate::store::ports::DocumentStore

pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;

mod composition;

pub use composition::ChatStore;
