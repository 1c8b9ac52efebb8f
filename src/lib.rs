//! Chat store: a per-user conversational message store.
//!
//! This crate manages chat messages, the conversations ("memories") and
//! files they reference, and the chat sessions grouping them, on top of a
//! schemaless hierarchical document store without joins or cascading
//! deletes.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: pure entity types with no infrastructure dependencies
//! - **Ports**: the [`store::ports::DocumentStore`] capability interface
//! - **Adapters**: concrete store implementations
//! - **Services**: query building, fetch-join, bulk mutation and session
//!   lifecycle
//!
//! # Modules
//!
//! - [`store`]: document store port, value types and in-memory adapter
//! - [`chat`]: messages, files and sessions over a user partition

pub mod chat;
pub mod store;
