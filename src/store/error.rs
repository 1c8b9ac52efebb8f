//! Errors surfaced by document store round trips.

use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during a store round trip.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A targeted update addressed a document that does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// A write batch held more operations than the store accepts atomically.
    #[error("write batch of {size} operations exceeds limit of {limit}")]
    BatchTooLarge {
        /// Number of operations in the rejected batch.
        size: usize,
        /// Maximum operations per batch.
        limit: usize,
    },

    /// The store could not be reached or rejected the request transiently.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("store backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Wraps a backend error.
    #[must_use]
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
