//! Error types for chat store operations.
//!
//! Expected absence is never an error here: read paths return `Option` or an
//! empty `Vec`. What remains are store round-trip failures and documents that
//! cannot be decoded.

use crate::chat::codec::CodecError;
use crate::store::error::StoreError;
use thiserror::Error;

/// Errors propagated by chat store operations.
#[derive(Debug, Clone, Error)]
pub enum ChatStoreError {
    /// A store round trip failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A document could not be converted to or from an entity.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result type for chat store operations.
pub type ChatStoreResult<T> = Result<T, ChatStoreError>;
