//! Configuration for the chat store services.

use serde::Deserialize;
use std::num::NonZeroUsize;

/// Number of messages deleted per atomic batch when clearing a chat.
///
/// Kept below the store's hard per-commit bound.
pub const DEFAULT_DELETE_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(450) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Tunables for the chat store.
///
/// Deserialisable so hosts can embed it in their own configuration files;
/// omitted fields take their defaults.
///
/// # Examples
///
/// ```
/// use chat_store::chat::config::ChatStoreConfig;
/// use std::num::NonZeroUsize;
///
/// let config = ChatStoreConfig::default();
/// assert_eq!(config.delete_batch_size.get(), 450);
///
/// let small = ChatStoreConfig::default().with_delete_batch_size(NonZeroUsize::MIN);
/// assert_eq!(small.delete_batch_size.get(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChatStoreConfig {
    /// Maximum messages deleted per atomic batch by `clear_chat`.
    pub delete_batch_size: NonZeroUsize,
}

impl Default for ChatStoreConfig {
    fn default() -> Self {
        Self {
            delete_batch_size: DEFAULT_DELETE_BATCH_SIZE,
        }
    }
}

impl ChatStoreConfig {
    /// Overrides the delete batch size.
    #[must_use]
    pub const fn with_delete_batch_size(mut self, delete_batch_size: NonZeroUsize) -> Self {
        self.delete_batch_size = delete_batch_size;
        self
    }
}
