//! Shared test helpers for in-memory chat store integration tests.

use std::{io, sync::Arc};

use chat_store::chat::{
    ChatStore,
    config::ChatStoreConfig,
    domain::{Message, Sender, StorageDocId, UserId, UserPartition},
};
use chat_store::store::{
    adapters::memory::InMemoryDocumentStore,
    domain::Fields,
    ports::DocumentStore,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;
use tokio::runtime::Runtime;

/// Boxed error returned by integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Chat store type used by the integration tests.
pub type TestChatStore = ChatStore<InMemoryDocumentStore, DefaultClock>;

/// A chat store together with direct access to its backing store.
pub struct Harness {
    /// The backing document store.
    pub store: Arc<InMemoryDocumentStore>,
    /// The chat store under test.
    pub chat: TestChatStore,
}

impl Harness {
    /// Builds a harness with the given configuration.
    #[must_use]
    pub fn with_config(config: ChatStoreConfig) -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        let chat = ChatStore::new(Arc::clone(&store), Arc::new(DefaultClock), config);
        Self { store, chat }
    }

    /// Creates the user document that marks `uid`'s partition as existing.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn create_user(&self, uid: &UserId) -> TestResult {
        let partition = UserPartition::new(uid);
        self.store
            .set(partition.user_document(), Fields::new())
            .await?;
        Ok(())
    }

    /// Stores a conversation record with a title.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn put_conversation(&self, uid: &UserId, id: &str, title: &str) -> TestResult {
        let mut fields = Fields::new();
        fields.insert("title".to_owned(), Value::String(title.to_owned()));
        self.store
            .set(&UserPartition::new(uid).conversations().doc(id), fields)
            .await?;
        Ok(())
    }

    /// Persists `message` and returns its document id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn add(&self, uid: &UserId, message: &Message) -> TestResult<StorageDocId> {
        Ok(self.chat.messages().add_message(uid, message).await?)
    }
}

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a fresh harness with default configuration.
#[fixture]
pub fn harness() -> Harness {
    Harness::with_config(ChatStoreConfig::default())
}

/// Provides the user most tests act as.
#[fixture]
pub fn uid() -> UserId {
    UserId::new("user-1")
}

/// Returns a fixed instant `minutes` after a common base time.
#[must_use]
pub fn minute(minutes: i64) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("valid base timestamp"));
    base + Duration::minutes(minutes)
}

/// Builds a human message created at `minute(at)`.
#[must_use]
pub fn message_at(text: &str, at: i64) -> Message {
    Message::new(text, Sender::Human, &DefaultClock).with_created_at(minute(at))
}

/// Returns the texts of a listing, in order.
#[must_use]
pub fn texts(messages: &[chat_store::chat::domain::ResolvedMessage]) -> Vec<&str> {
    messages.iter().map(|resolved| resolved.message.text()).collect()
}
