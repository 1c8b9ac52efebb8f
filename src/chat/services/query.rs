//! Paginated message query construction.
//!
//! Filters, ordering and pagination are pushed to the store. Moderation is
//! not: reported messages are dropped after retrieval, so a page may hold
//! fewer messages than its `limit`.

use crate::chat::domain::{Message, SessionId, UserPartition};
use crate::store::domain::{Direction, Query};
use serde_json::Value;

pub(crate) const ID_FIELD: &str = "id";
pub(crate) const APP_ID_FIELD: &str = "app_id";
pub(crate) const CHAT_SESSION_ID_FIELD: &str = "chat_session_id";
pub(crate) const CREATED_AT_FIELD: &str = "created_at";
pub(crate) const REPORTED_FIELD: &str = "reported";

/// Default page size for message listings.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// The app and session scope a message listing or clear applies to.
///
/// The app predicate is always applied: an absent app id selects messages
/// with no app scope rather than acting as a wildcard. The session predicate
/// applies only when a session is given.
///
/// # Examples
///
/// ```
/// use chat_store::chat::domain::SessionId;
/// use chat_store::chat::services::MessageScope;
///
/// let scope = MessageScope::app("p1").with_session(SessionId::new("s1"));
/// assert_eq!(scope.app_id(), Some("p1"));
/// assert!(MessageScope::default().app_id().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageScope {
    app_id: Option<String>,
    chat_session_id: Option<SessionId>,
}

impl MessageScope {
    /// Scope covering messages that belong to no app.
    #[must_use]
    pub fn unscoped() -> Self {
        Self::default()
    }

    /// Scope covering messages of `app_id`.
    #[must_use]
    pub fn app(app_id: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            chat_session_id: None,
        }
    }

    /// Builds a scope from optional parts.
    #[must_use]
    pub const fn new(app_id: Option<String>, chat_session_id: Option<SessionId>) -> Self {
        Self {
            app_id,
            chat_session_id,
        }
    }

    /// Narrows the scope to one chat session.
    #[must_use]
    pub fn with_session(mut self, chat_session_id: SessionId) -> Self {
        self.chat_session_id = Some(chat_session_id);
        self
    }

    /// Returns the app scope.
    #[must_use]
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    /// Returns the session scope.
    #[must_use]
    pub const fn chat_session_id(&self) -> Option<&SessionId> {
        self.chat_session_id.as_ref()
    }

    /// Adds this scope's predicates to `query`.
    #[must_use]
    pub fn apply(&self, query: Query) -> Query {
        let app_value = self
            .app_id
            .as_ref()
            .map_or(Value::Null, |app_id| Value::String(app_id.clone()));
        let scoped = query.where_eq(APP_ID_FIELD, app_value);
        match &self.chat_session_id {
            Some(session_id) => scoped.where_eq(CHAT_SESSION_ID_FIELD, session_id.as_str()),
            None => scoped,
        }
    }
}

/// Offset/limit page request, newest messages first.
///
/// `limit` bounds the documents fetched from the store, before moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagePage {
    /// Maximum documents fetched.
    pub limit: usize,
    /// Documents skipped before the page starts.
    pub offset: usize,
}

impl Default for MessagePage {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl MessagePage {
    /// Creates a page request.
    #[must_use]
    pub const fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Returns the page that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }
}

/// Builds the store query for one page of a scoped listing.
#[must_use]
pub fn listing_query(partition: &UserPartition, scope: &MessageScope, page: MessagePage) -> Query {
    scope
        .apply(Query::new(partition.messages()))
        .order_by(CREATED_AT_FIELD, Direction::Descending)
        .limit(page.limit)
        .offset(page.offset)
}

/// Drops reported messages from a fetched page.
#[must_use]
pub fn without_reported(messages: Vec<Message>) -> Vec<Message> {
    messages
        .into_iter()
        .filter(|message| !message.is_reported())
        .collect()
}
