//! Conjunctive collection queries.

use super::CollectionPath;
use serde_json::Value;

/// A single field predicate. Predicates within a [`Query`] are conjunctive.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals the value. An absent field compares equal to `null`.
    Eq(String, Value),
    /// Field equals one of the values.
    In(String, Vec<Value>),
}

impl Filter {
    /// Returns the field the predicate applies to.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Eq(field, _) | Self::In(field, _) => field,
        }
    }
}

/// Sort direction for [`OrderBy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

/// Ordering clause applied before offset and limit.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// Field to sort on.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

/// A bounded, optionally ordered query over one collection.
///
/// # Examples
///
/// ```
/// use chat_store::store::domain::{CollectionPath, Direction, Query};
/// use serde_json::json;
///
/// let query = Query::new(CollectionPath::root("messages"))
///     .where_eq("app_id", json!(null))
///     .order_by("created_at", Direction::Descending)
///     .limit(20)
///     .offset(40);
/// assert_eq!(query.filters().len(), 1);
/// assert_eq!(query.limit_value(), Some(20));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    collection: CollectionPath,
    filters: Vec<Filter>,
    order_by: Option<OrderBy>,
    limit: Option<usize>,
    offset: usize,
}

impl Query {
    /// Creates an unfiltered, unbounded query over `collection`.
    #[must_use]
    pub const fn new(collection: CollectionPath) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
            limit: None,
            offset: 0,
        }
    }

    /// Adds an equality predicate.
    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(field.into(), value.into()));
        self
    }

    /// Adds a membership predicate.
    #[must_use]
    pub fn where_in(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.filters.push(Filter::In(field.into(), values));
        self
    }

    /// Sets the ordering clause, replacing any previous one.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Bounds the number of returned documents.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips the first `offset` matching documents.
    #[must_use]
    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the queried collection.
    #[must_use]
    pub const fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    /// Returns the predicates.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns the ordering clause.
    #[must_use]
    pub const fn ordering(&self) -> Option<&OrderBy> {
        self.order_by.as_ref()
    }

    /// Returns the limit, if bounded.
    #[must_use]
    pub const fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the offset.
    #[must_use]
    pub const fn offset_value(&self) -> usize {
        self.offset
    }
}
