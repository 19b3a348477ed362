//! Transaction filter builder for constructing dynamic SQL queries
//!
//! Listing and counting share the same WHERE clause, so both go through
//! [`TransactionFilter::build`].

use chrono::NaiveDate;

use crate::models::{Category, TransactionType};

/// Default page size when no limit is given
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest page a caller may request
pub const MAX_LIMIT: i64 = 500;

/// Builder for constructing transaction query filters
///
/// Every query is scoped to one owner; the owner is supplied at build time
/// rather than stored on the filter so a filter parsed from a request can
/// never reach another user's rows.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub category: Option<Category>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Case-insensitive substring match on the title
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword
    pub where_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl TransactionFilter {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transaction_type(mut self, value: Option<TransactionType>) -> Self {
        self.transaction_type = value;
        self
    }

    pub fn category(mut self, value: Option<Category>) -> Self {
        self.category = value;
        self
    }

    /// Set inclusive date bounds; either side may be open
    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn search(mut self, query: Option<String>) -> Self {
        self.search = query;
        self
    }

    pub fn limit(mut self, limit: Option<i64>) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: Option<i64>) -> Self {
        self.offset = offset;
        self
    }

    /// Page size actually applied, clamped to `1..=MAX_LIMIT`
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Offset actually applied; negative offsets become 0
    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// Build the filter components for one owner
    pub fn build(&self, owner_id: i64) -> FilterResult {
        let mut conditions = vec!["owner_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(owner_id)];

        if let Some(t) = self.transaction_type {
            conditions.push("type = ?".to_string());
            params.push(Box::new(t.as_str()));
        }

        if let Some(c) = self.category {
            conditions.push("category = ?".to_string());
            params.push(Box::new(c.as_str()));
        }

        if let Some(from) = self.from {
            conditions.push("date >= ?".to_string());
            params.push(Box::new(from.to_string()));
        }

        if let Some(to) = self.to {
            conditions.push("date <= ?".to_string());
            params.push(Box::new(to.to_string()));
        }

        if let Some(ref q) = self.search {
            if !q.trim().is_empty() {
                conditions.push("title LIKE ? COLLATE NOCASE".to_string());
                params.push(Box::new(format!("%{}%", q.trim())));
            }
        }

        FilterResult {
            where_clause: format!("WHERE {}", conditions.join(" AND ")),
            params,
        }
    }
}
