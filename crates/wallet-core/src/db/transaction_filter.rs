//! SQL clause builder for transaction listings
//!
//! Turns a `TransactionQuery` into WHERE / ORDER BY / LIMIT fragments plus
//! boxed parameters, so listing and counting share one definition of the
//! filter.

use chrono::NaiveDate;

use crate::store::{TransactionOrder, TransactionQuery};

/// Builder for constructing transaction query filters
#[derive(Debug, Default)]
pub struct TransactionFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub order: TransactionOrder,
    pub limit: Option<i64>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: &'static str,
    /// LIMIT clause (empty if unlimited)
    pub limit_clause: &'static str,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl From<&TransactionQuery> for TransactionFilter {
    fn from(query: &TransactionQuery) -> Self {
        Self::new()
            .date_from(query.date_from)
            .date_to(query.date_to)
            .order(query.order)
            .limit(query.limit)
    }
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive lower date bound
    pub fn date_from(mut self, date: Option<NaiveDate>) -> Self {
        self.date_from = date;
        self
    }

    /// Inclusive upper date bound
    pub fn date_to(mut self, date: Option<NaiveDate>) -> Self {
        self.date_to = date;
        self
    }

    pub fn order(mut self, order: TransactionOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: Option<i64>) -> Self {
        self.limit = limit;
        self
    }

    /// Build the filter components
    pub fn build(self) -> FilterResult {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        // ISO dates compare correctly as strings
        if let Some(from) = self.date_from {
            conditions.push("t.date >= ?");
            params.push(Box::new(from.to_string()));
        }
        if let Some(to) = self.date_to {
            conditions.push("t.date <= ?");
            params.push(Box::new(to.to_string()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let order_clause = match self.order {
            TransactionOrder::Newest => "ORDER BY t.created_at DESC, t.id DESC",
            TransactionOrder::DateAscending => "ORDER BY t.date ASC, t.id ASC",
        };

        let limit_clause = match self.limit {
            Some(limit) => {
                params.push(Box::new(limit));
                "LIMIT ?"
            }
            None => "",
        };

        FilterResult {
            where_clause,
            order_clause,
            limit_clause,
            params,
        }
    }
}

impl FilterResult {
    /// Build a COUNT query (LIMIT is ignored)
    pub fn build_count_query(&self) -> String {
        format!("SELECT COUNT(*) FROM transactions t {}", self.where_clause)
    }

    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }

    /// Parameter references without the trailing LIMIT value
    pub fn filter_params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        let n = if self.limit_clause.is_empty() {
            self.params.len()
        } else {
            self.params.len() - 1
        };
        self.params[..n].iter().map(|p| p.as_ref()).collect()
    }
}
