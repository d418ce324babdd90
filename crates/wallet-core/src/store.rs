//! Storage gateway contracts
//!
//! Everything above this layer talks to storage through these two traits.
//! `db::Database` is the SQLite implementation; tests use
//! `test_utils::MemoryStore`.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{Budget, BudgetCategory, NewTransaction, Transaction};

/// Sort order for transaction listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionOrder {
    /// Most recently created first
    #[default]
    Newest,
    /// Oldest transaction date first (chart input)
    DateAscending,
}

/// Filter for listing transactions. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub order: TransactionOrder,
    pub limit: Option<i64>,
}

impl TransactionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query bounded by an optional period (both ends or neither)
    pub fn period(period: Option<(NaiveDate, NaiveDate)>) -> Self {
        match period {
            Some((from, to)) => Self::new().from(Some(from)).to(Some(to)),
            None => Self::new(),
        }
    }

    pub fn from(mut self, date: Option<NaiveDate>) -> Self {
        self.date_from = date;
        self
    }

    pub fn to(mut self, date: Option<NaiveDate>) -> Self {
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

    /// Whether a transaction's date falls inside the bounds
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.date_from.map_or(true, |from| tx.date >= from)
            && self.date_to.map_or(true, |to| tx.date <= to)
    }
}

/// Transaction persistence
pub trait TransactionStore {
    fn list_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>>;

    /// Validate and insert. A transaction that fails validation is rejected
    /// before storage is touched.
    fn insert_transaction(&self, new: &NewTransaction) -> Result<Transaction>;
}

/// Budget persistence.
///
/// The application works with a single active budget. Implementations return
/// the lowest-id row from `active_budget` and log when more than one exists.
pub trait BudgetStore {
    fn active_budget(&self) -> Result<Option<Budget>>;

    fn create_budget(
        &self,
        income: Decimal,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Budget>;

    /// Write income, totals and period; stamps `updated_at`
    fn update_budget(&self, budget: &Budget) -> Result<()>;

    fn list_budget_categories(&self, budget_id: i64) -> Result<Vec<BudgetCategory>>;

    /// Insert when `id` is 0, update otherwise. Returns the row id.
    fn upsert_budget_category(&self, category: &BudgetCategory) -> Result<i64>;
}
