//! Cash Wallet Core Library
//!
//! Shared functionality for the Cash Wallet personal finance tracker:
//! - Transaction and budget models with pre-submit validation
//! - Category registry and the budget subcategory remapping
//! - Aggregation pipeline (balance, category breakdown, daily balance
//!   series, budget warnings, validity gate)
//! - Budget planner (merge with reference lines, save gate)
//! - Storage gateway traits with a SQLite implementation
//! - Request sequencing and view caching helpers

pub mod aggregation;
pub mod categories;
pub mod db;
pub mod error;
pub mod models;
pub mod planner;
pub mod store;
pub mod subcategories;
pub mod view;

/// Transaction builders and an in-process store with failure injection
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregation::{
    analyze_categories, balance, budget_warnings, daily_balance_series, format_money,
    is_budget_valid, savings_warning, summarize, BudgetWarnings, CategoryWarning, ChartRange,
    MonthSelection, SavingsWarning,
};
pub use categories::{categories_for, lookup, CategoryInfo, TransactionCategory};
pub use db::Database;
pub use error::{Error, Result, ValidationError};
pub use models::*;
pub use planner::{init_budget, load_budget_plan, save_budget_plan, BudgetPlan};
pub use store::{BudgetStore, TransactionOrder, TransactionQuery, TransactionStore};
pub use subcategories::{BudgetSubcategory, NeedSubcategory, WantSubcategory};
pub use view::{load_or, Loaded, RefreshSignal, RequestToken, ViewCache};
