//! Error types for Cash Wallet

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl Error {
    /// True for failures that came from the store (transport, query, missing
    /// records, corrupt rows) rather than from local pre-submit checks.
    pub fn is_store_error(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}

/// Local field checks that block a write before the store is contacted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields: name is required.")]
    MissingName,

    #[error("Please fill in all fields: amount is required.")]
    MissingAmount,

    #[error("Amount must not be negative.")]
    NegativeAmount,

    #[error("Please fill in all fields: category is required.")]
    MissingCategory,

    #[error("Needs + Wants + Savings must equal Income (income {income}, allocated {allocated}).")]
    UnbalancedBudget { income: Decimal, allocated: Decimal },

    #[error("Budget period start must not be after its end.")]
    InvalidPeriod,
}

pub type Result<T> = std::result::Result<T, Error>;
