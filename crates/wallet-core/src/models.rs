//! Domain models for Cash Wallet

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Direction of a cash movement. The stored amount is always a magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {} (valid: income, expense)", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub name: String,
    /// Non-negative magnitude; the sign comes from `transaction_type`
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Category identifier from the registry (unknown ids are tolerated)
    pub category: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Amount with the sign applied: positive for income, negative for expenses
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// A transaction to be inserted (the store assigns the id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub name: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub date: NaiveDate,
}

impl NewTransaction {
    /// Field-completeness checks run before anything is sent to the store
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount);
        }
        if self.amount.is_zero() {
            return Err(ValidationError::MissingAmount);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        Ok(())
    }
}

/// The single active budget configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Budget {
    /// 0 when no budget has been persisted yet
    pub id: i64,
    pub income: Decimal,
    /// Sum of the need allocations as of the last save
    pub needs: Decimal,
    /// Sum of the want allocations as of the last save
    pub wants: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Budget {
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Budget period, only when both bounds are set
    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// Allocation bucket of a budget line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetBucket {
    Need,
    Want,
}

impl BudgetBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Need => "need",
            Self::Want => "want",
        }
    }
}

impl std::str::FromStr for BudgetBucket {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "need" | "needs" => Ok(Self::Need),
            "want" | "wants" => Ok(Self::Want),
            _ => Err(format!("Unknown budget bucket: {} (valid: need, want)", s)),
        }
    }
}

impl std::fmt::Display for BudgetBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One allocation line under a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    /// 0 = not yet persisted, inserted on save
    pub id: i64,
    pub budget_id: i64,
    #[serde(rename = "type")]
    pub bucket: BudgetBucket,
    /// Subcategory name (free text)
    pub category: String,
    pub amount: Decimal,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BudgetCategory {
    /// An unsaved zero-amount line
    pub fn placeholder(budget_id: i64, bucket: BudgetBucket, category: &str) -> Self {
        Self {
            id: 0,
            budget_id,
            bucket,
            category: category.to_string(),
            amount: Decimal::ZERO,
            updated_at: None,
        }
    }
}

// ========== Derived Models ==========

/// Per-category totals over a set of transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAnalysis {
    pub category: String,
    pub total: Decimal,
    pub count: i64,
}

/// Income and expense breakdowns for the analytics view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub income: Vec<CategoryAnalysis>,
    pub expense: Vec<CategoryAnalysis>,
}

/// Income/expense totals and the resulting balance
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

/// A point on the cumulative balance chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub date: NaiveDate,
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_tx(name: &str, amount: Decimal, category: &str) -> NewTransaction {
        NewTransaction {
            name: name.to_string(),
            amount,
            transaction_type: TransactionType::Expense,
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_transaction() {
        assert!(new_tx("Lunch", Decimal::new(1250, 2), "food")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert_eq!(
            new_tx("  ", Decimal::ONE, "food").validate(),
            Err(ValidationError::MissingName)
        );
        assert_eq!(
            new_tx("Lunch", Decimal::ZERO, "food").validate(),
            Err(ValidationError::MissingAmount)
        );
        assert_eq!(
            new_tx("Lunch", Decimal::ONE, "").validate(),
            Err(ValidationError::MissingCategory)
        );
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        assert_eq!(
            new_tx("Refund", Decimal::new(-500, 2), "food").validate(),
            Err(ValidationError::NegativeAmount)
        );
    }

    #[test]
    fn test_transaction_wire_shape() {
        let tx = Transaction {
            id: 7,
            name: "Salary".to_string(),
            amount: Decimal::new(250000, 2),
            transaction_type: TransactionType::Income,
            category: "salary".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["date"], "2024-01-20");
        assert_eq!(json["category"], "salary");
    }

    #[test]
    fn test_bucket_parse() {
        assert_eq!("needs".parse::<BudgetBucket>().unwrap(), BudgetBucket::Need);
        assert_eq!("Want".parse::<BudgetBucket>().unwrap(), BudgetBucket::Want);
        assert!("savings".parse::<BudgetBucket>().is_err());
    }

    #[test]
    fn test_budget_period_requires_both_bounds() {
        let mut budget = Budget {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert_eq!(budget.period(), None);
        budget.end_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        assert!(budget.period().is_some());
    }
}
