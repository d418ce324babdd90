//! Aggregation pipeline
//!
//! Pure reductions over an already-filtered set of transactions: balance,
//! per-category breakdown, the cumulative daily balance series used by the
//! chart, budget threshold warnings and the budget validity gate.
//!
//! Nothing in here does I/O or keeps state between calls. Callers that want
//! to avoid recomputation cache the results at the boundary (see `view`).

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::TransactionCategory;
use crate::models::{
    BudgetBucket, BudgetCategory, CategoryAnalysis, CategoryBreakdown, ChartPoint, Transaction,
    TransactionSummary, TransactionType,
};
use crate::subcategories::{budget_subcategory, BudgetSubcategory};

/// Share of income always reserved for savings (20%)
pub fn savings_rate() -> Decimal {
    Decimal::new(2, 1)
}

/// Share of an allocation that triggers a category warning (80%, inclusive)
pub fn warning_threshold() -> Decimal {
    Decimal::new(8, 1)
}

/// Margin above the savings goal that still counts as "close" (10% of the goal)
pub fn savings_margin() -> Decimal {
    Decimal::new(1, 1)
}

/// Tolerance of the budget validity gate
pub fn budget_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

// ========== Balance & Summary ==========

/// Income minus expenses
pub fn balance(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(Transaction::signed_amount).sum()
}

/// Income total, expense total and balance in one pass
pub fn summarize(transactions: &[Transaction]) -> TransactionSummary {
    let mut summary = TransactionSummary::default();
    for tx in transactions {
        match tx.transaction_type {
            TransactionType::Income => summary.income += tx.amount,
            TransactionType::Expense => summary.expenses += tx.amount,
        }
    }
    summary.balance = summary.income - summary.expenses;
    summary
}

// ========== Category Breakdown ==========

/// Group each transaction type by category identifier.
///
/// Only categories that occur in `transactions` appear in the result. Each
/// side is ordered by total (largest first), then by identifier.
pub fn analyze_categories(transactions: &[Transaction]) -> CategoryBreakdown {
    CategoryBreakdown {
        income: analyze_type(transactions, TransactionType::Income),
        expense: analyze_type(transactions, TransactionType::Expense),
    }
}

fn analyze_type(transactions: &[Transaction], transaction_type: TransactionType) -> Vec<CategoryAnalysis> {
    let mut grouped: BTreeMap<&str, (Decimal, i64)> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.transaction_type == transaction_type) {
        let entry = grouped.entry(tx.category.as_str()).or_default();
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    let mut result: Vec<CategoryAnalysis> = grouped
        .into_iter()
        .map(|(category, (total, count))| CategoryAnalysis {
            category: category.to_string(),
            total,
            count,
        })
        .collect();
    result.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    result
}

// ========== Daily Balance Series ==========

/// A calendar month, written `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthSelection {
    pub year: i32,
    pub month: u32,
}

impl MonthSelection {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month, from the calendar rather than a table of lengths
    pub fn last_day(&self) -> NaiveDate {
        let first = self.first_day();
        first
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first)
    }

    /// Every day of the month, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last_day();
        self.first_day().iter_days().take_while(move |d| *d <= last)
    }

    pub fn num_days(&self) -> u32 {
        self.last_day().day()
    }

    /// Inclusive date range covering the month
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.last_day())
    }
}

impl std::str::FromStr for MonthSelection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || format!("Invalid month: {} (use YYYY-MM)", s);
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl std::fmt::Display for MonthSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Which dates the balance chart plots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRange {
    /// Every day of the month, including days without transactions
    Month(MonthSelection),
    /// Only the distinct dates present in the transactions
    Observed,
}

/// Cumulative balance per day.
///
/// The running sum starts at zero at the first plotted date: transactions
/// outside the given set do not contribute an opening balance, so the first
/// point is that day's net movement, not the account's true balance.
pub fn daily_balance_series(transactions: &[Transaction], range: ChartRange) -> Vec<ChartPoint> {
    let mut deltas: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for tx in transactions {
        *deltas.entry(tx.date).or_default() += tx.signed_amount();
    }

    let dates: Vec<NaiveDate> = match range {
        ChartRange::Month(month) => month.days().collect(),
        ChartRange::Observed => deltas.keys().copied().collect(),
    };

    let mut running = Decimal::ZERO;
    dates
        .into_iter()
        .map(|date| {
            running += deltas.get(&date).copied().unwrap_or_default();
            ChartPoint {
                label: chart_label(date, range),
                date,
                balance: running,
            }
        })
        .collect()
}

fn chart_label(date: NaiveDate, range: ChartRange) -> String {
    match range {
        ChartRange::Month(_) => date.format("%d").to_string(),
        ChartRange::Observed => date.format("%-d %b").to_string(),
    }
}

// ========== Budget Warnings ==========

/// Spending on a budget line has reached the warning threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWarning {
    pub bucket: BudgetBucket,
    pub category: String,
    pub allocated: Decimal,
    pub spent: Decimal,
}

/// Position of the money left against the savings goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SavingsWarning {
    BelowGoal { goal: Decimal, money_left: Decimal },
    CloseToGoal { goal: Decimal, money_left: Decimal },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetWarnings {
    pub categories: Vec<CategoryWarning>,
    pub savings: Option<SavingsWarning>,
}

impl BudgetWarnings {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.savings.is_none()
    }
}

/// Spending per budget subcategory. Expenses whose category has no mapping
/// are left out.
pub fn mapped_spending(transactions: &[Transaction]) -> HashMap<BudgetSubcategory, Decimal> {
    let mut spent: HashMap<BudgetSubcategory, Decimal> = HashMap::new();
    for tx in transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
    {
        let sub = TransactionCategory::from_id(TransactionType::Expense, &tx.category)
            .and_then(budget_subcategory);
        if let Some(sub) = sub {
            *spent.entry(sub).or_default() += tx.amount;
        }
    }
    spent
}

/// Warnings for the budget lines and the savings goal.
///
/// A line warns when spending reaches 80% of a positive allocation. The
/// savings check looks at every expense, mapped or not.
pub fn budget_warnings(
    transactions: &[Transaction],
    income: Decimal,
    allocations: &[BudgetCategory],
) -> BudgetWarnings {
    let spent_by_sub = mapped_spending(transactions);

    let categories = allocations
        .iter()
        .filter(|line| line.amount > Decimal::ZERO)
        .filter_map(|line| {
            let spent: Decimal = spent_by_sub
                .iter()
                .filter(|(sub, _)| sub.bucket() == line.bucket && sub.name() == line.category)
                .map(|(_, amount)| *amount)
                .sum();
            (spent >= line.amount * warning_threshold()).then(|| CategoryWarning {
                bucket: line.bucket,
                category: line.category.clone(),
                allocated: line.amount,
                spent,
            })
        })
        .collect();

    let total_expenses = summarize(transactions).expenses;

    BudgetWarnings {
        categories,
        savings: savings_warning(income, total_expenses),
    }
}

/// Compare what is left of `income` against the 20% savings goal
pub fn savings_warning(income: Decimal, total_expenses: Decimal) -> Option<SavingsWarning> {
    let goal = income * savings_rate();
    let money_left = income - total_expenses;

    if money_left < goal {
        Some(SavingsWarning::BelowGoal { goal, money_left })
    } else if money_left - goal <= goal * savings_margin() {
        Some(SavingsWarning::CloseToGoal { goal, money_left })
    } else {
        None
    }
}

// ========== Budget Validity ==========

/// Save gate: needs + wants + 20% savings must equal income, within 0.01.
/// A zero income is always accepted.
pub fn is_budget_valid(income: Decimal, needs_total: Decimal, wants_total: Decimal) -> bool {
    if income.is_zero() {
        return true;
    }
    let allocated = needs_total + wants_total + income * savings_rate();
    (allocated - income).abs() < budget_tolerance()
}

/// Format an amount for display with two decimal places
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded < Decimal::ZERO {
        format!("-£{:.2}", rounded.abs())
    } else {
        format!("£{:.2}", rounded)
    }
}
