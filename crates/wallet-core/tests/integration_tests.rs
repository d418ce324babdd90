//! Integration tests for wallet-core
//!
//! These tests exercise the record → plan → aggregate workflow against a real
//! SQLite database.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use wallet_core::{
    aggregation::{self, ChartRange, MonthSelection, SavingsWarning},
    categories,
    db::Database,
    models::{BudgetBucket, NewTransaction, TransactionType},
    planner::{init_budget, load_budget_plan, save_budget_plan},
    store::{TransactionOrder, TransactionQuery, TransactionStore},
    Error, ValidationError,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(db: &Database, kind: TransactionType, name: &str, amount: &str, category: &str, on: NaiveDate) {
    db.insert_transaction(&NewTransaction {
        name: name.to_string(),
        amount: dec(amount),
        transaction_type: kind,
        category: category.to_string(),
        date: on,
    })
    .expect("Failed to insert transaction");
}

/// A month of typical activity
fn seed_january(db: &Database) {
    use TransactionType::{Expense, Income};
    record(db, Income, "Salary", "2000.00", "salary", date(2024, 1, 1));
    record(db, Expense, "Supermarket", "180.00", "food", date(2024, 1, 3));
    record(db, Expense, "Bus pass", "60.00", "transport", date(2024, 1, 5));
    record(db, Expense, "Laptop instalment", "75.00", "bills", date(2024, 1, 10));
    record(db, Expense, "Cinema", "24.50", "entertainment", date(2024, 1, 12));
    record(db, Expense, "Weekend away", "400.00", "travel", date(2024, 1, 20));
    record(db, Expense, "Bitcoin", "50.00", "crypto", date(2024, 1, 21));
    // Outside the budget period
    record(db, Expense, "Rent", "900.00", "bills", date(2024, 2, 1));
}

// =============================================================================
// Workflow Tests
// =============================================================================

#[test]
fn test_full_budget_workflow() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    seed_january(&db);

    // Fresh install: default plan
    let plan = load_budget_plan(&db).unwrap();
    assert!(!plan.budget.is_persisted());
    assert!(plan.warnings(&[]).is_empty());

    let mut plan = init_budget(&db, dec("2000"), Some(date(2024, 1, 1)), Some(date(2024, 1, 31)))
        .expect("Failed to create budget");
    plan.set_allocation(BudgetBucket::Need, "Food", dec("200"));
    plan.set_allocation(BudgetBucket::Need, "Transport", dec("100"));
    plan.set_allocation(BudgetBucket::Need, "Laptop bill", dec("75"));
    plan.set_allocation(BudgetBucket::Want, "Entertainment subscription (streaming, music)", dec("30"));
    plan.set_allocation(BudgetBucket::Want, "Disposable", dec("1195"));
    assert!(plan.is_valid());

    let plan = save_budget_plan(&db, &plan).expect("Failed to save plan");
    assert_eq!(plan.budget.needs, dec("375"));
    assert_eq!(plan.budget.wants, dec("1225"));

    // Budget period restricts the transactions the warnings see
    let txs = db
        .list_transactions(&TransactionQuery::period(plan.period()))
        .unwrap();
    assert_eq!(txs.len(), 7);

    let warnings = plan.warnings(&txs);
    let warned: Vec<&str> = warnings.categories.iter().map(|w| w.category.as_str()).collect();
    // Food 180/200, Laptop bill 75/75, Entertainment 24.50/30 all reach 80%;
    // Transport 60/100 does not
    assert_eq!(warned.len(), 3);
    assert!(warned.contains(&"Food"));
    assert!(warned.contains(&"Laptop bill"));
    assert!(warned.contains(&"Entertainment subscription (streaming, music)"));

    // Expenses 789.50 of 2000 leaves 1210.50, well above the 400 goal
    assert_eq!(warnings.savings, None);
}

#[test]
fn test_savings_warning_counts_unmapped_expenses() {
    let db = Database::in_memory().unwrap();
    seed_january(&db);
    record(&db, TransactionType::Expense, "Flights", "900.00", "travel", date(2024, 1, 25));

    let plan = init_budget(&db, dec("2000"), Some(date(2024, 1, 1)), Some(date(2024, 1, 31))).unwrap();
    let txs = db
        .list_transactions(&TransactionQuery::period(plan.period()))
        .unwrap();

    // 1689.50 spent leaves 310.50, below the 400 goal
    assert_eq!(
        plan.warnings(&txs).savings,
        Some(SavingsWarning::BelowGoal {
            goal: dec("400"),
            money_left: dec("310.50"),
        })
    );
}

#[test]
fn test_unbalanced_plan_is_rejected_and_nothing_changes() {
    let db = Database::in_memory().unwrap();
    let mut plan = init_budget(&db, dec("1000"), None, None).unwrap();
    plan.set_allocation(BudgetBucket::Need, "Groceries", dec("500"));
    plan.set_allocation(BudgetBucket::Want, "Gym", dec("300.02"));

    let err = save_budget_plan(&db, &plan).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::UnbalancedBudget { .. })
    ));
    assert!(!err.is_store_error());

    let stored = load_budget_plan(&db).unwrap();
    assert_eq!(stored.needs_total(), Decimal::ZERO);
    assert!(stored.needs.iter().all(|c| c.id == 0));
}

#[test]
fn test_month_chart_and_analytics() {
    let db = Database::in_memory().unwrap();
    seed_january(&db);

    let month: MonthSelection = "2024-01".parse().unwrap();
    let (from, to) = month.range();
    let txs = db
        .list_transactions(
            &TransactionQuery::new()
                .from(Some(from))
                .to(Some(to))
                .order(TransactionOrder::DateAscending),
        )
        .unwrap();

    let series = aggregation::daily_balance_series(&txs, ChartRange::Month(month));
    assert_eq!(series.len(), 31);
    assert_eq!(series[0].balance, dec("2000.00"));
    assert_eq!(series[30].balance, aggregation::balance(&txs));
    assert_eq!(series[30].balance, dec("1210.50"));

    let breakdown = aggregation::analyze_categories(&txs);
    assert_eq!(breakdown.income.len(), 1);
    assert_eq!(breakdown.expense[0].category, "travel");

    // Unknown identifiers still render
    let crypto = breakdown
        .expense
        .iter()
        .find(|c| c.category == "crypto")
        .unwrap();
    let info = categories::lookup(TransactionType::Expense, &crypto.category);
    assert_eq!(info.name, categories::UNCATEGORIZED_NAME);
}

#[test]
fn test_reopening_database_keeps_data() {
    let path = std::env::temp_dir().join(format!("wallet_reopen_{}.db", std::process::id()));
    let path = path.to_string_lossy().into_owned();
    let _ = std::fs::remove_file(&path);

    {
        let db = Database::new(&path).unwrap();
        record(&db, TransactionType::Income, "Gift", "25", "gifts", date(2024, 3, 1));
        init_budget(&db, dec("100"), None, None).unwrap();
    }

    let db = Database::new(&path).unwrap();
    assert_eq!(db.list_transactions(&TransactionQuery::new()).unwrap().len(), 1);
    assert_eq!(load_budget_plan(&db).unwrap().budget.income, dec("100"));

    let _ = std::fs::remove_file(&path);
}
