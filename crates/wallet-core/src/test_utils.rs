//! Test helpers: transaction builders and an in-process store
//!
//! `MemoryStore` implements both gateway traits over plain vectors and can
//! be told to fail reads or writes, which is how the fallback paths are
//! exercised without a broken database.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{Budget, BudgetCategory, NewTransaction, Transaction, TransactionType};
use crate::store::{BudgetStore, TransactionOrder, TransactionQuery, TransactionStore};

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

/// Parse a decimal literal; panics on bad input
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_else(|_| panic!("bad decimal literal: {}", s))
}

pub fn transaction(
    transaction_type: TransactionType,
    name: &str,
    amount: &str,
    category: &str,
    date: NaiveDate,
) -> Transaction {
    Transaction {
        id: NEXT_ID.fetch_add(1, Ordering::SeqCst),
        name: name.to_string(),
        amount: dec(amount),
        transaction_type,
        category: category.to_string(),
        date,
        created_at: Utc::now(),
    }
}

pub fn income(name: &str, amount: &str, category: &str, date: NaiveDate) -> Transaction {
    transaction(TransactionType::Income, name, amount, category, date)
}

pub fn expense(name: &str, amount: &str, category: &str, date: NaiveDate) -> Transaction {
    transaction(TransactionType::Expense, name, amount, category, date)
}

pub fn new_transaction(
    transaction_type: TransactionType,
    name: &str,
    amount: &str,
    category: &str,
    date: NaiveDate,
) -> NewTransaction {
    NewTransaction {
        name: name.to_string(),
        amount: dec(amount),
        transaction_type,
        category: category.to_string(),
        date,
    }
}

#[derive(Default)]
struct MemoryState {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    categories: Vec<BudgetCategory>,
    next_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store with failure injection
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read return a store error
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write return a store error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of writes that reached the store
    pub fn write_count(&self) -> i64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::InvalidData("simulated read failure".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::InvalidData("simulated write failure".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Insert a budget row directly, bypassing the single-budget flow
    pub fn push_budget(&self, budget: Budget) {
        self.state().budgets.push(budget);
    }
}

impl TransactionStore for MemoryStore {
    fn list_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        self.check_read()?;
        let state = self.state();
        let mut result: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect();
        match query.order {
            TransactionOrder::Newest => result.sort_by(|a, b| b.id.cmp(&a.id)),
            TransactionOrder::DateAscending => {
                result.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)))
            }
        }
        if let Some(limit) = query.limit {
            result.truncate(limit.max(0) as usize);
        }
        Ok(result)
    }

    fn insert_transaction(&self, new: &NewTransaction) -> Result<Transaction> {
        new.validate()?;
        self.check_write()?;
        let mut state = self.state();
        let tx = Transaction {
            id: state.next_id(),
            name: new.name.trim().to_string(),
            amount: new.amount,
            transaction_type: new.transaction_type,
            category: new.category.clone(),
            date: new.date,
            created_at: Utc::now(),
        };
        state.transactions.push(tx.clone());
        Ok(tx)
    }
}

impl BudgetStore for MemoryStore {
    fn active_budget(&self) -> Result<Option<Budget>> {
        self.check_read()?;
        Ok(self.state().budgets.iter().min_by_key(|b| b.id).cloned())
    }

    fn create_budget(
        &self,
        income: Decimal,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Budget> {
        self.check_write()?;
        let mut state = self.state();
        let budget = Budget {
            id: state.next_id(),
            income,
            start_date,
            end_date,
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        state.budgets.push(budget.clone());
        Ok(budget)
    }

    fn update_budget(&self, budget: &Budget) -> Result<()> {
        self.check_write()?;
        let mut state = self.state();
        let row = state
            .budgets
            .iter_mut()
            .find(|b| b.id == budget.id)
            .ok_or_else(|| Error::NotFound(format!("budget {}", budget.id)))?;
        *row = Budget {
            updated_at: Some(Utc::now()),
            ..budget.clone()
        };
        Ok(())
    }

    fn list_budget_categories(&self, budget_id: i64) -> Result<Vec<BudgetCategory>> {
        self.check_read()?;
        Ok(self
            .state()
            .categories
            .iter()
            .filter(|c| c.budget_id == budget_id)
            .cloned()
            .collect())
    }

    fn upsert_budget_category(&self, category: &BudgetCategory) -> Result<i64> {
        self.check_write()?;
        let mut state = self.state();
        let existing = state.categories.iter().position(|c| {
            if category.id == 0 {
                c.budget_id == category.budget_id
                    && c.bucket == category.bucket
                    && c.category == category.category
            } else {
                c.id == category.id
            }
        });

        match existing {
            Some(idx) => {
                let row = &mut state.categories[idx];
                row.amount = category.amount;
                row.updated_at = Some(Utc::now());
                Ok(row.id)
            }
            None if category.id != 0 => {
                Err(Error::NotFound(format!("budget category {}", category.id)))
            }
            None => {
                let id = state.next_id();
                state.categories.push(BudgetCategory {
                    id,
                    updated_at: Some(Utc::now()),
                    ..category.clone()
                });
                Ok(id)
            }
        }
    }
}
