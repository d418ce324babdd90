//! Budget plan: the active budget plus its need and want allocation lines
//!
//! Stored lines are merged with the reference subcategory lists so that every
//! default line is always present for editing. Lines that were never saved
//! carry id 0 and are inserted on the next save.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregation::{budget_warnings, is_budget_valid, savings_rate, BudgetWarnings};
use crate::error::{Error, Result, ValidationError};
use crate::models::{Budget, BudgetBucket, BudgetCategory, Transaction};
use crate::store::BudgetStore;
use crate::subcategories::{canonical_name, reference_names};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub budget: Budget,
    pub needs: Vec<BudgetCategory>,
    pub wants: Vec<BudgetCategory>,
}

impl Default for BudgetPlan {
    fn default() -> Self {
        Self::from_stored(Budget::default(), Vec::new())
    }
}

impl BudgetPlan {
    /// Merge stored lines with the reference lists.
    ///
    /// Stored lines win over defaults. Reference names without a stored line
    /// become zero-amount placeholders. Stored lines outside the reference
    /// list are kept after the defaults.
    pub fn from_stored(budget: Budget, stored: Vec<BudgetCategory>) -> Self {
        let needs = merge_bucket(budget.id, BudgetBucket::Need, &stored);
        let wants = merge_bucket(budget.id, BudgetBucket::Want, &stored);
        Self {
            budget,
            needs,
            wants,
        }
    }

    pub fn lines(&self, bucket: BudgetBucket) -> &[BudgetCategory] {
        match bucket {
            BudgetBucket::Need => &self.needs,
            BudgetBucket::Want => &self.wants,
        }
    }

    fn lines_mut(&mut self, bucket: BudgetBucket) -> &mut Vec<BudgetCategory> {
        match bucket {
            BudgetBucket::Need => &mut self.needs,
            BudgetBucket::Want => &mut self.wants,
        }
    }

    pub fn needs_total(&self) -> Decimal {
        self.needs.iter().map(|c| c.amount).sum()
    }

    pub fn wants_total(&self) -> Decimal {
        self.wants.iter().map(|c| c.amount).sum()
    }

    /// The fixed 20% savings share of income
    pub fn savings(&self) -> Decimal {
        self.budget.income * savings_rate()
    }

    /// Needs + wants + savings
    pub fn allocated(&self) -> Decimal {
        self.needs_total() + self.wants_total() + self.savings()
    }

    pub fn is_valid(&self) -> bool {
        is_budget_valid(self.budget.income, self.needs_total(), self.wants_total())
    }

    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.budget.period()
    }

    /// Set the amount of a line, adding an unsaved line if the name is new
    pub fn set_allocation(&mut self, bucket: BudgetBucket, name: &str, amount: Decimal) {
        let budget_id = self.budget.id;
        let lines = self.lines_mut(bucket);
        match lines.iter_mut().find(|c| c.category.eq_ignore_ascii_case(name)) {
            Some(line) => line.amount = amount,
            None => {
                let mut line = BudgetCategory::placeholder(budget_id, bucket, name);
                line.amount = amount;
                lines.push(line);
            }
        }
    }

    /// Checks that gate a save
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if let (Some(start), Some(end)) = (self.budget.start_date, self.budget.end_date) {
            if start > end {
                return Err(ValidationError::InvalidPeriod);
            }
        }
        if !self.is_valid() {
            return Err(ValidationError::UnbalancedBudget {
                income: self.budget.income,
                allocated: self.allocated(),
            });
        }
        Ok(())
    }

    /// Category and savings warnings for the given transactions.
    /// Nothing is reported until a budget has been persisted.
    pub fn warnings(&self, transactions: &[Transaction]) -> BudgetWarnings {
        if !self.budget.is_persisted() {
            return BudgetWarnings::default();
        }
        let lines: Vec<BudgetCategory> = self.needs.iter().chain(&self.wants).cloned().collect();
        budget_warnings(transactions, self.budget.income, &lines)
    }
}

fn merge_bucket(budget_id: i64, bucket: BudgetBucket, stored: &[BudgetCategory]) -> Vec<BudgetCategory> {
    let stored: Vec<&BudgetCategory> = stored.iter().filter(|c| c.bucket == bucket).collect();

    let mut lines: Vec<BudgetCategory> = reference_names(bucket)
        .into_iter()
        .map(|name| {
            stored
                .iter()
                .find(|c| c.category == name)
                .or_else(|| stored.iter().find(|c| canonical_name(bucket, &c.category) == Some(name)))
                .map(|c| BudgetCategory {
                    category: name.to_string(),
                    ..(*c).clone()
                })
                .unwrap_or_else(|| BudgetCategory::placeholder(budget_id, bucket, name))
        })
        .collect();

    lines.extend(
        stored
            .iter()
            .filter(|c| canonical_name(bucket, &c.category).is_none())
            .map(|c| (*c).clone()),
    );
    lines
}

/// Load the active budget and its lines. Without a stored budget the default
/// plan is returned: income 0, no period, zero-amount default lines.
pub fn load_budget_plan(store: &impl BudgetStore) -> Result<BudgetPlan> {
    let Some(budget) = store.active_budget()? else {
        debug!("No budget stored, using default plan");
        return Ok(BudgetPlan::default());
    };
    let stored = store.list_budget_categories(budget.id)?;
    Ok(BudgetPlan::from_stored(budget, stored))
}

/// Create the budget row and return its plan with default lines
pub fn init_budget(
    store: &impl BudgetStore,
    income: Decimal,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<BudgetPlan> {
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(ValidationError::InvalidPeriod.into());
        }
    }
    if income < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount.into());
    }
    let budget = store.create_budget(income, start_date, end_date)?;
    info!(budget_id = budget.id, %income, "Created budget");
    load_budget_plan(store)
}

/// Persist a plan: the budget row first (income, totals, period), then every
/// line. Returns the plan as reloaded from the store.
pub fn save_budget_plan(store: &impl BudgetStore, plan: &BudgetPlan) -> Result<BudgetPlan> {
    plan.validate()?;

    if !plan.budget.is_persisted() {
        return Err(Error::NotFound(
            "No budget exists yet; create one before saving allocations".to_string(),
        ));
    }

    let budget = Budget {
        needs: plan.needs_total(),
        wants: plan.wants_total(),
        ..plan.budget.clone()
    };
    store.update_budget(&budget)?;

    let mut written = 0;
    for line in plan.needs.iter().chain(&plan.wants) {
        let row = BudgetCategory {
            budget_id: budget.id,
            ..line.clone()
        };
        store.upsert_budget_category(&row)?;
        written += 1;
    }

    info!(
        budget_id = budget.id,
        needs = %budget.needs,
        wants = %budget.wants,
        lines = written,
        "Saved budget plan"
    );

    load_budget_plan(store)
}
