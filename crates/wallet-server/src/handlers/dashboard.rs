//! Dashboard handler
//!
//! The dashboard combines the budget overview, the balance, the summary and
//! the chart over every transaction, plus the recent transactions and budget
//! warnings restricted to the budget period. Each read falls back on its own:
//! a failed budget read still shows transactions and vice versa, with the
//! failure reported in that section's `error`.
//!
//! The cached view is keyed on the plan and on the transaction count and
//! newest id as well as the refresh epoch, so writes made by another process
//! against the same database (the CLI while `serve` runs) are picked up too.

use std::sync::Arc;

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::transactions::TransactionView;
use crate::{AppError, AppState};
use wallet_core::aggregation::{self, BudgetWarnings, ChartRange};
use wallet_core::models::{ChartPoint, Transaction, TransactionSummary};
use wallet_core::planner::{load_budget_plan, BudgetPlan};
use wallet_core::store::{TransactionQuery, TransactionStore};
use wallet_core::view::{load_or, Loaded};

/// Number of transactions shown in the recent list
pub const RECENT_LIMIT: usize = 10;

/// What a cached dashboard was built from. Transactions are never edited
/// or deleted, so their count and newest id identify the set.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardKey {
    pub plan: BudgetPlan,
    pub transaction_count: usize,
    pub newest_id: Option<i64>,
}

impl DashboardKey {
    fn new(plan: &BudgetPlan, transactions: &[Transaction]) -> Self {
        Self {
            plan: plan.clone(),
            transaction_count: transactions.len(),
            newest_id: transactions.iter().map(|t| t.id).max(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetOverview {
    /// "N/A" when no period is set
    pub period: String,
    pub income: Decimal,
    pub needs: Decimal,
    pub wants: Decimal,
    pub savings: Decimal,
}

impl BudgetOverview {
    fn from_plan(plan: &BudgetPlan) -> Self {
        let period = match plan.period() {
            Some((start, end)) => format!("{} - {}", start, end),
            None => "N/A".to_string(),
        };
        Self {
            period,
            income: plan.budget.income,
            needs: plan.needs_total(),
            wants: plan.wants_total(),
            savings: plan.savings(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub budget: Loaded<BudgetOverview>,
    pub transactions: Loaded<Vec<TransactionView>>,
    pub summary: TransactionSummary,
    pub balance: Decimal,
    pub chart: Vec<ChartPoint>,
    pub warnings: BudgetWarnings,
}

/// GET /api/dashboard - Overview of the current budget period
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, AppError> {
    let epoch = state.refresh.epoch();

    let plan = load_or(
        load_budget_plan(&state.db),
        BudgetPlan::default(),
        "Failed to load budget.",
    );
    let transactions = load_or(
        state.db.list_transactions(&TransactionQuery::new()),
        Vec::new(),
        "Failed to load transactions.",
    );
    let complete = plan.is_ok() && transactions.is_ok();
    let key = DashboardKey::new(&plan.data, &transactions.data);

    if complete {
        if let Some(cached) = state.dashboard.get(&key, epoch) {
            debug!(epoch, "Dashboard served from cache");
            return Ok(Json(cached));
        }
    }

    let token = state.dashboard.begin();

    let all = &transactions.data;
    let period = TransactionQuery::period(plan.data.period());
    let in_period: Vec<Transaction> = all.iter().filter(|t| period.matches(t)).cloned().collect();

    let response = DashboardResponse {
        budget: Loaded {
            data: BudgetOverview::from_plan(&plan.data),
            error: plan.error.clone(),
        },
        summary: aggregation::summarize(all),
        balance: aggregation::balance(all),
        chart: aggregation::daily_balance_series(all, ChartRange::Observed),
        warnings: plan.data.warnings(&in_period),
        transactions: Loaded {
            data: in_period
                .into_iter()
                .take(RECENT_LIMIT)
                .map(TransactionView::from)
                .collect(),
            error: transactions.error.clone(),
        },
    };

    // Only complete views are cached; a failed section is retried next time
    if complete {
        state.dashboard.commit(token, key, epoch, response.clone());
    }

    Ok(Json(response))
}
