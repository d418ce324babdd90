//! Budget planner handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState};
use wallet_core::aggregation::BudgetWarnings;
use wallet_core::models::BudgetBucket;
use wallet_core::planner::{init_budget, load_budget_plan, save_budget_plan, BudgetPlan};
use wallet_core::store::{BudgetStore, TransactionQuery, TransactionStore};

/// A plan with its derived totals
#[derive(Debug, Clone, Serialize)]
pub struct BudgetResponse {
    #[serde(flatten)]
    pub plan: BudgetPlan,
    pub needs_total: Decimal,
    pub wants_total: Decimal,
    pub savings: Decimal,
    pub allocated: Decimal,
    pub is_valid: bool,
}

impl From<BudgetPlan> for BudgetResponse {
    fn from(plan: BudgetPlan) -> Self {
        Self {
            needs_total: plan.needs_total(),
            wants_total: plan.wants_total(),
            savings: plan.savings(),
            allocated: plan.allocated(),
            is_valid: plan.is_valid(),
            plan,
        }
    }
}

/// GET /api/budget - The active plan, with default lines filled in
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BudgetResponse>, AppError> {
    let plan = load_budget_plan(&state.db)?;
    Ok(Json(plan.into()))
}

#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    pub income: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// POST /api/budget - Create the budget (only one may exist)
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<BudgetResponse>), AppError> {
    if state.db.active_budget()?.is_some() {
        return Err(AppError::conflict("A budget already exists"));
    }

    let plan = init_budget(&state.db, body.income, body.start_date, body.end_date)?;
    state.refresh.bump();
    Ok((StatusCode::CREATED, Json(plan.into())))
}

/// One allocation line in an update
#[derive(Debug, Deserialize)]
pub struct AllocationInput {
    pub category: String,
    pub amount: Decimal,
}

/// Edits applied to the active plan before saving
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    pub income: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub needs: Vec<AllocationInput>,
    #[serde(default)]
    pub wants: Vec<AllocationInput>,
}

/// PUT /api/budget - Edit and save the plan; rejected unless it balances
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateBudgetRequest>,
) -> Result<Json<BudgetResponse>, AppError> {
    if body
        .needs
        .iter()
        .chain(&body.wants)
        .any(|l| l.amount < Decimal::ZERO)
    {
        return Err(AppError::bad_request("Allocations must not be negative"));
    }

    let mut plan = load_budget_plan(&state.db)?;

    if let Some(income) = body.income {
        if income < Decimal::ZERO {
            return Err(AppError::bad_request("Income must not be negative"));
        }
        plan.budget.income = income;
    }
    if body.start_date.is_some() {
        plan.budget.start_date = body.start_date;
    }
    if body.end_date.is_some() {
        plan.budget.end_date = body.end_date;
    }
    for line in &body.needs {
        plan.set_allocation(BudgetBucket::Need, &line.category, line.amount);
    }
    for line in &body.wants {
        plan.set_allocation(BudgetBucket::Want, &line.category, line.amount);
    }

    let saved = save_budget_plan(&state.db, &plan)?;
    let epoch = state.refresh.bump();
    info!(budget_id = saved.budget.id, epoch, "Budget saved");

    Ok(Json(saved.into()))
}

/// GET /api/budget/warnings - Warnings over the budget period's transactions
pub async fn get_budget_warnings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BudgetWarnings>, AppError> {
    let plan = load_budget_plan(&state.db)?;
    let transactions = state
        .db
        .list_transactions(&TransactionQuery::period(plan.period()))?;
    Ok(Json(plan.warnings(&transactions)))
}
