//! Report handlers: summary, category analytics, balance chart

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use wallet_core::aggregation::{self, ChartRange, MonthSelection};
use wallet_core::categories::lookup;
use wallet_core::models::{ChartPoint, TransactionSummary, TransactionType};
use wallet_core::store::{TransactionOrder, TransactionQuery, TransactionStore};

/// Parse an optional YYYY-MM-DD query value
pub(crate) fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, AppError> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d"))
        .transpose()
        .map_err(|_| AppError::bad_request(&format!("Invalid {} date format (use YYYY-MM-DD)", field)))
}

/// Parse an optional YYYY-MM query value
pub(crate) fn parse_month(value: Option<&str>) -> Result<Option<MonthSelection>, AppError> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<MonthSelection>())
        .transpose()
        .map_err(|e| AppError::bad_request(&e))
}

/// Resolve from/to parameters into a date-bounded query
pub(crate) fn resolve_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<TransactionQuery, AppError> {
    let from = parse_date(from, "from")?;
    let to = parse_date(to, "to")?;
    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            return Err(AppError::bad_request("from date must not be after to date"));
        }
    }
    Ok(TransactionQuery::new().from(from).to(to))
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    /// Start date (YYYY-MM-DD, inclusive)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD, inclusive)
    pub to: Option<String>,
}

/// GET /api/summary - Income, expenses and balance
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateRangeQuery>,
) -> Result<Json<TransactionSummary>, AppError> {
    let query = resolve_range(params.from.as_deref(), params.to.as_deref())?;
    let transactions = state.db.list_transactions(&query)?;
    Ok(Json(aggregation::summarize(&transactions)))
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    /// Month filter (YYYY-MM); all transactions when absent
    pub month: Option<String>,
}

/// A category total with its display info
#[derive(Debug, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub name: &'static str,
    pub icon: &'static str,
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub month: Option<MonthSelection>,
    pub income: Vec<CategoryTotal>,
    pub expense: Vec<CategoryTotal>,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
}

/// GET /api/analytics - Per-category breakdown, optionally for one month
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let month = parse_month(params.month.as_deref())?;
    let query = TransactionQuery::period(month.map(|m| m.range()));
    let transactions = state.db.list_transactions(&query)?;

    let breakdown = aggregation::analyze_categories(&transactions);
    let summary = aggregation::summarize(&transactions);

    let with_info = |transaction_type: TransactionType, rows: Vec<wallet_core::CategoryAnalysis>| {
        rows.into_iter()
            .map(|row| {
                let info = lookup(transaction_type, &row.category);
                CategoryTotal {
                    category: row.category,
                    name: info.name,
                    icon: info.icon,
                    total: row.total,
                    count: row.count,
                }
            })
            .collect::<Vec<_>>()
    };

    Ok(Json(AnalyticsResponse {
        month,
        income: with_info(TransactionType::Income, breakdown.income),
        expense: with_info(TransactionType::Expense, breakdown.expense),
        total_income: summary.income,
        total_expenses: summary.expenses,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Month (YYYY-MM): plot every day of the month
    pub month: Option<String>,
    /// Start date (YYYY-MM-DD) when no month is given
    pub from: Option<String>,
    /// End date (YYYY-MM-DD) when no month is given
    pub to: Option<String>,
}

/// GET /api/chart - Cumulative daily balance series
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartQuery>,
) -> Result<Json<Vec<ChartPoint>>, AppError> {
    let (query, range) = match parse_month(params.month.as_deref())? {
        Some(month) => (
            TransactionQuery::period(Some(month.range())),
            ChartRange::Month(month),
        ),
        None => (
            resolve_range(params.from.as_deref(), params.to.as_deref())?,
            ChartRange::Observed,
        ),
    };

    let transactions = state
        .db
        .list_transactions(&query.order(TransactionOrder::DateAscending))?;
    Ok(Json(aggregation::daily_balance_series(&transactions, range)))
}
