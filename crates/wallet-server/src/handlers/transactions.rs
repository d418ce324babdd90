//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::reports::resolve_range;
use crate::{AppError, AppState, MAX_PAGE_LIMIT};
use wallet_core::categories::lookup;
use wallet_core::models::{NewTransaction, Transaction, TransactionType};
use wallet_core::store::TransactionStore;

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Start date (YYYY-MM-DD, inclusive)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD, inclusive)
    pub to: Option<String>,
}

fn default_limit() -> i64 {
    50
}

/// A transaction with its category display info
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category_name: &'static str,
    pub category_icon: &'static str,
}

impl From<Transaction> for TransactionView {
    fn from(transaction: Transaction) -> Self {
        let info = lookup(transaction.transaction_type, &transaction.category);
        Self {
            transaction,
            category_name: info.name,
            category_icon: info.icon,
        }
    }
}

/// GET /api/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTransactionsQuery>,
) -> Result<Json<Vec<TransactionView>>, AppError> {
    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);

    let query = resolve_range(params.from.as_deref(), params.to.as_deref())?.limit(Some(limit));
    let transactions = state.db.list_transactions(&query)?;

    Ok(Json(transactions.into_iter().map(TransactionView::from).collect()))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TransactionView>, AppError> {
    let tx = state
        .db
        .get_transaction(id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    Ok(Json(tx.into()))
}

/// Body for recording a transaction. Missing fields are reported by
/// validation rather than rejected by the JSON extractor.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(default)]
    pub name: String,
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub category: String,
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionView>), AppError> {
    let new = NewTransaction {
        name: body.name,
        amount: body.amount.unwrap_or(Decimal::ZERO),
        transaction_type: body.transaction_type,
        category: body.category,
        date: body.date.unwrap_or_else(|| Local::now().date_naive()),
    };

    let tx = state.db.insert_transaction(&new)?;
    let epoch = state.refresh.bump();
    info!(id = tx.id, kind = %tx.transaction_type, epoch, "Transaction recorded");

    Ok((StatusCode::CREATED, Json(tx.into())))
}
