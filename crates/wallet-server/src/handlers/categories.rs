//! Category registry handlers

use axum::Json;
use serde::Serialize;

use wallet_core::categories::{categories_for, CategoryInfo};
use wallet_core::models::TransactionType;

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub income: Vec<CategoryInfo>,
    pub expense: Vec<CategoryInfo>,
}

/// GET /api/categories - Registry entries for both transaction types
pub async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        income: categories_for(TransactionType::Income),
        expense: categories_for(TransactionType::Expense),
    })
}
