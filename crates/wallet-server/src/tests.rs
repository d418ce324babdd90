//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wallet_core::db::Database;
use wallet_core::models::TransactionType;
use wallet_core::store::TransactionStore;
use wallet_core::test_utils::new_transaction;

fn setup_test_app() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let app = create_router(db.clone(), None, ServerConfig::default());
    (app, db)
}

fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed(db: &Database) {
    let rows = [
        (TransactionType::Income, "Salary", "2000", "salary", date(2024, 1, 1)),
        (TransactionType::Expense, "Supermarket", "180", "food", date(2024, 1, 3)),
        (TransactionType::Expense, "Bus", "60", "transport", date(2024, 1, 5)),
        (TransactionType::Expense, "Crypto", "50", "crypto", date(2024, 1, 5)),
        (TransactionType::Expense, "Rent", "900", "bills", date(2024, 2, 1)),
    ];
    for (kind, name, amount, category, on) in rows {
        db.insert_transaction(&new_transaction(kind, name, amount, category, on))
            .unwrap();
    }
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

// ========== Category API Tests ==========

#[tokio::test]
async fn test_list_categories() {
    let (app, _db) = setup_test_app();
    let response = get(app, "/api/categories").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["income"].as_array().unwrap().len(), 5);
    assert_eq!(json["expense"].as_array().unwrap().len(), 9);
    assert_eq!(json["expense"][0]["id"], "food");
}

// ========== Transaction API Tests ==========

#[tokio::test]
async fn test_create_and_list_transactions() {
    let (app, _db) = setup_test_app();

    let response = send_json(
        app.clone(),
        "POST",
        "/api/transactions",
        serde_json::json!({
            "name": "Lunch",
            "amount": "12.50",
            "type": "expense",
            "category": "food",
            "date": "2024-03-01"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["name"], "Lunch");
    assert_eq!(json["type"], "expense");
    assert_eq!(json["category_name"], "Food & Dining");

    let response = get(app, "/api/transactions").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_transaction_defaults_date_to_today() {
    let (app, _db) = setup_test_app();
    let response = send_json(
        app,
        "POST",
        "/api/transactions",
        serde_json::json!({
            "name": "Gift",
            "amount": 20,
            "type": "income",
            "category": "gifts"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(
        json["date"],
        chrono::Local::now().date_naive().to_string()
    );
}

#[tokio::test]
async fn test_create_transaction_validation_error() {
    let (app, db) = setup_test_app();
    let response = send_json(
        app,
        "POST",
        "/api/transactions",
        serde_json::json!({
            "name": "Lunch",
            "type": "expense",
            "category": "food"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Please fill in all fields"));

    assert_eq!(
        db.count_transactions(&wallet_core::TransactionQuery::new())
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_unknown_category_renders_uncategorized() {
    let (app, db) = setup_test_app();
    seed(&db);

    let json = get_body_json(get(app, "/api/transactions?from=2024-01-05&to=2024-01-05").await).await;
    let crypto = json
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["category"] == "crypto")
        .unwrap();
    assert_eq!(crypto["category_name"], "Uncategorized");
    assert_eq!(crypto["category_icon"], "💰");
}

#[tokio::test]
async fn test_list_transactions_limit_and_bad_date() {
    let (app, db) = setup_test_app();
    seed(&db);

    let json = get_body_json(get(app.clone(), "/api/transactions?limit=0").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let json = get_body_json(get(app.clone(), "/api/transactions?limit=2").await).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let response = get(app, "/api/transactions?from=01/02/2024").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_missing_transaction() {
    let (app, _db) = setup_test_app();
    let response = get(app, "/api/transactions/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Report API Tests ==========

#[tokio::test]
async fn test_summary_with_range() {
    let (app, db) = setup_test_app();
    seed(&db);

    let json = get_body_json(get(app.clone(), "/api/summary").await).await;
    assert_eq!(json["balance"], "810");

    let json = get_body_json(get(app, "/api/summary?from=2024-01-01&to=2024-01-31").await).await;
    assert_eq!(json["income"], "2000");
    assert_eq!(json["expenses"], "290");
    assert_eq!(json["balance"], "1710");
}

#[tokio::test]
async fn test_analytics_month() {
    let (app, db) = setup_test_app();
    seed(&db);

    let response = get(app.clone(), "/api/analytics?month=2024-01").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["month"]["month"], 1);
    let expense = json["expense"].as_array().unwrap();
    assert_eq!(expense.len(), 3);
    assert_eq!(expense[0]["category"], "food");
    assert_eq!(expense[0]["name"], "Food & Dining");

    let response = get(app, "/api/analytics?month=2024-13").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chart_month_fills_every_day() {
    let (app, db) = setup_test_app();
    seed(&db);

    let json = get_body_json(get(app.clone(), "/api/chart?month=2023-02").await).await;
    let points = json.as_array().unwrap();
    assert_eq!(points.len(), 28);
    assert!(points.iter().all(|p| p["balance"] == "0"));

    let json = get_body_json(get(app.clone(), "/api/chart?month=2024-01").await).await;
    let points = json.as_array().unwrap();
    assert_eq!(points.len(), 31);
    assert_eq!(points[0]["label"], "01");
    assert_eq!(points[30]["balance"], "1710");

    let json = get_body_json(get(app, "/api/chart").await).await;
    let points = json.as_array().unwrap();
    assert_eq!(points.len(), 4);
    assert_eq!(points[0]["label"], "1 Jan");
}

// ========== Budget API Tests ==========

#[tokio::test]
async fn test_budget_default_plan() {
    let (app, _db) = setup_test_app();
    let json = get_body_json(get(app, "/api/budget").await).await;
    assert_eq!(json["budget"]["id"], 0);
    assert_eq!(json["needs"].as_array().unwrap().len(), 6);
    assert_eq!(json["wants"].as_array().unwrap().len(), 7);
    assert_eq!(json["is_valid"], true);
}

#[tokio::test]
async fn test_budget_save_requires_existing_budget() {
    let (app, _db) = setup_test_app();
    let response = send_json(app, "PUT", "/api/budget", serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_budget_create_update_and_warnings() {
    let (app, db) = setup_test_app();
    seed(&db);

    let response = send_json(
        app.clone(),
        "POST",
        "/api/budget",
        serde_json::json!({
            "income": "2000",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send_json(
        app.clone(),
        "POST",
        "/api/budget",
        serde_json::json!({ "income": "10" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Does not balance: 500 + 300 + 400 != 2000
    let response = send_json(
        app.clone(),
        "PUT",
        "/api/budget",
        serde_json::json!({
            "needs": [{ "category": "Food", "amount": "500" }],
            "wants": [{ "category": "Gym", "amount": "300" }]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Needs + Wants + Savings must equal Income"));

    let response = send_json(
        app.clone(),
        "PUT",
        "/api/budget",
        serde_json::json!({
            "needs": [
                { "category": "Food", "amount": "200" },
                { "category": "Transport", "amount": "100" }
            ],
            "wants": [{ "category": "Disposable", "amount": "1300" }]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["is_valid"], true);
    assert_eq!(json["budget"]["needs"], "300");

    let json = get_body_json(get(app, "/api/budget/warnings").await).await;
    let categories = json["categories"].as_array().unwrap();
    // Food 180 of 200 warns; Transport 60 of 100 does not
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["category"], "Food");
    assert!(json["savings"].is_null());
}

// ========== Dashboard API Tests ==========

#[tokio::test]
async fn test_dashboard_list_follows_budget_period_totals_do_not() {
    let (app, db) = setup_test_app();
    seed(&db);

    // No budget: everything, period N/A
    let json = get_body_json(get(app.clone(), "/api/dashboard").await).await;
    assert_eq!(json["budget"]["data"]["period"], "N/A");
    assert_eq!(json["transactions"]["data"].as_array().unwrap().len(), 5);
    assert_eq!(json["balance"], "810");

    let response = send_json(
        app.clone(),
        "POST",
        "/api/budget",
        serde_json::json!({
            "income": "2000",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(get(app, "/api/dashboard").await).await;
    assert_eq!(json["budget"]["data"]["period"], "2024-01-01 - 2024-01-31");
    // Only the list is restricted; totals and chart cover every transaction
    assert_eq!(json["transactions"]["data"].as_array().unwrap().len(), 4);
    assert_eq!(json["balance"], "810");
    assert_eq!(json["summary"]["expenses"], "1190");
    assert_eq!(json["chart"].as_array().unwrap().len(), 4);
    assert_eq!(json["chart"][3]["balance"], "810");
    assert!(json["budget"]["error"].is_null());
}

#[tokio::test]
async fn test_dashboard_sees_writes_made_outside_the_server() {
    let (app, db) = setup_test_app();
    seed(&db);

    let json = get_body_json(get(app.clone(), "/api/dashboard").await).await;
    assert_eq!(json["balance"], "810");

    // Written straight to the database, so the refresh signal is not bumped
    db.insert_transaction(&new_transaction(
        TransactionType::Expense,
        "Cinema",
        "10",
        "entertainment",
        date(2024, 2, 3),
    ))
    .unwrap();
    let json = get_body_json(get(app.clone(), "/api/dashboard").await).await;
    assert_eq!(json["balance"], "800");

    wallet_core::planner::init_budget(&db, "2000".parse().unwrap(), None, None).unwrap();
    let json = get_body_json(get(app, "/api/dashboard").await).await;
    assert_eq!(json["budget"]["data"]["income"], "2000");
}

#[tokio::test]
async fn test_dashboard_sees_new_transactions() {
    let (app, db) = setup_test_app();
    seed(&db);

    let json = get_body_json(get(app.clone(), "/api/dashboard").await).await;
    assert_eq!(json["balance"], "810");

    let response = send_json(
        app.clone(),
        "POST",
        "/api/transactions",
        serde_json::json!({
            "name": "Bonus",
            "amount": "100",
            "type": "income",
            "category": "salary",
            "date": "2024-02-02"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The write bumped the refresh epoch, so the cached view is not reused
    let json = get_body_json(get(app, "/api/dashboard").await).await;
    assert_eq!(json["balance"], "910");
}

#[tokio::test]
async fn test_dashboard_falls_back_per_section() {
    let (app, db) = setup_test_app();
    seed(&db);
    db.conn()
        .unwrap()
        .execute_batch("DROP TABLE budget_categories; DROP TABLE budget;")
        .unwrap();

    let response = get(app, "/api/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["budget"]["error"], "Failed to load budget.");
    assert_eq!(json["budget"]["data"]["period"], "N/A");
    assert!(json["transactions"]["error"].is_null());
    assert_eq!(json["transactions"]["data"].as_array().unwrap().len(), 5);
}

// ========== Security Header Tests ==========

#[tokio::test]
async fn test_security_headers() {
    let (app, _db) = setup_test_app();
    let response = get(app, "/api/categories").await;
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
}
