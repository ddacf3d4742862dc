use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use serde_json::{Value, json};

use api_types::{
    Amount, CategoryType,
    recurring::Frequency,
    transaction::{TransactionFilters, TransactionRequest},
};
use fintrack_client::{Api, ClientError, MemoryStorage, SessionStore};

#[derive(Clone, Default)]
struct Mock {
    register_hits: Arc<AtomicUsize>,
    create_hits: Arc<AtomicUsize>,
    last_auth: Arc<Mutex<Option<String>>>,
    last_query: Arc<Mutex<Option<String>>>,
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret1" {
        Json(json!({ "token": "tok-123" })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn register(State(mock): State<Mock>, Json(body): Json<Value>) -> Response {
    mock.register_hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::CREATED,
        Json(json!({ "id": 1, "username": body["username"] })),
    )
        .into_response()
}

async fn dashboard(State(mock): State<Mock>, headers: HeaderMap) -> Json<Value> {
    *mock.last_auth.lock().unwrap() = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({
        "username": "alice",
        "fromDate": "2025-01-01",
        "toDate": "2025-01-31",
        "totalIncome": 500,
        "totalExpense": 200,
        "totalDelta": 300,
        "expenseBreakdown": [
            { "category": "Food", "totalAmount": 200, "transactionCount": 3 }
        ]
    }))
}

async fn list_transactions(State(mock): State<Mock>, RawQuery(query): RawQuery) -> Json<Value> {
    *mock.last_query.lock().unwrap() = query;
    Json(json!({
        "username": "alice",
        "transactionsCount": 1,
        "totalIncome": 0,
        "totalExpense": 12.5,
        "totalDelta": -12.5,
        "transactions": [{
            "id": 1,
            "user": { "id": 42, "username": "alice", "balance": 100 },
            "category": { "id": 5, "name": "GROCERIES", "type": "EXPENSE" },
            "name": "Bread",
            "amount": 12.5,
            "datetime": "2025-01-10T08:30:00",
            "paymentMode": "CASH",
            "note": null
        }]
    }))
}

async fn create_transaction(State(mock): State<Mock>) -> StatusCode {
    mock.create_hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn delete_transaction(Path(id): Path<i64>) -> Response {
    if id == 1 {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Transaction not found" })),
        )
            .into_response()
    }
}

async fn list_recurring() -> Json<Value> {
    Json(json!([{
        "id": 9,
        "user": { "id": 42, "username": "alice" },
        "category": { "id": 3, "name": "RENT", "type": "EXPENSE" },
        "name": "Rent",
        "amount": 950,
        "frequency": "MONTHLY",
        "nextRunDate": "2025-02-01"
    }]))
}

async fn slow_profile() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({ "id": 1, "username": "alice" }))
}

async fn spawn_server(mock: Mock) -> String {
    let router = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/dashboard", get(dashboard))
        .route("/api/transaction", get(list_transactions))
        .route("/api/transaction/new", post(create_transaction))
        .route("/api/transaction/delete/{id}", delete(delete_transaction))
        .route("/api/recurring", get(list_recurring))
        .route("/api/user", get(slow_profile))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

async fn api_with_mock() -> (Api, Mock) {
    let mock = Mock::default();
    let base_url = spawn_server(mock.clone()).await;
    let api = Api::new(
        &base_url,
        Duration::from_millis(500),
        SessionStore::new(MemoryStorage::new()),
    )
    .unwrap();
    (api, mock)
}

#[tokio::test]
async fn login_persists_session_and_authorizes_requests() {
    let (api, mock) = api_with_mock().await;

    api.dashboard().stats(None, None).await.unwrap();
    assert_eq!(*mock.last_auth.lock().unwrap(), None);

    let user = api.auth().login("alice", "secret1").await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(api.session().token().as_deref(), Some("tok-123"));
    assert_eq!(api.auth().current_user(), Some(user));

    api.dashboard().stats(None, None).await.unwrap();
    assert_eq!(
        mock.last_auth.lock().unwrap().as_deref(),
        Some("Bearer tok-123")
    );
}

#[tokio::test]
async fn rejected_credentials_leave_no_session() {
    let (api, _mock) = api_with_mock().await;

    let err = api.auth().login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert!(!api.session().is_authenticated());
    assert_eq!(api.session().token(), None);
}

#[tokio::test]
async fn logout_clears_session() {
    let (api, _mock) = api_with_mock().await;

    api.auth().login("alice", "secret1").await.unwrap();
    api.auth().logout();
    assert_eq!(api.auth().current_user(), None);
    assert_eq!(api.session().token(), None);
}

#[tokio::test]
async fn invalid_registration_never_reaches_the_network() {
    let (api, mock) = api_with_mock().await;
    let auth = api.auth();

    let cases = [
        ("alice", "secret1", "secret2"),
        ("al", "secret1", "secret1"),
        (" ab ", "secret1", "secret1"),
        ("alice", "12345", "12345"),
    ];
    for (username, password, confirm) in cases {
        let err = auth
            .register(username, password, confirm, Amount::new(1_000))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
    assert_eq!(mock.register_hits.load(Ordering::SeqCst), 0);

    let created = auth
        .register("alice", "secret1", "secret1", Amount::new(1_000))
        .await
        .unwrap();
    assert_eq!(created.username, "alice");
    assert_eq!(mock.register_hits.load(Ordering::SeqCst), 1);
    assert!(!api.session().is_authenticated());
}

#[tokio::test]
async fn dashboard_is_reshaped_for_charts() {
    let (api, _mock) = api_with_mock().await;

    let stats = api
        .dashboard()
        .stats(NaiveDate::from_ymd_opt(2025, 1, 1), None)
        .await
        .unwrap();
    assert_eq!(stats.total_delta, Amount::new(30_000));
    assert_eq!(stats.total_income, Amount::new(50_000));
    assert_eq!(stats.total_expense, Amount::new(20_000));
    assert_eq!(stats.breakdown.len(), 1);
    assert_eq!(stats.breakdown[0].name, "Food");
    assert_eq!(stats.breakdown[0].value, Amount::new(20_000));
    assert_eq!(stats.breakdown[0].transaction_count, 3);
    assert_eq!(stats.to, NaiveDate::from_ymd_opt(2025, 1, 31));
}

#[tokio::test]
async fn filters_are_forwarded_as_query_parameters() {
    let (api, mock) = api_with_mock().await;

    let filters = TransactionFilters {
        from: NaiveDate::from_ymd_opt(2025, 1, 1),
        category_type: Some(CategoryType::Expense),
        name: Some("bread".to_string()),
        min_amount: Some(Amount::new(1_000)),
        ..Default::default()
    };
    let page = api.transactions().list(&filters).await.unwrap();
    assert_eq!(page.transactions.len(), 1);
    assert_eq!(page.total_delta, Amount::new(-1_250));
    assert_eq!(page.transactions[0].category.name, "GROCERIES");

    let query = mock.last_query.lock().unwrap().clone().unwrap();
    assert!(query.contains("from=2025-01-01"));
    assert!(query.contains("categoryType=EXPENSE"));
    assert!(query.contains("name=bread"));
    assert!(query.contains("minAmount=10.00"));
    assert!(!query.contains("note"));
    assert!(!query.contains("maxAmount"));
}

#[tokio::test]
async fn non_positive_amount_is_rejected_before_submission() {
    let (api, mock) = api_with_mock().await;

    let req = TransactionRequest {
        category_name: "GROCERIES".to_string(),
        name: "Bread".to_string(),
        amount: Amount::ZERO,
        payment_mode: "CASH".to_string(),
        note: None,
    };
    let err = api.transactions().create(&req).await.unwrap_err();
    let fields = err.field_errors().unwrap();
    assert!(fields.get("amount").is_some());
    assert_eq!(mock.create_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn deleting_missing_transaction_is_not_found() {
    let (api, _mock) = api_with_mock().await;

    api.transactions().delete(1).await.unwrap();
    let err = api.transactions().delete(404).await.unwrap_err();
    match err {
        ClientError::NotFound(message) => assert_eq!(message, "Transaction not found"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn recurring_list_is_flattened() {
    let (api, _mock) = api_with_mock().await;

    let items = api.recurring().list().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].user_id, Some(42));
    assert_eq!(items[0].category_name.as_deref(), Some("RENT"));
    assert_eq!(items[0].category_type, Some(CategoryType::Expense));
    assert_eq!(items[0].frequency, Frequency::Monthly);
}

#[tokio::test]
async fn slow_responses_time_out() {
    let (api, _mock) = api_with_mock().await;

    let err = api.user().profile().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = Api::new(
        &format!("http://{addr}/api"),
        Duration::from_secs(2),
        SessionStore::new(MemoryStorage::new()),
    )
    .unwrap();
    let err = api.categories().list().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
