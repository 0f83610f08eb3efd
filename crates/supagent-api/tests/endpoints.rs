//! End-to-end tests driving the router with in-memory stores.
//!
//! Each test builds its own private database, so tests run in parallel
//! without sharing rows.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use supagent_api::{create_router, AppState};
use supagent_models::{Agent, AgentColumn, FieldSet};
use supagent_store::RecordStore;
use tower::ServiceExt;

const KEY: &str = "test-secret";

fn app() -> (Router, RecordStore) {
    let store = RecordStore::open_in_memory().unwrap();
    let router = create_router(AppState::new(store.clone(), KEY));
    (router, store)
}

fn seed_agent(store: &RecordStore, agent_id: &str) {
    let values = FieldSet::new()
        .with(AgentColumn::AgentId, agent_id.to_string())
        .with(AgentColumn::Name, "seeded".to_string());
    store.insert::<Agent>(&values).unwrap();
}

async fn send(app: &Router, path: &str, body: Value, key: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(key) = key {
        request = request.header("x-api-key", key);
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    send(app, path, body, Some(KEY)).await
}

#[tokio::test]
async fn missing_api_key_is_rejected() {
    let (app, _) = app();
    let (status, body) = send(&app, "/api_v1/agent/get", json!({}), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn wrong_api_key_is_rejected_before_payload_checks() {
    let (app, store) = app();
    let (status, _) = send(
        &app,
        "/api_v1/test/create",
        json!({"name": "should not land"}),
        Some("not-the-key"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Malformed body with a bad key is still a 401, not a 400.
    let (status, _) = send(&app, "/api_v1/test/create", json!([1, 2]), Some("nope")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let page = store
        .select::<supagent_models::Test>(&Default::default())
        .unwrap();
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn health_needs_no_key() {
    let (app, _) = app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["service"], "supagent");
}

#[tokio::test]
async fn create_then_get_round_trips_every_entity() {
    let (app, store) = app();
    seed_agent(&store, "agent_007");

    let cases = [
        ("agent", "agent_id", json!({"name": "alpha", "configuration": "{\"risk\":\"low\"}"})),
        ("agent_sessions", "session_id", json!({"agent_id": "agent_007", "status": "running", "session_interval": 60})),
        ("strategies", "strategy_id", json!({"agent_id": "agent_007", "summarized_desc": "mean reversion"})),
        ("chat_history", "history_id", json!({"agent_id": "agent_007", "role": "user", "message": "hi"})),
        ("notification", "notification_id", json!({"source": "bot", "short_desc": "filled", "notification_date": "2024-05-01T12:00:00Z"})),
        ("wallet_snapshots", "snapshot_id", json!({"agent_id": "agent_007", "total_value_usd": "1234.50", "assets": "[]"})),
        ("user", "user_id", json!({"username": "neo", "wallet_address": "0xabc"})),
        ("payments", "payment_id", json!({"user_id": "u-1", "amount": "10.5", "currency": "USDC", "status": "pending"})),
        ("test", "test_id", json!({"name": "probe", "description": "round trip"})),
    ];

    for (route, id_field, payload) in cases {
        let (status, created) = post(&app, &format!("/api_v1/{route}/create"), payload.clone()).await;
        assert_eq!(status, StatusCode::OK, "create {route}: {created}");
        assert_eq!(created["status"], "success");
        let id = created["data"][id_field]
            .as_str()
            .unwrap_or_else(|| panic!("{route} create returned no {id_field}"))
            .to_string();

        let (status, fetched) = post(
            &app,
            &format!("/api_v1/{route}/get"),
            json!({ id_field: &id }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "get {route}: {fetched}");
        let record = &fetched["data"];
        assert_eq!(record[id_field], id.as_str());
        for (field, value) in payload.as_object().unwrap() {
            assert_eq!(&record[field], value, "{route}.{field}");
        }
        if !matches!(route, "agent_sessions" | "wallet_snapshots") {
            assert!(record["created_at"].is_string(), "{route} created_at");
        }
    }
}

#[tokio::test]
async fn agent_session_scenario() {
    let (app, store) = app();
    seed_agent(&store, "agent_007");

    let (status, created) = post(
        &app,
        "/api_v1/agent_sessions/create",
        json!({"agent_id": "agent_007"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let session_id = created["data"]["session_id"].as_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&session_id).is_ok());

    let (status, updated) = post(
        &app,
        "/api_v1/agent_sessions/update",
        json!({"session_id": session_id, "trades_count": "5"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, json!({"status": "success"}));

    let (_, fetched) = post(
        &app,
        "/api_v1/agent_sessions/get",
        json!({"session_id": session_id}),
    )
    .await;
    assert_eq!(fetched["data"]["trades_count"], "5");
    assert_eq!(fetched["data"]["agent_id"], "agent_007");
}

#[tokio::test]
async fn null_fields_are_left_untouched_on_update() {
    let (app, store) = app();
    seed_agent(&store, "agent_007");
    let (_, created) = post(
        &app,
        "/api_v1/agent_sessions/create",
        json!({"agent_id": "agent_007", "trades_count": "5", "status": "running"}),
    )
    .await;
    let session_id = created["data"]["session_id"].as_str().unwrap().to_string();

    let (status, _) = post(
        &app,
        "/api_v1/agent_sessions/update",
        json!({"session_id": session_id, "trades_count": null, "cycle_count": "2"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, fetched) = post(
        &app,
        "/api_v1/agent_sessions/get",
        json!({"session_id": session_id}),
    )
    .await;
    assert_eq!(fetched["data"]["trades_count"], "5");
    assert_eq!(fetched["data"]["cycle_count"], "2");
    assert_eq!(fetched["data"]["status"], "running");
}

#[tokio::test]
async fn update_with_predicate_mismatch_changes_nothing() {
    let (app, store) = app();
    seed_agent(&store, "agent_007");
    let (_, created) = post(
        &app,
        "/api_v1/agent_sessions/create",
        json!({"agent_id": "agent_007", "trades_count": "1"}),
    )
    .await;
    let session_id = created["data"]["session_id"].as_str().unwrap().to_string();

    let (status, _) = post(
        &app,
        "/api_v1/agent_sessions/update",
        json!({"session_id": session_id, "agent_id": "someone_else", "trades_count": "9"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, fetched) = post(
        &app,
        "/api_v1/agent_sessions/get",
        json!({"session_id": session_id}),
    )
    .await;
    assert_eq!(fetched["data"]["trades_count"], "1");
}

#[tokio::test]
async fn update_without_identifier_is_a_validation_error() {
    let (app, _) = app();
    let (status, body) = post(
        &app,
        "/api_v1/agent_sessions/update",
        json!({"agent_id": "agent_007", "trades_count": "5"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    let (status, body) = post(&app, "/api_v1/test/update", json!({"test_id": "t-1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn second_page_holds_rows_eleven_to_twenty() {
    let (app, _) = app();
    for i in 1..=25 {
        let (status, _) = post(
            &app,
            "/api_v1/test/create",
            json!({"name": format!("row-{i:02}")}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = post(&app, "/api_v1/test/get", json!({"page": 2, "page_size": 10})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 25);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    let expected: Vec<String> = (11..=20).map(|i| format!("row-{i:02}")).collect();
    assert_eq!(names, expected);

    let (_, last) = post(&app, "/api_v1/test/get", json!({"page": 3, "page_size": 10})).await;
    assert_eq!(last["data"].as_array().unwrap().len(), 5);
    assert_eq!(last["total_items"], 25);
}

#[tokio::test]
async fn list_filters_on_present_fields() {
    let (app, _) = app();
    for name in ["a", "b", "a"] {
        post(&app, "/api_v1/test/create", json!({"name": name})).await;
    }
    let (_, body) = post(&app, "/api_v1/test/get", json!({"name": "a"})).await;
    assert_eq!(body["total_items"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn zero_page_is_a_validation_error() {
    let (app, _) = app();
    let (status, body) = post(&app, "/api_v1/test/get", json!({"page": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn session_for_unknown_agent_is_not_found_and_not_inserted() {
    let (app, _) = app();
    let (status, body) = post(
        &app,
        "/api_v1/agent_sessions/create",
        json!({"agent_id": "ghost"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (_, listed) = post(&app, "/api_v1/agent_sessions/get", json!({})).await;
    assert_eq!(listed["total_items"], 0);
}

#[tokio::test]
async fn user_create_is_idempotent_on_wallet() {
    let (app, _) = app();
    let payload = json!({"username": "trinity", "wallet_address": "0xfeed"});
    let (_, first) = post(&app, "/api_v1/user/create", payload.clone()).await;
    let (status, second) = post(&app, "/api_v1/user/create", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["user_id"], second["data"]["user_id"]);

    let (_, listed) = post(&app, "/api_v1/user/get", json!({"wallet_address": "0xfeed"})).await;
    assert_eq!(listed["total_items"], 1);
}

#[tokio::test]
async fn unknown_identifier_is_not_found() {
    let (app, _) = app();
    let (status, body) = post(&app, "/api_v1/agent/get", json!({"agent_id": "missing"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn malformed_payload_is_a_validation_error() {
    let (app, _) = app();
    let (status, body) = post(
        &app,
        "/api_v1/agent_sessions/create",
        json!({"agent_id": "agent_007", "status": "paused"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn record_progress_adds_to_counters() {
    let (app, store) = app();
    seed_agent(&store, "agent_007");
    let (_, created) = post(
        &app,
        "/api_v1/agent_sessions/create",
        json!({"agent_id": "agent_007", "trades_count": "4"}),
    )
    .await;
    let session_id = created["data"]["session_id"].as_str().unwrap().to_string();

    let (status, body) = post(
        &app,
        "/api_v1/agent_sessions/record_progress",
        json!({"session_id": session_id, "trades": 2, "cycles": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["trades_count"], "6");
    assert_eq!(body["data"]["cycle_count"], "1");

    let (_, fetched) = post(
        &app,
        "/api_v1/agent_sessions/get",
        json!({"session_id": session_id}),
    )
    .await;
    assert_eq!(fetched["data"]["trades_count"], "6");
    assert!(fetched["data"]["last_cycle"].is_string());

    let (status, _) = post(
        &app,
        "/api_v1/agent_sessions/record_progress",
        json!({"session_id": "missing", "trades": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
