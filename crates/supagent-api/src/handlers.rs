use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Map, Value};
use supagent_models::Column;

use crate::error::ApiError;
use crate::service::{self, Created, Endpoint, Fetched};
use crate::state::AppState;
use crate::types::{GetRequest, HealthResponse, ProgressRequest};

/// Store calls are blocking SQLite work; keep them off the async workers.
async fn run_blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
}

pub async fn create<E: Endpoint>(
    State(state): State<AppState>,
    payload: Result<Json<E>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    let store = state.store.clone();
    let data = match run_blocking(move || service::create(&store, payload)).await? {
        Created::New(id) => {
            let mut data = Map::new();
            data.insert(E::ID.name().to_string(), Value::String(id));
            Value::Object(data)
        }
        Created::Existing(record) => serde_json::to_value(record)?,
    };
    Ok(Json(json!({ "status": "success", "data": data })))
}

pub async fn update<E: Endpoint>(
    State(state): State<AppState>,
    payload: Result<Json<E>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    let store = state.store.clone();
    let matched = run_blocking(move || service::update(&store, &payload)).await?;
    tracing::debug!(route = E::ROUTE, rows = matched, "Update applied");
    Ok(Json(json!({ "status": "success" })))
}

pub async fn get<E: Endpoint>(
    State(state): State<AppState>,
    payload: Result<Json<GetRequest<E>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let store = state.store.clone();
    let body = match run_blocking(move || service::get(&store, request)).await? {
        Fetched::One(record) => json!({ "status": "success", "data": record }),
        Fetched::Many(page) => json!({
            "status": "success",
            "data": page.items,
            "total_items": page.total_items,
        }),
    };
    Ok(Json(body))
}

pub async fn record_progress(
    State(state): State<AppState>,
    payload: Result<Json<ProgressRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let store = state.store.clone();
    let progress = run_blocking(move || service::record_progress(&store, &request)).await?;
    Ok(Json(json!({ "status": "success", "data": progress })))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "success".to_string(),
        service: "supagent".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}
