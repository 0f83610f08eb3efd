use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use supagent_models::Entity;

/// Body of a `get` request: the entity's fields as filters, plus paging.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "E: Entity"))]
pub struct GetRequest<E> {
    #[serde(flatten)]
    pub record: E,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Sort column name; must be one of the entity's columns.
    #[serde(default)]
    pub order_by: Option<String>,
}

/// Add completed trades and cycles to a running session's counters.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressRequest {
    pub session_id: String,
    #[serde(default)]
    pub trades: u64,
    #[serde(default)]
    pub cycles: u64,
    #[serde(default)]
    pub last_cycle: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Progress {
    pub session_id: String,
    pub trades_count: String,
    pub cycle_count: String,
    pub last_cycle: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: i64,
}
