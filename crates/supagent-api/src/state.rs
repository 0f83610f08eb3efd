use std::sync::Arc;

use chrono::{DateTime, Utc};
use supagent_store::RecordStore;

/// Shared application state for API handlers. Holds no mutable state; the
/// store opens its own connection per call.
#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    api_key: Arc<str>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: RecordStore, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            api_key: api_key.into(),
            started_at: Utc::now(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
