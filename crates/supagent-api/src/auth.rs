use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared-secret check: the header must be present and exactly equal to the
/// configured key.
pub fn authorize(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if key == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

/// Middleware guarding every `/api_v1` route. Runs before the body is read,
/// so unauthenticated requests never reach payload validation.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(e) = authorize(request.headers(), state.api_key()) {
        tracing::warn!(path = %request.uri().path(), "Rejected request with bad API key");
        return Err(e);
    }
    Ok(next.run(request).await)
}
