use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use supagent_models::PaginationError;
use supagent_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("missing or invalid API key")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("record conflicts with an existing one")]
    Conflict(String),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::Store(_) => "store_error",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyPredicate { .. }
            | StoreError::NothingToUpdate { .. }
            | StoreError::EmptyInsert { .. } => Self::Validation(err.to_string()),
            StoreError::Constraint(detail) => Self::Conflict(detail),
            other => Self::Store(other),
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("response serialization failed: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internal detail is logged, never echoed to the client.
        let message = match &self {
            Self::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                "internal storage error".to_string()
            }
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "internal error".to_string()
            }
            Self::Conflict(detail) => {
                tracing::warn!(detail = %detail, "Constraint violation");
                self.to_string()
            }
            other => other.to_string(),
        };

        (
            self.status(),
            Json(serde_json::json!({
                "status": "error",
                "error": self.code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_guards_map_to_validation() {
        let err: ApiError = StoreError::EmptyPredicate {
            table: "sup_agents",
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "validation");
    }

    #[test]
    fn constraint_maps_to_conflict_without_detail() {
        let err: ApiError =
            StoreError::Constraint("UNIQUE constraint failed: sup_users.user_id".into()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(!err.to_string().contains("sup_users"));
    }

    #[test]
    fn row_mapping_failure_is_opaque_500() {
        let json_err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err: ApiError = StoreError::Json(json_err).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "store_error");
    }
}
