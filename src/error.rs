//! Error types for the inventory view service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cache::BuildError;
use crate::inventory::StoreError;

// == App Error Enum ==
/// Unified error type for the service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested view is unknown or its resources are missing
    #[error("View not found: {0}")]
    ViewNotFound(String),

    /// View builder failed
    #[error("View build failed: {0}")]
    Build(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Mutation conflicts with current inventory state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A backing component (cache task, store) is not available
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::NotFound(key) => AppError::ViewNotFound(key),
            failed @ BuildError::Failed { .. } => AppError::Build(failed.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::Invalid(msg) => AppError::InvalidRequest(msg),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Unavailable(msg) => AppError::Unavailable(msg),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ViewNotFound(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Build(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the service.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_build_not_found_maps_to_view_not_found() {
        let err: AppError = BuildError::NotFound("ghost".to_string()).into();
        assert!(matches!(err, AppError::ViewNotFound(ref key) if key == "ghost"));
    }

    #[test]
    fn test_build_failure_keeps_reason() {
        let err: AppError = BuildError::Failed {
            key: "stock".to_string(),
            reason: "store offline".to_string(),
        }
        .into();
        match err {
            AppError::Build(msg) => {
                assert!(msg.contains("stock"));
                assert!(msg.contains("store offline"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_store_errors_map_to_status() {
        let cases = [
            (
                AppError::from(StoreError::NotFound {
                    entity: "product",
                    id: Uuid::nil(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(StoreError::Invalid("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(StoreError::Conflict("busy".into())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(StoreError::Unavailable("poisoned".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
