use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use estoque_core::error::CoreError;
use estoque_db::services::ServiceError;
use estoque_db::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain ([`CoreError`]), storage ([`StoreError`]) and workflow
/// ([`ServiceError`]) errors and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Store(store) => classify_store_error(store),
            AppError::Service(service) => match service {
                ServiceError::Core(core) => classify_core_error(core),
                ServiceError::Store(store) => classify_store_error(store),
                ServiceError::AuditTrail(err) => {
                    tracing::error!(error = %err, "Audit trail append failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "AUDIT_TRAIL_ERROR",
                        "Stock was updated but the movement log append failed".to_string(),
                    )
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, key } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} \"{key}\" not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::InsufficientStock { .. } => {
            (StatusCode::CONFLICT, "INSUFFICIENT_STOCK", core.to_string())
        }
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - `NotFound` maps to 404.
/// - Backend rejections and transport failures map to 502: the record store
///   is an upstream service.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::NotFound { collection, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Record {collection}/{id} not found"),
        ),
        StoreError::Backend { status, message } => {
            tracing::error!(status, message, "Record store rejected request");
            (
                StatusCode::BAD_GATEWAY,
                "STORE_ERROR",
                "The record store rejected the request".to_string(),
            )
        }
        StoreError::Http(e) => {
            tracing::error!(error = %e, "Record store unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "STORE_UNAVAILABLE",
                "The record store is unreachable".to_string(),
            )
        }
        StoreError::Serde(e) => {
            tracing::error!(error = %e, "Record decode failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        StoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
