use axum::http::header::InvalidHeaderValue;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledger_core::error::CoreError;
use ledger_db::StoreError;
use serde_json::json;

use crate::auth::session::SessionError;

/// Message returned for every failure whose detail must not leak.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, the store and session errors, and
/// adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{"error": ..., "code": ...}` JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `ledger_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from the store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A session issuance or verification error.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A response header could not be encoded.
    #[error("Invalid header value: {0}")]
    Header(#[from] InvalidHeaderValue),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A dependency needed to answer the request is unavailable.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for the 401 rejections issued by the session gate.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Core(CoreError::Unauthorized(message.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Persistence ---
            AppError::Store(err) => classify_store_error(err),

            // --- Sessions ---
            AppError::Session(SessionError::NotFound) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "session was not verified".to_string(),
            ),
            AppError::Session(SessionError::Store(err)) => classify_store_error(err),
            AppError::Session(err @ SessionError::Entropy(_)) => {
                tracing::error!(error = %err, "Session issuance failed");
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::Header(err) => {
                tracing::error!(error = %err, "Response header encoding failed");
                internal()
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Unique constraint violations map to 409.
/// - Dangling foreign keys map to 400 (the client referenced a missing row).
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Conflict(constraint) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        StoreError::InvalidReference(constraint) => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            format!("Referenced row does not exist: {constraint}"),
        ),
        StoreError::Database(_) | StoreError::Unavailable(_) => {
            tracing::error!(error = %err, "Store error");
            internal()
        }
    }
}
