use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::error::CoreError;
use folio_db::error::StoreError;
use folio_history::error::HistoryError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`StoreError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `folio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure reported by a store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Core(core) => Self::Core(core),
            HistoryError::Store(store) => Self::Store(store),
        }
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
                CoreError::InvalidPosition { .. } => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_POSITION",
                    core.to_string(),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Store errors ---
            AppError::Store(StoreError::Database(err)) => classify_sqlx_error(err),
            AppError::Store(StoreError::Corrupt(msg)) => {
                tracing::error!(error = %msg, "Corrupt store data");
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
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
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (PostgreSQL code 23505) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
