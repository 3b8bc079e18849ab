//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router needed.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use folio_api::error::AppError;
use folio_core::error::CoreError;
use folio_db::error::StoreError;
use folio_history::error::HistoryError;
use http_body_util::BodyExt;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Post",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Post with id 42 not found");
}

#[tokio::test]
async fn invalid_position_returns_400() {
    let err = AppError::Core(CoreError::InvalidPosition {
        post_id: 3,
        timestamp: 1000,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_POSITION");
}

#[test]
fn history_errors_keep_their_variant() {
    let err = AppError::from(HistoryError::Core(CoreError::InvalidPosition {
        post_id: 3,
        timestamp: 1000,
    }));
    assert_matches!(
        err,
        AppError::Core(CoreError::InvalidPosition { timestamp: 1000, .. })
    );

    let err = AppError::from(HistoryError::Store(StoreError::Corrupt("bad row".into())));
    assert_matches!(err, AppError::Store(StoreError::Corrupt(ref detail)) if detail == "bad row");
}

#[tokio::test]
async fn history_errors_unwrap_into_app_errors() {
    let err: AppError = HistoryError::Core(CoreError::Conflict("duplicate revision".into())).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "duplicate revision");
}

#[tokio::test]
async fn corrupt_store_data_is_sanitized() {
    let err: AppError = HistoryError::Store(StoreError::Corrupt("bad row".into())).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let err = AppError::Store(StoreError::Database(sqlx::Error::RowNotFound));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
