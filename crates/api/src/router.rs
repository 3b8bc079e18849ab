//! Shared application router builder.
//!
//! Provides [`build_app_router`] so both the production binary (`main.rs`)
//! and integration tests (`tests/common/mod.rs`) use the exact same middleware
//! stack.

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::middleware::viewer::USER_ID_HEADER;
use crate::routes;
use crate::state::AppState;

/// Header carrying the per-request UUID, echoed back on every response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the full application [`Router`] with all middleware layers.
///
/// Layers wrap bottom-up, so CORS sees a request first and panic recovery
/// sits closest to the handlers:
///
/// 1. CORS (admits the `x-user-id` actor header, exposes the request ID)
/// 2. Set request ID on incoming requests
/// 3. Structured request/response tracing
/// 4. Propagate request ID to response
/// 5. Request timeout
/// 6. Panic recovery (catch panics, return 500)
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        // Health check at root level (not under /api/v1).
        .merge(routes::health::router())
        // Posts and their revision history.
        .nest("/api/v1", routes::api_routes())
        // -- Middleware stack (applied bottom-up) --
        // Panics in a handler become a 500 instead of a dropped connection.
        .layer(CatchPanicLayer::new())
        // Request timeout, `REQUEST_TIMEOUT_SECS`.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // One INFO span per request, closed with status and latency.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // CORS.
        .layer(cors)
        .with_state(state)
}

/// Build the CORS middleware layer from server configuration.
///
/// Browsers send the acting user in `x-user-id`, so it is allowed on
/// requests; the request ID is exposed so clients can quote it in reports.
///
/// Panics at startup if any configured origin is invalid.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        // Revisions are read (GET), restored (POST) and deleted (DELETE);
        // posts are edited with PUT.
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
