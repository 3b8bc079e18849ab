pub mod health;
pub mod posts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /posts                                       create
/// /posts/{pid}                                 get, update
/// /posts/{pid}/revisions                       list history
/// /posts/{pid}/revisions/{since}               load, delete
/// /posts/{pid}/revisions/{since}/restore       restore
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/posts", posts::router())
}
