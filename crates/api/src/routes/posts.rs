//! Route definitions for posts and their revision history.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{history, posts};
use crate::state::AppState;

/// Post routes, registered as `/posts`.
///
/// ```text
/// POST   /                                 create_post
/// GET    /{pid}                            get_post
/// PUT    /{pid}                            update_post
/// GET    /{pid}/revisions                  list_revisions
/// GET    /{pid}/revisions/{since}          get_revision
/// DELETE /{pid}/revisions/{since}          delete_revision
/// POST   /{pid}/revisions/{since}/restore  restore_revision
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(posts::create_post))
        .route("/{pid}", get(posts::get_post).put(posts::update_post))
        .route("/{pid}/revisions", get(history::list_revisions))
        .route(
            "/{pid}/revisions/{since}",
            get(history::get_revision).delete(history::delete_revision),
        )
        .route(
            "/{pid}/revisions/{since}/restore",
            post(history::restore_revision),
        )
}
