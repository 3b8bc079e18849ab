//! Handlers for post revision history.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::revision::Revision;
use folio_core::types::{EpochMillis, PostId};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::viewer::{Editor, Viewer};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListRevisionsParams {
    /// Only return records newer than this timestamp.
    pub since: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RevisionListing {
    pub post_id: PostId,
    /// Every revision timestamp, newest first.
    pub timestamps: Vec<EpochMillis>,
    pub revisions: Vec<Revision>,
}

/// GET /posts/{pid}/revisions
///
/// 404 when the post has no recorded history (or history is disabled).
pub async fn list_revisions(
    _viewer: Viewer,
    State(state): State<AppState>,
    Path(post_id): Path<PostId>,
    Query(params): Query<ListRevisionsParams>,
) -> AppResult<impl IntoResponse> {
    if !state.history.exists(post_id).await? {
        return Err(CoreError::NotFound {
            entity: "Post history",
            id: post_id,
        }
        .into());
    }

    let (timestamps, revisions) = tokio::try_join!(
        state.history.list(post_id),
        state.history.revisions(post_id, params.since.as_deref()),
    )?;

    Ok(Json(DataResponse {
        data: RevisionListing {
            post_id,
            timestamps,
            revisions,
        },
    }))
}

/// GET /posts/{pid}/revisions/{since}
pub async fn get_revision(
    viewer: Viewer,
    State(state): State<AppState>,
    Path((post_id, since)): Path<(PostId, String)>,
) -> AppResult<impl IntoResponse> {
    let reconstruction = state.history.load(post_id, &since, viewer.user_id).await?;
    Ok(Json(DataResponse {
        data: reconstruction,
    }))
}

/// POST /posts/{pid}/revisions/{since}/restore
pub async fn restore_revision(
    editor: Editor,
    State(state): State<AppState>,
    Path((post_id, since)): Path<(PostId, String)>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .history
        .restore(post_id, &since, editor.user_id)
        .await?;

    tracing::info!(
        user_id = editor.user_id,
        post_id,
        since = %since,
        "Post version restored"
    );

    Ok(Json(DataResponse { data: outcome }))
}

/// DELETE /posts/{pid}/revisions/{timestamp}
pub async fn delete_revision(
    editor: Editor,
    State(state): State<AppState>,
    Path((post_id, timestamp)): Path<(PostId, String)>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .history
        .delete(post_id, &timestamp, editor.user_id)
        .await?;

    tracing::info!(
        user_id = editor.user_id,
        post_id,
        removed = outcome.removed,
        "Post revision deleted"
    );

    Ok(Json(DataResponse { data: outcome }))
}
