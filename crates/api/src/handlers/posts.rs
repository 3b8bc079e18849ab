//! Handlers for live posts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::post::{NewPost, PostEdit};
use folio_core::types::PostId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::viewer::{Editor, Viewer};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub content: String,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// POST /posts
pub async fn create_post(
    editor: Editor,
    State(state): State<AppState>,
    Json(input): Json<CreatePostRequest>,
) -> AppResult<impl IntoResponse> {
    let post = state
        .writer
        .create(NewPost {
            author_id: editor.user_id,
            title: input.title,
            content: input.content,
            tags: input.tags,
            timestamp: None,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// GET /posts/{pid}
pub async fn get_post(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(post_id): Path<PostId>,
) -> AppResult<impl IntoResponse> {
    let post = state.posts.summary(post_id, viewer.user_id).await?;
    Ok(Json(DataResponse { data: post }))
}

/// PUT /posts/{pid}
///
/// Replace the post's content (and optionally title and tags), recording a
/// revision when history is enabled.
pub async fn update_post(
    editor: Editor,
    State(state): State<AppState>,
    Path(post_id): Path<PostId>,
    Json(input): Json<UpdatePostRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .writer
        .edit(PostEdit {
            post_id,
            editor_id: editor.user_id,
            content: input.content,
            title: input.title,
            tags: input.tags,
            edited: None,
            restored_from: None,
        })
        .await?;

    Ok(Json(DataResponse { data: outcome }))
}
