//! Post row model.

use folio_core::types::{DbId, EpochMillis, PostId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `posts` table. Content and title are stored raw.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostRow {
    pub id: PostId,
    pub author_id: DbId,
    pub title: String,
    pub tags: Vec<String>,
    pub content: String,
    pub created_at_ms: EpochMillis,
    pub edited_at_ms: Option<EpochMillis>,
}

/// Column values for a post update.
#[derive(Debug)]
pub struct UpdatePost<'a> {
    pub title: &'a str,
    pub tags: &'a [String],
    pub content: &'a str,
    pub edited_at_ms: EpochMillis,
}
