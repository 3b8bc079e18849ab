//! Repository for the `posts` table.

use folio_core::types::{DbId, EpochMillis, PostId};
use sqlx::PgPool;

use crate::models::post::{PostRow, UpdatePost};

/// Column list for posts queries.
const COLUMNS: &str = "id, author_id, title, tags, content, created_at_ms, edited_at_ms";

/// Provides create, read and update operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        title: &str,
        tags: &[String],
        content: &str,
        created_at_ms: EpochMillis,
    ) -> Result<PostRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (author_id, title, tags, content, created_at_ms)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PostRow>(&query)
            .bind(author_id)
            .bind(title)
            .bind(tags.to_vec())
            .bind(content)
            .bind(created_at_ms)
            .fetch_one(pool)
            .await
    }

    /// Find a post by its ID.
    pub async fn find_by_id(pool: &PgPool, id: PostId) -> Result<Option<PostRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a post's content, title and tags. Returns `None` if the post
    /// does not exist.
    pub async fn update(
        pool: &PgPool,
        id: PostId,
        input: &UpdatePost<'_>,
    ) -> Result<Option<PostRow>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET title = $2, tags = $3, content = $4, edited_at_ms = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .bind(input.title)
            .bind(input.tags.to_vec())
            .bind(input.content)
            .bind(input.edited_at_ms)
            .fetch_optional(pool)
            .await
    }
}
