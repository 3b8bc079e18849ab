//! Repository for the `post_revision_sequence` and `post_revisions` tables.
//!
//! The sequence table stores the chain order (newest entry = highest
//! `position`); the revisions table stores one record per `(post, timestamp)`.

use folio_core::revision::{Revision, RevisionKey};
use folio_core::types::{EpochMillis, PostId};
use sqlx::PgPool;

use crate::models::revision::RevisionRow;

/// Column list for post_revisions queries.
const COLUMNS: &str = "post_id, timestamp_ms, editor_id, patch, title, tags";

/// Provides sequence and record operations for revision chains.
pub struct RevisionRepo;

impl RevisionRepo {
    // -- sequence -----------------------------------------------------------

    /// Append `timestamp` at the front of the post's sequence.
    pub async fn prepend_timestamp(
        pool: &PgPool,
        post_id: PostId,
        timestamp: EpochMillis,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO post_revision_sequence (post_id, timestamp_ms) VALUES ($1, $2)")
            .bind(post_id)
            .bind(timestamp)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// List the post's sequence, newest first.
    pub async fn list_timestamps(
        pool: &PgPool,
        post_id: PostId,
    ) -> Result<Vec<EpochMillis>, sqlx::Error> {
        sqlx::query_scalar::<_, EpochMillis>(
            "SELECT timestamp_ms FROM post_revision_sequence
             WHERE post_id = $1
             ORDER BY position DESC",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
    }

    /// Remove every occurrence of `timestamp` from the post's sequence.
    pub async fn remove_timestamp(
        pool: &PgPool,
        post_id: PostId,
        timestamp: EpochMillis,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM post_revision_sequence WHERE post_id = $1 AND timestamp_ms = $2",
        )
        .bind(post_id)
        .bind(timestamp)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Number of entries in the post's sequence.
    pub async fn count_timestamps(pool: &PgPool, post_id: PostId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM post_revision_sequence WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_one(pool)
        .await
    }

    // -- records ------------------------------------------------------------

    /// Insert or fully replace a revision record.
    pub async fn upsert(pool: &PgPool, revision: &Revision) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO post_revisions (post_id, timestamp_ms, editor_id, patch, title, tags)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (post_id, timestamp_ms) DO UPDATE
             SET editor_id = EXCLUDED.editor_id,
                 patch = EXCLUDED.patch,
                 title = EXCLUDED.title,
                 tags = EXCLUDED.tags",
        )
        .bind(revision.post_id)
        .bind(revision.timestamp)
        .bind(revision.editor_id)
        .bind(revision.patch.as_ref().map(|patch| patch.as_str()))
        .bind(revision.title.as_deref())
        .bind(revision.tags.as_deref())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace the patch of a record. Returns the number of rows updated.
    pub async fn set_patch(
        pool: &PgPool,
        key: RevisionKey,
        patch: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE post_revisions SET patch = $3 WHERE post_id = $1 AND timestamp_ms = $2",
        )
        .bind(key.post_id)
        .bind(key.timestamp)
        .bind(patch)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Fetch the records of a post at the given timestamps, in no particular order.
    pub async fn find_many(
        pool: &PgPool,
        post_id: PostId,
        timestamps: &[EpochMillis],
    ) -> Result<Vec<RevisionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM post_revisions
             WHERE post_id = $1 AND timestamp_ms = ANY($2)"
        );
        sqlx::query_as::<_, RevisionRow>(&query)
            .bind(post_id)
            .bind(timestamps.to_vec())
            .fetch_all(pool)
            .await
    }

    /// Delete a revision record.
    pub async fn delete(pool: &PgPool, key: RevisionKey) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM post_revisions WHERE post_id = $1 AND timestamp_ms = $2")
                .bind(key.post_id)
                .bind(key.timestamp)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
