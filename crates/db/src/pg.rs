//! PostgreSQL-backed revision store.

use std::collections::HashMap;

use async_trait::async_trait;
use folio_core::patch::Patch;
use folio_core::revision::{Revision, RevisionKey};
use folio_core::types::{EpochMillis, PostId};

use crate::error::StoreError;
use crate::repositories::RevisionRepo;
use crate::store::{RevisionRecordStore, RevisionSequenceStore};
use crate::DbPool;

/// Implements both store traits on top of [`RevisionRepo`].
#[derive(Clone)]
pub struct PgRevisionStore {
    pool: DbPool,
}

impl PgRevisionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevisionSequenceStore for PgRevisionStore {
    async fn prepend(&self, post_id: PostId, timestamp: EpochMillis) -> Result<(), StoreError> {
        RevisionRepo::prepend_timestamp(&self.pool, post_id, timestamp).await?;
        Ok(())
    }

    async fn range(&self, post_id: PostId) -> Result<Vec<EpochMillis>, StoreError> {
        Ok(RevisionRepo::list_timestamps(&self.pool, post_id).await?)
    }

    async fn remove(&self, post_id: PostId, timestamp: EpochMillis) -> Result<(), StoreError> {
        let removed = RevisionRepo::remove_timestamp(&self.pool, post_id, timestamp).await?;
        tracing::debug!(post_id, timestamp, removed, "Removed revision timestamp");
        Ok(())
    }

    async fn len(&self, post_id: PostId) -> Result<usize, StoreError> {
        let count = RevisionRepo::count_timestamps(&self.pool, post_id).await?;
        usize::try_from(count).map_err(|_| {
            StoreError::Corrupt(format!("Negative sequence length {count} for post {post_id}"))
        })
    }
}

#[async_trait]
impl RevisionRecordStore for PgRevisionStore {
    async fn put(&self, revision: &Revision) -> Result<(), StoreError> {
        RevisionRepo::upsert(&self.pool, revision).await?;
        Ok(())
    }

    async fn set_patch(&self, key: RevisionKey, patch: Option<&Patch>) -> Result<bool, StoreError> {
        let updated =
            RevisionRepo::set_patch(&self.pool, key, patch.map(Patch::as_str)).await?;
        Ok(updated > 0)
    }

    async fn get_many(
        &self,
        post_id: PostId,
        timestamps: &[EpochMillis],
    ) -> Result<Vec<Option<Revision>>, StoreError> {
        if timestamps.is_empty() {
            return Ok(Vec::new());
        }

        let found: HashMap<EpochMillis, Revision> =
            RevisionRepo::find_many(&self.pool, post_id, timestamps)
                .await?
                .into_iter()
                .map(|row| (row.timestamp_ms, Revision::from(row)))
                .collect();

        Ok(timestamps.iter().map(|ts| found.get(ts).cloned()).collect())
    }

    async fn delete(&self, key: RevisionKey) -> Result<(), StoreError> {
        RevisionRepo::delete(&self.pool, key).await?;
        Ok(())
    }
}
