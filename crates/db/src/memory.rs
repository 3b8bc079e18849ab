//! In-process revision store.
//!
//! Implements both store traits over `RwLock`-guarded maps. Used by the test
//! suites and by the API binary when no database is configured.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use folio_core::patch::Patch;
use folio_core::revision::{Revision, RevisionKey};
use folio_core::types::{EpochMillis, PostId};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{RevisionRecordStore, RevisionSequenceStore};

/// Thread-safe in-memory store; wrap in `Arc` to share.
#[derive(Default)]
pub struct MemoryRevisionStore {
    sequences: RwLock<HashMap<PostId, VecDeque<EpochMillis>>>,
    records: RwLock<HashMap<RevisionKey, Revision>>,
}

impl MemoryRevisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held across all posts.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RevisionSequenceStore for MemoryRevisionStore {
    async fn prepend(&self, post_id: PostId, timestamp: EpochMillis) -> Result<(), StoreError> {
        self.sequences
            .write()
            .await
            .entry(post_id)
            .or_default()
            .push_front(timestamp);
        Ok(())
    }

    async fn range(&self, post_id: PostId) -> Result<Vec<EpochMillis>, StoreError> {
        Ok(self
            .sequences
            .read()
            .await
            .get(&post_id)
            .map(|seq| seq.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn remove(&self, post_id: PostId, timestamp: EpochMillis) -> Result<(), StoreError> {
        let mut sequences = self.sequences.write().await;
        if let Some(seq) = sequences.get_mut(&post_id) {
            seq.retain(|ts| *ts != timestamp);
            if seq.is_empty() {
                sequences.remove(&post_id);
            }
        }
        Ok(())
    }

    async fn len(&self, post_id: PostId) -> Result<usize, StoreError> {
        Ok(self
            .sequences
            .read()
            .await
            .get(&post_id)
            .map_or(0, VecDeque::len))
    }
}

#[async_trait]
impl RevisionRecordStore for MemoryRevisionStore {
    async fn put(&self, revision: &Revision) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(revision.key(), revision.clone());
        Ok(())
    }

    async fn set_patch(&self, key: RevisionKey, patch: Option<&Patch>) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&key) {
            Some(record) => {
                record.patch = patch.cloned();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_many(
        &self,
        post_id: PostId,
        timestamps: &[EpochMillis],
    ) -> Result<Vec<Option<Revision>>, StoreError> {
        let records = self.records.read().await;
        Ok(timestamps
            .iter()
            .map(|ts| records.get(&RevisionKey::new(post_id, *ts)).cloned())
            .collect())
    }

    async fn delete(&self, key: RevisionKey) -> Result<(), StoreError> {
        self.records.write().await.remove(&key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
