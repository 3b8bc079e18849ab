//! The revision log: the persisted half of a post's delta chain.

use std::sync::Arc;

use folio_core::chain::{select_since, RebasePlan, RevisionChain};
use folio_core::error::CoreError;
use folio_core::revision::{Revision, RevisionDraft, RevisionKey};
use folio_core::types::{now_millis, EpochMillis, PostId};
use folio_db::store::{RevisionRecordStore, RevisionSequenceStore};

use crate::error::HistoryResult;

/// Reads and writes revision chains through the two store traits.
#[derive(Clone)]
pub struct RevisionLog {
    sequence: Arc<dyn RevisionSequenceStore>,
    records: Arc<dyn RevisionRecordStore>,
}

impl RevisionLog {
    pub fn new(
        sequence: Arc<dyn RevisionSequenceStore>,
        records: Arc<dyn RevisionRecordStore>,
    ) -> Self {
        Self { sequence, records }
    }

    /// Build a log over a single store implementing both traits.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: RevisionSequenceStore + RevisionRecordStore + 'static,
    {
        Self::new(store.clone(), store)
    }

    /// Newest-first timestamps of the post's revisions.
    pub async fn timestamps(&self, post_id: PostId) -> HistoryResult<Vec<EpochMillis>> {
        Ok(self.sequence.range(post_id).await?)
    }

    pub async fn len(&self, post_id: PostId) -> HistoryResult<usize> {
        Ok(self.sequence.len(post_id).await?)
    }

    /// Records newer than `since` (all of them when absent), newest first.
    /// Timestamps whose record is missing are skipped.
    pub async fn revisions_since(
        &self,
        post_id: PostId,
        since: Option<EpochMillis>,
    ) -> HistoryResult<Vec<Revision>> {
        let order = self.timestamps(post_id).await?;
        let selected = select_since(&order, since.unwrap_or(0));
        let found = self.records.get_many(post_id, &selected).await?;
        Ok(found.into_iter().flatten().collect())
    }

    /// Load the records for `order` into a chain.
    pub async fn load_chain(
        &self,
        post_id: PostId,
        order: Vec<EpochMillis>,
    ) -> HistoryResult<RevisionChain> {
        let found = self.records.get_many(post_id, &order).await?;
        let missing = found.iter().filter(|record| record.is_none()).count();
        if missing > 0 {
            tracing::warn!(post_id, missing, "Revision sequence references missing records");
        }
        Ok(RevisionChain::new(post_id, order, found.into_iter().flatten()))
    }

    /// Record an edit and put it at the front of the post's chain.
    ///
    /// Fails with `Conflict` if the post already has a revision at the same
    /// timestamp.
    pub async fn append(&self, draft: RevisionDraft) -> HistoryResult<Revision> {
        let post_id = draft.post_id;
        let timestamp = draft.timestamp.unwrap_or_else(now_millis);

        let existing = self.sequence.range(post_id).await?;
        if existing.contains(&timestamp) {
            return Err(CoreError::Conflict(format!(
                "Post {post_id} already has a revision at {timestamp}"
            ))
            .into());
        }
        if let Some(newest) = existing.first().copied().filter(|newest| timestamp < *newest) {
            tracing::warn!(post_id, timestamp, newest, "Revision is older than the newest entry");
        }

        let revision = draft.into_revision(timestamp);
        tokio::try_join!(
            self.records.put(&revision),
            self.sequence.prepend(post_id, timestamp),
        )?;

        tracing::info!(
            post_id,
            timestamp,
            editor_id = revision.editor_id,
            has_patch = revision.patch.is_some(),
            renamed = revision.title.is_some(),
            tags_changed = revision.tags.is_some(),
            "Revision recorded"
        );
        Ok(revision)
    }

    /// Persist a rebase plan: rewrite patches oldest first, then drop the
    /// removed revision. Returns the timestamps whose patch was rewritten.
    pub(crate) async fn apply_rebase(
        &self,
        post_id: PostId,
        plan: &RebasePlan,
    ) -> HistoryResult<Vec<EpochMillis>> {
        let mut rewritten = Vec::with_capacity(plan.rewrites.len());
        for rewrite in &plan.rewrites {
            let key = RevisionKey::new(post_id, rewrite.timestamp);
            if self.records.set_patch(key, rewrite.patch.as_ref()).await? {
                rewritten.push(rewrite.timestamp);
            } else {
                tracing::warn!(%key, "Rebased revision has no record, patch not stored");
            }
        }

        self.remove(RevisionKey::new(post_id, plan.removed)).await?;
        Ok(rewritten)
    }

    /// Delete a record and drop its timestamp from the sequence.
    pub(crate) async fn remove(&self, key: RevisionKey) -> HistoryResult<()> {
        tokio::try_join!(
            self.records.delete(key),
            self.sequence.remove(key.post_id, key.timestamp),
        )?;
        tracing::debug!(%key, "Revision removed");
        Ok(())
    }
}
