//! Capability traits consumed by the history engine.
//!
//! The chain needs exactly two storage primitives: an ordered list of
//! timestamps per post, and a map from `(post, timestamp)` to a revision
//! record. Keeping them separate lets each be backed (or faked) on its own.

use async_trait::async_trait;
use folio_core::patch::Patch;
use folio_core::revision::{Revision, RevisionKey};
use folio_core::types::{EpochMillis, PostId};

use crate::error::StoreError;

/// Ordered, newest-first timestamp list per post.
#[async_trait]
pub trait RevisionSequenceStore: Send + Sync {
    /// Put `timestamp` at the front of the post's sequence.
    async fn prepend(&self, post_id: PostId, timestamp: EpochMillis) -> Result<(), StoreError>;

    /// The whole sequence, newest first.
    async fn range(&self, post_id: PostId) -> Result<Vec<EpochMillis>, StoreError>;

    /// Remove every occurrence of `timestamp` from the sequence.
    async fn remove(&self, post_id: PostId, timestamp: EpochMillis) -> Result<(), StoreError>;

    async fn len(&self, post_id: PostId) -> Result<usize, StoreError>;
}

/// Revision records keyed by `(post, timestamp)`.
#[async_trait]
pub trait RevisionRecordStore: Send + Sync {
    /// Write a whole record, replacing any record under the same key.
    async fn put(&self, revision: &Revision) -> Result<(), StoreError>;

    /// Replace only the patch of an existing record, keeping its metadata.
    ///
    /// Returns `false` when no record exists under `key`.
    async fn set_patch(&self, key: RevisionKey, patch: Option<&Patch>) -> Result<bool, StoreError>;

    /// Fetch records in the order of `timestamps`; missing records are `None`.
    async fn get_many(
        &self,
        post_id: PostId,
        timestamps: &[EpochMillis],
    ) -> Result<Vec<Option<Revision>>, StoreError>;

    async fn delete(&self, key: RevisionKey) -> Result<(), StoreError>;
}
