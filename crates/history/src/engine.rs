//! Reconstruction and rebase of a post's delta chain.
//!
//! The chain arithmetic lives in `folio_core::chain`; this module gathers the
//! inputs from the collaborators, runs it, and persists the results.

use std::sync::Arc;

use folio_core::chain::{select_since, PatchReport};
use folio_core::error::CoreError;
use folio_core::post::PostSummary;
use folio_core::revision::RevisionKey;
use folio_core::types::{EpochMillis, PostId, UserId};
use serde::Serialize;

use crate::collaborators::{PostReader, Renderer, TagResolver};
use crate::error::HistoryResult;
use crate::log::RevisionLog;

/// A post as it was at a point in time.
///
/// `post.content` and `post.title` are raw (unescaped) text.
#[derive(Debug, Clone, Serialize)]
pub struct Reconstruction {
    pub post: PostSummary,
    pub since: EpochMillis,
    pub warnings: Vec<PatchReport>,
}

/// Result of deleting a revision from a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub post_id: PostId,
    pub removed: EpochMillis,
    /// Revisions whose patch was rewritten, oldest first.
    pub rewritten: Vec<EpochMillis>,
    pub warnings: Vec<PatchReport>,
}

#[derive(Clone)]
pub struct DeltaChain {
    log: RevisionLog,
    posts: Arc<dyn PostReader>,
    renderer: Arc<dyn Renderer>,
    tags: Arc<dyn TagResolver>,
}

impl DeltaChain {
    pub fn new(
        log: RevisionLog,
        posts: Arc<dyn PostReader>,
        renderer: Arc<dyn Renderer>,
        tags: Arc<dyn TagResolver>,
    ) -> Self {
        Self {
            log,
            posts,
            renderer,
            tags,
        }
    }

    /// Rebuild the post as it was at `since` by replaying every newer
    /// revision's reverse patch over the live content.
    pub async fn reconstruct(
        &self,
        post_id: PostId,
        since: EpochMillis,
        viewer: UserId,
    ) -> HistoryResult<Reconstruction> {
        let (mut post, order) = tokio::try_join!(
            self.posts.summary(post_id, viewer),
            self.log.timestamps(post_id),
        )?;

        let chain = self
            .log
            .load_chain(post_id, select_since(&order, since))
            .await?;
        let live = self.renderer.unescape(&post.content);
        let replay = chain.replay(&live, since);
        log_warnings(post_id, &replay.warnings);

        post.content = replay.content;
        post.title = match chain.historical_title(since) {
            Some(title) => self.renderer.unescape(title),
            None => self.renderer.unescape(&post.title),
        };
        if let Some(values) = chain.historical_tags(since) {
            post.tags = self.tags.tag_data(&values).await?;
        }

        tracing::debug!(
            post_id,
            since,
            replayed = chain.len(),
            warnings = replay.warnings.len(),
            "Post reconstructed"
        );

        Ok(Reconstruction {
            post,
            since,
            warnings: replay.warnings,
        })
    }

    /// Remove the revision at `target` and rewrite its neighbours so every
    /// surviving timestamp still reconstructs to the same content.
    ///
    /// Targeting the post's creation time drops the oldest revision instead,
    /// without rebasing.
    pub async fn delete_with_rebase(
        &self,
        post_id: PostId,
        target: EpochMillis,
        viewer: UserId,
    ) -> HistoryResult<DeleteOutcome> {
        let (post, order) = tokio::try_join!(
            self.posts.summary(post_id, viewer),
            self.log.timestamps(post_id),
        )?;

        if target == post.timestamp {
            let oldest = order.last().copied().ok_or(CoreError::InvalidPosition {
                post_id,
                timestamp: target,
            })?;
            self.log.remove(RevisionKey::new(post_id, oldest)).await?;
            tracing::info!(post_id, removed = oldest, "Oldest revision removed");
            return Ok(DeleteOutcome {
                post_id,
                removed: oldest,
                rewritten: Vec::new(),
                warnings: Vec::new(),
            });
        }

        let chain = self.log.load_chain(post_id, order).await?;
        let live = self.renderer.unescape(&post.content);
        let plan = chain.rebase_without(&live, target)?;
        log_warnings(post_id, &plan.warnings);

        let rewritten = self.log.apply_rebase(post_id, &plan).await?;
        tracing::info!(
            post_id,
            removed = plan.removed,
            rewritten = rewritten.len(),
            "Revision removed and chain rebased"
        );

        Ok(DeleteOutcome {
            post_id,
            removed: plan.removed,
            rewritten,
            warnings: plan.warnings,
        })
    }
}

fn log_warnings(post_id: PostId, warnings: &[PatchReport]) {
    for report in warnings {
        tracing::warn!(
            post_id,
            timestamp = report.timestamp,
            status = ?report.status,
            "Revision patch did not apply cleanly"
        );
    }
}
