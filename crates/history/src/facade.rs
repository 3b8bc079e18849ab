//! Entry point for post history: listing, loading, restoring and deleting
//! revisions by caller-supplied timestamps.

use std::sync::Arc;

use folio_core::post::{EditOutcome, PostEdit};
use folio_core::revision::{validate_timestamp, Revision};
use folio_core::types::{EpochMillis, PostId, UserId};

use crate::collaborators::{PostReader, PostWriter, Renderer, TagResolver};
use crate::config::HistoryConfig;
use crate::engine::{DeleteOutcome, DeltaChain, Reconstruction};
use crate::error::HistoryResult;
use crate::log::RevisionLog;

#[derive(Clone)]
pub struct PostHistory {
    config: HistoryConfig,
    log: RevisionLog,
    chain: DeltaChain,
    renderer: Arc<dyn Renderer>,
    writer: Arc<dyn PostWriter>,
}

impl PostHistory {
    pub fn new(
        config: HistoryConfig,
        log: RevisionLog,
        posts: Arc<dyn PostReader>,
        writer: Arc<dyn PostWriter>,
        renderer: Arc<dyn Renderer>,
        tags: Arc<dyn TagResolver>,
    ) -> Self {
        let chain = DeltaChain::new(log.clone(), posts, renderer.clone(), tags);
        Self {
            config,
            log,
            chain,
            renderer,
            writer,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn log(&self) -> &RevisionLog {
        &self.log
    }

    /// Whether the post has any recorded history.
    pub async fn exists(&self, post_id: PostId) -> HistoryResult<bool> {
        if !self.config.enable_post_history {
            return Ok(false);
        }
        Ok(self.log.len(post_id).await? > 0)
    }

    /// Revision timestamps, newest first.
    pub async fn list(&self, post_id: PostId) -> HistoryResult<Vec<EpochMillis>> {
        self.log.timestamps(post_id).await
    }

    /// Raw revision records newer than `since`.
    pub async fn revisions(
        &self,
        post_id: PostId,
        since: Option<&str>,
    ) -> HistoryResult<Vec<Revision>> {
        let since = since.map(validate_timestamp).transpose()?;
        self.log.revisions_since(post_id, since).await
    }

    /// The post as it was at `since`, ready for delivery.
    pub async fn load(
        &self,
        post_id: PostId,
        since: &str,
        viewer: UserId,
    ) -> HistoryResult<Reconstruction> {
        let since = validate_timestamp(since)?;
        let mut reconstruction = self.chain.reconstruct(post_id, since, viewer).await?;

        reconstruction.post = self.renderer.parse_post(reconstruction.post).await?;
        reconstruction.post.content = self.renderer.escape(&reconstruction.post.content);
        Ok(reconstruction)
    }

    /// Make the version at `since` the live version again, recorded as a new
    /// edit by `viewer`.
    pub async fn restore(
        &self,
        post_id: PostId,
        since: &str,
        viewer: UserId,
    ) -> HistoryResult<EditOutcome> {
        let since = validate_timestamp(since)?;
        let Reconstruction { post, .. } = self.chain.reconstruct(post_id, since, viewer).await?;
        let tags = post.tag_values();

        tracing::info!(post_id, since, editor_id = viewer, "Restoring post version");

        self.writer
            .edit(PostEdit {
                post_id,
                editor_id: viewer,
                content: post.content,
                title: Some(post.title),
                tags: Some(tags),
                edited: None,
                restored_from: Some(since),
            })
            .await
    }

    /// Delete the revision at `timestamp`, rebasing its neighbours.
    pub async fn delete(
        &self,
        post_id: PostId,
        timestamp: &str,
        viewer: UserId,
    ) -> HistoryResult<DeleteOutcome> {
        let timestamp = validate_timestamp(timestamp)?;
        self.chain.delete_with_rebase(post_id, timestamp, viewer).await
    }
}
