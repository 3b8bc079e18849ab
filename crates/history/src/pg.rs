//! PostgreSQL-backed post service.

use async_trait::async_trait;
use folio_core::error::CoreError;
use folio_core::markup::escape_html;
use folio_core::post::{
    validate_content, validate_tags, validate_title, EditOutcome, NewPost, PostEdit, PostSummary,
    TagData,
};
use folio_core::types::{now_millis, PostId, UserId};
use folio_db::error::StoreError;
use folio_db::models::post::{PostRow, UpdatePost};
use folio_db::repositories::PostRepo;
use folio_db::DbPool;

use crate::collaborators::{PostReader, PostWriter};
use crate::config::HistoryConfig;
use crate::edit::{plan_edit, CurrentPost};
use crate::error::HistoryResult;
use crate::log::RevisionLog;

/// Posts in the `posts` table, recording revisions through a [`RevisionLog`].
#[derive(Clone)]
pub struct PgPosts {
    pool: DbPool,
    log: RevisionLog,
    config: HistoryConfig,
}

impl PgPosts {
    pub fn new(pool: DbPool, log: RevisionLog, config: HistoryConfig) -> Self {
        Self { pool, log, config }
    }

    async fn find(&self, post_id: PostId) -> HistoryResult<PostRow> {
        let row = PostRepo::find_by_id(&self.pool, post_id)
            .await
            .map_err(StoreError::from)?;
        Ok(row.ok_or(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        })?)
    }
}

fn summarize(row: &PostRow) -> PostSummary {
    PostSummary {
        post_id: row.id,
        author_id: row.author_id,
        timestamp: row.created_at_ms,
        edited: row.edited_at_ms,
        content: escape_html(&row.content),
        title: escape_html(&row.title),
        tags: row.tags.iter().map(|tag| TagData::from_value(tag)).collect(),
    }
}

#[async_trait]
impl PostReader for PgPosts {
    async fn summary(&self, post_id: PostId, _viewer: UserId) -> HistoryResult<PostSummary> {
        Ok(summarize(&self.find(post_id).await?))
    }
}

#[async_trait]
impl PostWriter for PgPosts {
    async fn create(&self, post: NewPost) -> HistoryResult<PostSummary> {
        validate_title(&post.title)?;
        validate_content(&post.content)?;
        validate_tags(&post.tags)?;

        let row = PostRepo::create(
            &self.pool,
            post.author_id,
            &post.title,
            &post.tags,
            &post.content,
            post.timestamp.unwrap_or_else(now_millis),
        )
        .await
        .map_err(StoreError::from)?;

        tracing::info!(post_id = row.id, author_id = row.author_id, "Post created");
        Ok(summarize(&row))
    }

    async fn edit(&self, edit: PostEdit) -> HistoryResult<EditOutcome> {
        let post_id = edit.post_id;
        let current = self.find(post_id).await?;
        let plan = plan_edit(
            CurrentPost {
                title: &current.title,
                tags: &current.tags,
                content: &current.content,
            },
            edit,
        )?;

        let revision = if self.config.enable_post_history {
            Some(self.log.append(plan.draft).await?.timestamp)
        } else {
            None
        };

        let update = UpdatePost {
            title: &plan.title,
            tags: &plan.tags,
            content: &plan.content,
            edited_at_ms: plan.edited,
        };
        let row = PostRepo::update(&self.pool, post_id, &update)
            .await
            .map_err(StoreError::from)?
            .ok_or(CoreError::NotFound {
                entity: "Post",
                id: post_id,
            })?;

        tracing::info!(post_id, ?revision, renamed = plan.renamed, "Post edited");
        Ok(EditOutcome {
            post: summarize(&row),
            revision,
            renamed: plan.renamed,
            tags_updated: plan.tags_updated,
        })
    }
}
