//! In-process post service backing tests and database-less runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use folio_core::error::CoreError;
use folio_core::markup::escape_html;
use folio_core::post::{
    validate_content, validate_tags, validate_title, EditOutcome, NewPost, PostEdit, PostSummary,
    TagData,
};
use folio_core::types::{now_millis, EpochMillis, PostId, UserId};
use tokio::sync::RwLock;

use crate::collaborators::{PostReader, PostWriter};
use crate::config::HistoryConfig;
use crate::edit::{plan_edit, CurrentPost};
use crate::error::HistoryResult;
use crate::log::RevisionLog;

#[derive(Debug, Clone)]
struct StoredPost {
    id: PostId,
    author_id: UserId,
    title: String,
    tags: Vec<String>,
    content: String,
    created_at: EpochMillis,
    edited_at: Option<EpochMillis>,
}

impl StoredPost {
    fn summary(&self) -> PostSummary {
        PostSummary {
            post_id: self.id,
            author_id: self.author_id,
            timestamp: self.created_at,
            edited: self.edited_at,
            content: escape_html(&self.content),
            title: escape_html(&self.title),
            tags: self.tags.iter().map(|tag| TagData::from_value(tag)).collect(),
        }
    }
}

/// Posts held in memory, recording revisions through a [`RevisionLog`].
pub struct MemoryPosts {
    posts: RwLock<HashMap<PostId, StoredPost>>,
    next_id: AtomicI64,
    log: RevisionLog,
    config: HistoryConfig,
}

impl MemoryPosts {
    pub fn new(log: RevisionLog, config: HistoryConfig) -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            log,
            config,
        }
    }
}

#[async_trait]
impl PostReader for MemoryPosts {
    async fn summary(&self, post_id: PostId, _viewer: UserId) -> HistoryResult<PostSummary> {
        self.posts
            .read()
            .await
            .get(&post_id)
            .map(StoredPost::summary)
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Post",
                    id: post_id,
                }
                .into()
            })
    }
}

#[async_trait]
impl PostWriter for MemoryPosts {
    async fn create(&self, post: NewPost) -> HistoryResult<PostSummary> {
        validate_title(&post.title)?;
        validate_content(&post.content)?;
        validate_tags(&post.tags)?;

        let stored = StoredPost {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            author_id: post.author_id,
            title: post.title,
            tags: post.tags,
            content: post.content,
            created_at: post.timestamp.unwrap_or_else(now_millis),
            edited_at: None,
        };
        let summary = stored.summary();
        self.posts.write().await.insert(stored.id, stored);

        tracing::info!(post_id = summary.post_id, author_id = summary.author_id, "Post created");
        Ok(summary)
    }

    async fn edit(&self, edit: PostEdit) -> HistoryResult<EditOutcome> {
        let post_id = edit.post_id;
        let current = self.posts.read().await.get(&post_id).cloned().ok_or(
            CoreError::NotFound {
                entity: "Post",
                id: post_id,
            },
        )?;

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

        let mut posts = self.posts.write().await;
        let stored = posts.get_mut(&post_id).ok_or(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        })?;
        stored.title = plan.title;
        stored.tags = plan.tags;
        stored.content = plan.content;
        stored.edited_at = Some(plan.edited);
        let post = stored.summary();
        drop(posts);

        tracing::info!(post_id, ?revision, renamed = plan.renamed, "Post edited");
        Ok(EditOutcome {
            post,
            revision,
            renamed: plan.renamed,
            tags_updated: plan.tags_updated,
        })
    }
}
