#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use folio_core::patch::Patch;
use folio_core::post::{NewPost, PostEdit, PostSummary};
use folio_core::revision::{Revision, RevisionKey};
use folio_core::types::{EpochMillis, PostId};
use folio_db::error::StoreError;
use folio_db::memory::MemoryRevisionStore;
use folio_db::store::{RevisionRecordStore, RevisionSequenceStore};
use folio_history::collaborators::PostWriter;
use folio_history::config::HistoryConfig;
use folio_history::facade::PostHistory;
use folio_history::log::RevisionLog;
use folio_history::memory::MemoryPosts;
use folio_history::renderer::HtmlRenderer;
use folio_history::tags::BasicTagResolver;

pub const AUTHOR: i64 = 7;
pub const EDITOR: i64 = 8;

/// Creation time of posts made with [`Harness::create`].
pub const CREATED: EpochMillis = 1_000;

/// Memory store that counts every call made through the store traits.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryRevisionStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RevisionSequenceStore for CountingStore {
    async fn prepend(&self, post_id: PostId, timestamp: EpochMillis) -> Result<(), StoreError> {
        self.hit();
        self.inner.prepend(post_id, timestamp).await
    }

    async fn range(&self, post_id: PostId) -> Result<Vec<EpochMillis>, StoreError> {
        self.hit();
        self.inner.range(post_id).await
    }

    async fn remove(&self, post_id: PostId, timestamp: EpochMillis) -> Result<(), StoreError> {
        self.hit();
        self.inner.remove(post_id, timestamp).await
    }

    async fn len(&self, post_id: PostId) -> Result<usize, StoreError> {
        self.hit();
        self.inner.len(post_id).await
    }
}

#[async_trait]
impl RevisionRecordStore for CountingStore {
    async fn put(&self, revision: &Revision) -> Result<(), StoreError> {
        self.hit();
        self.inner.put(revision).await
    }

    async fn set_patch(&self, key: RevisionKey, patch: Option<&Patch>) -> Result<bool, StoreError> {
        self.hit();
        self.inner.set_patch(key, patch).await
    }

    async fn get_many(
        &self,
        post_id: PostId,
        timestamps: &[EpochMillis],
    ) -> Result<Vec<Option<Revision>>, StoreError> {
        self.hit();
        self.inner.get_many(post_id, timestamps).await
    }

    async fn delete(&self, key: RevisionKey) -> Result<(), StoreError> {
        self.hit();
        self.inner.delete(key).await
    }
}

/// A history facade wired to in-memory posts and a counting store.
pub struct Harness {
    pub history: PostHistory,
    pub posts: Arc<MemoryPosts>,
    pub store: Arc<CountingStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        let store = Arc::new(CountingStore::default());
        let log = RevisionLog::from_store(store.clone());
        let posts = Arc::new(MemoryPosts::new(log.clone(), config.clone()));
        let history = PostHistory::new(
            config,
            log,
            posts.clone(),
            posts.clone(),
            Arc::new(HtmlRenderer),
            Arc::new(BasicTagResolver),
        );
        Self {
            history,
            posts,
            store,
        }
    }

    /// Create a post at [`CREATED`].
    pub async fn create(&self, title: &str, content: &str, tags: &[&str]) -> PostSummary {
        self.posts
            .create(NewPost {
                author_id: AUTHOR,
                title: title.to_string(),
                content: content.to_string(),
                tags: tags.iter().map(|tag| tag.to_string()).collect(),
                timestamp: Some(CREATED),
            })
            .await
            .expect("create post")
    }

    /// Replace the body of a post at `edited`.
    pub async fn edit(&self, post_id: PostId, content: &str, edited: EpochMillis) {
        self.posts
            .edit(PostEdit {
                post_id,
                editor_id: EDITOR,
                content: content.to_string(),
                title: None,
                tags: None,
                edited: Some(edited),
                restored_from: None,
            })
            .await
            .expect("edit post");
    }

    /// Raw content of the post as of `since`.
    pub async fn content_at(&self, post_id: PostId, since: EpochMillis) -> String {
        self.history
            .load(post_id, &since.to_string(), AUTHOR)
            .await
            .expect("load revision")
            .post
            .content
    }
}
