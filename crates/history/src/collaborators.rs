//! Services the history engine depends on but does not own.

use async_trait::async_trait;
use folio_core::post::{EditOutcome, NewPost, PostEdit, PostSummary, TagData};
use folio_core::types::{PostId, UserId};

use crate::error::HistoryResult;

/// Read access to live posts.
#[async_trait]
pub trait PostReader: Send + Sync {
    /// Current state of a post as seen by `viewer`, content and title in
    /// stored (HTML-escaped) form. Fails with `NotFound` for unknown posts.
    async fn summary(&self, post_id: PostId, viewer: UserId) -> HistoryResult<PostSummary>;
}

/// Write access to posts. Edits go through here so that restoring a version
/// is recorded like any other edit.
#[async_trait]
pub trait PostWriter: Send + Sync {
    async fn create(&self, post: NewPost) -> HistoryResult<PostSummary>;

    async fn edit(&self, edit: PostEdit) -> HistoryResult<EditOutcome>;
}

/// Markup conversions applied around reconstruction.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Turn stored text back into the raw text patches operate on.
    fn unescape(&self, stored: &str) -> String;

    /// Prepare raw text for delivery to clients.
    fn escape(&self, raw: &str) -> String;

    /// Post-processing hook run on a reconstructed post before delivery.
    async fn parse_post(&self, post: PostSummary) -> HistoryResult<PostSummary>;
}

/// Resolves tag values into display records.
#[async_trait]
pub trait TagResolver: Send + Sync {
    async fn tag_data(&self, values: &[String]) -> HistoryResult<Vec<TagData>>;
}
