//! Revision row model.

use folio_core::patch::Patch;
use folio_core::revision::Revision;
use folio_core::types::{DbId, EpochMillis, PostId};
use sqlx::FromRow;

/// A row from the `post_revisions` table.
#[derive(Debug, Clone, FromRow)]
pub struct RevisionRow {
    pub post_id: PostId,
    pub timestamp_ms: EpochMillis,
    pub editor_id: DbId,
    pub patch: Option<String>,
    pub title: Option<String>,
    pub tags: Option<String>,
}

impl From<RevisionRow> for Revision {
    fn from(row: RevisionRow) -> Self {
        Revision {
            post_id: row.post_id,
            timestamp: row.timestamp_ms,
            editor_id: row.editor_id,
            patch: row.patch.map(Patch::from_text),
            title: row.title,
            tags: row.tags,
        }
    }
}
