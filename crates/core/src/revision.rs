//! Revision records: one per edit, each carrying a reverse delta.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::patch::{self, Patch};
use crate::types::{EpochMillis, PostId, UserId};

/// Separator used when a tag set is stored on a revision.
pub const TAG_SEPARATOR: &str = ",";

/// Store key of a revision: a post and the revision's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RevisionKey {
    pub post_id: PostId,
    pub timestamp: EpochMillis,
}

impl RevisionKey {
    pub fn new(post_id: PostId, timestamp: EpochMillis) -> Self {
        Self { post_id, timestamp }
    }
}

impl std::fmt::Display for RevisionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "revision:{}.{}", self.post_id, self.timestamp)
    }
}

/// One recorded edit.
///
/// `patch` turns the content as it was right after this edit back into the
/// content right before it. `title` and `tags` hold the values *before* the
/// edit and are present only when the edit changed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub post_id: PostId,
    pub timestamp: EpochMillis,
    pub editor_id: UserId,
    pub patch: Option<Patch>,
    pub title: Option<String>,
    pub tags: Option<String>,
}

impl Revision {
    pub fn key(&self) -> RevisionKey {
        RevisionKey::new(self.post_id, self.timestamp)
    }

    /// The previous tag values, if this revision changed tags.
    pub fn tag_values(&self) -> Option<Vec<String>> {
        self.tags.as_deref().map(parse_tags)
    }
}

/// Everything needed to record an edit.
#[derive(Debug, Clone)]
pub struct RevisionDraft {
    pub post_id: PostId,
    pub editor_id: UserId,
    pub prior_content: String,
    pub new_content: String,
    /// Title before the edit; `Some` only when the edit renamed the post.
    pub previous_title: Option<String>,
    /// Tags before the edit; `Some` only when the edit changed the tags.
    pub previous_tags: Option<Vec<String>>,
    /// Explicit edit time; wall clock when absent.
    pub timestamp: Option<EpochMillis>,
}

impl RevisionDraft {
    /// Build the stored revision. The patch is only computed when the body
    /// text changed.
    pub fn into_revision(self, timestamp: EpochMillis) -> Revision {
        let patch = (self.prior_content != self.new_content)
            .then(|| patch::diff(&self.prior_content, &self.new_content));

        Revision {
            post_id: self.post_id,
            timestamp,
            editor_id: self.editor_id,
            patch,
            title: self.previous_title,
            tags: self.previous_tags.as_deref().map(serialize_tags),
        }
    }
}

/// Join tag values for storage, dropping empty values.
pub fn serialize_tags(values: &[String]) -> String {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(TAG_SEPARATOR)
}

/// Split a stored tag set back into values. An empty string is an empty set.
pub fn parse_tags(serialized: &str) -> Vec<String> {
    serialized
        .split(TAG_SEPARATOR)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate a caller-supplied revision timestamp.
pub fn validate_timestamp(raw: &str) -> Result<EpochMillis, CoreError> {
    raw.trim()
        .parse::<EpochMillis>()
        .map_err(|_| CoreError::Validation(format!("Invalid revision timestamp '{raw}'")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
