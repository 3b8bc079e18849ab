//! Post-facing data shared by the history engine and its collaborators, plus
//! input validation for post writes.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::markup::{escape_html, slugify};
use crate::types::{EpochMillis, PostId, UserId};

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum content length in characters.
pub const MAX_CONTENT_LEN: usize = 100_000;

/// Maximum number of tags on a post.
pub const MAX_TAGS: usize = 20;

/// Maximum length of a single tag.
pub const MAX_TAG_LEN: usize = 50;

/// Structured tag record produced by a tag resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagData {
    pub value: String,
    pub value_escaped: String,
    pub class: String,
}

impl TagData {
    /// Derive the display fields of a tag from its raw value.
    pub fn from_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            value_escaped: escape_html(value),
            class: slugify(value),
        }
    }
}

/// Current state of a post as handed out by a post reader.
///
/// `content` and `title` are in their stored, HTML-escaped form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub post_id: PostId,
    pub author_id: UserId,
    /// Creation time.
    pub timestamp: EpochMillis,
    pub edited: Option<EpochMillis>,
    pub content: String,
    pub title: String,
    pub tags: Vec<TagData>,
}

impl PostSummary {
    pub fn tag_values(&self) -> Vec<String> {
        self.tags.iter().map(|tag| tag.value.clone()).collect()
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation time; wall clock when absent.
    #[serde(default)]
    pub timestamp: Option<EpochMillis>,
}

/// A full replacement edit of a post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostEdit {
    pub post_id: PostId,
    pub editor_id: UserId,
    pub content: String,
    /// New title; unchanged when absent.
    #[serde(default)]
    pub title: Option<String>,
    /// New tag values; unchanged when absent.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Edit time; wall clock when absent.
    #[serde(default)]
    pub edited: Option<EpochMillis>,
    /// Set when the edit restores a historical version.
    #[serde(default)]
    pub restored_from: Option<EpochMillis>,
}

/// Result of a post edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub post: PostSummary,
    /// Timestamp of the recorded revision, `None` when history is disabled.
    pub revision: Option<EpochMillis>,
    pub renamed: bool,
    pub tags_updated: bool,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a post title (non-empty, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate post content (max 100 000 chars).
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(CoreError::Validation(format!(
            "Content must be at most {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate post tags (each non-empty, no separators, <= 50 chars, max 20 tags).
pub fn validate_tags(tags: &[String]) -> Result<(), CoreError> {
    if tags.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "A maximum of {MAX_TAGS} tags is allowed"
        )));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(CoreError::Validation("Tags must not be empty".into()));
        }
        if tag.contains(crate::revision::TAG_SEPARATOR) {
            return Err(CoreError::Validation(format!(
                "Tag '{tag}' must not contain '{}'",
                crate::revision::TAG_SEPARATOR
            )));
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(CoreError::Validation(format!(
                "Each tag must be at most {MAX_TAG_LEN} characters"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
