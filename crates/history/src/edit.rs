//! Planning of post edits, shared by every [`PostWriter`] implementation.
//!
//! [`PostWriter`]: crate::collaborators::PostWriter

use folio_core::error::CoreError;
use folio_core::markup::escape_html;
use folio_core::post::{validate_content, validate_tags, validate_title, PostEdit};
use folio_core::revision::RevisionDraft;
use folio_core::types::{now_millis, EpochMillis};

/// The stored state an edit is applied to, in raw form.
#[derive(Debug, Clone, Copy)]
pub struct CurrentPost<'a> {
    pub title: &'a str,
    pub tags: &'a [String],
    pub content: &'a str,
}

/// Validated result of an edit: the new stored state plus the revision to
/// record for it.
#[derive(Debug, Clone)]
pub struct EditPlan {
    pub title: String,
    pub tags: Vec<String>,
    pub content: String,
    pub edited: EpochMillis,
    pub renamed: bool,
    pub tags_updated: bool,
    pub draft: RevisionDraft,
}

/// Validate `edit` against `current` and work out what changed.
///
/// The previous title is captured in escaped form, matching what post readers
/// hand out, so reconstruction can unescape titles and content alike.
pub fn plan_edit(current: CurrentPost<'_>, edit: PostEdit) -> Result<EditPlan, CoreError> {
    validate_content(&edit.content)?;

    let title = edit.title.unwrap_or_else(|| current.title.to_string());
    validate_title(&title)?;

    let tags = edit.tags.unwrap_or_else(|| current.tags.to_vec());
    validate_tags(&tags)?;

    let renamed = title != current.title;
    let tags_updated = tags != current.tags;
    let edited = edit.edited.unwrap_or_else(now_millis);

    if let Some(restored_from) = edit.restored_from {
        tracing::debug!(post_id = edit.post_id, restored_from, "Edit restores a historical version");
    }

    let draft = RevisionDraft {
        post_id: edit.post_id,
        editor_id: edit.editor_id,
        prior_content: current.content.to_string(),
        new_content: edit.content.clone(),
        previous_title: renamed.then(|| escape_html(current.title)),
        previous_tags: tags_updated.then(|| current.tags.to_vec()),
        timestamp: Some(edited),
    };

    Ok(EditPlan {
        title,
        tags,
        content: edit.content,
        edited,
        renamed,
        tags_updated,
        draft,
    })
}
