//! Integration tests for post history over the in-memory stores.

mod common;

use assert_matches::assert_matches;
use common::{Harness, CREATED, EDITOR};
use folio_core::chain::PatchStatus;
use folio_core::error::CoreError;
use folio_core::patch::Patch;
use folio_core::post::PostEdit;
use folio_core::revision::RevisionKey;
use folio_db::store::RevisionRecordStore;
use folio_history::collaborators::{PostReader, PostWriter};
use folio_history::config::HistoryConfig;
use folio_history::error::HistoryError;

/// A post created with "A" and edited to "B" at 2000, "C" at 3000, "D" at
/// 4000 and "E" at 5000.
async fn five_versions(h: &Harness) -> i64 {
    let post = h.create("Title", "A\n", &[]).await;
    for (content, ts) in [("B\n", 2000), ("C\n", 3000), ("D\n", 4000), ("E\n", 5000)] {
        h.edit(post.post_id, content, ts).await;
    }
    post.post_id
}

// ---------------------------------------------------------------------------
// Reconstruction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reconstruct_before_first_revision_yields_creation_content() {
    let h = Harness::new();
    let pid = five_versions(&h).await;

    assert_eq!(h.content_at(pid, CREATED).await, "A\n");
    assert_eq!(h.content_at(pid, 0).await, "A\n");
}

#[tokio::test]
async fn reconstruct_after_newest_revision_yields_live_content() {
    let h = Harness::new();
    let pid = five_versions(&h).await;

    assert_eq!(h.content_at(pid, 5000).await, "E\n");
    assert_eq!(h.content_at(pid, 9_999_999).await, "E\n");
}

#[tokio::test]
async fn reconstruct_walks_intermediate_versions() {
    let h = Harness::new();
    let pid = five_versions(&h).await;

    assert_eq!(h.content_at(pid, 2000).await, "B\n");
    assert_eq!(h.content_at(pid, 2500).await, "B\n");
    assert_eq!(h.content_at(pid, 3000).await, "C\n");
    assert_eq!(h.content_at(pid, 4000).await, "D\n");
}

#[tokio::test]
async fn reconstruct_multiline_edits() {
    let h = Harness::new();
    let post = h
        .create("Notes", "intro\nbody one\nbody two\noutro\n", &[])
        .await;
    h.edit(post.post_id, "intro\nbody one\nbody 2\noutro\nps\n", 2000)
        .await;
    h.edit(post.post_id, "preface\nintro\nbody 2\noutro\nps\n", 3000)
        .await;

    assert_eq!(
        h.content_at(post.post_id, CREATED).await,
        "intro\nbody one\nbody two\noutro\n"
    );
    assert_eq!(
        h.content_at(post.post_id, 2000).await,
        "intro\nbody one\nbody 2\noutro\nps\n"
    );
}

#[tokio::test]
async fn load_escapes_translation_markers() {
    let h = Harness::new();
    let post = h.create("Title", "see [[docs]]\n", &[]).await;
    h.edit(post.post_id, "plain\n", 2000).await;

    let loaded = h
        .history
        .load(post.post_id, "1000", EDITOR)
        .await
        .unwrap();
    assert_eq!(loaded.post.content, "see &lsqb;&lsqb;docs&rsqb;&rsqb;\n");
    assert_eq!(loaded.since, 1000);
    assert!(loaded.warnings.is_empty());
}

#[tokio::test]
async fn reconstruct_restores_historical_title_and_tags() {
    let h = Harness::new();
    let post = h.create("Fish & chips", "body\n", &["food"]).await;
    h.posts
        .edit(PostEdit {
            post_id: post.post_id,
            editor_id: EDITOR,
            content: "body\n".into(),
            title: Some("Fish and chips".into()),
            tags: Some(vec!["food".into(), "uk".into()]),
            edited: Some(2000),
            restored_from: None,
        })
        .await
        .unwrap();
    h.edit(post.post_id, "new body\n", 3000).await;

    let original = h.history.load(post.post_id, "1000", EDITOR).await.unwrap();
    assert_eq!(original.post.title, "Fish & chips");
    assert_eq!(original.post.tag_values(), vec!["food".to_string()]);
    assert_eq!(original.post.content, "body\n");

    let renamed = h.history.load(post.post_id, "2000", EDITOR).await.unwrap();
    assert_eq!(renamed.post.title, "Fish and chips");
    assert_eq!(
        renamed.post.tag_values(),
        vec!["food".to_string(), "uk".to_string()]
    );
}

#[tokio::test]
async fn reconstruct_restores_empty_tag_set() {
    let h = Harness::new();
    let post = h.create("Title", "body\n", &[]).await;
    h.posts
        .edit(PostEdit {
            post_id: post.post_id,
            editor_id: EDITOR,
            content: "body\n".into(),
            title: None,
            tags: Some(vec!["added".into()]),
            edited: Some(2000),
            restored_from: None,
        })
        .await
        .unwrap();

    let loaded = h.history.load(post.post_id, "1000", EDITOR).await.unwrap();
    assert!(loaded.post.tags.is_empty());
}

#[tokio::test]
async fn rejected_patch_is_reported_not_masked() {
    let h = Harness::new();
    let pid = five_versions(&h).await;
    let bogus = Patch::from_text("@@ -1 +1 @@\n-zzz\n+yyy\n");
    assert!(h
        .store
        .set_patch(RevisionKey::new(pid, 4000), Some(&bogus))
        .await
        .unwrap());

    // Every older patch no longer lines up once 4000 is skipped.
    let loaded = h.history.load(pid, "1000", EDITOR).await.unwrap();
    let rejected: Vec<_> = loaded
        .warnings
        .iter()
        .map(|report| report.timestamp)
        .collect();
    assert_eq!(rejected, vec![4000, 3000, 2000]);
    assert_matches!(loaded.warnings[0].status, PatchStatus::Rejected { .. });
    assert_eq!(loaded.post.content, "D\n");

    let recent = h.history.load(pid, "4000", EDITOR).await.unwrap();
    assert!(recent.warnings.is_empty());
    assert_eq!(recent.post.content, "D\n");
}

#[tokio::test]
async fn load_rejects_malformed_timestamp_before_store_access() {
    let h = Harness::new();
    let pid = five_versions(&h).await;
    let calls = h.store.calls();

    let result = h.history.load(pid, "not-a-number", EDITOR).await;
    assert_matches!(result, Err(HistoryError::Core(CoreError::Validation(_))));

    let result = h.history.delete(pid, "12.5", EDITOR).await;
    assert_matches!(result, Err(HistoryError::Core(CoreError::Validation(_))));

    assert_eq!(h.store.calls(), calls);
}

#[tokio::test]
async fn load_unknown_post_is_not_found() {
    let h = Harness::new();
    let result = h.history.load(404, "1000", EDITOR).await;
    assert_matches!(
        result,
        Err(HistoryError::Core(CoreError::NotFound { id: 404, .. }))
    );
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_and_revisions_are_newest_first() {
    let h = Harness::new();
    let pid = five_versions(&h).await;

    assert_eq!(h.history.list(pid).await.unwrap(), vec![5000, 4000, 3000, 2000]);

    let newer: Vec<_> = h
        .history
        .revisions(pid, Some("3000"))
        .await
        .unwrap()
        .into_iter()
        .map(|revision| revision.timestamp)
        .collect();
    assert_eq!(newer, vec![5000, 4000]);
    assert_eq!(h.history.revisions(pid, None).await.unwrap().len(), 4);
}

#[tokio::test]
async fn exists_tracks_recorded_history() {
    let h = Harness::new();
    let post = h.create("Title", "A\n", &[]).await;
    assert!(!h.history.exists(post.post_id).await.unwrap());

    h.edit(post.post_id, "B\n", 2000).await;
    assert!(h.history.exists(post.post_id).await.unwrap());
}

#[tokio::test]
async fn disabled_history_records_nothing() {
    let h = Harness::with_config(HistoryConfig {
        enable_post_history: false,
    });
    let post = h.create("Title", "A\n", &[]).await;
    h.edit(post.post_id, "B\n", 2000).await;

    assert!(!h.history.exists(post.post_id).await.unwrap());
    assert!(h.history.list(post.post_id).await.unwrap().is_empty());

    let live = h.posts.summary(post.post_id, EDITOR).await.unwrap();
    assert_eq!(live.content, "B\n");
}

// ---------------------------------------------------------------------------
// Delete with rebase
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_keeps_neighbouring_reconstructions() {
    let h = Harness::new();
    let pid = five_versions(&h).await;

    let outcome = h.history.delete(pid, "3000", EDITOR).await.unwrap();
    assert_eq!(outcome.removed, 3000);
    assert_eq!(outcome.rewritten, vec![2000, 4000]);
    assert!(outcome.warnings.is_empty());

    assert_eq!(h.history.list(pid).await.unwrap(), vec![5000, 4000, 2000]);
    assert_eq!(h.content_at(pid, 4000).await, "D\n");
    assert_eq!(h.content_at(pid, 2000).await, "B\n");
    assert_eq!(h.content_at(pid, CREATED).await, "A\n");
    assert_eq!(h.content_at(pid, 5000).await, "E\n");
}

#[tokio::test]
async fn delete_middle_of_three_versions() {
    let h = Harness::new();
    let post = h.create("Title", "A\n", &[]).await;
    h.edit(post.post_id, "B\n", 2000).await;
    h.edit(post.post_id, "C\n", 3000).await;

    assert_eq!(h.content_at(post.post_id, CREATED).await, "A\n");
    assert_eq!(h.content_at(post.post_id, 2000).await, "B\n");

    h.history.delete(post.post_id, "2000", EDITOR).await.unwrap();
    assert_eq!(h.content_at(post.post_id, CREATED).await, "A\n");
    assert_eq!(h.content_at(post.post_id, 3000).await, "C\n");
}

#[tokio::test]
async fn delete_newest_revision_is_rejected() {
    let h = Harness::new();
    let pid = five_versions(&h).await;

    let result = h.history.delete(pid, "5000", EDITOR).await;
    assert_matches!(
        result,
        Err(HistoryError::Core(CoreError::InvalidPosition { timestamp: 5000, .. }))
    );
    assert_eq!(h.history.list(pid).await.unwrap().len(), 4);
}

#[tokio::test]
async fn delete_unknown_timestamp_is_rejected() {
    let h = Harness::new();
    let pid = five_versions(&h).await;

    let result = h.history.delete(pid, "3500", EDITOR).await;
    assert_matches!(
        result,
        Err(HistoryError::Core(CoreError::InvalidPosition { .. }))
    );
}

#[tokio::test]
async fn delete_at_creation_time_drops_oldest_revision() {
    let h = Harness::new();
    let pid = five_versions(&h).await;

    let outcome = h
        .history
        .delete(pid, &CREATED.to_string(), EDITOR)
        .await
        .unwrap();
    assert_eq!(outcome.removed, 2000);
    assert!(outcome.rewritten.is_empty());
    assert_eq!(h.history.list(pid).await.unwrap(), vec![5000, 4000, 3000]);
}

#[tokio::test]
async fn delete_at_creation_time_without_history_is_rejected() {
    let h = Harness::new();
    let post = h.create("Title", "A\n", &[]).await;

    let result = h
        .history
        .delete(post.post_id, &CREATED.to_string(), EDITOR)
        .await;
    assert_matches!(
        result,
        Err(HistoryError::Core(CoreError::InvalidPosition { .. }))
    );
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

#[tokio::test]
async fn restore_records_a_new_edit() {
    let h = Harness::new();
    let post = h.create("Old title", "A\n", &["one"]).await;
    h.posts
        .edit(PostEdit {
            post_id: post.post_id,
            editor_id: EDITOR,
            content: "B\n".into(),
            title: Some("New title".into()),
            tags: Some(vec!["two".into()]),
            edited: Some(2000),
            restored_from: None,
        })
        .await
        .unwrap();

    let outcome = h
        .history
        .restore(post.post_id, "1000", EDITOR)
        .await
        .unwrap();
    assert!(outcome.renamed);
    assert!(outcome.tags_updated);
    assert_eq!(outcome.post.content, "A\n");
    assert_eq!(outcome.post.title, "Old title");
    assert_eq!(outcome.post.tag_values(), vec!["one".to_string()]);

    let restored_at = outcome.revision.expect("restore records a revision");
    assert!(restored_at > 2000);
    assert_eq!(h.history.list(post.post_id).await.unwrap().len(), 2);

    // The version replaced by the restore is still reachable.
    let before = h.history.load(post.post_id, "2000", EDITOR).await.unwrap();
    assert_eq!(before.post.content, "B\n");
    assert_eq!(before.post.title, "New title");
}
