//! The revision delta chain.
//!
//! A [`RevisionChain`] is an arena of revision records keyed by timestamp plus
//! the newest-first order in which they were recorded. Walking the order from
//! the front and applying each revision's reverse patch to the live content
//! moves backwards through the post's history.
//!
//! Everything here is pure; the async engine in `folio-history` fetches the
//! data, calls into this module and persists the results.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::patch::{self, ApplyOutcome, Patch};
use crate::revision::{parse_tags, Revision};
use crate::types::{EpochMillis, PostId};

/// Why a revision's patch did not apply cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatchStatus {
    /// Applied with `lines` mismatched context lines.
    Fuzzed { lines: usize },
    /// Not applied; the content was left as it was.
    Rejected { reason: String },
}

/// A warning attached to one revision during replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    pub timestamp: EpochMillis,
    #[serde(flatten)]
    pub status: PatchStatus,
}

/// Content reconstructed at a cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    pub content: String,
    pub warnings: Vec<PatchReport>,
}

/// Every historical content of a post, one entry per revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLadder {
    /// `versions[i]` is the content just before the revision at `order[i]`.
    pub versions: Vec<String>,
    pub warnings: Vec<PatchReport>,
}

/// A patch to persist on a surviving revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRewrite {
    pub timestamp: EpochMillis,
    pub patch: Option<Patch>,
}

/// The writes needed to splice one revision out of the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebasePlan {
    pub removed: EpochMillis,
    /// Rewrites ordered oldest revision first.
    pub rewrites: Vec<PatchRewrite>,
    /// Replay warnings hit while building the ladder the plan is based on.
    pub warnings: Vec<PatchReport>,
}

/// Select the timestamps strictly newer than `cutoff`, keeping chain order.
pub fn select_since(order: &[EpochMillis], cutoff: EpochMillis) -> Vec<EpochMillis> {
    order.iter().copied().filter(|ts| *ts > cutoff).collect()
}

#[derive(Debug, Clone)]
pub struct RevisionChain {
    post_id: PostId,
    order: Vec<EpochMillis>,
    arena: HashMap<EpochMillis, Revision>,
}

impl RevisionChain {
    /// Build a chain from its newest-first order and whatever records were
    /// found. Timestamps without a record replay as no-ops.
    pub fn new(
        post_id: PostId,
        order: Vec<EpochMillis>,
        revisions: impl IntoIterator<Item = Revision>,
    ) -> Self {
        let arena = revisions
            .into_iter()
            .map(|revision| (revision.timestamp, revision))
            .collect();
        Self {
            post_id,
            order,
            arena,
        }
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    /// Newest-first timestamps.
    pub fn order(&self) -> &[EpochMillis] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, timestamp: EpochMillis) -> Option<&Revision> {
        self.arena.get(&timestamp)
    }

    pub fn position(&self, timestamp: EpochMillis) -> Option<usize> {
        self.order.iter().position(|ts| *ts == timestamp)
    }

    /// The oldest recorded revision (last in chain order).
    pub fn oldest(&self) -> Option<EpochMillis> {
        self.order.last().copied()
    }

    /// Revisions newer than `cutoff`, newest first. Missing records are `None`.
    fn newer_than(
        &self,
        cutoff: EpochMillis,
    ) -> impl Iterator<Item = (EpochMillis, Option<&Revision>)> {
        self.order
            .iter()
            .filter(move |ts| **ts > cutoff)
            .map(move |ts| (*ts, self.arena.get(ts)))
    }

    /// Reconstruct the content as of `cutoff` from the live content.
    pub fn replay(&self, live: &str, cutoff: EpochMillis) -> Replay {
        let mut warnings = Vec::new();
        let content = self
            .newer_than(cutoff)
            .fold(live.to_string(), |content, (ts, revision)| {
                step(content, ts, revision, &mut warnings)
            });
        Replay { content, warnings }
    }

    /// The title as of `cutoff`.
    ///
    /// Revisions store the title from *before* their edit, so the oldest
    /// renaming revision newer than the cutoff holds the value that was
    /// current at the cutoff.
    pub fn historical_title(&self, cutoff: EpochMillis) -> Option<&str> {
        self.newer_than(cutoff)
            .filter_map(|(_, revision)| revision?.title.as_deref())
            .filter(|title| !title.is_empty())
            .last()
    }

    /// The tag values as of `cutoff`, by the same rule as [`Self::historical_title`].
    pub fn historical_tags(&self, cutoff: EpochMillis) -> Option<Vec<String>> {
        self.newer_than(cutoff)
            .filter_map(|(_, revision)| revision?.tags.as_deref())
            .last()
            .map(parse_tags)
    }

    /// Reconstruct every historical content by folding over the whole chain.
    pub fn version_ladder(&self, live: &str) -> VersionLadder {
        let mut warnings = Vec::new();
        let mut versions = Vec::with_capacity(self.order.len());
        let mut content = live.to_string();

        for ts in &self.order {
            content = step(content, *ts, self.arena.get(ts), &mut warnings);
            versions.push(content.clone());
        }

        VersionLadder { versions, warnings }
    }

    /// Plan the removal of the revision at `target`.
    ///
    /// Every revision from the oldest up to the target gets a freshly computed
    /// patch against the ladder; the revision just newer than the target is
    /// re-pointed two steps back so it skips the removed content. The newest
    /// revision cannot be removed this way.
    pub fn rebase_without(&self, live: &str, target: EpochMillis) -> Result<RebasePlan, CoreError> {
        let index = self
            .position(target)
            .filter(|index| *index > 0)
            .ok_or(CoreError::InvalidPosition {
                post_id: self.post_id,
                timestamp: target,
            })?;

        let ladder = self.version_ladder(live);
        let last = self.order.len() - 1;
        let mut rewrites = Vec::with_capacity(last - index + 1);

        for i in (index..=last).rev() {
            let (newer, owner) = if i == index {
                (i as isize - 2, i - 1)
            } else {
                (i as isize - 1, i)
            };
            let newer_content = if newer < 0 {
                live
            } else {
                ladder.versions[newer as usize].as_str()
            };

            let patch = patch::diff(&ladder.versions[i], newer_content);
            rewrites.push(PatchRewrite {
                timestamp: self.order[owner],
                patch: (!patch.is_empty()).then_some(patch),
            });
        }

        Ok(RebasePlan {
            removed: target,
            rewrites,
            warnings: ladder.warnings,
        })
    }
}

/// Apply one revision's patch, recording a warning when it is not clean.
fn step(
    content: String,
    timestamp: EpochMillis,
    revision: Option<&Revision>,
    warnings: &mut Vec<PatchReport>,
) -> String {
    let Some(patch) = revision.and_then(|revision| revision.patch.as_ref()) else {
        return content;
    };

    match patch::apply(&content, patch) {
        ApplyOutcome::Applied(next) => next,
        ApplyOutcome::Fuzzed {
            content: next,
            lines,
        } => {
            warnings.push(PatchReport {
                timestamp,
                status: PatchStatus::Fuzzed { lines },
            });
            next
        }
        ApplyOutcome::Rejected { reason } => {
            warnings.push(PatchReport {
                timestamp,
                status: PatchStatus::Rejected { reason },
            });
            content
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
