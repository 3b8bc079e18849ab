//! Reverse-delta patch codec.
//!
//! Patches are unified-diff hunks computed with [`similar`]. A patch produced by
//! [`diff`] always points *backwards*: applying `diff(old, new)` to `new`
//! yields `old`. [`apply`] tolerates a bounded amount of context drift and
//! reports how the patch was applied instead of silently returning its input.

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Lines of unchanged context written around each hunk.
pub const CONTEXT_LINES: usize = 4;

/// Maximum number of mismatched context lines tolerated per hunk.
pub const FUZZ_FACTOR: usize = 1;

/// A textual patch in unified-diff hunk format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(String);

impl Patch {
    /// Wrap stored patch text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// `true` when the patch contains no hunks and therefore changes nothing.
    pub fn is_empty(&self) -> bool {
        !self.0.lines().any(|line| line.starts_with("@@"))
    }
}

/// Result of applying a [`Patch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Every hunk matched exactly (possibly at a shifted position).
    Applied(String),
    /// The patch was applied, but `lines` context lines did not match.
    Fuzzed { content: String, lines: usize },
    /// The patch is malformed or one of its hunks could not be placed.
    Rejected { reason: String },
}

impl ApplyOutcome {
    /// The patched content, unless the patch was rejected.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Applied(content) | Self::Fuzzed { content, .. } => Some(content),
            Self::Rejected { .. } => None,
        }
    }

    pub fn into_content(self) -> Option<String> {
        match self {
            Self::Applied(content) | Self::Fuzzed { content, .. } => Some(content),
            Self::Rejected { .. } => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Compute the reverse delta that turns `new` back into `old`.
///
/// Identical inputs produce an empty patch.
pub fn diff(old: &str, new: &str) -> Patch {
    if old == new {
        return Patch(String::new());
    }

    // Lines end at '\n' only, the same split `apply` uses.
    let source: Vec<&str> = new.split_inclusive('\n').collect();
    let target: Vec<&str> = old.split_inclusive('\n').collect();
    let text_diff = TextDiff::configure().diff_slices(&source, &target);

    let mut rendered = String::new();
    for group in text_diff.grouped_ops(CONTEXT_LINES) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        rendered.push_str(&format!(
            "@@ -{} +{} @@\n",
            hunk_range(first.old_range().start, last.old_range().end),
            hunk_range(first.new_range().start, last.new_range().end),
        ));

        for op in &group {
            for change in text_diff.iter_changes(op) {
                rendered.push(match change.tag() {
                    ChangeTag::Equal => ' ',
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                });
                let line = change.value();
                rendered.push_str(line);
                if !line.ends_with('\n') {
                    rendered.push_str("\n\\ No newline at end of file\n");
                }
            }
        }
    }
    Patch(rendered)
}

/// Render a `start,len` hunk range. An empty range names the line before it.
fn hunk_range(start: usize, end: usize) -> String {
    match end - start {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        len => format!("{},{len}", start + 1),
    }
}

/// Apply `patch` to `text`.
pub fn apply(text: &str, patch: &Patch) -> ApplyOutcome {
    let hunks = match parse_hunks(patch.as_str()) {
        Ok(hunks) => hunks,
        Err(reason) => return ApplyOutcome::Rejected { reason },
    };

    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    let mut drift = 0isize;
    let mut fuzzed = 0usize;

    for (index, hunk) in hunks.iter().enumerate() {
        let expected = (hunk.start as isize + drift).max(0) as usize;
        let Some((at, mismatches)) = locate(&lines, hunk, cursor, expected) else {
            return ApplyOutcome::Rejected {
                reason: format!(
                    "hunk {} does not match near line {}",
                    index + 1,
                    hunk.start + 1
                ),
            };
        };

        for line in &lines[cursor..at] {
            out.push_str(line);
        }

        let mut pos = at;
        for line in &hunk.lines {
            match line {
                HunkLine::Context(_) => {
                    out.push_str(lines[pos]);
                    pos += 1;
                }
                HunkLine::Remove(_) => pos += 1,
                HunkLine::Insert(inserted) => out.push_str(inserted),
            }
        }

        cursor = pos;
        drift = at as isize - hunk.start as isize;
        fuzzed += mismatches;
    }

    for line in &lines[cursor..] {
        out.push_str(line);
    }

    if fuzzed == 0 {
        ApplyOutcome::Applied(out)
    } else {
        ApplyOutcome::Fuzzed {
            content: out,
            lines: fuzzed,
        }
    }
}

// ---------------------------------------------------------------------------
// Hunk parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum HunkLine {
    Context(String),
    Remove(String),
    Insert(String),
}

impl HunkLine {
    fn text_mut(&mut self) -> &mut String {
        match self {
            Self::Context(text) | Self::Remove(text) | Self::Insert(text) => text,
        }
    }
}

#[derive(Debug)]
struct Hunk {
    /// Zero-based line index in the text being patched.
    start: usize,
    lines: Vec<HunkLine>,
}

impl Hunk {
    /// Number of lines of the patched text this hunk consumes.
    fn source_len(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| !matches!(line, HunkLine::Insert(_)))
            .count()
    }
}

fn parse_hunks(patch: &str) -> Result<Vec<Hunk>, String> {
    let mut hunks: Vec<Hunk> = Vec::new();

    for raw in patch.split_inclusive('\n') {
        if raw.starts_with("@@") {
            hunks.push(Hunk {
                start: parse_header(raw)?,
                lines: Vec::new(),
            });
            continue;
        }

        // File headers and anything else before the first hunk are ignored.
        let Some(hunk) = hunks.last_mut() else {
            continue;
        };

        if raw.starts_with('\\') {
            let previous = hunk
                .lines
                .last_mut()
                .ok_or_else(|| "newline marker without a preceding line".to_string())?;
            let text = previous.text_mut();
            if text.ends_with('\n') {
                text.pop();
            }
            continue;
        }

        let Some(tag) = raw.chars().next() else {
            continue;
        };
        let text = raw[tag.len_utf8()..].to_string();
        let line = match tag {
            ' ' => HunkLine::Context(text),
            '-' => HunkLine::Remove(text),
            '+' => HunkLine::Insert(text),
            // Some writers emit a bare newline for an empty context line.
            '\n' => HunkLine::Context("\n".to_string()),
            _ => return Err(format!("unexpected patch line {raw:?}")),
        };
        hunk.lines.push(line);
    }

    if hunks.is_empty() && !patch.trim().is_empty() {
        return Err("patch contains no hunks".to_string());
    }
    if hunks.iter().any(|hunk| hunk.lines.is_empty()) {
        return Err("patch contains an empty hunk".to_string());
    }

    Ok(hunks)
}

/// Parse `@@ -start[,len] +start[,len] @@` into the zero-based source index.
fn parse_header(line: &str) -> Result<usize, String> {
    let range = line
        .split_whitespace()
        .nth(1)
        .and_then(|range| range.strip_prefix('-'))
        .ok_or_else(|| format!("malformed hunk header {line:?}"))?;

    let (start, len) = range.split_once(',').unwrap_or((range, "1"));
    let start: usize = start
        .parse()
        .map_err(|_| format!("malformed hunk start in {line:?}"))?;
    let len: usize = len
        .parse()
        .map_err(|_| format!("malformed hunk length in {line:?}"))?;

    // Empty ranges name the line *before* the insertion point.
    Ok(if len == 0 {
        start
    } else {
        start.saturating_sub(1)
    })
}

// ---------------------------------------------------------------------------
// Hunk placement
// ---------------------------------------------------------------------------

/// Find where `hunk` applies, searching outward from `expected` and never
/// before `floor`. Exact placements are preferred over fuzzy ones.
///
/// Returns the start index and the number of mismatched context lines.
fn locate(lines: &[&str], hunk: &Hunk, floor: usize, expected: usize) -> Option<(usize, usize)> {
    let source_len = hunk.source_len();
    if lines.len() < floor + source_len {
        return None;
    }
    let ceiling = lines.len() - source_len;
    let expected = expected.clamp(floor, ceiling);
    let span = (expected - floor).max(ceiling - expected);

    for allowed in 0..=FUZZ_FACTOR {
        for distance in 0..=span {
            let forward = expected + distance;
            if forward <= ceiling {
                if let Some(mismatches) = matches_at(lines, hunk, forward, allowed) {
                    return Some((forward, mismatches));
                }
            }
            if distance > 0 && distance <= expected - floor {
                let backward = expected - distance;
                if let Some(mismatches) = matches_at(lines, hunk, backward, allowed) {
                    return Some((backward, mismatches));
                }
            }
        }
    }

    None
}

fn matches_at(lines: &[&str], hunk: &Hunk, at: usize, allowed: usize) -> Option<usize> {
    let mut mismatches = 0;
    let mut pos = at;

    for line in &hunk.lines {
        match line {
            HunkLine::Context(expected) => {
                if lines[pos] != expected {
                    mismatches += 1;
                    if mismatches > allowed {
                        return None;
                    }
                }
                pos += 1;
            }
            HunkLine::Remove(expected) => {
                if lines[pos] != expected {
                    return None;
                }
                pos += 1;
            }
            HunkLine::Insert(_) => {}
        }
    }

    Some(mismatches)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
