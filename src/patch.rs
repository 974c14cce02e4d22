//! Rebuilding appliable patches from a parsed diff.
//!
//! A patch built here is meant to be handed byte for byte to `git apply`, with the flags
//! from [`ApplyMode::git_apply_args`]. Selecting whole hunks reuses the original lines;
//! selecting individual lines rewrites the hunk so its header counts match what is emitted.

use std::collections::HashSet;

use crate::diff::{HunkLine, LineKind, ParsedDiff, split_lines};

const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

/// What the caller wants to do with a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Add the change to the index
    Stage,
    /// Take the change back out of the index
    Unstage,
    /// Throw the change away in the working tree
    Discard,
}

impl ApplyMode {
    /// Arguments for `git apply` (before the patch source).
    pub fn git_apply_args(self) -> &'static [&'static str] {
        match self {
            ApplyMode::Stage => &["apply", "--cached"],
            ApplyMode::Unstage => &["apply", "--cached", "--reverse"],
            ApplyMode::Discard => &["apply", "--reverse"],
        }
    }
}

/// The file header without `index` lines.
///
/// The blob hashes on an `index` line often don't match the destination the patch is
/// applied to, so they are left out.
pub fn minimal_header(diff: &ParsedDiff) -> String {
    split_lines(&diff.file_header)
        .filter(|line| !line.starts_with("index "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A patch containing exactly one hunk, unchanged.
///
/// Returns an empty string when `hunk_index` is out of range.
///
/// ```
/// use git_lanes::diff::ParsedDiff;
/// use git_lanes::patch::patch_for_hunk;
///
/// let diff = ParsedDiff::parse("--- a/f\n+++ b/f\n@@ -1 +1 @@\n-old\n+new\n");
/// assert_eq!(patch_for_hunk(&diff, 0), "--- a/f\n+++ b/f\n@@ -1 +1 @@\n-old\n+new\n");
/// assert_eq!(patch_for_hunk(&diff, 1), "");
/// ```
pub fn patch_for_hunk(diff: &ParsedDiff, hunk_index: usize) -> String {
    let Some(hunk) = diff.hunks.get(hunk_index) else {
        tracing::debug!(hunk_index, hunks = diff.hunks.len(), "hunk index out of range");
        return String::new();
    };

    let mut patch = minimal_header(diff);
    patch.push('\n');
    patch.push_str(&hunk.raw_header);
    patch.push('\n');
    for line in &hunk.lines {
        push_line(&mut patch, &line.raw_text, line);
    }
    patch
}

/// A single-hunk patch that applies only the selected lines.
///
/// - context lines are kept;
/// - a selected deletion stays a deletion, an unselected one becomes context;
/// - a selected addition stays an addition, an unselected one is dropped.
///
/// The header keeps the original start lines and gets counts recomputed from the
/// emitted lines. Returns an empty string when `hunk_index` is out of range.
///
/// ```
/// use std::collections::HashSet;
/// use git_lanes::diff::ParsedDiff;
/// use git_lanes::patch::patch_for_lines;
///
/// let diff = ParsedDiff::parse("@@ -10,3 +10,4 @@\n a\n-b\n+c\n+d\n e\n");
/// let patch = patch_for_lines(&diff, 0, &HashSet::from([2]));
/// assert_eq!(patch, "\n@@ -10,3 +10,4 @@\n a\n b\n+c\n e\n");
/// ```
pub fn patch_for_lines(
    diff: &ParsedDiff,
    hunk_index: usize,
    selected_ids: &HashSet<usize>,
) -> String {
    let Some(hunk) = diff.hunks.get(hunk_index) else {
        tracing::debug!(hunk_index, hunks = diff.hunks.len(), "hunk index out of range");
        return String::new();
    };

    let mut body = String::new();
    let mut old_count = 0u32;
    let mut new_count = 0u32;
    let mut selected_changes = 0usize;

    for (position, line) in hunk.lines.iter().enumerate() {
        let selected = selected_ids.contains(&line.id);
        match (line.kind, selected) {
            (LineKind::Context, _) => {
                push_line(&mut body, &line.raw_text, line);
                old_count += 1;
                new_count += 1;
            }
            (LineKind::Deletion, true) => {
                push_line(&mut body, &line.raw_text, line);
                old_count += 1;
                selected_changes += 1;
            }
            // The old last line gains a newline when anything is appended after it
            (LineKind::Deletion, false)
                if line.no_newline_at_eof
                    && hunk.lines[position + 1..].iter().any(|later| {
                        later.kind == LineKind::Addition && selected_ids.contains(&later.id)
                    }) =>
            {
                push_line(&mut body, &line.raw_text, line);
                body.push_str(&format!("+{}\n", line.content));
                old_count += 1;
                new_count += 1;
            }
            // The line stays in the file, so it is context for this patch
            (LineKind::Deletion, false) => {
                push_line(&mut body, &format!(" {}", line.content), line);
                old_count += 1;
                new_count += 1;
            }
            (LineKind::Addition, true) => {
                push_line(&mut body, &line.raw_text, line);
                new_count += 1;
                selected_changes += 1;
            }
            (LineKind::Addition, false) => {}
        }
    }

    if selected_changes == 0 {
        tracing::debug!(hunk_index, "selection matches no change line");
    }

    format!(
        "{}\n@@ -{},{} +{},{} @@\n{}",
        minimal_header(diff),
        hunk.old_start,
        old_count,
        hunk.new_start,
        new_count,
        body
    )
}

fn push_line(patch: &mut String, text: &str, line: &HunkLine) {
    patch.push_str(text);
    patch.push('\n');
    if line.no_newline_at_eof {
        patch.push_str(NO_NEWLINE_MARKER);
        patch.push('\n');
    }
}
