//! Commit-graph lane layout.
//!
//! Takes a history that is already in display order (newest first, topologically sorted)
//! and assigns every commit a dot column plus the line segments crossing its row. Lanes
//! heading for the same ancestor are drawn as one column, which keeps the graph narrow.
//!
//! Columns are logical units and colors are plain indices; the renderer maps them to
//! pixels and wraps colors into its palette.
//!
//! ```
//! use git_lanes::graph::{Commit, compute_entries};
//!
//! let commits = vec![
//!     Commit::new("c", ["b"]),
//!     Commit::new("b", ["a"]),
//!     Commit::new("a", [] as [&str; 0]),
//! ];
//! let entries = compute_entries(&commits);
//!
//! assert_eq!(entries.len(), 3);
//! assert_eq!(entries["b"].dot_column, 0);
//! ```

mod connection;
mod row;

use serde::Serialize;
use std::collections::HashMap;

/// Hash used for the working-directory pseudo-commit.
pub const UNCOMMITTED_HASH: &str = "0000000000000000000000000000000000000000";

/// A commit as handed over by the git-access layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub hash: String,
    /// Empty for a root, one entry for a normal commit, more for a merge.
    pub parents: Vec<String>,
    pub is_uncommitted: bool,
}

impl Commit {
    pub fn new<I, S>(hash: impl Into<String>, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hash: hash.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            is_uncommitted: false,
        }
    }

    /// The working-directory state, drawn on top of `head` (or alone in an empty repository).
    pub fn uncommitted(head: Option<&str>) -> Self {
        Self {
            hash: UNCOMMITTED_HASH.to_string(),
            parents: head.map(str::to_string).into_iter().collect(),
            is_uncommitted: true,
        }
    }
}

/// A line segment drawn in one row.
///
/// - `child_index == None`: the line starts at this row's dot.
/// - `parent_index == None`: the line ends at this row's dot.
/// - both set: a lane passing through the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryLine {
    /// Column at the top edge of the row
    pub child_index: Option<usize>,
    /// Column at the bottom edge of the row
    pub parent_index: Option<usize>,
    pub color_index: usize,
}

/// Layout of one commit row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitGraphEntry {
    pub dot_column: usize,
    pub dot_color_index: usize,
    pub lines: Vec<HistoryLine>,
    pub is_uncommitted: bool,
}

impl CommitGraphEntry {
    /// Number of columns this row needs, including the dot.
    pub fn width(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|line| [line.child_index, line.parent_index])
            .flatten()
            .chain(std::iter::once(self.dot_column))
            .max()
            .map_or(0, |column| column + 1)
    }
}

/// Lay out `commits` and return the rows in input order.
///
/// The order of `commits` is used as is; it must already be a valid traversal order.
pub fn compute_rows(commits: &[Commit]) -> Vec<(String, CommitGraphEntry)> {
    let snapshots = connection::track_connections(commits);

    let rows: Vec<_> = commits
        .iter()
        .zip(&snapshots)
        .map(|(commit, snapshot)| {
            (
                commit.hash.clone(),
                row::layout_row(&commit.hash, snapshot, commit.is_uncommitted),
            )
        })
        .collect();

    tracing::debug!(rows = rows.len(), "computed commit graph layout");

    rows
}

/// Lay out `commits`, keyed by commit hash.
///
/// Parents that never show up in `commits` (a truncated history) are tolerated: their
/// lanes simply run to the bottom of the graph.
pub fn compute_entries(commits: &[Commit]) -> HashMap<String, CommitGraphEntry> {
    compute_rows(commits).into_iter().collect()
}
