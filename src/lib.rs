use error_set::error_set;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

pub mod diff;
pub mod graph;
pub mod logging;
pub mod parse;
pub mod patch;

pub use diff::{HunkLine, LineKind, ParsedDiff, ParsedHunk};
pub use graph::{Commit, CommitGraphEntry, HistoryLine, compute_entries, compute_rows};
pub use parse::ParseError;
pub use patch::{ApplyMode, minimal_header, patch_for_hunk, patch_for_lines};

error_set! {
    /// Top-level error for git-lanes operations
    GitLanesError := {
        #[display("Diff contains no hunks")]
        NoHunks,
        #[display("Hunk {index} is out of range ({count} hunks in diff)")]
        HunkOutOfRange { index: usize, count: usize },
        ParseError(ParseError),
    } || InputError

    /// Errors reading input or writing output
    InputError := {
        #[display("Failed to read {source_name}: {message}")]
        ReadFailed { source_name: String, message: String },
        #[display("Failed to serialize output: {message}")]
        SerializeFailed { message: String },
    }
}

/// How command output is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Read a whole input: the file at `path`, or stdin when `path` is absent or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String, InputError> {
    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => std::fs::read_to_string(path).map_err(|e| InputError::ReadFailed {
            source_name: path.display().to_string(),
            message: e.to_string(),
        }),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| InputError::ReadFailed {
                    source_name: "stdin".to_string(),
                    message: e.to_string(),
                })?;
            Ok(text)
        }
    }
}

#[derive(Serialize)]
struct GraphRow<'a> {
    hash: &'a str,
    entry: &'a CommitGraphEntry,
}

/// Lay out a `git log --format='%H %P'` listing.
///
/// With `uncommitted`, a working-directory row is drawn on top of the first commit.
///
/// # Examples
/// ```
/// # use git_lanes::{OutputFormat, render_graph};
/// let text = render_graph("b a\na\n", false, OutputFormat::Text).unwrap();
/// assert_eq!(text, "b            col 0 color 0  *>0:0\na            col 0 color 0  0>*:0\n");
/// ```
pub fn render_graph(
    log: &str,
    uncommitted: bool,
    format: OutputFormat,
) -> Result<String, GitLanesError> {
    let mut commits = parse::parse_commit_log(log);
    if uncommitted {
        let head = commits.first().map(|c| c.hash.clone());
        commits.insert(0, Commit::uncommitted(head.as_deref()));
    }

    let rows = graph::compute_rows(&commits);

    match format {
        OutputFormat::Text => Ok(rows
            .iter()
            .map(|(hash, entry)| format_graph_row(hash, entry))
            .collect()),
        OutputFormat::Json => {
            let rows: Vec<_> = rows
                .iter()
                .map(|(hash, entry)| GraphRow { hash, entry })
                .collect();
            to_json(&rows)
        }
    }
}

fn format_graph_row(hash: &str, entry: &CommitGraphEntry) -> String {
    let column = |index: Option<usize>| index.map_or_else(|| "*".to_string(), |i| i.to_string());
    let segments: Vec<String> = entry
        .lines
        .iter()
        .map(|line| {
            format!(
                "{}>{}:{}",
                column(line.child_index),
                column(line.parent_index),
                line.color_index
            )
        })
        .collect();
    let label = if entry.is_uncommitted {
        "uncommitted"
    } else {
        hash.get(..12).unwrap_or(hash)
    };

    format!(
        "{label:<12} col {} color {}  {}\n",
        entry.dot_column,
        entry.dot_color_index,
        segments.join(" ")
    )
}

/// Parse a single-file diff and list its hunks with line ids.
pub fn render_hunks(diff_text: &str, format: OutputFormat) -> Result<String, GitLanesError> {
    let diff = ParsedDiff::parse(diff_text);
    match format {
        OutputFormat::Text => Ok(diff::format_hunks(&diff)),
        OutputFormat::Json => to_json(&diff),
    }
}

/// Build the patch for hunk `hunk_index`, restricted to `lines` (a selection such as
/// `0,2..4`) when given.
///
/// # Errors
///
/// Returns [`GitLanesError`] if the diff has no hunks, the index is out of range, or the
/// selection does not parse.
pub fn render_patch(
    diff_text: &str,
    hunk_index: usize,
    lines: Option<&str>,
) -> Result<String, GitLanesError> {
    let diff = ParsedDiff::parse(diff_text);
    if diff.hunks.is_empty() {
        return Err(GitLanesError::NoHunks);
    }

    let patch = match lines {
        Some(selection) => {
            let selected: HashSet<usize> =
                parse::parse_line_selection(selection)?.into_iter().collect();
            patch::patch_for_lines(&diff, hunk_index, &selected)
        }
        None => patch::patch_for_hunk(&diff, hunk_index),
    };

    if patch.is_empty() {
        return Err(GitLanesError::HunkOutOfRange {
            index: hunk_index,
            count: diff.hunks.len(),
        });
    }

    Ok(patch)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, GitLanesError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| InputError::SerializeFailed {
        message: e.to_string(),
    })?;
    json.push('\n');
    Ok(json)
}
