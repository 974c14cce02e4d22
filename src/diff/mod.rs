//! Unified diff parsing.
//!
//! [`ParsedDiff::parse`] turns the `git diff` output of one file into hunks whose lines
//! carry stable ids and old/new line numbers. Those ids are what line-level staging
//! selects on (see [`crate::patch`]).

pub mod file;
pub mod full;
pub mod hunk;

pub use file::ParsedDiff;
pub use full::parse_all;
pub use hunk::{HunkLine, LineKind, ParsedHunk};

/// Format a parsed diff for display, one row per hunk line.
///
/// Each row shows the line id (used to select lines), the old and new line numbers,
/// and the line as it appeared in the diff.
///
/// ```text
/// hunk 0: @@ -10,3 +10,4 @@
///    0    10    10  a
///    1    11       -b
///    2          11 +c
/// ```
pub fn format_hunks(diff: &ParsedDiff) -> String {
    let mut result = String::new();

    for (index, hunk) in diff.hunks.iter().enumerate() {
        if index > 0 {
            result.push('\n');
        }
        result.push_str(&format!("hunk {index}: {}\n", hunk.raw_header));

        for line in &hunk.lines {
            let old = line.old_line_num.map(|n| n.to_string()).unwrap_or_default();
            let new = line.new_line_num.map(|n| n.to_string()).unwrap_or_default();
            result.push_str(&format!(
                "{:>4} {old:>5} {new:>5} {}\n",
                line.id, line.raw_text
            ));
        }
    }

    result
}

/// Lines of `text` split on `\n` only; a `\r` before the newline stays part of the line.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
}
