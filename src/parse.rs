//! Parsing of user-supplied input.
//!
//! Two small formats are handled here:
//!
//! - line selections such as `0,2,5..7`, naming hunk line ids (see [`crate::diff::format_hunks`]);
//! - commit listings as printed by `git log --format='%H %P'`.
//!
//! # Examples
//!
//! ```
//! use git_lanes::parse::{parse_commit_log, parse_line_selection};
//!
//! let ids = parse_line_selection("1,4..6").unwrap();
//! assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 4, 5, 6]);
//!
//! let commits = parse_commit_log("c3 c2\nc2 c1\nc1\n");
//! assert_eq!(commits.len(), 3);
//! assert_eq!(commits[0].parents, vec!["c2"]);
//! assert!(commits[2].parents.is_empty());
//! ```

use error_set::error_set;
use std::collections::BTreeSet;

use crate::graph::Commit;

error_set! {
    /// Errors from parsing user input
    ParseError := {
        /// No line ids were given
        #[display("No line ids provided")]
        EmptySelection,
        /// A line id could not be parsed as a number
        #[display("Invalid line id '{value}'")]
        InvalidLineId { value: String },
        /// Range has start greater than end
        #[display("Invalid range {start}..{end}: start must be <= end")]
        InvalidRange { start: usize, end: usize },
    }
}

/// Parse a comma-separated list of line ids and inclusive `N..M` ranges.
///
/// # Errors
///
/// Returns [`ParseError`] if:
/// - no ids are given
/// - an id is not a non-negative number
/// - a range starts after it ends
pub fn parse_line_selection(input: &str) -> Result<BTreeSet<usize>, ParseError> {
    let mut ids = BTreeSet::new();

    for part in input.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        if let Some((start_str, end_str)) = part.split_once("..") {
            let start = parse_id(start_str)?;
            let end = parse_id(end_str)?;
            if start > end {
                return Err(ParseError::InvalidRange { start, end });
            }
            ids.extend(start..=end);
        } else {
            ids.insert(parse_id(part)?);
        }
    }

    if ids.is_empty() {
        return Err(ParseError::EmptySelection);
    }

    Ok(ids)
}

fn parse_id(input: &str) -> Result<usize, ParseError> {
    input
        .trim()
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidLineId {
            value: input.to_string(),
        })
}

/// Parse `git log --format='%H %P'` output: one commit per line, its hash followed by
/// its parent hashes. Blank lines are skipped.
pub fn parse_commit_log(input: &str) -> Vec<Commit> {
    input
        .lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let hash = tokens.next()?;
            Some(Commit::new(hash, tokens))
        })
        .collect()
}
