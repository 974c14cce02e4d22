use std::collections::HashMap;

use super::connection::Connection;
use super::{CommitGraphEntry, HistoryLine};

/// Turn one row's connection snapshot into drawable line segments.
///
/// Top columns (`child_index`) are handed out in snapshot order. Bottom columns
/// (`parent_index`) are the positions of the distinct parents still in flight below the row.
/// Connections heading for the same parent share one lane and its color.
pub(crate) fn layout_row(
    hash: &str,
    snapshot: &[Connection],
    is_uncommitted: bool,
) -> CommitGraphEntry {
    let parent_outlets = parent_outlets(hash, snapshot);

    let mut next_child_index = 0;
    let mut parent_lines: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut dot: Option<(Option<usize>, usize)> = None;
    let mut lines = Vec::with_capacity(snapshot.len());

    for connection in snapshot {
        let commit_is_parent = connection.parent == hash;
        let commit_is_child = connection.child == hash;

        let parent_index = if commit_is_parent {
            None
        } else {
            parent_outlets
                .iter()
                .position(|outlet| *outlet == connection.parent)
        };
        let mut child_index = if commit_is_child {
            None
        } else {
            Some(next_child_index)
        };
        let mut color_index = connection.color;

        if dot.is_none() && (commit_is_parent || commit_is_child) {
            dot = Some((child_index, color_index));
        }

        match parent_lines.get(connection.parent.as_str()) {
            Some(&(lane, lane_color)) => {
                if !commit_is_child {
                    child_index = Some(lane);
                    color_index = lane_color;
                    if !commit_is_parent {
                        next_child_index += 1;
                    }
                }
            }
            None => {
                if !commit_is_child {
                    parent_lines.insert(
                        connection.parent.as_str(),
                        (next_child_index, color_index),
                    );
                }
                if !commit_is_parent {
                    next_child_index += 1;
                }
            }
        }

        lines.push(HistoryLine {
            child_index,
            parent_index,
            color_index,
        });
    }

    let (dot_column, dot_color_index) = match dot {
        Some((column, color)) => (column.unwrap_or(0), color),
        None => (0, 0),
    };

    CommitGraphEntry {
        dot_column,
        dot_color_index,
        lines,
        is_uncommitted,
    }
}

/// Distinct parents in flight below this row, in first-seen order.
fn parent_outlets<'a>(hash: &str, snapshot: &'a [Connection]) -> Vec<&'a str> {
    let mut outlets: Vec<&str> = Vec::new();
    for connection in snapshot {
        let parent = connection.parent.as_str();
        if parent != hash && !outlets.contains(&parent) {
            outlets.push(parent);
        }
    }
    outlets
}
