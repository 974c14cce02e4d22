use super::Commit;

/// A pipe in flight between the row of `child` and the row of `parent`.
///
/// Connections only exist while a layout is being computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Connection {
    pub parent: String,
    pub child: String,
    pub color: usize,
}

/// Hands out lane colors. Colors are never reused.
#[derive(Debug, Default)]
struct ColorCounter {
    next: usize,
}

impl ColorCounter {
    fn allocate(&mut self) -> usize {
        let color = self.next;
        self.next += 1;
        color
    }
}

/// Walk the commits in order and record, for every row, the open connections at that row.
///
/// The returned snapshots line up with `commits` one to one.
pub(crate) fn track_connections(commits: &[Commit]) -> Vec<Vec<Connection>> {
    let mut live: Vec<Connection> = Vec::new();
    let mut colors = ColorCounter::default();
    let mut snapshots = Vec::with_capacity(commits.len());

    for commit in commits {
        // The pipe arriving at this commit, if any
        let arriving = live.iter().position(|c| c.parent == commit.hash);

        let mut parents = commit.parents.iter();

        if let Some(first_parent) = parents.next() {
            let color = match arriving {
                Some(i) => live[i].color,
                None => colors.allocate(),
            };
            let continuing = Connection {
                parent: first_parent.clone(),
                child: commit.hash.clone(),
                color,
            };

            // A continuing lane keeps its position; a new lane goes last
            match arriving {
                Some(i) => live.insert(i + 1, continuing),
                None => live.push(continuing),
            }
        }

        // Merge parents spawn new lanes
        for parent in parents {
            live.push(Connection {
                parent: parent.clone(),
                child: commit.hash.clone(),
                color: colors.allocate(),
            });
        }

        snapshots.push(live.clone());

        live.retain(|c| c.parent != commit.hash);
    }

    if !live.is_empty() {
        tracing::trace!(
            unresolved = live.len(),
            "connections point at parents outside the history"
        );
    }

    snapshots
}
