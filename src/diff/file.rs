use serde::Serialize;

use super::hunk::{HunkLine, LineKind, ParsedHunk, parse_header};
use super::split_lines;

/// Prefixes of the lines that make up a file header.
const HEADER_PREFIXES: &[&str] = &[
    "diff --git",
    "index ",
    "--- ",
    "+++ ",
    "old mode",
    "new mode",
    "new file",
    "deleted file",
];

/// A structured single-file diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDiff {
    /// Header lines (`diff --git`, `index`, `---`, `+++`, mode lines), newline-joined
    pub file_header: String,
    pub hunks: Vec<ParsedHunk>,
    pub is_new_file: bool,
    pub is_deleted_file: bool,
}

impl ParsedDiff {
    /// Parse the diff of a single file.
    ///
    /// Never fails: input that doesn't look like a diff yields no hunks, and an
    /// unexpected line inside a hunk simply ends that hunk. Parsing stops at the
    /// `diff --git` line of a second file.
    ///
    /// ```
    /// use git_lanes::diff::ParsedDiff;
    ///
    /// let diff = ParsedDiff::parse("--- a/f\n+++ b/f\n@@ -5,2 +5,3 @@\n a\n+b\n c\n");
    /// let line = &diff.hunks[0].lines[1];
    /// assert_eq!(line.content, "b");
    /// assert_eq!((line.old_line_num, line.new_line_num), (None, Some(6)));
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut lines = split_lines(text).peekable();
        let mut header = Vec::new();
        let mut is_new_file = false;
        let mut is_deleted_file = false;

        while let Some(&line) = lines.peek() {
            let is_header = HEADER_PREFIXES.iter().any(|prefix| line.starts_with(prefix));
            if line.starts_with("@@") || !is_header {
                break;
            }
            // Only one `diff --git` line belongs to this file
            if line.starts_with("diff --git") && !header.is_empty() {
                break;
            }
            is_new_file |= line.starts_with("new file");
            is_deleted_file |= line.starts_with("deleted file");
            header.push(line);
            lines.next();
        }

        let mut hunks = Vec::new();

        while let Some(line) = lines.next() {
            if line.starts_with("diff --git") {
                tracing::debug!("diff continues with another file, stopping");
                break;
            }
            if !line.starts_with("@@") {
                continue;
            }
            let Some(range) = parse_header(line) else {
                tracing::debug!(header = line, "skipping unparseable hunk header");
                continue;
            };

            let mut old_line = range.old.start;
            let mut new_line = range.new.start;
            let mut hunk_lines: Vec<HunkLine> = Vec::new();

            while let Some(&body) = lines.peek() {
                if body.starts_with("@@") || body.starts_with("diff --git") {
                    break;
                }
                lines.next();

                if body.starts_with('\\') {
                    if let Some(last) = hunk_lines.last_mut() {
                        last.no_newline_at_eof = true;
                    }
                    continue;
                }
                if body.is_empty() {
                    break;
                }

                let kind = if body.starts_with('+') && !body.starts_with("+++") {
                    LineKind::Addition
                } else if body.starts_with('-') && !body.starts_with("---") {
                    LineKind::Deletion
                } else {
                    LineKind::Context
                };

                let (content, old_line_num, new_line_num) = match kind {
                    LineKind::Addition => (&body[1..], None, Some(new_line)),
                    LineKind::Deletion => (&body[1..], Some(old_line), None),
                    LineKind::Context => (
                        body.strip_prefix(' ').unwrap_or(body),
                        Some(old_line),
                        Some(new_line),
                    ),
                };
                if old_line_num.is_some() {
                    old_line = old_line.saturating_add(1);
                }
                if new_line_num.is_some() {
                    new_line = new_line.saturating_add(1);
                }

                hunk_lines.push(HunkLine {
                    id: hunk_lines.len(),
                    kind,
                    raw_text: body.to_string(),
                    content: content.to_string(),
                    old_line_num,
                    new_line_num,
                    no_newline_at_eof: false,
                });
            }

            hunks.push(ParsedHunk {
                raw_header: line.to_string(),
                old_start: range.old.start,
                old_count: range.old.count,
                new_start: range.new.start,
                new_count: range.new.count,
                section: range.section.to_string(),
                lines: hunk_lines,
            });
        }

        ParsedDiff {
            file_header: header.join("\n"),
            hunks,
            is_new_file,
            is_deleted_file,
        }
    }

    /// Path of the file after the change, or before it for a deletion.
    pub fn path(&self) -> Option<&str> {
        header_path(&self.file_header, "+++ b/")
            .or_else(|| header_path(&self.file_header, "--- a/"))
    }
}

fn header_path<'a>(header: &'a str, prefix: &str) -> Option<&'a str> {
    split_lines(header)
        .find_map(|line| line.strip_prefix(prefix))
        .filter(|path| !path.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const MIXED: &str = r#"diff --git a/gtk.nix b/gtk.nix
index 2ce966d..93d8dbc 100644
--- a/gtk.nix
+++ b/gtk.nix
@@ -8,5 +8,6 @@ in
 line 8
 line 9
-    gtk.theme.name = "Adwaita";
-    gtk.iconTheme.name = "Papirus";
+    # Theme managed by Stylix
+    gtk.iconTheme.name = "Papirus-Dark";
+    gtk.cursorTheme.size = 24;
 line 12
"#;

    #[test]
    fn parse_empty_input() {
        let diff = ParsedDiff::parse("");
        assert_eq!(diff.file_header, "");
        assert!(diff.hunks.is_empty());
        assert!(!diff.is_new_file);
        assert!(!diff.is_deleted_file);
    }

    #[test]
    fn parse_header_lines() {
        let diff = ParsedDiff::parse(MIXED);
        assert_eq!(
            diff.file_header,
            "diff --git a/gtk.nix b/gtk.nix\nindex 2ce966d..93d8dbc 100644\n--- a/gtk.nix\n+++ b/gtk.nix"
        );
        assert_eq!(diff.path(), Some("gtk.nix"));
        assert!(!diff.is_new_file);
    }

    #[test]
    fn parse_mixed_hunk() {
        let diff = ParsedDiff::parse(MIXED);
        assert_eq!(diff.hunks.len(), 1);

        let hunk = &diff.hunks[0];
        assert_eq!(hunk.raw_header, "@@ -8,5 +8,6 @@ in");
        assert_eq!(
            (hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count),
            (8, 5, 8, 6)
        );
        assert_eq!(hunk.section, "in");

        let kinds: Vec<_> = hunk.lines.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Context,
                LineKind::Context,
                LineKind::Deletion,
                LineKind::Deletion,
                LineKind::Addition,
                LineKind::Addition,
                LineKind::Addition,
                LineKind::Context,
            ]
        );

        let numbers: Vec<_> = hunk
            .lines
            .iter()
            .map(|l| (l.id, l.old_line_num, l.new_line_num))
            .collect();
        assert_eq!(
            numbers,
            vec![
                (0, Some(8), Some(8)),
                (1, Some(9), Some(9)),
                (2, Some(10), None),
                (3, Some(11), None),
                (4, None, Some(10)),
                (5, None, Some(11)),
                (6, None, Some(12)),
                (7, Some(12), Some(13)),
            ]
        );

        assert_eq!(hunk.lines[2].raw_text, "-    gtk.theme.name = \"Adwaita\";");
        assert_eq!(hunk.lines[2].content, "    gtk.theme.name = \"Adwaita\";");
        assert_eq!(hunk.lines[7].content, "line 12");
    }

    #[test]
    fn counts_match_line_kinds() {
        let diff = ParsedDiff::parse(MIXED);
        let hunk = &diff.hunks[0];
        let old = hunk.lines.iter().filter(|l| l.kind != LineKind::Addition).count();
        let new = hunk.lines.iter().filter(|l| l.kind != LineKind::Deletion).count();
        assert_eq!((old as u32, new as u32), (hunk.old_count, hunk.new_count));
    }

    #[test]
    fn line_numbering_starts_at_hunk_start() {
        let diff = ParsedDiff::parse("@@ -5,2 +5,3 @@\n first\n+added\n second\n");
        let lines = &diff.hunks[0].lines;
        assert_eq!((lines[0].old_line_num, lines[0].new_line_num), (Some(5), Some(5)));
        assert_eq!((lines[1].old_line_num, lines[1].new_line_num), (None, Some(6)));
        assert_eq!((lines[2].old_line_num, lines[2].new_line_num), (Some(6), Some(7)));
    }

    #[test]
    fn crlf_lines_keep_carriage_return() {
        let diff = ParsedDiff::parse("--- a/f\n+++ b/f\n@@ -1,3 +1,3 @@\n a\r\n-b\r\n+B\r\n c\r\n");
        let lines = &diff.hunks[0].lines;
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].raw_text, " a\r");
        assert_eq!(lines[1].content, "b\r");
        assert_eq!(lines[3].new_line_num, Some(3));
    }

    #[test]
    fn line_numbers_saturate_at_u32_max() {
        let diff = ParsedDiff::parse("@@ -4294967295,2 +1,2 @@\n a\n b\n");
        let lines = &diff.hunks[0].lines;
        assert_eq!(lines[0].old_line_num, Some(u32::MAX));
        assert_eq!(lines[1].old_line_num, Some(u32::MAX));
        assert_eq!(lines[1].new_line_num, Some(2));
    }

    #[test]
    fn parse_multiple_hunks() {
        let diff = r#"diff --git a/config.nix b/config.nix
index fa2da6e..41114ff 100644
--- a/config.nix
+++ b/config.nix
@@ -1,3 +1,4 @@
 one
+# FIRST INSERTION
 two
 three
@@ -8,3 +9,4 @@ line 8
 eight
 nine
+# SECOND INSERTION
 ten
"#;
        let diff = ParsedDiff::parse(diff);
        assert_eq!(diff.hunks.len(), 2);
        assert_eq!(diff.hunks[1].old_start, 8);
        assert_eq!(diff.hunks[1].new_start, 9);
        assert_eq!(diff.hunks[1].lines[2].content, "# SECOND INSERTION");
        assert_eq!(diff.hunks[1].lines[2].new_line_num, Some(11));
        // ids restart in each hunk
        assert_eq!(diff.hunks[1].lines[0].id, 0);
    }

    #[test]
    fn parse_new_file() {
        let diff = r#"diff --git a/new.txt b/new.txt
new file mode 100644
index 0000000..3b18e51
--- /dev/null
+++ b/new.txt
@@ -0,0 +1,2 @@
+hello
+world
"#;
        let diff = ParsedDiff::parse(diff);
        assert!(diff.is_new_file);
        assert_eq!(diff.path(), Some("new.txt"));
        assert_eq!(diff.hunks[0].lines[1].new_line_num, Some(2));
    }

    #[test]
    fn parse_deleted_file() {
        let diff = r#"diff --git a/old.txt b/old.txt
deleted file mode 100644
index 3b18e51..0000000
--- a/old.txt
+++ /dev/null
@@ -1 +0,0 @@
-bye
"#;
        let diff = ParsedDiff::parse(diff);
        assert!(diff.is_deleted_file);
        assert!(diff.file_header.ends_with("+++ /dev/null"));
        assert_eq!(diff.path(), Some("old.txt"));
        assert_eq!(diff.hunks[0].lines[0].kind, LineKind::Deletion);
    }

    #[test]
    fn mode_change_lines_belong_to_header() {
        let diff = "diff --git a/run.sh b/run.sh\nold mode 100644\nnew mode 100755\n";
        let diff = ParsedDiff::parse(diff);
        assert_eq!(diff.file_header.lines().count(), 3);
        assert!(diff.hunks.is_empty());
    }

    #[test]
    fn no_newline_marker_is_recorded_on_previous_line() {
        let diff = "@@ -3 +3,2 @@\n-last line\n\\ No newline at end of file\n+last line\n+new final line\n";
        let diff = ParsedDiff::parse(diff);
        let lines = &diff.hunks[0].lines;
        assert_eq!(lines.len(), 3);
        assert!(lines[0].no_newline_at_eof);
        assert!(!lines[1].no_newline_at_eof);
        // marker does not advance numbering
        assert_eq!(lines[1].new_line_num, Some(3));
        assert_eq!(lines[2].new_line_num, Some(4));
    }

    #[test]
    fn unprefixed_line_is_context() {
        let diff = ParsedDiff::parse("@@ -1,2 +1,2 @@\nbare context\n-gone\n+here\n");
        let first = &diff.hunks[0].lines[0];
        assert_eq!(first.kind, LineKind::Context);
        assert_eq!(first.content, "bare context");
        assert_eq!(first.raw_text, "bare context");
    }

    #[test]
    fn empty_line_ends_hunk() {
        let diff = ParsedDiff::parse("@@ -1,2 +1,2 @@\n-a\n+b\n\n-stray\n");
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(diff.hunks[0].lines.len(), 2);
    }

    #[test]
    fn malformed_header_is_skipped() {
        let diff = ParsedDiff::parse("@@ nonsense @@\n+x\n@@ -1 +1 @@\n-a\n+b\n");
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(diff.hunks[0].raw_header, "@@ -1 +1 @@");
    }

    #[test]
    fn stops_at_second_file() {
        let diff = r#"diff --git a/a.txt b/a.txt
--- a/a.txt
+++ b/a.txt
@@ -1 +1 @@
-a
+A
diff --git a/b.txt b/b.txt
--- a/b.txt
+++ b/b.txt
@@ -1 +1 @@
-b
+B
"#;
        let diff = ParsedDiff::parse(diff);
        assert_eq!(diff.path(), Some("a.txt"));
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(diff.hunks[0].lines.len(), 2);
    }

    #[test]
    fn garbage_input_yields_no_hunks() {
        let diff = ParsedDiff::parse("this is not\na diff at all\n");
        assert_eq!(diff.file_header, "");
        assert!(diff.hunks.is_empty());
    }
}
