use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete::{char, u32 as decimal},
    combinator::{opt, rest},
    sequence::preceded,
};
use serde::Serialize;

/// What a hunk line does to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineKind {
    Context,
    Addition,
    Deletion,
}

/// A single line of a hunk body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HunkLine {
    /// 0-based, unique within the hunk
    pub id: usize,
    pub kind: LineKind,
    /// The line as it appeared in the diff, prefix included
    pub raw_text: String,
    /// The line without its prefix
    pub content: String,
    /// Set for context and deletion lines
    pub old_line_num: Option<u32>,
    /// Set for context and addition lines
    pub new_line_num: Option<u32>,
    /// Followed by a `\ No newline at end of file` marker
    pub no_newline_at_eof: bool,
}

impl HunkLine {
    pub fn is_change(&self) -> bool {
        self.kind != LineKind::Context
    }
}

/// One `@@` block of a file diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedHunk {
    /// The header line exactly as it appeared
    pub raw_header: String,
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    /// Text after the closing `@@` (usually the enclosing function)
    pub section: String,
    pub lines: Vec<HunkLine>,
}

impl ParsedHunk {
    /// Ids of every addition and deletion, i.e. the selection covering the whole hunk.
    pub fn change_ids(&self) -> Vec<usize> {
        self.lines
            .iter()
            .filter(|line| line.is_change())
            .map(|line| line.id)
            .collect()
    }

    pub fn line(&self, id: usize) -> Option<&HunkLine> {
        self.lines.iter().find(|line| line.id == id)
    }
}

/// Start and count of one side of a hunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Range {
    pub start: u32,
    pub count: u32,
}

/// Both ranges of a hunk header plus the trailing section text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HunkHeader<'a> {
    pub old: Range,
    pub new: Range,
    pub section: &'a str,
}

/// `start[,count]`, where a missing count means 1.
fn range(input: &str) -> IResult<&str, Range> {
    (decimal, opt(preceded(char(','), decimal)))
        .map(|(start, count)| Range {
            start,
            count: count.unwrap_or(1),
        })
        .parse(input)
}

/// `@@ -old[,count] +new[,count] @@[ section]`
fn hunk_header(input: &str) -> IResult<&str, HunkHeader<'_>> {
    (
        tag("@@ -"),
        range,
        tag(" +"),
        range,
        tag(" @@"),
        rest,
    )
        .map(|(_, old, _, new, _, section): (_, _, _, _, _, &str)| HunkHeader {
            old,
            new,
            section: section.strip_prefix(' ').unwrap_or(section),
        })
        .parse(input)
}

/// Parse a hunk header line, returning `None` if it does not have the expected shape.
pub(crate) fn parse_header(line: &str) -> Option<HunkHeader<'_>> {
    hunk_header(line).ok().map(|(_, header)| header)
}
