use super::file::ParsedDiff;
use super::split_lines;

/// Parse `git diff` output covering any number of files.
///
/// The text is split on `diff --git` lines and each section is parsed on its own.
/// Anything before the first `diff --git` line is ignored.
pub fn parse_all(text: &str) -> Vec<ParsedDiff> {
    let mut files = Vec::new();
    let mut current_file_text = String::new();

    for line in split_lines(text) {
        if line.starts_with("diff --git ") {
            if !current_file_text.is_empty() {
                files.push(ParsedDiff::parse(&current_file_text));
            }
            current_file_text.clear();
        } else if current_file_text.is_empty() {
            continue;
        }
        current_file_text.push_str(line);
        current_file_text.push('\n');
    }

    if !current_file_text.is_empty() {
        files.push(ParsedDiff::parse(&current_file_text));
    }

    files
}
