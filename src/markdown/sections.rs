//! Level-2 section index.
//!
//! A section opens at a `## Name` header and its body runs until the next
//! line starting with `##` (deeper headers included) or the end of the file.
//! All line indices here are 0-based positions in `content.split('\n')`.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*##[ \t]+(?P<name>\S.*?)\s*$").expect("section regex is valid")
});

/// A `## ` section located in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Header text as written (trimmed)
    pub name: String,
    /// Line index of the `## ` header
    pub header_line: usize,
    /// Body line indices, header excluded
    pub body: Range<usize>,
}

/// Split content into lines the same way mutations rejoin them.
#[must_use]
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').collect()
}

/// Index at which appended lines land.
///
/// A terminating newline stays terminating: the empty segment after it is
/// treated as outside the file body.
#[must_use]
pub fn end_of_file(content: &str) -> usize {
    if content.is_empty() {
        return 0;
    }
    let count = content.split('\n').count();
    if content.ends_with('\n') {
        count - 1
    } else {
        count
    }
}

/// Parse a `## Name` header line, returning the trimmed name.
///
/// Exactly two `#` are required; `###` and deeper do not open a section.
#[must_use]
pub fn section_name(line: &str) -> Option<&str> {
    SECTION_RE
        .captures(line)
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str())
}

fn closes_section(line: &str) -> bool {
    line.trim_start().starts_with("##")
}

/// Locate every `## ` section, keyed by lowercased name.
///
/// When a name appears twice the first occurrence wins.
///
/// # Example
///
/// ```
/// use pilot::markdown::sections::find_sections;
///
/// let content = "# Tasks\n## Backlog\n- [ ] A\n\n## Done\n- [x] B\n";
/// let sections = find_sections(content);
/// assert_eq!(sections["backlog"].body, 2..4);
/// assert_eq!(sections["done"].body, 5..6);
/// ```
#[must_use]
pub fn find_sections(content: &str) -> HashMap<String, Section> {
    let lines = split_lines(content);
    let eof = end_of_file(content);
    let mut sections: HashMap<String, Section> = HashMap::new();

    for (index, line) in lines.iter().enumerate() {
        let Some(name) = section_name(line) else {
            continue;
        };

        let body_start = index + 1;
        let body_end = lines
            .iter()
            .enumerate()
            .skip(body_start)
            .find(|(_, l)| closes_section(l))
            .map_or(eof, |(i, _)| i)
            .max(body_start);

        sections
            .entry(name.to_lowercase())
            .or_insert_with(|| Section {
                name: name.to_string(),
                header_line: index,
                body: body_start..body_end,
            });
    }

    sections
}

/// Line index where a new line should be spliced in.
///
/// With a known section, this is the end of its body (just before the next
/// header, after any blank lines the body already ends with). Unknown or
/// omitted sections append at end of file.
#[must_use]
pub fn find_insertion_point(content: &str, section: Option<&str>) -> usize {
    section
        .and_then(|name| find_sections(content).remove(&name.trim().to_lowercase()))
        .map_or_else(|| end_of_file(content), |s| s.body.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASKS: &str = "# Tasks\n\n## Backlog\n- [ ] A\n- [ ] B\n\n## In Progress\n- [ ] C\n\n## Done\n- [x] D\n";

    // ========================================================================
    // Header Tests
    // ========================================================================

    #[test]
    fn test_section_name_parses_level_two_only() {
        assert_eq!(section_name("## Goals"), Some("Goals"));
        assert_eq!(section_name("  ##   In Progress  "), Some("In Progress"));
        assert_eq!(section_name("### Sub"), None);
        assert_eq!(section_name("# Title"), None);
        assert_eq!(section_name("##NoSpace"), None);
        assert_eq!(section_name("## "), None);
    }

    #[test]
    fn test_section_name_ignores_carriage_return() {
        assert_eq!(section_name("## Notes\r"), Some("Notes"));
    }

    // ========================================================================
    // Section Index Tests
    // ========================================================================

    #[test]
    fn test_find_sections_extents() {
        let sections = find_sections(TASKS);
        assert_eq!(sections.len(), 3);

        let backlog = &sections["backlog"];
        assert_eq!(backlog.name, "Backlog");
        assert_eq!(backlog.header_line, 2);
        assert_eq!(backlog.body, 3..6);

        assert_eq!(sections["in progress"].body, 7..9);
        // Last section stops before the empty segment after the final newline
        assert_eq!(sections["done"].body, 10..11);
    }

    #[test]
    fn test_find_sections_first_duplicate_wins() {
        let content = "## Notes\n- first\n## Notes\n- second\n";
        let sections = find_sections(content);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections["notes"].header_line, 0);
        assert_eq!(sections["notes"].body, 1..2);
    }

    #[test]
    fn test_deeper_header_closes_section() {
        let content = "## Goals\n- [ ] A\n### Detail\n- [ ] B\n";
        let sections = find_sections(content);
        assert_eq!(sections["goals"].body, 1..2);
        assert!(!sections.contains_key("detail"));
    }

    #[test]
    fn test_header_followed_by_header_has_empty_body() {
        let sections = find_sections("## A\n## B\ntext");
        assert_eq!(sections["a"].body, 1..1);
        assert_eq!(sections["b"].body, 2..3);
    }

    #[test]
    fn test_find_sections_empty_content() {
        assert!(find_sections("").is_empty());
    }

    // ========================================================================
    // Insertion Point Tests
    // ========================================================================

    #[test]
    fn test_insertion_point_before_next_header() {
        // After the trailing blank line of Backlog, right before "## In Progress"
        assert_eq!(find_insertion_point(TASKS, Some("backlog")), 6);
    }

    #[test]
    fn test_insertion_point_is_case_insensitive() {
        assert_eq!(find_insertion_point(TASKS, Some("IN PROGRESS")), 9);
    }

    #[test]
    fn test_insertion_point_last_section_keeps_final_newline() {
        assert_eq!(find_insertion_point(TASKS, Some("Done")), 11);
    }

    #[test]
    fn test_insertion_point_unknown_or_missing_section() {
        assert_eq!(find_insertion_point(TASKS, Some("Blockers")), 11);
        assert_eq!(find_insertion_point(TASKS, None), 11);
    }

    #[test]
    fn test_end_of_file_variants() {
        assert_eq!(end_of_file(""), 0);
        assert_eq!(end_of_file("a"), 1);
        assert_eq!(end_of_file("a\n"), 1);
        assert_eq!(end_of_file("a\nb"), 2);
        assert_eq!(end_of_file("a\n\n"), 2);
    }
}
