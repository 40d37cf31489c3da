//! Placeholder parser for `{{identifier}}` syntax
//!
//! Finds placeholders the way a lazy `\{\{(.*?)\}\}` scan would: left to
//! right, non-overlapping, shortest content between the delimiters, and
//! never across a line break.

use std::ops::Range;

use shortpress_domain::is_valid_identifier;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A placeholder found in a raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderReference {
    /// The text between `{{` and `}}`, untrimmed and not yet validated.
    pub name: String,

    /// Byte range of the whole `{{...}}` token in the original string.
    pub span: Range<usize>,
}

impl PlaceholderReference {
    /// Creates a new placeholder reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Returns true if the enclosed text is a valid reference name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_reference_name(&self.name)
    }
}

/// Parses a string and extracts every placeholder, duplicates and invalid
/// contents included, in order of appearance.
///
/// # Examples
///
/// ```
/// use shortpress_application::variable_resolver::parser::parse_references;
///
/// let refs = parse_references("{{host}}:{{port}} {{bad name}}");
/// assert_eq!(refs.len(), 3);
/// assert_eq!(refs[0].name, "host");
/// assert_eq!(refs[2].name, "bad name");
/// assert!(!refs[2].is_valid());
/// ```
#[must_use]
pub fn parse_references(input: &str) -> Vec<PlaceholderReference> {
    let mut references = Vec::new();
    let mut start = 0;

    while let Some(offset) = input[start..].find(OPEN) {
        let open = start + offset;
        let content_start = open + OPEN.len();

        if let Some(close) = find_close(input, content_start) {
            let end = close + CLOSE.len();
            references.push(PlaceholderReference::new(
                &input[content_start..close],
                open..end,
            ));
            start = end;
        } else {
            // No match can start here; retry from the next byte. `{` is
            // ASCII, so `open + 1` is always a char boundary.
            start = open + 1;
        }
    }

    references
}

/// Finds the first `}}` at or after `from`, unless a newline comes first.
fn find_close(input: &str, from: usize) -> Option<usize> {
    let rest = &input[from..];
    let close = rest.find(CLOSE)?;
    if rest[..close].contains('\n') {
        None
    } else {
        Some(from + close)
    }
}

/// Returns the distinct placeholder texts in order of first appearance.
#[must_use]
pub fn distinct_reference_names(input: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for reference in parse_references(input) {
        if !names.contains(&reference.name) {
            names.push(reference.name);
        }
    }
    names
}

/// Extracts just the placeholder texts, duplicates included.
#[must_use]
pub fn extract_reference_names(input: &str) -> Vec<String> {
    parse_references(input)
        .into_iter()
        .map(|r| r.name)
        .collect()
}

/// Returns true if the input contains at least one placeholder.
#[must_use]
pub fn has_placeholders(input: &str) -> bool {
    !parse_references(input).is_empty()
}

/// Validates placeholder content against `^[A-Za-z0-9_]+$`.
#[must_use]
pub fn is_valid_reference_name(name: &str) -> bool {
    is_valid_identifier(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_placeholder() {
        let refs = parse_references("{{name}}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert_eq!(refs[0].span, 0..8);
    }

    #[test]
    fn test_parse_keeps_duplicates_in_order() {
        let names = extract_reference_names("{{a}}-{{b}}-{{a}}");
        assert_eq!(names, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_distinct_names_keep_first_occurrence_order() {
        let names = distinct_reference_names("{{b}}{{a}}{{b}}{{c}}{{a}}");
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_whitespace_is_kept_verbatim() {
        let refs = parse_references("{{ name }}");
        assert_eq!(refs[0].name, " name ");
        assert!(!refs[0].is_valid());
    }

    #[test]
    fn test_empty_placeholder_is_reported() {
        let refs = parse_references("{{}}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "");
        assert!(!refs[0].is_valid());
    }

    #[test]
    fn test_lazy_match_takes_shortest_content() {
        let names = extract_reference_names("{{a}}}}");
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_extra_open_brace_joins_content() {
        let names = extract_reference_names("{{{a}}");
        assert_eq!(names, vec!["{a"]);
    }

    #[test]
    fn test_unclosed_placeholder() {
        assert!(parse_references("{{name").is_empty());
        assert!(parse_references("name}}").is_empty());
    }

    #[test]
    fn test_placeholder_never_spans_newline() {
        assert!(parse_references("{{na\nme}}").is_empty());
        let names = extract_reference_names("{{broken\n{{ok}}");
        assert_eq!(names, vec!["ok"]);
    }

    #[test]
    fn test_single_brace() {
        assert!(parse_references("{name}").is_empty());
    }

    #[test]
    fn test_adjacent_placeholders() {
        let names = extract_reference_names("{{a}}{{b}}{{c}}");
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_multibyte_text_around_placeholders() {
        let input = "café {{prix}} €";
        let refs = parse_references(input);
        assert_eq!(refs.len(), 1);
        assert_eq!(&input[refs[0].span.clone()], "{{prix}}");
    }

    #[test]
    fn test_has_placeholders() {
        assert!(has_placeholders("Hello {{name}}!"));
        assert!(has_placeholders("{{}}"));
        assert!(!has_placeholders("Hello World!"));
        assert!(!has_placeholders("}} backwards {{"));
    }

    #[test]
    fn test_valid_reference_names() {
        assert!(is_valid_reference_name("foo"));
        assert!(is_valid_reference_name("foo_bar_1"));
        assert!(!is_valid_reference_name("foo bar"));
        assert!(!is_valid_reference_name("foo.bar"));
        assert!(!is_valid_reference_name(""));
    }
}
