//! Trailing filter suffixes (`ul>li|bem|c`)
//!
//! A filter is selected by appending `|code` to an abbreviation. Suffixes are
//! peeled off from the cursor backwards, at most `max_filters` of them.

use std::fmt;

/// Separates an abbreviation from its filter codes
pub const FILTER_DELIMITER: char = '|';

/// Default bound on how many suffixes are peeled off
pub const DEFAULT_MAX_FILTERS: usize = 3;

/// Output filters selectable from a suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// BEM-style class naming
    Bem,
    /// Comment annotation after elements with id/class
    Comment,
    /// Trim list markers from wrapped lines
    Trim,
}

/// Filters in the order suffixes are tried
const KNOWN_FILTERS: &[Filter] = &[Filter::Bem, Filter::Comment, Filter::Trim];

impl Filter {
    pub fn code(self) -> &'static str {
        match self {
            Filter::Bem => "bem",
            Filter::Comment => "c",
            Filter::Trim => "t",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        KNOWN_FILTERS.iter().copied().find(|f| f.code() == code.trim())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of peeling filter suffixes off a line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFilters {
    /// Byte offset where the abbreviation (without suffixes) ends
    pub end: usize,
    /// Filters in the order they appear in the text
    pub filters: Vec<Filter>,
}

impl ParsedFilters {
    /// Comma-joined filter codes, as handed to the expansion options
    pub fn joined(&self) -> Option<String> {
        if self.filters.is_empty() {
            return None;
        }
        Some(self.filters.iter().map(|f| f.code()).collect::<Vec<_>>().join(","))
    }

    pub fn contains(&self, filter: Filter) -> bool {
        self.filters.contains(&filter)
    }
}

/// Strip up to `max_filters` `|code` suffixes from `text[..end]`.
///
/// `end` is a byte offset. Stops at the first suffix that is not a known
/// filter code.
///
/// # Examples
/// ```
/// use emmet_assist::filters::{parse_filters, Filter, DEFAULT_MAX_FILTERS};
///
/// let parsed = parse_filters("ul>li|bem|c", 11, DEFAULT_MAX_FILTERS);
/// assert_eq!(parsed.end, 5);
/// assert_eq!(parsed.filters, vec![Filter::Bem, Filter::Comment]);
/// assert_eq!(parsed.joined().as_deref(), Some("bem,c"));
/// ```
pub fn parse_filters(text: &str, end: usize, max_filters: usize) -> ParsedFilters {
    let mut end = end.min(text.len());
    let mut filters = Vec::new();

    for _ in 0..max_filters {
        let head = &text[..end];
        let matched = KNOWN_FILTERS.iter().copied().find(|filter| {
            head.strip_suffix(filter.code())
                .is_some_and(|rest| rest.ends_with(FILTER_DELIMITER))
        });

        let Some(filter) = matched else {
            break;
        };

        end -= filter.code().len() + FILTER_DELIMITER.len_utf8();
        // Suffixes are found right to left; keep them in text order
        filters.insert(0, filter);
    }

    ParsedFilters { end, filters }
}
