//! Abbreviation extraction at the cursor
//!
//! Peels filter suffixes off the line, asks the engine for the abbreviation
//! boundary, and widens the resulting range so that accepting a completion
//! also replaces the typed filter suffix.

use crate::document::{LineSource, Position, Range, byte_to_char_offset, char_to_byte_offset};
use crate::engine::{AbbreviationEngine, ExtractOptions};
use crate::filters::{Filter, parse_filters};

/// Abbreviation located before the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviationToken {
    /// Abbreviation text without filter suffixes
    pub abbreviation: String,
    /// Range covering the abbreviation and its filter suffixes
    pub range: Range,
    /// Filters in the order they were typed
    pub filters: Vec<Filter>,
}

impl AbbreviationToken {
    /// Comma-joined filter codes, `None` when no filter was typed
    pub fn filter(&self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.iter().map(|f| f.code()).collect::<Vec<_>>().join(","))
        }
    }
}

/// Extract the abbreviation ending at `position` in `document`.
///
/// Returns `None` when the line does not exist or no abbreviation precedes
/// the cursor. That is the normal "nothing to suggest" outcome.
pub fn extract_abbreviation<E, D>(
    engine: &E,
    document: &D,
    position: Position,
    options: &ExtractOptions,
    max_filters: usize,
) -> Option<AbbreviationToken>
where
    E: AbbreviationEngine + ?Sized,
    D: LineSource + ?Sized,
{
    let line = document.line(position.line)?;
    extract_from_line(engine, line, position, options, max_filters)
}

/// Same as [`extract_abbreviation`] for an already fetched line
pub fn extract_from_line<E>(
    engine: &E,
    line: &str,
    position: Position,
    options: &ExtractOptions,
    max_filters: usize,
) -> Option<AbbreviationToken>
where
    E: AbbreviationEngine + ?Sized,
{
    let cursor = char_to_byte_offset(line, position.character as usize);
    let parsed = parse_filters(&line[..cursor], cursor, max_filters);
    let suffix_len = cursor - parsed.end;

    let (abbreviation, start) = match engine.extract(line, parsed.end, options) {
        Some(found) => (found.abbreviation, found.start),
        // Filters with an empty body are still extracted; validation rejects them
        None if !parsed.filters.is_empty() => (String::new(), parsed.end),
        None => {
            log::debug!("No abbreviation found at {}:{}", position.line, position.character);
            return None;
        }
    };

    let start_col = byte_to_char_offset(line, start) as u32;
    let end_col = start_col + abbreviation.chars().count() as u32 + suffix_len as u32;

    Some(AbbreviationToken {
        abbreviation,
        range: Range::on_line(position.line, start_col, end_col),
        filters: parsed.filters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScanOnlyEngine;
    use crate::filters::DEFAULT_MAX_FILTERS;

    fn extract(line: &str, column: u32) -> Option<AbbreviationToken> {
        extract_from_line(
            &ScanOnlyEngine,
            line,
            Position::new(0, column),
            &ExtractOptions::default(),
            DEFAULT_MAX_FILTERS,
        )
    }

    #[test]
    fn test_extract_inside_tag_content() {
        let token = extract("<div>ul>li*3</div>", 10).unwrap();
        assert_eq!(token.abbreviation, "ul>li");
        assert_eq!(token.range, Range::on_line(0, 5, 10));
        assert_eq!(token.filter(), None);
    }

    #[test]
    fn test_extract_with_filter_suffix() {
        let token = extract("ul>li|bem", 9).unwrap();
        assert_eq!(token.abbreviation, "ul>li");
        assert_eq!(token.filter().as_deref(), Some("bem"));
        assert_eq!(token.range, Range::on_line(0, 0, 9));
    }

    #[test]
    fn test_extract_with_multiple_filters() {
        let token = extract("  ul>li|bem|c", 13).unwrap();
        assert_eq!(token.abbreviation, "ul>li");
        assert_eq!(token.filter().as_deref(), Some("bem,c"));
        assert_eq!(token.range, Range::on_line(0, 2, 13));
    }

    #[test]
    fn test_empty_body_with_filter() {
        let token = extract("foo |bem", 8).unwrap();
        assert_eq!(token.abbreviation, "");
        assert_eq!(token.range, Range::on_line(0, 4, 8));
    }

    #[test]
    fn test_nothing_to_extract() {
        assert_eq!(extract("hello ", 6), None);
        assert_eq!(extract("", 0), None);
    }

    #[test]
    fn test_document_lookup() {
        let doc = "<p></p>\n  div.a";
        let token = extract_abbreviation(
            &ScanOnlyEngine,
            doc,
            Position::new(1, 7),
            &ExtractOptions::default(),
            DEFAULT_MAX_FILTERS,
        )
        .unwrap();
        assert_eq!(token.abbreviation, "div.a");
        assert_eq!(token.range, Range::on_line(1, 2, 7));

        let missing = extract_abbreviation(
            &ScanOnlyEngine,
            doc,
            Position::new(5, 0),
            &ExtractOptions::default(),
            DEFAULT_MAX_FILTERS,
        );
        assert!(missing.is_none());
    }

    #[test]
    fn test_character_columns_with_multibyte_text() {
        let token = extract("café p", 6).unwrap();
        assert_eq!(token.abbreviation, "p");
        assert_eq!(token.range, Range::on_line(0, 5, 6));
    }
}
