//! Tab-stop and escaping transforms for expanded snippets
//!
//! Expansions use `${n}` and `${n:placeholder}` markers. Editors reserve `${0}`
//! for the final cursor position and treat a bare `$` as the start of a
//! variable, so expansions are post-processed before they are inserted.

use fancy_regex::Regex as FancyRegex;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Unescaped tab-stop opener: `${12}` or `${12:`
static TAB_STOP_OPENER: LazyLock<FancyRegex> = LazyLock::new(|| FancyRegex::new(r"(?<!\\)\$\{(\d+)([}:])").unwrap());

static BARE_TAB_STOP: LazyLock<FancyRegex> = LazyLock::new(|| FancyRegex::new(r"(?<!\\)\$\{\d+\}").unwrap());

/// Innermost placeholder: the body holds no `}` and no further marker opener
static PLACEHOLDER_TAB_STOP: LazyLock<FancyRegex> =
    LazyLock::new(|| FancyRegex::new(r"(?<!\\)\$\{\d+:((?:[^$}]|\$(?!\{))*)\}").unwrap());

static WHOLE_TAB_STOP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\$\{\d+\}$").unwrap());

/// Glyph standing in for a cursor position in previews
pub const CURSOR_GLYPH: &str = "|";

/// True if `text` is exactly one bare tab stop such as `${1}`
pub fn is_tab_stop_marker(text: &str) -> bool {
    WHOLE_TAB_STOP.is_match(text)
}

/// Escape every `$` that does not open a `${...}` marker.
///
/// Already escaped dollars are left alone, so the transform is idempotent.
///
/// # Examples
/// ```
/// use emmet_assist::tabstops::escape_bare_dollar;
///
/// assert_eq!(escape_bare_dollar("<span>$5</span>"), r"<span>\$5</span>");
/// assert_eq!(escape_bare_dollar(r"<span>\$5</span>"), r"<span>\$5</span>");
/// assert_eq!(escape_bare_dollar("${1:$}"), r"${1:\$}");
/// ```
pub fn escape_bare_dollar(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 4);
    let mut chars = text.chars().peekable();
    let mut prev: Option<char> = None;

    while let Some(ch) = chars.next() {
        if ch == '$' && prev != Some('\\') && chars.peek() != Some(&'{') {
            result.push('\\');
        }
        result.push(ch);
        prev = Some(ch);
    }

    result
}

#[derive(Debug, Clone, Copy)]
struct TabStop {
    /// Byte range of the number inside the marker
    digits: (usize, usize),
    number: u64,
    placeholder: bool,
}

fn tab_stops(text: &str) -> Vec<TabStop> {
    TAB_STOP_OPENER
        .captures_iter(text)
        .filter_map(Result::ok)
        .filter_map(|caps| {
            let digits = caps.get(1)?;
            let number = digits.as_str().parse::<u64>().ok()?;
            let opener = caps.get(2)?;
            // `${1:}` counts as bare
            let placeholder = opener.as_str() == ":" && !text[opener.end()..].starts_with('}');
            Some(TabStop {
                digits: (digits.start(), digits.end()),
                number,
                placeholder,
            })
        })
        .collect()
}

/// Turn the highest tab stop into the final `${0}` stop.
///
/// Nothing changes when a `${0}` already exists, or when any marker carrying
/// the highest number is a placeholder (`${3:text}`). Mirrored bare markers
/// are all renumbered. An empty placeholder `${3:}` counts as bare. Numbers
/// are compared numerically, so `${10}` wins over `${9}`.
///
/// # Examples
/// ```
/// use emmet_assist::tabstops::promote_final_tab_stop;
///
/// assert_eq!(promote_final_tab_stop("<a>${1}</a><b>${2}</b>"), "<a>${1}</a><b>${0}</b>");
/// assert_eq!(promote_final_tab_stop("${1}${2:x}"), "${1}${2:x}");
/// assert_eq!(promote_final_tab_stop("${2:x}${1}${2}"), "${2:x}${1}${2}");
/// ```
pub fn promote_final_tab_stop(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let stops = tab_stops(text);
    if stops.iter().any(|stop| stop.number == 0) {
        return text.to_string();
    }

    let Some(max) = stops.iter().map(|stop| stop.number).max() else {
        return text.to_string();
    };

    let maximal: Vec<&TabStop> = stops.iter().filter(|stop| stop.number == max).collect();
    if maximal.iter().any(|stop| stop.placeholder) {
        return text.to_string();
    }

    let mut result = text.to_string();
    // Right to left so earlier byte ranges stay valid
    for stop in maximal.iter().rev() {
        result.replace_range(stop.digits.0..stop.digits.1, "0");
    }
    result
}

/// Render a human-readable preview: `${n}` becomes the cursor glyph and
/// `${n:text}` becomes `text`, nested placeholders included. Never use the
/// result as insert text.
///
/// # Examples
/// ```
/// use emmet_assist::tabstops::collapse_to_preview;
///
/// assert_eq!(collapse_to_preview("<a href=\"${1:url}\">${0}</a>"), "<a href=\"url\">|</a>");
/// assert_eq!(collapse_to_preview("${1:x ${2:y}}"), "x y");
/// ```
pub fn collapse_to_preview(text: &str) -> String {
    let cursors = replace_all(&BARE_TAB_STOP, text, CURSOR_GLYPH);
    unwrap_placeholders(&cursors)
}

/// Strip tab stops entirely, keeping placeholder text
pub fn remove_tab_stops(text: &str) -> String {
    let stripped = replace_all(&BARE_TAB_STOP, text, "");
    unwrap_placeholders(&stripped)
}

/// Replace placeholders by their text, innermost first, until none are left
fn unwrap_placeholders(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = replace_all(&PLACEHOLDER_TAB_STOP, &current, "$1").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn replace_all<'t>(regex: &FancyRegex, text: &'t str, replacement: &str) -> Cow<'t, str> {
    match regex.try_replacen(text, 0, replacement) {
        Ok(replaced) => replaced,
        Err(e) => {
            log::debug!("Tab-stop rewrite skipped: {e}");
            Cow::Borrowed(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_bare_dollar() {
        assert_eq!(escape_bare_dollar("$"), r"\$");
        assert_eq!(escape_bare_dollar("a$b$c"), r"a\$b\$c");
        assert_eq!(escape_bare_dollar("${1} costs $5"), r"${1} costs \$5");
        assert_eq!(escape_bare_dollar(""), "");
    }

    #[test]
    fn test_escape_is_idempotent() {
        let once = escape_bare_dollar("<span>$5</span>");
        assert_eq!(once, r"<span>\$5</span>");
        assert_eq!(escape_bare_dollar(&once), once);
    }

    #[test]
    fn test_promote_existing_final_stop() {
        let text = "<a>${0}</a>${1}";
        assert_eq!(promote_final_tab_stop(text), text);
    }

    #[test]
    fn test_promote_numeric_not_lexical() {
        let items: String = (1..=10).map(|i| format!("<li>${{{i}}}</li>")).collect();
        let promoted = promote_final_tab_stop(&items);
        assert!(promoted.ends_with("<li>${0}</li>"));
        assert!(promoted.contains("<li>${9}</li>"));
        assert!(!promoted.contains("${10}"));
    }

    #[test]
    fn test_promote_all_maximal_markers() {
        assert_eq!(promote_final_tab_stop("${2}a${1}b${2}"), "${0}a${1}b${0}");
    }

    #[test]
    fn test_promote_skips_max_shared_with_placeholder() {
        assert_eq!(promote_final_tab_stop("${2:x}${2}"), "${2:x}${2}");
        assert_eq!(promote_final_tab_stop("${2:x}${1}${2}"), "${2:x}${1}${2}");
        assert_eq!(promote_final_tab_stop("${2}${1}${2:x}"), "${2}${1}${2:x}");
    }

    #[test]
    fn test_promote_empty_placeholder_as_bare() {
        assert_eq!(promote_final_tab_stop("${1}${2:}"), "${1}${0:}");
        assert_eq!(promote_final_tab_stop("${2:}${1}${2}"), "${0:}${1}${0}");
        assert_eq!(collapse_to_preview("${1}${0:}"), "|");
    }

    #[test]
    fn test_promote_skips_placeholder_only_max() {
        assert_eq!(promote_final_tab_stop("${1}${2:x}"), "${1}${2:x}");
    }

    #[test]
    fn test_promote_without_markers() {
        assert_eq!(promote_final_tab_stop("plain"), "plain");
        assert_eq!(promote_final_tab_stop("  "), "  ");
        assert_eq!(promote_final_tab_stop("${x}"), "${x}");
        assert_eq!(promote_final_tab_stop(r"\${3}"), r"\${3}");
    }

    #[test]
    fn test_promote_is_idempotent() {
        let once = promote_final_tab_stop("<ul>\n\t<li>${1}</li>\n</ul>");
        assert_eq!(once, "<ul>\n\t<li>${0}</li>\n</ul>");
        assert_eq!(promote_final_tab_stop(&once), once);
    }

    #[test]
    fn test_collapse_to_preview() {
        assert_eq!(collapse_to_preview("<div>${1}</div>"), "<div>|</div>");
        assert_eq!(collapse_to_preview("${1:a}${2}"), "a|");
        assert_eq!(collapse_to_preview("${1:}"), "");
        assert_eq!(collapse_to_preview(r"\${1}"), r"\${1}");
    }

    #[test]
    fn test_collapse_nested_placeholders() {
        let promoted = promote_final_tab_stop("<a title=\"${1:x ${2:y}}\">${3}</a>");
        assert_eq!(promoted, "<a title=\"${1:x ${2:y}}\">${0}</a>");
        assert_eq!(collapse_to_preview(&promoted), "<a title=\"x y\">|</a>");
        assert_eq!(collapse_to_preview("${1:a ${2:b ${3:c}} ${4}}"), "a b c |");
        assert_eq!(collapse_to_preview(r"${1:\$5}"), r"\$5");
    }

    #[test]
    fn test_remove_tab_stops() {
        assert_eq!(remove_tab_stops("margin: ${1};"), "margin: ;");
        assert_eq!(remove_tab_stops("color: ${1:#000};"), "color: #000;");
        assert_eq!(remove_tab_stops("${1:x ${2:y}}${3}"), "x y");
    }

    #[test]
    fn test_is_tab_stop_marker() {
        assert!(is_tab_stop_marker("${0}"));
        assert!(is_tab_stop_marker("${12}"));
        assert!(!is_tab_stop_marker("${1:x}"));
        assert!(!is_tab_stop_marker(" ${1}"));
    }
}
