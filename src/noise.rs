//! Noise suppression for expansions
//!
//! Emmet happily expands any word: `abc` becomes `<abc></abc>` in HTML and
//! `abc: ;` in CSS. Offering those on every keystroke makes completion
//! unusable, so such non-resolving expansions are classified as noise.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::OutputOptions;
use crate::data::{common_tags, is_common_tag, is_html_tag};
use crate::syntax::SyntaxKind;
use crate::tabstops::is_tab_stop_marker;

/// A word followed by a period, typical for the end of a sentence
static WORD_THEN_DOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([a-zA-Z\d]*)\.$").unwrap());

/// PascalCase identifiers, typical for JSX components
static PASCAL_CASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-Z][A-Za-z0-9]*)+$").unwrap());

/// Everything a noise rule may look at
#[derive(Debug, Clone, Copy)]
pub struct NoiseInput<'a> {
    pub syntax: &'a str,
    pub abbreviation: &'a str,
    pub expanded: &'a str,
    pub options: &'a OutputOptions,
    /// Known snippet keys for the syntax (built-in and custom)
    pub snippet_keys: &'a [String],
}

/// A named noise rule. `Some(true)` means noise, `Some(false)` means keep,
/// `None` defers to the next rule.
#[derive(Clone, Copy)]
pub struct NoiseRule {
    pub name: &'static str,
    pub check: fn(&NoiseInput<'_>) -> Option<bool>,
}

impl std::fmt::Debug for NoiseRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseRule").field("name", &self.name).finish()
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// `abc` → `abc: ${1};`, i.e. an unknown property with an empty value
fn empty_property(input: &NoiseInput<'_>) -> Option<bool> {
    let between = input.options.get_str("stylesheet.between").unwrap_or(": ");
    let after = input.options.get_str("stylesheet.after").unwrap_or(";");
    let abbr = input.abbreviation;

    // `m:` expands to `m: ;`; drop the part of the abbreviation that overlaps `between`
    let prefix_end = between
        .chars()
        .next()
        .and_then(|first| {
            let from = abbr.len().saturating_sub(between.len());
            if !abbr.is_char_boundary(from) {
                return None;
            }
            abbr[from..].find(first).map(|idx| idx + from)
        })
        .unwrap_or(abbr.len());
    let property = &abbr[..prefix_end];

    let echoes_property = input
        .expanded
        .strip_prefix(property)
        .and_then(|rest| rest.strip_prefix(between))
        .and_then(|rest| rest.strip_suffix(after))
        .is_some_and(is_tab_stop_marker);

    let lost_separator = strip_whitespace(input.expanded) == format!("{}{}", strip_whitespace(abbr), after);

    Some(echoes_property || lost_separator)
}

/// Common HTML tags are not suggested for XML
fn xml_html_tag(input: &NoiseInput<'_>) -> Option<bool> {
    if input.syntax != "xml" {
        return None;
    }
    let lower = input.abbreviation.to_lowercase();
    common_tags().any(|tag| tag.starts_with(&lower)).then_some(true)
}

fn known_name(input: &NoiseInput<'_>) -> Option<bool> {
    let abbr = input.abbreviation;
    let known = is_common_tag(&abbr.to_lowercase()) || input.snippet_keys.iter().any(|k| k == abbr);
    known.then_some(false)
}

/// Custom elements and namespaced tags: `my-element`, `svg:rect`
fn custom_element(input: &NoiseInput<'_>) -> Option<bool> {
    let abbr = input.abbreviation;
    let custom = abbr.contains(['-', ':']) && !abbr.contains("--") && !abbr.contains("::") && !abbr.ends_with(':');
    custom.then_some(false)
}

/// A lone `.` must stay expandable so `.foo` can be built up keystroke by keystroke
fn lone_dot(input: &NoiseInput<'_>) -> Option<bool> {
    (input.abbreviation == ".").then_some(false)
}

/// Sentences end with a period; only `tag.` is a real abbreviation
fn word_then_dot(input: &NoiseInput<'_>) -> Option<bool> {
    let caps = WORD_THEN_DOT.captures(input.abbreviation)?;
    let word = caps.get(1).map_or("", |m| m.as_str());
    Some(word.is_empty() || !is_html_tag(word))
}

fn jsx_component(input: &NoiseInput<'_>) -> Option<bool> {
    (input.syntax == "jsx" && PASCAL_CASE.is_match(input.abbreviation)).then_some(false)
}

/// `abc` → `<abc>${1}</abc>`: the engine did not recognise the tag
fn echoed_tag(input: &NoiseInput<'_>) -> Option<bool> {
    let expanded = input.expanded.to_lowercase();
    let abbr = input.abbreviation.to_lowercase();
    let echoed = expanded
        .strip_prefix(&format!("<{abbr}>"))
        .and_then(|rest| rest.strip_suffix(&format!("</{abbr}>")))
        .is_some_and(is_tab_stop_marker);
    Some(echoed)
}

/// Stylesheet rules in evaluation order
pub static STYLESHEET_NOISE_RULES: &[NoiseRule] = &[NoiseRule {
    name: "empty-property",
    check: empty_property,
}];

/// Markup rules in evaluation order
pub static MARKUP_NOISE_RULES: &[NoiseRule] = &[
    NoiseRule {
        name: "xml-html-tag",
        check: xml_html_tag,
    },
    NoiseRule {
        name: "known-name",
        check: known_name,
    },
    NoiseRule {
        name: "custom-element",
        check: custom_element,
    },
    NoiseRule {
        name: "lone-dot",
        check: lone_dot,
    },
    NoiseRule {
        name: "word-then-dot",
        check: word_then_dot,
    },
    NoiseRule {
        name: "jsx-component",
        check: jsx_component,
    },
    NoiseRule {
        name: "echoed-tag",
        check: echoed_tag,
    },
];

/// Evaluate the rules and report `(is_noise, deciding rule)`
pub fn explain(input: &NoiseInput<'_>) -> (bool, &'static str) {
    rule_set(SyntaxKind::of(input.syntax))
        .iter()
        .find_map(|rule| (rule.check)(input).map(|noise| (noise, rule.name)))
        .unwrap_or((false, "default"))
}

/// True if the expansion is too trivial to offer as a completion
pub fn is_noise(input: &NoiseInput<'_>) -> bool {
    explain(input).0
}

/// Rules applied to a syntax family, in evaluation order
pub fn rule_set(kind: SyntaxKind) -> &'static [NoiseRule] {
    match kind {
        SyntaxKind::Stylesheet => STYLESHEET_NOISE_RULES,
        SyntaxKind::Markup => MARKUP_NOISE_RULES,
    }
}
