//! Abbreviation validation
//!
//! Decides whether the text before the cursor is plausibly an abbreviation
//! rather than prose or code. Rules run in order; the first rule that reaches
//! a verdict wins.

use regex::Regex;
use std::sync::LazyLock;

use crate::data::is_common_tag;
use crate::syntax::SyntaxKind;

/// `#` followed by one to six hex digits
static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[\da-fA-F]{1,6}$").unwrap());

/// A property abbreviation carrying a hex color value, e.g. `c#f00`, `bd1-s#000`
static PROPERTY_HEX_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[a-zA-Z][\w.:+-]*#[\da-fA-F]{1,6}$").unwrap());

/// Letters, `!`, `@`, `#`, optionally behind a vendor prefix dash
static STYLESHEET_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[a-zA-Z!@#]").unwrap());

static MARKUP_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z!(\[#.]").unwrap());

static MARKUP_HAS_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z.]").unwrap());

/// Parentheses inside a text node: `p{(hi)}`, `p{(hi)}>a`
static PARENS_IN_TEXT_NODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*[()]+[^{}]*\}(?:[>+*^]|$)").unwrap());

/// Group followed by an operator: `(ul>li)*2`
static GROUP_BEFORE_OPERATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*\)[>+*^]").unwrap());

/// Group following an operator: `div>(p+p)`
static GROUP_AFTER_OPERATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[>+*^]\(.*\)").unwrap());

/// Parentheses inside a quoted attribute value: `span[onclick="alert()"]`
static PARENS_IN_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\[[^\[\]()]+=".*"\]"#).unwrap());

/// Outcome of a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
    /// The rule has no opinion; evaluate the next one
    Next,
}

/// A named validation rule
#[derive(Clone, Copy)]
pub struct ValidationRule {
    pub name: &'static str,
    pub check: fn(&str) -> Verdict,
}

impl std::fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationRule").field("name", &self.name).finish()
    }
}

/// Final decision together with the rule that made it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub valid: bool,
    pub rule: &'static str,
}

fn invalid_if(condition: bool) -> Verdict {
    if condition { Verdict::Invalid } else { Verdict::Next }
}

fn valid_or_invalid(condition: bool) -> Verdict {
    if condition { Verdict::Valid } else { Verdict::Invalid }
}

fn stylesheet_trailing_colon(abbr: &str) -> Verdict {
    invalid_if(abbr.ends_with(':'))
}

fn stylesheet_hex_color(abbr: &str) -> Verdict {
    if abbr.starts_with('#') {
        valid_or_invalid(HEX_COLOR.is_match(abbr))
    } else {
        Verdict::Next
    }
}

// Single letters like `b#000` or `a#fff` are property aliases, not selectors
fn stylesheet_tag_with_hash(abbr: &str) -> Verdict {
    match abbr.find('#') {
        Some(idx) => {
            let tag = &abbr[..idx];
            invalid_if(tag.len() > 1 && is_common_tag(tag))
        }
        None => Verdict::Next,
    }
}

fn stylesheet_property_hex(abbr: &str) -> Verdict {
    if abbr.contains('#') {
        valid_or_invalid(PROPERTY_HEX_VALUE.is_match(abbr))
    } else {
        Verdict::Next
    }
}

fn stylesheet_start(abbr: &str) -> Verdict {
    valid_or_invalid(STYLESHEET_START.is_match(abbr))
}

fn markup_bang(abbr: &str) -> Verdict {
    if abbr.contains('!') {
        valid_or_invalid(abbr.chars().all(|c| c == '!'))
    } else {
        Verdict::Next
    }
}

fn markup_grouping(abbr: &str) -> Verdict {
    if !abbr.contains(['(', ')']) {
        return Verdict::Next;
    }
    let allowed = PARENS_IN_TEXT_NODE.is_match(abbr)
        || GROUP_BEFORE_OPERATOR.is_match(abbr)
        || PARENS_IN_ATTRIBUTE.is_match(abbr)
        || GROUP_AFTER_OPERATOR.is_match(abbr);
    invalid_if(!allowed)
}

fn markup_start(abbr: &str) -> Verdict {
    invalid_if(!MARKUP_START.is_match(abbr))
}

fn markup_has_word(abbr: &str) -> Verdict {
    valid_or_invalid(MARKUP_HAS_WORD.is_match(abbr))
}

/// Stylesheet rules in evaluation order
pub static STYLESHEET_RULES: &[ValidationRule] = &[
    ValidationRule {
        name: "trailing-colon",
        check: stylesheet_trailing_colon,
    },
    ValidationRule {
        name: "hex-color",
        check: stylesheet_hex_color,
    },
    ValidationRule {
        name: "tag-with-hash",
        check: stylesheet_tag_with_hash,
    },
    ValidationRule {
        name: "property-hex-value",
        check: stylesheet_property_hex,
    },
    ValidationRule {
        name: "stylesheet-start",
        check: stylesheet_start,
    },
];

/// Markup rules in evaluation order
pub static MARKUP_RULES: &[ValidationRule] = &[
    ValidationRule {
        name: "doctype-bang",
        check: markup_bang,
    },
    ValidationRule {
        name: "grouping",
        check: markup_grouping,
    },
    ValidationRule {
        name: "markup-start",
        check: markup_start,
    },
    ValidationRule {
        name: "has-word",
        check: markup_has_word,
    },
];

/// Run the rules for `kind` and report which one decided
pub fn explain(kind: SyntaxKind, abbreviation: &str) -> Decision {
    if abbreviation.is_empty() {
        return Decision {
            valid: false,
            rule: "non-empty",
        };
    }

    let rules = match kind {
        SyntaxKind::Stylesheet => STYLESHEET_RULES,
        SyntaxKind::Markup => MARKUP_RULES,
    };

    for rule in rules {
        match (rule.check)(abbreviation) {
            Verdict::Valid => return Decision { valid: true, rule: rule.name },
            Verdict::Invalid => return Decision { valid: false, rule: rule.name },
            Verdict::Next => {}
        }
    }

    Decision {
        valid: true,
        rule: "default",
    }
}

/// True if `abbreviation` is a plausible abbreviation for the syntax family
pub fn is_valid(kind: SyntaxKind, abbreviation: &str) -> bool {
    explain(kind, abbreviation).valid
}

/// True if `abbreviation` is a plausible abbreviation in `syntax`
///
/// # Examples
/// ```
/// use emmet_assist::validate::is_abbreviation_valid;
///
/// assert!(is_abbreviation_valid("html", "ul>li*3"));
/// assert!(!is_abbreviation_valid("html", "(just some prose)"));
/// assert!(!is_abbreviation_valid("css", "color:"));
/// ```
pub fn is_abbreviation_valid(syntax: &str, abbreviation: &str) -> bool {
    is_valid(SyntaxKind::of(syntax), abbreviation)
}
