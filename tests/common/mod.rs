//! Shared fixtures for integration tests
#![allow(dead_code)]

use emmet_assist::config::ExpandOptions;
use emmet_assist::syntax::SyntaxKind;
use emmet_assist::{AbbreviationEngine, ExpandError};
use std::fs;
use std::path::Path;

/// Built-in markup snippets of the fixture engine
const MARKUP_SNIPPETS: &[(&str, &str)] = &[
    ("a:link", "<a href=\"http://${1}\">${2}</a>"),
    ("a:mail", "<a href=\"mailto:${1}\">${2}</a>"),
    ("link:css", "<link rel=\"stylesheet\" href=\"${1:style}.css\">"),
    ("input:text", "<input type=\"text\" name=\"${1}\" id=\"${2}\">"),
];

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

const PROPERTIES: &[(&str, &str)] = &[
    ("m", "margin"),
    ("p", "padding"),
    ("w", "width"),
    ("h", "height"),
    ("c", "color"),
    ("d", "display"),
    ("pos", "position"),
    ("bd", "border"),
];

/// Small deterministic engine covering the abbreviations the tests use.
///
/// Markup: `>` chains of tag names with an optional `*N` repeat. Unknown
/// names are echoed as `<name>${1}</name>`. Stylesheet: single-letter
/// properties with an optional number, unknown names echoed as
/// `name: ${1};`.
pub struct FixtureEngine;

impl AbbreviationEngine for FixtureEngine {
    fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String, ExpandError> {
        if let Some(custom) = options.snippets.as_ref().and_then(|s| s.get(abbreviation)) {
            let text = custom
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
                .unwrap_or(custom);
            return Ok(text.to_string());
        }

        match options.kind {
            SyntaxKind::Markup => expand_markup(abbreviation, options),
            SyntaxKind::Stylesheet => expand_stylesheet(abbreviation, options),
        }
    }

    fn snippet_keys(&self, syntax: &str) -> Vec<String> {
        if SyntaxKind::of(syntax) == SyntaxKind::Markup {
            MARKUP_SNIPPETS.iter().map(|(key, _)| key.to_string()).collect()
        } else {
            Vec::new()
        }
    }
}

fn is_name(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':')
}

fn expand_markup(abbreviation: &str, options: &ExpandOptions) -> Result<String, ExpandError> {
    if let Some((_, snippet)) = MARKUP_SNIPPETS.iter().find(|(key, _)| *key == abbreviation) {
        return Ok(snippet.to_string());
    }

    let mut nodes = Vec::new();
    for part in abbreviation.split('>') {
        let (name, count) = match part.split_once('*') {
            Some((name, count)) => {
                let count: usize = count
                    .parse()
                    .map_err(|_| ExpandError::Unparseable(abbreviation.to_string()))?;
                (name, count.min(options.max_repeat))
            }
            None => (part, 1),
        };
        if !is_name(name) {
            return Err(ExpandError::Unparseable(abbreviation.to_string()));
        }
        nodes.push((name, count));
    }

    let mut field = 0;
    Ok(render(&nodes, 0, &mut field, options))
}

fn render(nodes: &[(&str, usize)], depth: usize, field: &mut usize, options: &ExpandOptions) -> String {
    let Some(((name, count), rest)) = nodes.split_first() else {
        return String::new();
    };
    let indent = "\t".repeat(depth);

    (0..*count)
        .map(|_| {
            if VOID_TAGS.contains(name) {
                return format!("{indent}<{name}>");
            }
            if rest.is_empty() {
                *field += 1;
                let body = options.options.field(*field, "");
                format!("{indent}<{name}>{body}</{name}>")
            } else {
                let inner = render(rest, depth + 1, field, options);
                format!("{indent}<{name}>\n{inner}\n{indent}</{name}>")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn expand_stylesheet(abbreviation: &str, options: &ExpandOptions) -> Result<String, ExpandError> {
    if abbreviation.starts_with('!') {
        return Ok("!important".to_string());
    }

    let between = options.options.get_str("stylesheet.between").unwrap_or(": ");
    let after = options.options.get_str("stylesheet.after").unwrap_or(";");

    let split = abbreviation
        .find(|c: char| c.is_ascii_digit() || c == '-')
        .unwrap_or(abbreviation.len());
    let (name, number) = abbreviation.split_at(split);
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ExpandError::Unparseable(abbreviation.to_string()));
    }

    let property = PROPERTIES
        .iter()
        .find(|(short, _)| *short == name)
        .map_or(name, |(_, long)| long);

    let value = if number.is_empty() {
        options.options.field(1, "")
    } else {
        let number: i64 = number
            .parse()
            .map_err(|_| ExpandError::Unparseable(abbreviation.to_string()))?;
        let unit = options.options.get_str("stylesheet.intUnit").unwrap_or("px");
        if number == 0 { "0".to_string() } else { format!("{number}{unit}") }
    };

    Ok(format!("{property}{between}{value}{after}"))
}

/// Write an extensions directory with `snippets.json` and, optionally, `syntaxProfiles.json`
pub fn write_extensions(dir: &Path, snippets: &str, profiles: Option<&str>) {
    fs::write(dir.join("snippets.json"), snippets).unwrap();
    if let Some(profiles) = profiles {
        fs::write(dir.join("syntaxProfiles.json"), profiles).unwrap();
    }
}
