//! Syntax identification for Emmet
//!
//! Maps editor language identifiers onto Emmet syntax names and classifies
//! them as markup or stylesheet dialects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Markup syntaxes Emmet knows how to expand.
pub const MARKUP_SYNTAXES: &[&str] = &["html", "xml", "xsl", "jsx", "js", "pug", "slim", "haml"];

/// Stylesheet syntaxes Emmet knows how to expand.
pub const STYLESHEET_SYNTAXES: &[&str] = &["css", "sass", "scss", "less", "sss", "stylus"];

/// Stylesheet dialects that get stylesheet treatment during completion
const STYLESHEET_COMPLETION_SYNTAXES: &[&str] = &["css", "scss", "sass", "less", "stylus"];

/// Broad family of an Emmet syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxKind {
    Markup,
    Stylesheet,
}

impl SyntaxKind {
    pub fn of(syntax: &str) -> Self {
        if is_stylesheet(syntax) {
            SyntaxKind::Stylesheet
        } else {
            SyntaxKind::Markup
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxKind::Markup => write!(f, "markup"),
            SyntaxKind::Stylesheet => write!(f, "stylesheet"),
        }
    }
}

/// Returns true for syntaxes whose abbreviations expand to CSS declarations
pub fn is_stylesheet(syntax: &str) -> bool {
    STYLESHEET_COMPLETION_SYNTAXES.contains(&syntax)
}

/// The syntax whose snippets a dialect inherits (`css` for stylesheets, `html` otherwise)
pub fn default_syntax(syntax: &str) -> &'static str {
    if is_stylesheet(syntax) { "css" } else { "html" }
}

/// Self-closing tag style a syntax uses unless a profile says otherwise
pub fn default_closing_style(syntax: &str) -> &'static str {
    match syntax {
        "xhtml" | "jsx" => "xhtml",
        "xml" | "xsl" => "xml",
        _ => "html",
    }
}

/// Map an editor language id onto an Emmet syntax name.
///
/// Returns `None` when the language is excluded or Emmet has no syntax for it.
///
/// # Examples
/// ```
/// use emmet_assist::syntax::get_emmet_mode;
///
/// assert_eq!(get_emmet_mode("typescriptreact", &[]), Some("jsx".to_string()));
/// assert_eq!(get_emmet_mode("jade", &[]), Some("pug".to_string()));
/// assert_eq!(get_emmet_mode("html", &["html".to_string()]), None);
/// ```
pub fn get_emmet_mode(language: &str, excluded_languages: &[String]) -> Option<String> {
    if language.is_empty() || excluded_languages.iter().any(|l| l == language) {
        return None;
    }

    match language {
        "typescriptreact" | "javascriptreact" | "jsx-tags" => return Some("jsx".to_string()),
        "sass-indented" => return Some("sass".to_string()),
        "jade" | "pug" => return Some("pug".to_string()),
        _ => {}
    }

    if MARKUP_SYNTAXES.contains(&language) || STYLESHEET_SYNTAXES.contains(&language) {
        return Some(language.to_string());
    }

    None
}
