//! Translation of legacy syntax profiles.
//!
//! Profiles used to be written with snake_case keys and loosely typed values
//! (`{"tag_nl": "decide", "self_closing_tag": true}`). The engine expects the
//! camelCase option model instead.

use serde_json::{Map, Value};

/// Map a legacy profile key onto its current name
fn legacy_to_current_key(key: &str) -> Option<&'static str> {
    match key {
        "tag_case" => Some("tagCase"),
        "attr_case" => Some("attributeCase"),
        "attr_quotes" => Some("attributeQuotes"),
        "tag_nl" => Some("format"),
        "inline_break" => Some("inlineBreak"),
        "self_closing_tag" => Some("selfClosingStyle"),
        "compact_bool" => Some("compactBooleanAttributes"),
        _ => None,
    }
}

/// Only `lower` and `upper` are meaningful; anything else keeps the source case
fn letter_case(value: &Value) -> Value {
    match value.as_str() {
        Some(case @ ("lower" | "upper")) => Value::from(case),
        _ => Value::from(""),
    }
}

fn translate_value(key: &str, value: &Value) -> Value {
    match key {
        "tag_case" | "attr_case" => letter_case(value),
        // `"decide"` and other legacy strings meant "format when appropriate"
        "tag_nl" => Value::Bool(value.as_bool().unwrap_or(true)),
        "self_closing_tag" => match value {
            Value::Bool(true) => Value::from("xml"),
            Value::Bool(false) => Value::from("html"),
            other => other.clone(),
        },
        _ => value.clone(),
    }
}

/// Normalize one legacy profile.
///
/// The string shorthand `"xhtml"` selects XHTML self-closing tags; other
/// strings and non-object values yield an empty profile. Unknown keys pass
/// through unchanged.
///
/// # Examples
/// ```
/// use emmet_assist::config::translate_profile;
/// use serde_json::json;
///
/// assert_eq!(translate_profile(&json!({"tag_nl": "decide"})), *json!({"format": true}).as_object().unwrap());
/// assert_eq!(translate_profile(&json!("xhtml")), *json!({"selfClosingStyle": "xhtml"}).as_object().unwrap());
/// ```
pub fn translate_profile(profile: &Value) -> Map<String, Value> {
    let mut translated = Map::new();
    match profile {
        Value::String(shorthand) if shorthand == "xhtml" => {
            translated.insert("selfClosingStyle".to_string(), Value::from("xhtml"));
        }
        Value::Object(entries) => {
            for (key, value) in entries {
                match legacy_to_current_key(key) {
                    Some(current) => {
                        translated.insert(current.to_string(), translate_value(key, value));
                    }
                    None => {
                        translated.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        other => {
            log::debug!("Ignoring unsupported profile shape: {other}");
        }
    }
    translated
}

/// Resolve the translated profile for `syntax`.
///
/// A profile from settings replaces the one loaded from the extensions
/// directory for the same syntax.
pub fn resolve_profile(
    syntax: &str,
    settings_profiles: &Map<String, Value>,
    file_profiles: &Map<String, Value>,
) -> Map<String, Value> {
    settings_profiles
        .get(syntax)
        .or_else(|| file_profiles.get(syntax))
        .map(translate_profile)
        .unwrap_or_default()
}
