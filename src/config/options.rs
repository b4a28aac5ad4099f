//! Expansion options handed to the engine.
//!
//! Every call builds a fresh [`ExpandOptions`] from the syntax, the typed
//! filters, the user settings and the installed customization snapshot. All
//! output keys are resolved up front as "user value, else default".

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;

use super::EmmetConfig;
use super::profile::resolve_profile;
use crate::customizations::Customizations;
use crate::filters::Filter;
use crate::syntax::{SyntaxKind, default_closing_style, is_stylesheet};

/// Upper bound on `*N` repetition the engine may honour
pub const MAX_REPEAT: usize = 1000;

/// Fallback for `stylesheet.fuzzySearchMinScore`
pub const DEFAULT_FUZZY_SEARCH_MIN_SCORE: f64 = 0.3;

const DEFAULT_UNIT_ALIASES: &[(&str, &str)] = &[("e", "em"), ("p", "%"), ("x", "ex"), ("r", "rem")];

/// Renders the tab-stop field at `index` with an optional placeholder
pub type FieldFormatter = fn(usize, &str) -> String;

/// Default field formatter: `${1}` or `${1:placeholder}`
pub fn tab_stop_field(index: usize, placeholder: &str) -> String {
    if placeholder.is_empty() {
        format!("${{{index}}}")
    } else {
        format!("${{{index}:{placeholder}}}")
    }
}

/// Dotted-key output options plus the tab-stop field formatter
#[derive(Clone)]
pub struct OutputOptions {
    values: IndexMap<String, Value>,
    field: FieldFormatter,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            values: IndexMap::new(),
            field: tab_stop_field,
        }
    }
}

impl fmt::Debug for OutputOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputOptions").field("values", &self.values).finish_non_exhaustive()
    }
}

impl OutputOptions {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render a tab-stop field with the configured formatter
    pub fn field(&self, index: usize, placeholder: &str) -> String {
        (self.field)(index, placeholder)
    }

    pub fn with_field(mut self, field: FieldFormatter) -> Self {
        self.field = field;
        self
    }
}

/// Everything the engine needs to expand one abbreviation
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    pub kind: SyntaxKind,
    pub syntax: String,
    pub options: OutputOptions,
    pub variables: IndexMap<String, String>,
    /// Custom snippets for the syntax, `None` when none are installed
    pub snippets: Option<IndexMap<String, String>>,
    pub max_repeat: usize,
}

impl ExpandOptions {
    /// Bare options for `syntax` with every output key at its default
    pub fn for_syntax(syntax: &str) -> Self {
        build_expand_options(syntax, &EmmetConfig::default(), None, &Customizations::default())
    }
}

/// Resolves `preferences[key]` against a default
struct Preferences<'a>(&'a Map<String, Value>);

impl Preferences<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    fn or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).cloned().unwrap_or_else(|| default.into())
    }
}

fn first_of(candidates: &[Option<&Value>], default: impl Into<Value>) -> Value {
    candidates
        .iter()
        .flatten()
        .find(|v| !v.is_null())
        .map(|v| (*v).clone())
        .unwrap_or_else(|| default.into())
}

fn string_list(items: &[&str]) -> Value {
    Value::from(items.iter().map(|s| Value::from(*s)).collect::<Vec<_>>())
}

/// Parse `"e:em, p:%"` (or an object) and merge it over the default aliases
fn unit_aliases(preference: Option<&Value>) -> Value {
    let mut aliases: Map<String, Value> = DEFAULT_UNIT_ALIASES
        .iter()
        .map(|(alias, unit)| (alias.to_string(), Value::from(*unit)))
        .collect();

    match preference {
        Some(Value::String(text)) => {
            for pair in text.split(',') {
                if let Some((alias, unit)) = pair.split_once(':') {
                    let alias = alias.trim();
                    if !alias.is_empty() {
                        aliases.insert(alias.to_string(), Value::from(unit.trim()));
                    }
                }
            }
        }
        Some(Value::Object(entries)) => {
            for (alias, unit) in entries {
                aliases.insert(alias.clone(), unit.clone());
            }
        }
        _ => {}
    }

    Value::Object(aliases)
}

fn fuzzy_search_min_score(preference: Option<&Value>) -> f64 {
    preference
        .and_then(Value::as_f64)
        .filter(|score| score.is_finite())
        .map_or(DEFAULT_FUZZY_SEARCH_MIN_SCORE, |score| score.clamp(0.0, 1.0))
}

fn default_between(syntax: &str) -> &'static str {
    if syntax == "stylus" { " " } else { ": " }
}

fn default_after(syntax: &str) -> &'static str {
    if matches!(syntax, "sass" | "stylus") { "" } else { ";" }
}

/// Filter codes listed in a profile: `"bem, c"`
fn profile_filters(profile: &Map<String, Value>) -> Vec<Filter> {
    profile
        .get("filters")
        .and_then(Value::as_str)
        .map(|codes| codes.split(',').filter_map(|code| Filter::from_code(code.trim())).collect())
        .unwrap_or_default()
}

/// Build the options used to expand an abbreviation in `syntax`.
///
/// `filter` is the comma-joined list of typed filter codes (`"bem,c"`).
pub fn build_expand_options(
    syntax: &str,
    config: &EmmetConfig,
    filter: Option<&str>,
    customizations: &Customizations,
) -> ExpandOptions {
    let prefs = Preferences(&config.preferences);
    let profile = resolve_profile(syntax, &config.syntax_profiles, &customizations.profiles);

    let mut filters: Vec<Filter> = filter
        .map(|codes| codes.split(',').filter_map(|code| Filter::from_code(code.trim())).collect())
        .unwrap_or_default();
    filters.extend(profile_filters(&profile));

    // Markup documents still carry inline styles; use the css separators there
    let css_syntax = if is_stylesheet(syntax) { syntax } else { "css" };

    let mut options = OutputOptions::default();

    options.set("output.formatSkip", prefs.or("format.noIndentTags", string_list(&["html"])));
    options.set(
        "output.formatForce",
        prefs.or("format.forceIndentationForTags", string_list(&["body"])),
    );
    options.set(
        "output.inlineBreak",
        first_of(&[prefs.get("output.inlineBreak"), profile.get("inlineBreak")], 3),
    );
    options.set(
        "output.compactBoolean",
        first_of(
            &[profile.get("compactBooleanAttributes"), prefs.get("profile.allowCompactBoolean")],
            false,
        ),
    );
    options.set("output.reverseAttributes", prefs.or("output.reverseAttributes", false));
    options.set(
        "output.selfClosingStyle",
        first_of(
            &[profile.get("selfClosingStyle"), prefs.get("output.selfClosingStyle")],
            default_closing_style(syntax),
        ),
    );
    options.set("output.tagCase", first_of(&[profile.get("tagCase")], ""));
    options.set("output.attributeCase", first_of(&[profile.get("attributeCase")], ""));
    options.set("output.attributeQuotes", first_of(&[profile.get("attributeQuotes")], "double"));
    options.set("output.format", first_of(&[profile.get("format")], true));

    options.set("comment.enabled", filters.contains(&Filter::Comment));
    options.set("comment.trigger", prefs.or("filter.commentTrigger", string_list(&["id", "class"])));
    options.set("comment.before", prefs.or("filter.commentBefore", ""));
    options.set("comment.after", prefs.or("filter.commentAfter", "\n<!-- /[#ID][.CLASS] -->"));

    options.set("bem.enabled", filters.contains(&Filter::Bem));
    options.set("bem.element", prefs.or("bem.elementSeparator", "__"));
    options.set("bem.modifier", prefs.or("bem.modifierSeparator", "_"));

    options.set("jsx.enabled", syntax == "jsx");

    options.set("stylesheet.shortHex", prefs.or("css.color.short", true));
    options.set(
        "stylesheet.between",
        prefs.or(&format!("{css_syntax}.valueSeparator"), default_between(css_syntax)),
    );
    options.set(
        "stylesheet.after",
        prefs.or(&format!("{css_syntax}.propertyEnd"), default_after(css_syntax)),
    );
    options.set("stylesheet.intUnit", prefs.or("css.intUnit", "px"));
    options.set("stylesheet.floatUnit", prefs.or("css.floatUnit", "em"));
    options.set("stylesheet.unitAliases", unit_aliases(prefs.get("css.unitAliases")));
    options.set(
        "stylesheet.fuzzySearchMinScore",
        fuzzy_search_min_score(prefs.get("css.fuzzySearchMinScore")),
    );
    options.set(
        "stylesheet.keywords",
        prefs.or("css.keywords", string_list(&["auto", "inherit", "unset", "none"])),
    );
    options.set(
        "stylesheet.unitless",
        prefs.or(
            "css.unitless",
            string_list(&[
                "z-index",
                "line-height",
                "opacity",
                "font-weight",
                "zoom",
                "order",
                "flex-grow",
                "flex-shrink",
            ]),
        ),
    );

    let mut variables = customizations.variables.clone();
    variables.extend(config.variables.iter().map(|(k, v)| (k.clone(), v.clone())));

    ExpandOptions {
        kind: SyntaxKind::of(syntax),
        syntax: syntax.to_string(),
        options,
        variables,
        snippets: customizations.snippets_for(syntax).cloned(),
        max_repeat: MAX_REPEAT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config(settings: Value) -> EmmetConfig {
        serde_json::from_value(settings).unwrap()
    }

    fn build(syntax: &str, settings: Value, filter: Option<&str>) -> ExpandOptions {
        build_expand_options(syntax, &config(settings), filter, &Customizations::default())
    }

    #[test]
    fn test_defaults_are_fully_resolved() {
        let expand = ExpandOptions::for_syntax("html");
        let options = &expand.options;

        assert_eq!(expand.kind, SyntaxKind::Markup);
        assert_eq!(expand.max_repeat, MAX_REPEAT);
        assert_eq!(options.get_str("output.selfClosingStyle"), Some("html"));
        assert_eq!(options.get_str("stylesheet.between"), Some(": "));
        assert_eq!(options.get_str("stylesheet.after"), Some(";"));
        assert_eq!(options.get_bool("output.format"), Some(true));
        assert_eq!(options.get_bool("bem.enabled"), Some(false));
        assert_eq!(options.get("stylesheet.fuzzySearchMinScore"), Some(&json!(0.3)));
        assert!(options.iter().all(|(_, value)| !value.is_null()));
        assert!(expand.snippets.is_none());
    }

    #[test]
    fn test_property_end_preference() {
        let expand = build("css", json!({"preferences": {"css.propertyEnd": ";;"}}), None);
        assert_eq!(expand.options.get_str("stylesheet.after"), Some(";;"));
        assert_eq!(expand.kind, SyntaxKind::Stylesheet);

        // Markup uses the css separators for inline styles
        let expand = build("html", json!({"preferences": {"css.valueSeparator": ":"}}), None);
        assert_eq!(expand.options.get_str("stylesheet.between"), Some(":"));

        let expand = build("scss", json!({"preferences": {"css.propertyEnd": ";;"}}), None);
        assert_eq!(expand.options.get_str("stylesheet.after"), Some(";"));
    }

    #[test]
    fn test_syntax_specific_separators() {
        assert_eq!(ExpandOptions::for_syntax("sass").options.get_str("stylesheet.after"), Some(""));
        let stylus = ExpandOptions::for_syntax("stylus");
        assert_eq!(stylus.options.get_str("stylesheet.between"), Some(" "));
        assert_eq!(stylus.options.get_str("stylesheet.after"), Some(""));
    }

    #[test]
    fn test_closing_style_by_syntax() {
        let style = |syntax: &str| {
            ExpandOptions::for_syntax(syntax)
                .options
                .get_str("output.selfClosingStyle")
                .map(str::to_string)
        };
        assert_eq!(style("jsx").as_deref(), Some("xhtml"));
        assert_eq!(style("xml").as_deref(), Some("xml"));
        assert_eq!(style("xsl").as_deref(), Some("xml"));
        assert_eq!(style("pug").as_deref(), Some("html"));
    }

    #[test]
    fn test_profile_overrides_preferences() {
        let expand = build(
            "html",
            json!({
                "syntaxProfiles": {"html": {"self_closing_tag": true, "tag_nl": false, "tag_case": "upper"}},
                "preferences": {"output.selfClosingStyle": "xhtml"}
            }),
            None,
        );
        assert_eq!(expand.options.get_str("output.selfClosingStyle"), Some("xml"));
        assert_eq!(expand.options.get_bool("output.format"), Some(false));
        assert_eq!(expand.options.get_str("output.tagCase"), Some("upper"));
    }

    #[test]
    fn test_filters_from_suffix_and_profile() {
        let expand = build("html", json!({}), Some("bem,c"));
        assert_eq!(expand.options.get_bool("bem.enabled"), Some(true));
        assert_eq!(expand.options.get_bool("comment.enabled"), Some(true));

        let expand = build("html", json!({"syntaxProfiles": {"html": {"filters": "html, c"}}}), None);
        assert_eq!(expand.options.get_bool("bem.enabled"), Some(false));
        assert_eq!(expand.options.get_bool("comment.enabled"), Some(true));
    }

    #[test]
    fn test_unit_aliases() {
        let expand = build("css", json!({"preferences": {"css.unitAliases": "e:em, p:pt, v: vh"}}), None);
        assert_eq!(
            expand.options.get("stylesheet.unitAliases"),
            Some(&json!({"e": "em", "p": "pt", "x": "ex", "r": "rem", "v": "vh"}))
        );
    }

    #[test]
    fn test_fuzzy_score_is_clamped() {
        let score = |value: Value| {
            build("css", json!({"preferences": {"css.fuzzySearchMinScore": value}}), None)
                .options
                .get("stylesheet.fuzzySearchMinScore")
                .cloned()
        };
        assert_eq!(score(json!(0.5)), Some(json!(0.5)));
        assert_eq!(score(json!(4)), Some(json!(1.0)));
        assert_eq!(score(json!(-1)), Some(json!(0.0)));
        assert_eq!(score(json!("high")), Some(json!(0.3)));
    }

    #[test]
    fn test_field_formatter() {
        let options = OutputOptions::default();
        assert_eq!(options.field(1, ""), "${1}");
        assert_eq!(options.field(2, "href"), "${2:href}");

        let custom = OutputOptions::default().with_field(|index, _| format!("[{index}]"));
        assert_eq!(custom.field(3, "x"), "[3]");
    }

    #[test]
    fn test_settings_variables_overlay_file_variables() {
        let mut customizations = Customizations::default();
        customizations.variables.insert("lang".to_string(), "fr".to_string());
        customizations.variables.insert("charset".to_string(), "latin1".to_string());

        let expand = build_expand_options(
            "html",
            &config(json!({"variables": {"lang": "de"}})),
            None,
            &customizations,
        );
        assert_eq!(expand.variables.get("lang").map(String::as_str), Some("de"));
        assert_eq!(expand.variables.get("charset").map(String::as_str), Some("latin1"));
    }
}
