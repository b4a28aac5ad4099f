//! User-facing Emmet settings and their translation into engine options.
//! Settings deserialize straight from editor JSON; legacy profile shapes are
//! normalized by [`profile`] and everything is resolved into [`ExpandOptions`]
//! by [`options::build_expand_options`].

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::filters::DEFAULT_MAX_FILTERS;

pub mod options;
pub use options::*;

pub mod profile;
pub use profile::*;

/// When the expanded abbreviation is offered as a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShowExpandedAbbreviation {
    Always,
    Never,
    #[default]
    InMarkupAndStylesheetFilesOnly,
}

/// Emmet settings as an editor sends them (`emmet.*`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmmetConfig {
    pub show_expanded_abbreviation: ShowExpandedAbbreviation,
    /// Offer snippet keys and common tags next to the expansion
    pub show_abbreviation_suggestions: bool,
    /// Report every item with the snippet kind
    pub show_suggestions_as_snippets: bool,
    /// Legacy per-syntax profiles, e.g. `{"html": {"tag_nl": true}}`
    pub syntax_profiles: Map<String, Value>,
    /// Dotted preference keys, e.g. `{"css.propertyEnd": ";"}`
    pub preferences: Map<String, Value>,
    pub variables: IndexMap<String, String>,
    pub exclude_languages: Vec<String>,
    /// Directories searched for `snippets.json` and `syntaxProfiles.json`
    #[serde(deserialize_with = "string_or_list")]
    pub extensions_path: Vec<String>,
}

impl Default for EmmetConfig {
    fn default() -> Self {
        Self {
            show_expanded_abbreviation: ShowExpandedAbbreviation::default(),
            show_abbreviation_suggestions: true,
            show_suggestions_as_snippets: false,
            syntax_profiles: Map::new(),
            preferences: Map::new(),
            variables: IndexMap::new(),
            exclude_languages: vec!["markdown".to_string()],
            extensions_path: Vec::new(),
        }
    }
}

impl EmmetConfig {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up a preference by its dotted key
    pub fn preference(&self, key: &str) -> Option<&Value> {
        self.preferences.get(key)
    }
}

/// Older settings store `extensionsPath` as a single string
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::One(path) if path.trim().is_empty() => Vec::new(),
        StringOrList::One(path) => vec![path],
        StringOrList::Many(paths) => paths,
        StringOrList::Nothing(()) => Vec::new(),
    })
}

/// Heuristic thresholds of the completion assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning {
    /// Stylesheet abbreviations longer than this that prefix a real CSS
    /// property are left to the editor's own CSS completion
    pub css_property_prefix_threshold: usize,
    /// Upper bound on `|filter` suffixes peeled off an abbreviation
    pub max_filters: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            css_property_prefix_threshold: 4,
            max_filters: DEFAULT_MAX_FILTERS,
        }
    }
}
