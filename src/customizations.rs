//! User customizations loaded from the `emmet.extensionsPath` directory.
//!
//! The directory holds `snippets.json` (custom snippets per syntax plus
//! `variables`) and optionally `syntaxProfiles.json`. Loaded state lives in an
//! immutable [`Customizations`] snapshot; [`CustomizationStore`] swaps whole
//! snapshots so completion requests never see a half-applied reload.

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::syntax::{default_syntax, is_stylesheet};

pub const SNIPPETS_FILE: &str = "snippets.json";
pub const PROFILES_FILE: &str = "syntaxProfiles.json";

#[derive(Debug, Error)]
pub enum CustomizationError {
    #[error("The directory {path} doesn't exist. Update the emmet.extensionsPath setting")]
    NotFound { path: String },

    #[error("The path {path} is not a usable directory. Update the emmet.extensionsPath setting")]
    InvalidPath { path: String },

    #[error("Error while parsing {path}: {message}. Fix the file or update the emmet.extensionsPath setting")]
    Parse { path: String, message: String },

    #[error("Failed to read {path}: {source}. Check the emmet.extensionsPath setting")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One immutable set of loaded customizations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Customizations {
    /// Increases with every install, `0` for the initial empty state
    pub version: u64,
    /// Directory the snapshot was loaded from
    pub source: Option<PathBuf>,
    pub variables: IndexMap<String, String>,
    /// Custom snippets per syntax, base-syntax snippets already merged in
    pub snippets: HashMap<String, IndexMap<String, String>>,
    /// Raw legacy profiles per syntax, translated on use
    pub profiles: Map<String, Value>,
    stylesheet_keys: HashMap<String, Vec<String>>,
}

impl Customizations {
    /// Build a snapshot from parsed `snippets.json` and `syntaxProfiles.json` documents
    pub fn from_documents(snippets: &Value, profiles: Option<&Value>) -> Result<Self, String> {
        let Value::Object(root) = snippets else {
            return Err("expected an object keyed by syntax name".to_string());
        };

        let variables = root
            .get("variables")
            .and_then(Value::as_object)
            .map(|vars| string_entries(vars, "variables"))
            .unwrap_or_default();

        let per_syntax: HashMap<&str, IndexMap<String, String>> = root
            .iter()
            .filter_map(|(syntax, entry)| {
                let snippets = entry.get("snippets")?.as_object()?;
                Some((syntax.as_str(), string_entries(snippets, syntax)))
            })
            .collect();

        let mut merged = HashMap::with_capacity(per_syntax.len());
        for (&syntax, own) in &per_syntax {
            let base = default_syntax(syntax);
            let mut snippets = match per_syntax.get(base) {
                Some(base_snippets) if base != syntax => {
                    let mut combined = base_snippets.clone();
                    combined.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
                    combined
                }
                _ => own.clone(),
            };
            if !is_stylesheet(syntax) {
                normalize_markup_snippets(&mut snippets);
            }
            merged.insert(syntax.to_string(), snippets);
        }

        let stylesheet_keys = merged
            .iter()
            .filter(|(syntax, _)| is_stylesheet(syntax))
            .map(|(syntax, snippets)| (syntax.clone(), snippets.keys().cloned().collect()))
            .collect();

        let profiles = profiles.and_then(Value::as_object).cloned().unwrap_or_default();

        Ok(Self {
            version: 0,
            source: None,
            variables,
            snippets: merged,
            profiles,
            stylesheet_keys,
        })
    }

    /// Custom snippets for `syntax`, falling back to the base syntax (`css` or `html`)
    pub fn snippets_for(&self, syntax: &str) -> Option<&IndexMap<String, String>> {
        self.snippets.get(syntax).or_else(|| self.snippets.get(default_syntax(syntax)))
    }

    /// Custom snippet keys offered for a stylesheet syntax
    pub fn stylesheet_snippet_keys(&self, syntax: &str) -> &[String] {
        self.stylesheet_keys
            .get(syntax)
            .or_else(|| self.stylesheet_keys.get("css"))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Custom snippet keys for any syntax
    pub fn snippet_keys(&self, syntax: &str) -> Vec<String> {
        if is_stylesheet(syntax) {
            return self.stylesheet_snippet_keys(syntax).to_vec();
        }
        self.snippets_for(syntax)
            .map(|snippets| snippets.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.snippets.is_empty() && self.profiles.is_empty()
    }
}

fn string_entries(entries: &Map<String, Value>, section: &str) -> IndexMap<String, String> {
    entries
        .iter()
        .filter_map(|(key, value)| match value.as_str() {
            Some(text) => Some((key.clone(), text.to_string())),
            None => {
                log::debug!("Skipping non-string entry '{key}' in {section}");
                None
            }
        })
        .collect()
}

/// Markup snippets must be abbreviations; wrap legacy `<tag>` snippets in a text node
fn normalize_markup_snippets(snippets: &mut IndexMap<String, String>) {
    for value in snippets.values_mut() {
        if value.starts_with('<') && value.ends_with('>') {
            *value = format!("{{{value}}}");
        }
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> Option<PathBuf> {
    use etcetera::{BaseStrategy, choose_base_strategy};

    let rest = path.strip_prefix('~')?;
    if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\')) {
        return None;
    }
    let home = choose_base_strategy().ok()?.home_dir().to_path_buf();
    Some(home.join(rest.trim_start_matches(['/', '\\'])))
}

/// Candidate directories for one configured path
fn candidate_dirs(path: &str, workspace_folders: &[PathBuf]) -> Vec<PathBuf> {
    if let Some(home) = expand_home(path) {
        return vec![home];
    }
    let path = Path::new(path);
    if path.is_absolute() {
        vec![path.to_path_buf()]
    } else {
        workspace_folders.iter().map(|folder| folder.join(path)).collect()
    }
}

/// Pick the first configured path that resolves to an existing directory
async fn resolve_directory(paths: &[&str], workspace_folders: &[PathBuf]) -> Result<PathBuf, CustomizationError> {
    let mut not_a_directory: Option<PathBuf> = None;

    for path in paths {
        let candidates = candidate_dirs(path, workspace_folders);
        if candidates.is_empty() {
            log::debug!("Relative extensions path '{path}' needs an open workspace folder");
        }
        for candidate in candidates {
            match tokio::fs::metadata(&candidate).await {
                Ok(meta) if meta.is_dir() => return Ok(candidate),
                Ok(_) => not_a_directory = not_a_directory.or(Some(candidate)),
                Err(_) => {}
            }
        }
    }

    match not_a_directory {
        Some(file) => Err(CustomizationError::InvalidPath {
            path: file.display().to_string(),
        }),
        None => Err(CustomizationError::NotFound { path: paths.join(", ") }),
    }
}

/// Load the customizations stored in `dir`
pub async fn load_directory(dir: &Path) -> Result<Customizations, CustomizationError> {
    let snippets_path = dir.join(SNIPPETS_FILE);
    let snippets_text = tokio::fs::read_to_string(&snippets_path)
        .await
        .map_err(|source| CustomizationError::Io {
            path: snippets_path.display().to_string(),
            source,
        })?;
    let snippets: Value = serde_json::from_str(&snippets_text).map_err(|e| CustomizationError::Parse {
        path: snippets_path.display().to_string(),
        message: e.to_string(),
    })?;

    let profiles_path = dir.join(PROFILES_FILE);
    let profiles = match tokio::fs::read_to_string(&profiles_path).await {
        Ok(text) => match serde_json::from_str::<Value>(&text) {
            Ok(profiles) => Some(profiles),
            Err(e) => {
                log::debug!("Ignoring unparsable {}: {e}", profiles_path.display());
                None
            }
        },
        Err(_) => None,
    };

    let mut customizations =
        Customizations::from_documents(&snippets, profiles.as_ref()).map_err(|message| CustomizationError::Parse {
            path: snippets_path.display().to_string(),
            message,
        })?;
    customizations.source = Some(dir.to_path_buf());
    Ok(customizations)
}

/// Holder of the currently installed [`Customizations`] snapshot
#[derive(Debug)]
pub struct CustomizationStore {
    current: ArcSwap<Customizations>,
    next_version: AtomicU64,
}

impl Default for CustomizationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomizationStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Customizations::default()),
            next_version: AtomicU64::new(1),
        }
    }

    /// The installed snapshot; stays valid across later reloads
    pub fn snapshot(&self) -> Arc<Customizations> {
        self.current.load_full()
    }

    /// Install `customizations` as a new version
    pub fn install(&self, mut customizations: Customizations) -> Arc<Customizations> {
        customizations.version = self.next_version.fetch_add(1, Ordering::Relaxed);
        let snapshot = Arc::new(customizations);
        self.current.store(Arc::clone(&snapshot));
        snapshot
    }

    /// Drop all customizations
    pub fn reset(&self) -> Arc<Customizations> {
        self.install(Customizations::default())
    }

    /// Reload from the first usable directory in `paths`.
    ///
    /// State is cleared before loading, so a failed reload leaves no
    /// customizations installed. Relative paths resolve against
    /// `workspace_folders`.
    pub async fn reload(
        &self,
        paths: &[String],
        workspace_folders: &[PathBuf],
    ) -> Result<Arc<Customizations>, CustomizationError> {
        let cleared = self.reset();

        let paths: Vec<&str> = paths.iter().map(|p| p.trim()).filter(|p| !p.is_empty()).collect();
        if paths.is_empty() {
            log::debug!("No extensions path configured");
            return Ok(cleared);
        }

        let loaded = match resolve_directory(&paths, workspace_folders).await {
            Ok(dir) => load_directory(&dir).await,
            Err(e) => Err(e),
        };

        match loaded {
            Ok(customizations) => {
                let snapshot = self.install(customizations);
                log::info!(
                    "Loaded Emmet customizations v{} from {} ({} syntaxes)",
                    snapshot.version,
                    snapshot.source.as_deref().map(Path::display).map(|d| d.to_string()).unwrap_or_default(),
                    snapshot.snippets.len()
                );
                Ok(snapshot)
            }
            Err(e) => {
                log::warn!("Failed to load Emmet customizations: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(snippets: Value) -> Customizations {
        Customizations::from_documents(&snippets, None).unwrap()
    }

    #[test]
    fn test_variables_and_snippets() {
        let customizations = parse(json!({
            "variables": {"lang": "de", "count": 3},
            "html": {"snippets": {"hdr": "header>h1"}},
            "css": {"snippets": {"bxs": "box-shadow: 0 0 ${1:0} #000"}}
        }));

        assert_eq!(customizations.variables.len(), 1);
        assert_eq!(customizations.variables["lang"], "de");
        assert_eq!(customizations.snippets_for("html").unwrap()["hdr"], "header>h1");
        assert_eq!(customizations.stylesheet_snippet_keys("css"), ["bxs".to_string()]);
    }

    #[test]
    fn test_legacy_tag_snippets_are_wrapped() {
        let customizations = parse(json!({
            "html": {"snippets": {"br2": "<br><br>", "nav2": "nav>ul"}},
            "css": {"snippets": {"raw": "<weird>"}}
        }));
        let html = customizations.snippets_for("html").unwrap();
        assert_eq!(html["br2"], "{<br><br>}");
        assert_eq!(html["nav2"], "nav>ul");
        assert_eq!(customizations.snippets_for("css").unwrap()["raw"], "<weird>");
    }

    #[test]
    fn test_base_syntax_snippets_merge_underneath() {
        let customizations = parse(json!({
            "css": {"snippets": {"a": "css-a", "b": "css-b"}},
            "scss": {"snippets": {"b": "scss-b"}}
        }));
        let scss = customizations.snippets_for("scss").unwrap();
        assert_eq!(scss["a"], "css-a");
        assert_eq!(scss["b"], "scss-b");

        let mut keys = customizations.stylesheet_snippet_keys("scss").to_vec();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_fallback_to_base_syntax() {
        let customizations = parse(json!({
            "css": {"snippets": {"x": "y"}},
            "html": {"snippets": {"p2": "p+p"}}
        }));
        assert_eq!(customizations.stylesheet_snippet_keys("less"), ["x".to_string()]);
        assert_eq!(customizations.snippet_keys("jsx"), vec!["p2".to_string()]);
        assert!(customizations.snippets_for("sass").is_some());
    }

    #[test]
    fn test_rejects_non_object_root() {
        assert!(Customizations::from_documents(&json!([1, 2]), None).is_err());
    }

    #[test]
    fn test_profiles_are_kept_raw() {
        let customizations = Customizations::from_documents(&json!({}), Some(&json!({"html": "xhtml"}))).unwrap();
        assert_eq!(customizations.profiles.get("html"), Some(&json!("xhtml")));
    }

    #[test]
    fn test_store_versions_increase() {
        let store = CustomizationStore::new();
        assert_eq!(store.snapshot().version, 0);

        let first = store.install(parse(json!({"html": {"snippets": {"a": "b"}}})));
        let second = store.reset();
        assert!(second.version > first.version);
        assert!(store.snapshot().is_empty());
        // Readers holding the old snapshot keep it intact
        assert_eq!(first.snippets_for("html").unwrap()["a"], "b");
    }

    #[test]
    fn test_candidate_dirs() {
        let folders = vec![PathBuf::from("/ws1"), PathBuf::from("/ws2")];
        assert_eq!(
            candidate_dirs("emmet", &folders),
            vec![PathBuf::from("/ws1/emmet"), PathBuf::from("/ws2/emmet")]
        );
        assert!(candidate_dirs("emmet", &[]).is_empty());
        #[cfg(unix)]
        assert_eq!(candidate_dirs("/abs/emmet", &folders), vec![PathBuf::from("/abs/emmet")]);
        assert_eq!(expand_home("~user/x"), None);
    }

    #[test]
    fn test_error_messages_name_the_setting() {
        let err = CustomizationError::NotFound {
            path: "/missing".to_string(),
        };
        assert!(err.to_string().contains("emmet.extensionsPath"));
        assert!(err.to_string().contains("/missing"));
    }
}
