//! Completion assembler
//!
//! Turns the abbreviation in front of the cursor into a ranked list of
//! completion candidates: the expanded abbreviation itself, common tags the
//! typed tag could grow into, and matching snippet keys.
//!
//! Every per-candidate failure (invalid abbreviation, engine error, noise) only
//! drops that candidate; the rest of the list is still assembled.

use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;

use crate::config::{EmmetConfig, ExpandOptions, ShowExpandedAbbreviation, Tuning, build_expand_options};
use crate::customizations::Customizations;
use crate::data::{common_tags, is_common_tag, is_css_property_prefix};
use crate::document::{LineSource, Position, Range, char_to_byte_offset};
use crate::engine::{AbbreviationEngine, ExtractOptions};
use crate::extract::{AbbreviationToken, extract_from_line};
use crate::noise::{NoiseInput, is_noise};
use crate::syntax::{SyntaxKind, get_emmet_mode};
use crate::tabstops::{collapse_to_preview, escape_bare_dollar, promote_final_tab_stop, remove_tab_stops};
use crate::validate::is_abbreviation_valid;
use crate::vendor::{apply_vendor_prefixes, split_vendor_prefix};

pub const ABBREVIATION_DETAIL: &str = "Emmet Abbreviation";
pub const CUSTOM_SNIPPET_DETAIL: &str = "Emmet Custom Snippet";

/// The tag typed after the last `>` or `+`
static LAST_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(>|\+)([\w:-]+)$").unwrap());

/// The word being typed, used to spot an unfinished open tag
static CURRENT_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\w,:.-]*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Expansion,
    Snippet,
}

/// One completion suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionCandidate {
    pub label: String,
    /// Snippet text to insert, tab stops included
    pub insert_template: String,
    /// Human-readable rendering of the template
    pub preview: String,
    pub detail: String,
    /// Text replaced when the candidate is accepted
    pub range: Range,
    pub sort_text: Option<String>,
    pub filter_text: Option<String>,
    pub kind: CandidateKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionList {
    pub items: Vec<CompletionCandidate>,
    /// Editors should ask again on the next keystroke
    pub is_incomplete: bool,
}

/// Why a candidate was not produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no abbreviation found")]
    NoAbbreviationFound,
    #[error("invalid abbreviation")]
    InvalidAbbreviation,
    #[error("expansion failed")]
    ExpansionFailed,
    #[error("expansion is noise")]
    Noise,
    #[error("open tag being typed")]
    OpenTag,
}

fn skip(reason: SkipReason, abbreviation: &str) {
    log::debug!("Skipping '{abbreviation}': {reason}");
}

/// Parameters shared by every key matched in [`make_snippet_suggestions`]
#[derive(Debug, Clone, Copy)]
pub struct SnippetQuery<'a> {
    /// What the keys must start with (case-insensitive)
    pub prefix: &'a str,
    /// Full typed abbreviation; the key's remainder is appended to it
    pub abbreviation: &'a str,
    pub range: Range,
    pub detail: &'a str,
    pub kind: CandidateKind,
    /// Leave out a key equal to the prefix
    pub skip_full_match: bool,
}

fn candidate(
    label: String,
    expanded: &str,
    detail: &str,
    range: Range,
    kind: CandidateKind,
) -> CompletionCandidate {
    CompletionCandidate {
        label,
        insert_template: escape_bare_dollar(&promote_final_tab_stop(expanded)),
        preview: collapse_to_preview(expanded),
        detail: detail.to_string(),
        range,
        sort_text: None,
        filter_text: None,
        kind,
    }
}

/// Suggest every key that extends `query.prefix`.
///
/// For key `link` and prefix `li` typed as `ul>li`, the candidate expands
/// `ul>link` and is labelled `link`. Keys that fail to expand are skipped.
pub fn make_snippet_suggestions<E, I, S>(
    engine: &E,
    keys: I,
    query: &SnippetQuery<'_>,
    options: &ExpandOptions,
) -> Vec<CompletionCandidate>
where
    E: AbbreviationEngine + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if query.prefix.is_empty() {
        return Vec::new();
    }
    let lower = query.prefix.to_lowercase();

    keys.into_iter()
        .filter_map(|key| {
            let key = key.as_ref();
            if !key.starts_with(&lower) || (query.skip_full_match && key == lower) {
                return None;
            }
            let rest = &key[lower.len()..];
            let abbreviation = format!("{}{rest}", query.abbreviation);
            match engine.expand(&abbreviation, options) {
                Ok(expanded) if !expanded.is_empty() => Some(candidate(
                    format!("{}{rest}", query.prefix),
                    &expanded,
                    query.detail,
                    query.range,
                    query.kind,
                )),
                Ok(_) => None,
                Err(e) => {
                    log::debug!("Snippet suggestion '{abbreviation}' failed: {e}");
                    None
                }
            }
        })
        .collect()
}

/// True if the characters of `abbreviation` appear in `label` in order
fn matches_in_order(label: &str, abbreviation: &str) -> bool {
    let mut label_chars = label.chars().flat_map(char::to_lowercase);
    abbreviation
        .chars()
        .flat_map(char::to_lowercase)
        .all(|wanted| label_chars.any(|c| c == wanted))
}

/// `<div` with the cursor right after the tag name is an open tag, not an abbreviation
fn is_open_tag(line_before_cursor: &str, abbreviation: &str) -> bool {
    let word = CURRENT_WORD.find(line_before_cursor).map_or("", |m| m.as_str());
    word == abbreviation && line_before_cursor.ends_with(&format!("<{abbreviation}"))
}

/// State shared by the markup and stylesheet assembly
struct Assembly<'a, E: ?Sized> {
    engine: &'a E,
    syntax: &'a str,
    kind: SyntaxKind,
    token: &'a AbbreviationToken,
    options: &'a ExpandOptions,
}

impl<E: AbbreviationEngine + ?Sized> Assembly<'_, E> {
    /// Expand `abbreviation` for the primary candidate, `None` if it should not be offered
    fn expand_primary(&self, abbreviation: &str, snippet_keys: &[String]) -> Option<String> {
        if !is_abbreviation_valid(self.syntax, &self.token.abbreviation) {
            skip(SkipReason::InvalidAbbreviation, &self.token.abbreviation);
            return None;
        }

        let expanded = match self.engine.expand(abbreviation, self.options) {
            Ok(_) if self.kind == SyntaxKind::Stylesheet && "!important".starts_with(abbreviation) => {
                "!important".to_string()
            }
            Ok(expanded) => expanded,
            Err(e) => {
                log::debug!("Expanding '{abbreviation}' failed: {e}");
                skip(SkipReason::ExpansionFailed, abbreviation);
                return None;
            }
        };

        let input = NoiseInput {
            syntax: self.syntax,
            abbreviation,
            expanded: &expanded,
            options: &self.options.options,
            snippet_keys,
        };
        if expanded.is_empty() || is_noise(&input) {
            skip(SkipReason::Noise, abbreviation);
            return None;
        }

        Some(expanded)
    }

    fn suggestions<I, S>(&self, keys: I, query: SnippetQuery<'_>) -> Vec<CompletionCandidate>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        make_snippet_suggestions(self.engine, keys, &query, self.options)
    }

    fn query<'q>(
        &'q self,
        prefix: &'q str,
        detail: &'q str,
        kind: CandidateKind,
        skip_full_match: bool,
    ) -> SnippetQuery<'q> {
        SnippetQuery {
            prefix,
            abbreviation: &self.token.abbreviation,
            range: self.token.range,
            detail,
            kind,
            skip_full_match,
        }
    }
}

/// Outcome of the stylesheet branch
enum Assembled {
    Items(Vec<CompletionCandidate>),
    /// Stop here and report an empty, incomplete list
    Defer,
}

fn assemble_stylesheet<E: AbbreviationEngine + ?Sized>(
    assembly: &Assembly<'_, E>,
    config: &EmmetConfig,
    customizations: &Customizations,
    tuning: &Tuning,
) -> Assembled {
    let abbreviation = assembly.token.abbreviation.as_str();
    let split = split_vendor_prefix(abbreviation);
    let expanded = assembly.expand_primary(split.abbreviation, &[]);

    // Long prefixes of real properties are better served by plain CSS completion
    if split.abbreviation.chars().count() > tuning.css_property_prefix_threshold
        && is_css_property_prefix(split.abbreviation)
    {
        log::debug!("'{}' is a CSS property prefix, deferring", split.abbreviation);
        return Assembled::Defer;
    }

    let mut items = assembly.suggestions(
        customizations.stylesheet_snippet_keys(assembly.syntax),
        assembly.query(abbreviation, CUSTOM_SNIPPET_DETAIL, CandidateKind::Snippet, false),
    );

    if let Some(expanded) = expanded {
        let prefixed = apply_vendor_prefixes(&expanded, split.prefix, &config.preferences);
        let mut primary = candidate(
            remove_tab_stops(&expanded),
            &prefixed,
            ABBREVIATION_DETAIL,
            assembly.token.range,
            CandidateKind::Expansion,
        );
        primary.filter_text = Some(abbreviation.to_string());

        let duplicate = items.iter().any(|item| item.insert_template == primary.insert_template);
        // `width` must not surface as `widows`, `font-family` not as `font: family`
        let plausible = abbreviation.chars().any(|c| c.is_ascii_digit())
            || matches_in_order(&primary.label, split.abbreviation);
        if !duplicate && plausible {
            items.push(primary);
        }
    }

    Assembled::Items(items)
}

fn assemble_markup<E: AbbreviationEngine + ?Sized>(
    assembly: &Assembly<'_, E>,
    config: &EmmetConfig,
    customizations: &Customizations,
) -> Vec<CompletionCandidate> {
    let token = assembly.token;
    let abbreviation = token.abbreviation.as_str();
    let syntax = assembly.syntax;

    let snippet_keys: Vec<String> = assembly
        .engine
        .snippet_keys(syntax)
        .into_iter()
        .chain(customizations.snippet_keys(syntax))
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect();

    let mut primary = assembly.expand_primary(abbreviation, &snippet_keys).map(|expanded| {
        let mut label = abbreviation.to_string();
        for filter in &token.filters {
            label.push('|');
            label.push_str(filter.code());
        }
        candidate(label, &expanded, ABBREVIATION_DETAIL, token.range, CandidateKind::Expansion)
    });

    let tag = LAST_TAG
        .captures(abbreviation)
        .and_then(|caps| caps.get(2))
        .map_or(abbreviation, |m| m.as_str());

    let common = if syntax == "xml" {
        Vec::new()
    } else {
        assembly.suggestions(
            common_tags(),
            assembly.query(tag, ABBREVIATION_DETAIL, CandidateKind::Expansion, true),
        )
    };

    let mut suggested = if config.show_abbreviation_suggestions {
        assembly.suggestions(
            snippet_keys.iter().filter(|key| !is_common_tag(key)),
            assembly.query(tag, ABBREVIATION_DETAIL, CandidateKind::Snippet, true),
        )
    } else {
        Vec::new()
    };

    if let Some(primary) = primary.as_mut()
        && !suggested.is_empty()
        && tag != abbreviation
    {
        // Keep the full expansion ahead of suggestions for the last tag only
        primary.sort_text = Some(format!("0{}", primary.label));
        for item in &mut suggested {
            item.filter_text = Some(abbreviation.to_string());
            item.sort_text = Some(format!("9{abbreviation}"));
        }
    }

    let echo_label = primary
        .as_ref()
        .filter(|p| p.insert_template == format!("<{abbreviation}>${{0}}</{abbreviation}>"))
        .map(|p| p.label.clone());

    let mut items: Vec<CompletionCandidate> = primary.into_iter().chain(common).chain(suggested).collect();

    // `a:b` echoed as a tag is useless next to real `a:...` snippets
    if syntax == "html"
        && items.len() >= 2
        && abbreviation.contains(':')
        && let Some(echo_label) = echo_label
    {
        items.retain(|item| item.label != echo_label);
    }

    items
}

/// Compute completions at `position` with default [`Tuning`].
///
/// `language` is the editor language id; it is mapped onto an Emmet syntax
/// first. Returns `None` when there is nothing to offer.
pub fn compute_completions<E, D>(
    engine: &E,
    document: &D,
    position: Position,
    language: &str,
    config: &EmmetConfig,
    customizations: &Customizations,
) -> Option<CompletionList>
where
    E: AbbreviationEngine + ?Sized,
    D: LineSource + ?Sized,
{
    compute_completions_with(engine, document, position, language, config, customizations, &Tuning::default())
}

/// [`compute_completions`] with explicit tuning thresholds
pub fn compute_completions_with<E, D>(
    engine: &E,
    document: &D,
    position: Position,
    language: &str,
    config: &EmmetConfig,
    customizations: &Customizations,
    tuning: &Tuning,
) -> Option<CompletionList>
where
    E: AbbreviationEngine + ?Sized,
    D: LineSource + ?Sized,
{
    if config.show_expanded_abbreviation == ShowExpandedAbbreviation::Never {
        return None;
    }
    let syntax = get_emmet_mode(language, &config.exclude_languages)?;
    let kind = SyntaxKind::of(&syntax);

    let line = document.line(position.line)?;
    let Some(token) = extract_from_line(
        engine,
        line,
        position,
        &ExtractOptions::for_kind(kind),
        tuning.max_filters,
    ) else {
        skip(SkipReason::NoAbbreviationFound, "");
        return None;
    };

    if kind == SyntaxKind::Markup {
        let before_cursor = &line[..char_to_byte_offset(line, position.character as usize)];
        if is_open_tag(before_cursor, &token.abbreviation) {
            skip(SkipReason::OpenTag, &token.abbreviation);
            return None;
        }
    }

    let filter = token.filter();
    let options = build_expand_options(&syntax, config, filter.as_deref(), customizations);
    let assembly = Assembly {
        engine,
        syntax: &syntax,
        kind,
        token: &token,
        options: &options,
    };

    let mut items = match kind {
        SyntaxKind::Stylesheet => match assemble_stylesheet(&assembly, config, customizations, tuning) {
            Assembled::Items(items) => items,
            Assembled::Defer => {
                return Some(CompletionList {
                    items: Vec::new(),
                    is_incomplete: true,
                });
            }
        },
        SyntaxKind::Markup => assemble_markup(&assembly, config, customizations),
    };

    if config.show_suggestions_as_snippets {
        for item in &mut items {
            item.kind = CandidateKind::Snippet;
        }
    }

    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.insert_template.clone()));

    if items.is_empty() {
        None
    } else {
        Some(CompletionList {
            items,
            is_incomplete: true,
        })
    }
}
