//! Vendor-prefixed stylesheet abbreviations
//!
//! `-wm-trf` expands `trf` and then emits `-webkit-` and `-moz-` copies of the
//! declaration ahead of the plain one. A bare `-trf` picks vendors from the
//! `css.<vendor>Properties` preferences.

use phf::phf_ordered_map;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Vendor letters in output order
static VENDORS: phf::OrderedMap<char, &'static str> = phf_ordered_map! {
    'w' => "webkit",
    'm' => "moz",
    's' => "ms",
    'o' => "o",
};

/// Explicit vendor letters followed by a dash and the abbreviation
static EXPLICIT_VENDORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[wmso]*-.").unwrap());

/// An abbreviation split into its vendor prefix and the remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorSplit<'a> {
    /// `""`, `"-"` or `"-wm-"`-like prefix
    pub prefix: &'a str,
    pub abbreviation: &'a str,
}

/// Split `-wm-trf` into `("-wm-", "trf")` and `-trf` into `("-", "trf")`
///
/// # Examples
/// ```
/// use emmet_assist::vendor::split_vendor_prefix;
///
/// let split = split_vendor_prefix("-wm-trf");
/// assert_eq!((split.prefix, split.abbreviation), ("-wm-", "trf"));
/// assert_eq!(split_vendor_prefix("m10").prefix, "");
/// ```
pub fn split_vendor_prefix(abbreviation: &str) -> VendorSplit<'_> {
    let Some(rest) = abbreviation.strip_prefix('-') else {
        return VendorSplit {
            prefix: "",
            abbreviation,
        };
    };

    if EXPLICIT_VENDORS.is_match(rest)
        && let Some(dash) = rest.find('-')
    {
        // +1 for the leading dash, +1 to keep the closing dash
        let end = dash + 2;
        return VendorSplit {
            prefix: &abbreviation[..end],
            abbreviation: &abbreviation[end..],
        };
    }

    VendorSplit {
        prefix: "-",
        abbreviation: rest,
    }
}

fn listed_in(preference: &Value, property: &str) -> bool {
    match preference {
        Value::String(list) => list.split(',').any(|p| p.trim() == property),
        Value::Array(items) => items.iter().filter_map(Value::as_str).any(|p| p.trim() == property),
        _ => false,
    }
}

/// Vendor letters for a bare `-` prefix: those whose preference list names
/// the property, or every vendor when none does
fn vendors_for_property(property: &str, preferences: &Map<String, Value>) -> String {
    let letters: String = VENDORS
        .entries()
        .filter(|(_, name)| {
            preferences
                .get(&format!("css.{name}Properties"))
                .is_some_and(|list| listed_in(list, property))
        })
        .map(|(letter, _)| *letter)
        .collect();

    if letters.is_empty() {
        VENDORS.keys().collect()
    } else {
        letters
    }
}

/// Prepend vendor-prefixed copies of `expanded` as selected by `prefix`.
///
/// Each copy goes on its own line before the unprefixed declaration.
pub fn apply_vendor_prefixes(expanded: &str, prefix: &str, preferences: &Map<String, Value>) -> String {
    let Some(letters) = prefix.strip_prefix('-') else {
        return expanded.to_string();
    };

    let letters = if letters.is_empty() {
        let Some(colon) = expanded.find(':').filter(|&idx| idx > 0) else {
            return expanded.to_string();
        };
        vendors_for_property(&expanded[..colon], preferences)
    } else {
        letters.trim_end_matches('-').to_string()
    };

    let mut prefixed = String::with_capacity((expanded.len() + 10) * (letters.len() + 1));
    for letter in letters.chars() {
        if let Some(vendor) = VENDORS.get(&letter) {
            prefixed.push_str(&format!("-{vendor}-{expanded}\n"));
        }
    }
    prefixed.push_str(expanded);
    prefixed
}
