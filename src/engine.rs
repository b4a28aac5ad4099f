//! The abbreviation engine seam
//!
//! Parsing and rendering abbreviations is delegated to an implementation of
//! [`AbbreviationEngine`]. Everything in this crate only relies on the three
//! capabilities declared here.

use thiserror::Error;

use crate::config::ExpandOptions;
use crate::scanner;
use crate::syntax::SyntaxKind;

/// Errors reported by an engine when an abbreviation cannot be expanded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("Unable to parse abbreviation: {0}")]
    Unparseable(String),
    #[error("Unsupported abbreviation: {0}")]
    Unsupported(String),
}

/// Options for locating an abbreviation on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Grammar family, controls which braces nest
    pub kind: SyntaxKind,
    /// Step over auto-closed characters right of the cursor first
    pub look_ahead: bool,
}

impl ExtractOptions {
    /// Options used during completion: look-ahead only for markup
    pub fn for_kind(kind: SyntaxKind) -> Self {
        Self {
            kind,
            look_ahead: kind == SyntaxKind::Markup,
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::for_kind(SyntaxKind::Markup)
    }
}

/// Abbreviation found by a token-boundary scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedAbbreviation {
    pub abbreviation: String,
    /// Byte offset in the scanned line where the abbreviation starts
    pub start: usize,
}

/// Expansion capability consumed by completion.
///
/// Implementations must not panic on malformed input; return an
/// [`ExpandError`] instead.
pub trait AbbreviationEngine: Send + Sync {
    /// Expand `abbreviation` into snippet text with `${n}` tab stops
    fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String, ExpandError>;

    /// Locate the abbreviation ending at byte offset `pos` in `line`
    fn extract(&self, line: &str, pos: usize, options: &ExtractOptions) -> Option<ExtractedAbbreviation> {
        scanner::scan_abbreviation(line, pos, options)
    }

    /// Keys of the engine's built-in snippets for `syntax`
    fn snippet_keys(&self, _syntax: &str) -> Vec<String> {
        Vec::new()
    }
}

impl<T: AbbreviationEngine + ?Sized> AbbreviationEngine for &T {
    fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String, ExpandError> {
        (**self).expand(abbreviation, options)
    }

    fn extract(&self, line: &str, pos: usize, options: &ExtractOptions) -> Option<ExtractedAbbreviation> {
        (**self).extract(line, pos, options)
    }

    fn snippet_keys(&self, syntax: &str) -> Vec<String> {
        (**self).snippet_keys(syntax)
    }
}

impl<T: AbbreviationEngine + ?Sized> AbbreviationEngine for Box<T> {
    fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String, ExpandError> {
        (**self).expand(abbreviation, options)
    }

    fn extract(&self, line: &str, pos: usize, options: &ExtractOptions) -> Option<ExtractedAbbreviation> {
        (**self).extract(line, pos, options)
    }

    fn snippet_keys(&self, syntax: &str) -> Vec<String> {
        (**self).snippet_keys(syntax)
    }
}

/// Engine that locates abbreviations but cannot expand them.
///
/// Useful for tooling that only needs extraction and validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOnlyEngine;

impl AbbreviationEngine for ScanOnlyEngine {
    fn expand(&self, abbreviation: &str, _options: &ExpandOptions) -> Result<String, ExpandError> {
        Err(ExpandError::Unsupported(abbreviation.to_string()))
    }
}
