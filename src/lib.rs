//! Emmet abbreviation support for editors.
//!
//! Locates the abbreviation in front of the cursor, decides whether it is
//! worth expanding, and assembles ranked completion candidates with tab-stop
//! metadata. Parsing and rendering abbreviations is left to an
//! [`AbbreviationEngine`] implementation.
//!
//! ```
//! use emmet_assist::config::ExpandOptions;
//! use emmet_assist::{
//!     AbbreviationEngine, Customizations, EmmetConfig, ExpandError, Position, compute_completions,
//! };
//!
//! struct Engine;
//!
//! impl AbbreviationEngine for Engine {
//!     fn expand(&self, abbreviation: &str, _options: &ExpandOptions) -> Result<String, ExpandError> {
//!         match abbreviation {
//!             "ul>li" => Ok("<ul>\n\t<li>${1}</li>\n</ul>".to_string()),
//!             _ => Err(ExpandError::Unsupported(abbreviation.to_string())),
//!         }
//!     }
//! }
//!
//! let list = compute_completions(
//!     &Engine,
//!     "<div>ul>li*3</div>",
//!     Position::new(0, 10),
//!     "html",
//!     &EmmetConfig::default(),
//!     &Customizations::default(),
//! )
//! .unwrap();
//! assert_eq!(list.items[0].label, "ul>li");
//! assert_eq!(list.items[0].insert_template, "<ul>\n\t<li>${0}</li>\n</ul>");
//! ```

pub mod completion;
pub mod config;
pub mod customizations;
pub mod data;
pub mod document;
pub mod engine;
pub mod exit_codes;
pub mod extract;
pub mod filters;
pub mod noise;
pub mod scanner;
pub mod syntax;
pub mod tabstops;
pub mod validate;
pub mod vendor;

#[cfg(feature = "lsp")]
pub mod lsp;

pub use completion::{
    CandidateKind, CompletionCandidate, CompletionList, SkipReason, compute_completions, compute_completions_with,
};
pub use config::{EmmetConfig, ShowExpandedAbbreviation, Tuning};
pub use customizations::{CustomizationError, CustomizationStore, Customizations};
pub use document::{LineSource, Position, Range};
pub use engine::{AbbreviationEngine, ExpandError, ExtractOptions};
pub use extract::{AbbreviationToken, extract_abbreviation};
pub use syntax::get_emmet_mode;
pub use validate::is_abbreviation_valid;
