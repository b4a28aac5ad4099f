//! Language Server Protocol adapter
//!
//! Maps completion results onto `tower_lsp::lsp_types` so a language server
//! can return them unchanged.

mod completion;

pub use completion::{
    from_lsp_position_utf16, to_lsp_completion_item, to_lsp_completion_list, to_lsp_completion_list_utf16,
    to_lsp_position, to_lsp_position_utf16, to_lsp_range, to_lsp_range_utf16,
};
