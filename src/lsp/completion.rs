use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionList as LspCompletionList, CompletionTextEdit, Documentation,
    InsertTextFormat, Position, Range, TextEdit,
};

use crate::completion::{CandidateKind, CompletionCandidate, CompletionList};
use crate::document;

/// Copy a position as is.
///
/// Columns stay counted in characters, which matches clients that negotiated
/// the `utf-32` position encoding. Use [`to_lsp_position_utf16`] for clients
/// on the protocol default.
pub fn to_lsp_position(position: document::Position) -> Position {
    Position {
        line: position.line,
        character: position.character,
    }
}

/// Convert a character column on `line` into UTF-16 code units
pub fn to_lsp_position_utf16(position: document::Position, line: &str) -> Position {
    let character: usize = line
        .chars()
        .take(position.character as usize)
        .map(char::len_utf16)
        .sum();
    Position {
        line: position.line,
        character: u32::try_from(character).unwrap_or(u32::MAX),
    }
}

/// Convert a UTF-16 column on `line` into a character column.
///
/// A column inside a surrogate pair lands after that character.
pub fn from_lsp_position_utf16(position: Position, line: &str) -> document::Position {
    let mut units = 0usize;
    let mut character = 0u32;
    for ch in line.chars() {
        if units >= position.character as usize {
            break;
        }
        units += ch.len_utf16();
        character += 1;
    }
    if units < position.character as usize {
        // Past the end of the line
        character += position.character - units as u32;
    }
    document::Position::new(position.line, character)
}

pub fn to_lsp_range(range: document::Range) -> Range {
    Range {
        start: to_lsp_position(range.start),
        end: to_lsp_position(range.end),
    }
}

/// UTF-16 range for a completion range on `line`
pub fn to_lsp_range_utf16(range: document::Range, line: &str) -> Range {
    Range {
        start: to_lsp_position_utf16(range.start, line),
        end: to_lsp_position_utf16(range.end, line),
    }
}

/// Convert one candidate into a snippet-format completion item
pub fn to_lsp_completion_item(candidate: &CompletionCandidate) -> CompletionItem {
    completion_item(candidate, to_lsp_range(candidate.range))
}

fn completion_item(candidate: &CompletionCandidate, range: Range) -> CompletionItem {
    let kind = match candidate.kind {
        CandidateKind::Expansion => CompletionItemKind::PROPERTY,
        CandidateKind::Snippet => CompletionItemKind::SNIPPET,
    };

    CompletionItem {
        label: candidate.label.clone(),
        kind: Some(kind),
        detail: Some(candidate.detail.clone()),
        documentation: Some(Documentation::String(candidate.preview.clone())),
        sort_text: candidate.sort_text.clone(),
        filter_text: candidate.filter_text.clone(),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        text_edit: Some(CompletionTextEdit::Edit(TextEdit {
            range,
            new_text: candidate.insert_template.clone(),
        })),
        ..Default::default()
    }
}

pub fn to_lsp_completion_list(list: &CompletionList) -> LspCompletionList {
    LspCompletionList {
        is_incomplete: list.is_incomplete,
        items: list.items.iter().map(to_lsp_completion_item).collect(),
    }
}

/// Like [`to_lsp_completion_list`], with columns in UTF-16 code units.
///
/// `line` is the text of the line holding the cursor, which every candidate
/// range sits on.
pub fn to_lsp_completion_list_utf16(list: &CompletionList, line: &str) -> LspCompletionList {
    LspCompletionList {
        is_incomplete: list.is_incomplete,
        items: list
            .items
            .iter()
            .map(|candidate| completion_item(candidate, to_lsp_range_utf16(candidate.range, line)))
            .collect(),
    }
}
