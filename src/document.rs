//! Minimal document model: line lookup and positions
//!
//! Columns are counted in characters, byte offsets are only used internally.

use serde::{Deserialize, Serialize};

/// Zero-based line/column position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Half-open range between two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range on a single line between two columns
    pub fn on_line(line: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            start: Position::new(line, start_col),
            end: Position::new(line, end_col),
        }
    }
}

/// Anything that can hand out the text of a line
pub trait LineSource {
    /// Text of the given zero-based line, without its line terminator
    fn line(&self, line: u32) -> Option<&str>;
}

impl LineSource for str {
    fn line(&self, line: u32) -> Option<&str> {
        self.lines().nth(line as usize)
    }
}

impl LineSource for String {
    fn line(&self, line: u32) -> Option<&str> {
        self.as_str().line(line)
    }
}

impl LineSource for [String] {
    fn line(&self, line: u32) -> Option<&str> {
        self.get(line as usize).map(String::as_str)
    }
}

impl LineSource for Vec<String> {
    fn line(&self, line: u32) -> Option<&str> {
        self.as_slice().line(line)
    }
}

/// Convert a character column into a byte offset, clamped to the line end
pub fn char_to_byte_offset(line: &str, column: usize) -> usize {
    line.char_indices().nth(column).map(|(idx, _)| idx).unwrap_or(line.len())
}

/// Convert a byte offset into a character column
pub fn byte_to_char_offset(line: &str, byte_offset: usize) -> usize {
    if byte_offset >= line.len() {
        return line.chars().count();
    }
    line.char_indices().take_while(|(idx, _)| *idx < byte_offset).count()
}
