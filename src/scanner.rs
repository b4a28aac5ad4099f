//! Backward token-boundary scan for abbreviations
//!
//! Walks left from the cursor while characters can belong to an abbreviation,
//! keeping track of attribute sets (`[...]`), text nodes (`{...}`) and groups
//! (`(...)`). Stops at the end of an HTML tag so that `<div>ul>li` yields `ul>li`.
//!
//! Offsets are bytes. Every stop happens on an ASCII byte or at line start, so
//! returned offsets are always char boundaries.

use crate::engine::{ExtractOptions, ExtractedAbbreviation};
use crate::syntax::SyntaxKind;

/// Non-alphanumeric characters allowed in an abbreviation
const SPECIAL_CHARS: &[u8] = b"#.*:$-_!@%^+>/";

/// Operators that cannot start an abbreviation
const LEADING_OPERATORS: &[char] = &['*', '+', '>', '^'];

struct BackwardScanner<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> BackwardScanner<'a> {
    fn new(text: &'a str, pos: usize) -> Self {
        Self {
            text: text.as_bytes(),
            pos,
        }
    }

    fn sol(&self) -> bool {
        self.pos == 0
    }

    fn peek(&self) -> Option<u8> {
        if self.sol() { None } else { Some(self.text[self.pos - 1]) }
    }

    fn previous(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos -= 1;
        Some(ch)
    }

    fn consume(&mut self, test: impl Fn(u8) -> bool) -> bool {
        match self.peek() {
            Some(ch) if test(ch) => {
                self.pos -= 1;
                true
            }
            _ => false,
        }
    }

    fn consume_byte(&mut self, expected: u8) -> bool {
        self.consume(|ch| ch == expected)
    }

    fn consume_while(&mut self, test: impl Fn(u8) -> bool) -> bool {
        let start = self.pos;
        while self.consume(&test) {}
        self.pos != start
    }

    fn consume_ident(&mut self) -> bool {
        self.consume_while(is_ident)
    }

    /// Consume a quoted string ending at the scanner position
    fn consume_quoted(&mut self) -> bool {
        let start = self.pos;
        if let Some(quote) = self.previous().filter(|ch| is_quote(*ch)) {
            while let Some(ch) = self.previous() {
                if ch == quote && self.peek() != Some(b'\\') {
                    return true;
                }
            }
        }
        self.pos = start;
        false
    }
}

fn is_quote(ch: u8) -> bool {
    ch == b'"' || ch == b'\''
}

fn is_ident(ch: u8) -> bool {
    ch == b':' || ch == b'-' || ch.is_ascii_alphanumeric()
}

fn is_abbreviation_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || SPECIAL_CHARS.contains(&ch)
}

fn matching_open(close: u8) -> Option<u8> {
    match close {
        b')' => Some(b'('),
        b']' => Some(b'['),
        b'}' => Some(b'{'),
        b'>' => Some(b'<'),
        _ => None,
    }
}

fn is_open_brace(ch: u8, kind: SyntaxKind) -> bool {
    ch == b'(' || (kind == SyntaxKind::Markup && (ch == b'[' || ch == b'{'))
}

fn is_close_brace(ch: u8, kind: SyntaxKind) -> bool {
    ch == b')' || (kind == SyntaxKind::Markup && (ch == b']' || ch == b'}'))
}

/// Locate the abbreviation that ends at byte offset `pos` in `line`.
///
/// Returns `None` when nothing abbreviation-like precedes the cursor or the
/// braces around it do not balance.
///
/// # Examples
/// ```
/// use emmet_assist::engine::ExtractOptions;
/// use emmet_assist::scanner::scan_abbreviation;
///
/// let found = scan_abbreviation("<div>ul>li*3</div>", 10, &ExtractOptions::default()).unwrap();
/// assert_eq!(found.abbreviation, "ul>li");
/// assert_eq!(found.start, 5);
/// ```
pub fn scan_abbreviation(line: &str, pos: usize, options: &ExtractOptions) -> Option<ExtractedAbbreviation> {
    let bytes = line.as_bytes();
    let mut pos = pos.min(line.len());
    while !line.is_char_boundary(pos) {
        pos -= 1;
    }

    if options.look_ahead {
        pos = offset_past_auto_closed(bytes, pos, options.kind);
    }

    let mut scanner = BackwardScanner::new(line, pos);
    let mut stack: Vec<u8> = Vec::new();

    while let Some(ch) = scanner.peek() {
        if stack.contains(&b'}') {
            if ch == b'}' {
                stack.push(ch);
                scanner.pos -= 1;
                continue;
            }
            if ch != b'{' {
                scanner.pos -= 1;
                continue;
            }
        }

        if is_close_brace(ch, options.kind) {
            stack.push(ch);
        } else if is_open_brace(ch, options.kind) {
            if stack.pop().and_then(matching_open) != Some(ch) {
                break;
            }
        } else if stack.contains(&b']') || stack.contains(&b'}') {
            // Attribute sets and text nodes accept anything
            scanner.pos -= 1;
            continue;
        } else if is_at_html_tag(&mut scanner) || !is_abbreviation_char(ch) {
            break;
        }

        scanner.pos -= 1;
    }

    if !stack.is_empty() || scanner.pos == pos {
        return None;
    }

    let abbreviation = line[scanner.pos..pos].trim_start_matches(LEADING_OPERATORS);
    Some(ExtractedAbbreviation {
        abbreviation: abbreviation.to_string(),
        start: pos - abbreviation.len(),
    })
}

/// Step over a closing quote and auto-inserted closing braces right of the cursor
fn offset_past_auto_closed(bytes: &[u8], mut pos: usize, kind: SyntaxKind) -> usize {
    if bytes.get(pos).copied().is_some_and(is_quote) {
        pos += 1;
    }
    while bytes.get(pos).is_some_and(|ch| is_close_brace(*ch, kind)) {
        pos += 1;
    }
    pos
}

/// True if the scanner sits right after the end of an HTML tag.
///
/// The scanner position is restored before returning.
fn is_at_html_tag(scanner: &mut BackwardScanner<'_>) -> bool {
    let start = scanner.pos;
    if !scanner.consume_byte(b'>') {
        return false;
    }

    let mut ok = false;
    // Possibly a self-closed element
    scanner.consume_byte(b'/');

    while !scanner.sol() {
        scanner.consume_while(|ch| ch.is_ascii_whitespace());

        if scanner.consume_ident() {
            // Tag name, boolean attribute or unquoted attribute value
            if scanner.consume_byte(b'/') {
                ok = scanner.consume_byte(b'<');
                break;
            } else if scanner.consume_byte(b'<') {
                ok = true;
                break;
            } else if scanner.consume(|ch| ch.is_ascii_whitespace()) {
                continue;
            } else if scanner.consume_byte(b'=') {
                if scanner.consume_ident() {
                    continue;
                }
                break;
            } else if consume_attribute_with_unquoted_value(scanner) {
                ok = true;
                break;
            }
            break;
        }

        if consume_attribute(scanner) {
            continue;
        }
        break;
    }

    scanner.pos = start;
    ok
}

fn consume_attribute(scanner: &mut BackwardScanner<'_>) -> bool {
    consume_attribute_with_quoted_value(scanner) || consume_attribute_with_unquoted_value(scanner)
}

fn consume_attribute_with_quoted_value(scanner: &mut BackwardScanner<'_>) -> bool {
    let start = scanner.pos;
    if scanner.consume_quoted() && scanner.consume_byte(b'=') && scanner.consume_ident() {
        return true;
    }
    scanner.pos = start;
    false
}

fn consume_attribute_with_unquoted_value(scanner: &mut BackwardScanner<'_>) -> bool {
    let start = scanner.pos;
    let mut stack: Vec<u8> = Vec::new();

    while let Some(ch) = scanner.peek() {
        if matching_open(ch).is_some() {
            stack.push(ch);
        } else if matches!(ch, b'(' | b'[' | b'{' | b'<') {
            if stack.pop().and_then(matching_open) != Some(ch) {
                break;
            }
        } else if ch == b'=' || ch.is_ascii_whitespace() || is_quote(ch) {
            break;
        }
        scanner.pos -= 1;
    }

    if start != scanner.pos && scanner.consume_byte(b'=') && scanner.consume_ident() {
        return true;
    }
    scanner.pos = start;
    false
}
