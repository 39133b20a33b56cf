//! Caret line/column derivation
//!
//! A position is never stored: it is recomputed from the text and the flat
//! char offset whenever the status line (or anything else) asks for it.

use ropey::Rope;

/// 1-based line/column position in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Locate a char offset in the text.
///
/// Equivalent to splitting `text[0..offset]` on `\n` and counting the
/// segments: `line` is the segment count, `column` the length of the last
/// segment plus one. Offsets past the end clamp to the end.
pub fn locate(text: &Rope, offset: usize) -> Position {
    let offset = offset.min(text.len_chars());
    let line = text.char_to_line(offset);
    let column = offset - text.line_to_char(line);
    Position {
        line: line + 1,
        column: column + 1,
    }
}
