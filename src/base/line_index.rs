//! Conversion between byte offsets and line/character positions.
//!
//! The syntax tree works in byte offsets (`TextSize`/`TextRange`); the public
//! data model works in line/character positions. `LineIndex` is built once per
//! document revision and shared by every consumer of that revision.
//!
//! Characters are counted in Unicode scalar values, so Cyrillic identifiers
//! occupy one column per letter.

use text_size::{TextRange, TextSize};

use super::position::{Position, Range};

/// Precomputed line-start table for one document revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset at which each line starts. Always non-empty; line 0
    /// starts at offset 0.
    line_starts: Vec<TextSize>,
    /// Total text length in bytes.
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(TextSize::new(i as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Byte offset where `line` starts, clamped to the last line.
    pub fn line_start(&self, line: u32) -> TextSize {
        let idx = (line as usize).min(self.line_starts.len() - 1);
        self.line_starts[idx]
    }

    /// Convert a byte offset into a line/character position.
    ///
    /// The character column is counted in chars from the line start, which
    /// requires the original text the index was built from.
    pub fn position(&self, text: &str, offset: TextSize) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next_line) => next_line - 1,
        };
        let line_start = self.line_starts[line];
        let column = text[usize::from(line_start)..usize::from(offset)]
            .chars()
            .count() as u32;
        Position::new(line as u32, column)
    }

    /// Convert a byte range into a line/character range.
    pub fn range(&self, text: &str, range: TextRange) -> Range {
        Range::new(
            self.position(text, range.start()),
            self.position(text, range.end()),
        )
    }

    /// Convert a line/character position back into a byte offset.
    ///
    /// Positions past the end of a line clamp to the line end; lines past the
    /// end of the document clamp to the document end.
    pub fn offset(&self, text: &str, position: Position) -> TextSize {
        if position.line as usize >= self.line_starts.len() {
            return self.len;
        }
        let line_start = self.line_starts[position.line as usize];
        let line_end = self
            .line_starts
            .get(position.line as usize + 1)
            .copied()
            .unwrap_or(self.len);
        let line_text = &text[usize::from(line_start)..usize::from(line_end)];
        let mut offset = line_start;
        for (taken, c) in line_text.chars().enumerate() {
            if taken as u32 >= position.character || c == '\n' {
                break;
            }
            offset += TextSize::of(c);
        }
        offset
    }
}
