//! Source positions, ranges, and locations.
//!
//! All coordinates are 0-indexed line/character pairs for LSP compatibility.

use std::sync::Arc;

/// Identity of a document in the workspace.
///
/// Cheap to clone; thousands of occurrences share the same allocation.
pub type Uri = Arc<str>;

/// A position in source code (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A span between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a range from line/character coordinates.
    pub fn from_coords(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
        Self {
            start: Position::new(start_line, start_char),
            end: Position::new(end_line, end_char),
        }
    }

    /// Check if a position falls within this range. Both ends are inclusive,
    /// matching editor cursor semantics where the caret just after the last
    /// character still touches the word.
    pub fn contains(&self, position: Position) -> bool {
        if position.line < self.start.line || position.line > self.end.line {
            return false;
        }
        if position.line == self.start.line && position.character < self.start.character {
            return false;
        }
        if position.line == self.end.line && position.character > self.end.character {
            return false;
        }
        true
    }

    /// Check if `other` lies entirely within this range.
    pub fn contains_range(&self, other: Range) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }
}

/// A range inside a particular document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub uri: Uri,
    pub range: Range,
}

impl Location {
    pub fn new(uri: Uri, range: Range) -> Self {
        Self { uri, range }
    }
}
