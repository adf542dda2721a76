//! Text range and position types for source location tracking.
//!
//! Tokens, AST nodes and errors all describe where they came from with these
//! types. Byte offsets are 0-based; lines and columns are 1-based.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Range;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A half-open byte range `[pos, end)` into the source buffer.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TextRange {
    /// The byte offset where this range starts (inclusive).
    pub pos: TextPos,
    /// The byte offset where this range ends (exclusive).
    pub end: TextPos,
}

impl TextRange {
    /// Create a new text range.
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= pos);
        Self { pos, end }
    }

    /// Create an empty range at a position.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    /// The length of this range in bytes.
    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    /// Whether this range is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// Convert to a byte range usable for slicing.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }

    /// Whether this range contains a position.
    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.pos && pos < self.end
    }

    /// Return a new range covering both this range and the other.
    pub fn cover(&self, other: &TextRange) -> TextRange {
        TextRange::new(self.pos.min(other.pos), self.end.max(other.end))
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.pos, self.end)
    }
}

/// Serialized as a two element array, `[start, end]`.
impl Serialize for TextRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.pos)?;
        tuple.serialize_element(&self.end)?;
        tuple.end()
    }
}

/// A 1-based line and column. Columns count characters, not bytes.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Compute the position of byte `offset` on the line starting at `line_start`.
    ///
    /// `offset` must lie on a char boundary at or after `line_start`.
    pub fn at(source: &str, line: u32, line_start: usize, offset: usize) -> Self {
        Self {
            line,
            column: column_of(source, line_start, offset),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Start and end positions of a node.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

impl SourceLocation {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// 1-based character column of byte `offset` relative to `line_start`.
pub fn column_of(source: &str, line_start: usize, offset: usize) -> u32 {
    let mut end = offset.min(source.len());
    while !source.is_char_boundary(end) {
        end -= 1;
    }
    let start = line_start.min(end);
    let line = source.get(start..end).unwrap_or("");
    let chars = if line.is_ascii() {
        line.len()
    } else {
        line.chars().count()
    };
    chars as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_range() {
        let range = TextRange::new(5, 15);
        assert_eq!(range.len(), 10);
        assert!(range.contains(5));
        assert!(range.contains(14));
        assert!(!range.contains(15));
        assert_eq!(range.to_range(), 5..15);
    }

    #[test]
    fn test_cover() {
        let a = TextRange::new(2, 4);
        let b = TextRange::new(8, 9);
        assert_eq!(a.cover(&b), TextRange::new(2, 9));
    }

    #[test]
    fn test_column_counts_characters() {
        let text = "x = 1\nlocal é = 2";
        assert_eq!(column_of(text, 0, 0), 1);
        assert_eq!(column_of(text, 0, 4), 5);
        // "local é " is 9 bytes but 8 characters.
        assert_eq!(column_of(text, 6, 15), 9);
    }

    #[test]
    fn test_range_serializes_as_pair() {
        let json = serde_json::to_string(&TextRange::new(3, 7)).unwrap();
        assert_eq!(json, "[3,7]");
    }
}
