//! Text span and range types for source location tracking.
//!
//! Positions are byte offsets into the UTF-8 source text. Line/character
//! pairs are reported in UTF-16 code units so they line up with what
//! editors and the JavaScript world expect.

use std::fmt;
use std::ops::Range;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A span in source text, defined by a start position and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end.saturating_sub(start),
        }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether this span contains the given position.
    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Convert to a byte range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// A half-open `[pos, end)` range. Every AST node and node list carries one.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextRange {
    /// The byte offset where this range starts (inclusive).
    pub pos: TextPos,
    /// The byte offset where this range ends (exclusive).
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        Self { pos, end }
    }

    /// An empty range at a position. Missing nodes are stamped with these.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    #[inline]
    pub fn len(&self) -> TextPos {
        self.end.saturating_sub(self.pos)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    #[inline]
    pub fn to_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.pos, self.end)
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }

    /// Whether `other` lies entirely within this range.
    #[inline]
    pub fn encloses(&self, other: TextRange) -> bool {
        self.pos <= other.pos && other.end <= self.end
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

impl From<TextRange> for TextSpan {
    fn from(range: TextRange) -> Self {
        range.to_span()
    }
}

impl From<TextSpan> for TextRange {
    fn from(span: TextSpan) -> Self {
        TextRange::new(span.start, span.end())
    }
}

/// Zero-based line and character of a position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineAndCharacter {
    pub line: u32,
    /// Column in UTF-16 code units.
    pub character: u32,
}

impl LineAndCharacter {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Whether `ch` terminates a line (LF, CR, LS, PS).
#[inline]
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Compute the byte offsets at which each line of `text` begins.
///
/// `\r\n` counts as one break. U+2028 and U+2029 are breaks too; their UTF-8
/// encoding starts with 0xE2, so the memchr scan stops on that lead byte and
/// decodes the character to decide.
pub fn compute_line_starts(text: &str) -> Vec<TextPos> {
    let bytes = text.as_bytes();
    let mut line_starts = vec![0];
    let mut pos = 0;
    while let Some(offset) = memchr::memchr3(b'\n', b'\r', 0xE2, &bytes[pos..]) {
        let at = pos + offset;
        match bytes[at] {
            b'\r' => {
                pos = if bytes.get(at + 1) == Some(&b'\n') { at + 2 } else { at + 1 };
                line_starts.push(pos as TextPos);
            }
            b'\n' => {
                pos = at + 1;
                line_starts.push(pos as TextPos);
            }
            _ => {
                pos = at + 1;
                if let Some(ch) = text.get(at..).and_then(|rest| rest.chars().next()) {
                    if is_line_break(ch) {
                        pos = at + ch.len_utf8();
                        line_starts.push(pos as TextPos);
                    }
                }
            }
        }
    }
    line_starts
}

/// Line-start table for one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMap {
    line_starts: Vec<TextPos>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        Self {
            line_starts: compute_line_starts(text),
        }
    }

    /// Zero-based line containing `pos`.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => line.saturating_sub(1) as u32,
        }
    }

    /// Map a byte offset to a line and a UTF-16 column. `text` must be the
    /// text this map was built from.
    pub fn line_and_character_of(&self, text: &str, pos: TextPos) -> LineAndCharacter {
        let pos = pos.min(text.len() as TextPos);
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize] as usize;
        let character = text
            .get(line_start..pos as usize)
            .map_or(pos as usize - line_start, |slice| slice.encode_utf16().count());
        LineAndCharacter::new(line, character as u32)
    }

    /// Inverse of [`LineMap::line_and_character_of`]. Positions past the end
    /// of a line clamp to the start of the next one.
    pub fn position_of(&self, text: &str, line: u32, character: u32) -> TextPos {
        let Some(&line_start) = self.line_starts.get(line as usize) else {
            return text.len() as TextPos;
        };
        let line_end = self
            .line_starts
            .get(line as usize + 1)
            .copied()
            .unwrap_or(text.len() as TextPos);
        let mut units = 0u32;
        let mut pos = line_start;
        for ch in text[line_start as usize..line_end as usize].chars() {
            if units >= character {
                break;
            }
            units += ch.len_utf16() as u32;
            pos += ch.len_utf8() as TextPos;
        }
        pos
    }

    pub fn line_start(&self, line: u32) -> TextPos {
        self.line_starts[line as usize]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_starts(&self) -> &[TextPos] {
        &self.line_starts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span() {
        let span = TextSpan::new(5, 10);
        assert_eq!(span.end(), 15);
        assert!(span.contains(5));
        assert!(span.contains(14));
        assert!(!span.contains(15));
    }

    #[test]
    fn test_text_range_encloses() {
        let outer = TextRange::new(2, 10);
        assert!(outer.encloses(TextRange::new(2, 10)));
        assert!(outer.encloses(TextRange::empty(4)));
        assert!(!outer.encloses(TextRange::new(1, 4)));
        assert!(!outer.encloses(TextRange::new(9, 11)));
    }

    #[test]
    fn test_line_starts_mixed_breaks() {
        let text = "a\r\nb\rc\nd\u{2028}e";
        assert_eq!(compute_line_starts(text), vec![0, 3, 5, 7, 11]);
    }

    #[test]
    fn test_line_map() {
        let text = "line1\nline2\nline3";
        let map = LineMap::new(text);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(5), 0);
        assert_eq!(map.line_of(6), 1);
        assert_eq!(map.line_of(12), 2);

        let lc = map.line_and_character_of(text, 8);
        assert_eq!(lc, LineAndCharacter::new(1, 2));
    }

    #[test]
    fn test_character_counts_utf16_units() {
        let text = "x\n\u{1F600}y";
        let map = LineMap::new(text);
        // The emoji is 4 bytes and 2 UTF-16 units.
        let lc = map.line_and_character_of(text, 6);
        assert_eq!(lc, LineAndCharacter::new(1, 2));
        assert_eq!(map.position_of(text, 1, 2), 6);
    }
}
