//! Text span and line index types for source location tracking.
//!
//! Checkers report positions as byte offsets; assertions are written per line.
//! [`LineIndex`] is the bridge between the two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Byte offset into a source text.
pub type TextPos = u32;

/// A `start` + `length` byte range, as checkers report node and
/// diagnostic locations.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: TextPos,
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// `start..end`; `end` must not precede `start`.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// Exclusive end offset.
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// For slicing the text the span was taken from.
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
        write!(f, "{}+{}", self.start, self.length)
    }
}

/// An out-of-range lookup against a [`LineIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("offset {offset} is out of range for text of length {len}")]
    Offset { offset: TextPos, len: TextPos },
    #[error("line {line} is out of range for text with {line_count} lines")]
    Line { line: u32, line_count: u32 },
}

/// A 0-based line / column pair.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    /// 0-based line number.
    pub line: u32,
    /// 0-based column, in bytes from the start of the line.
    pub character: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Offset-to-line lookup for one source text.
///
/// `\n`, `\r\n` and a lone `\r` each terminate a line; `\r\n` counts once.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Offset of the first byte of every line; `line_starts[0] == 0`.
    line_starts: Vec<TextPos>,
    /// Length of the indexed text in bytes.
    len: TextPos,
}

impl LineIndex {
    /// Build a line index from source text.
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0u32];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push((i + 1) as TextPos);
                }
                b'\n' => line_starts.push((i + 1) as TextPos),
                // U+2028 LINE SEPARATOR and U+2029 PARAGRAPH SEPARATOR
                0xE2 if bytes.get(i + 1) == Some(&0x80)
                    && matches!(bytes.get(i + 2), Some(0xA8) | Some(0xA9)) =>
                {
                    i += 2;
                    line_starts.push((i + 1) as TextPos);
                }
                _ => {}
            }
            i += 1;
        }
        Self {
            line_starts,
            len: bytes.len() as TextPos,
        }
    }

    /// The 0-based line containing `pos`.
    ///
    /// The end-of-text offset is valid and belongs to the last line.
    pub fn line_of(&self, pos: TextPos) -> Result<u32, IndexError> {
        if pos > self.len {
            return Err(IndexError::Offset {
                offset: pos,
                len: self.len,
            });
        }
        Ok(match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        })
    }

    /// Line and byte column of `pos`.
    pub fn line_and_column_of(&self, pos: TextPos) -> Result<LineAndColumn, IndexError> {
        let line = self.line_of(pos)?;
        let line_start = self.line_starts[line as usize];
        Ok(LineAndColumn::new(line, pos - line_start))
    }

    /// Offset where `line` begins.
    pub fn line_start(&self, line: u32) -> Result<TextPos, IndexError> {
        self.line_starts
            .get(line as usize)
            .copied()
            .ok_or(IndexError::Line {
                line,
                line_count: self.line_count() as u32,
            })
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get all line starts.
    pub fn line_starts(&self) -> &[TextPos] {
        &self.line_starts
    }

    /// Length of the indexed text in bytes.
    pub fn text_len(&self) -> TextPos {
        self.len
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
        assert_eq!(TextSpan::from_bounds(5, 15), span);
    }

    #[test]
    fn test_line_index_lf() {
        let text = "line1\nline2\nline3";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_of(0), Ok(0));
        assert_eq!(index.line_of(5), Ok(0)); // newline char
        assert_eq!(index.line_of(6), Ok(1)); // start of line2
        assert_eq!(index.line_of(12), Ok(2));

        let lc = index.line_and_column_of(8).unwrap();
        assert_eq!(lc, LineAndColumn::new(1, 2));
    }

    #[test]
    fn test_line_index_crlf_counts_once() {
        let text = "a\r\nb\r\nc";
        let index = LineIndex::new(text);
        assert_eq!(index.line_starts(), &[0, 3, 6]);
        assert_eq!(index.line_of(1), Ok(0)); // '\r'
        assert_eq!(index.line_of(2), Ok(0)); // '\n'
        assert_eq!(index.line_of(3), Ok(1));
        assert_eq!(index.line_start(2), Ok(6));
    }

    #[test]
    fn test_line_index_unicode_separators() {
        // LS and PS are three bytes each in UTF-8.
        let index = LineIndex::new("x;\u{2028}y;\u{2029}z");
        assert_eq!(index.line_starts(), &[0, 5, 10]);
        assert_eq!(index.line_of(4), Ok(0));
        assert_eq!(index.line_of(5), Ok(1));
        assert_eq!(index.line_of(10), Ok(2));
    }

    #[test]
    fn test_line_index_lone_cr() {
        let index = LineIndex::new("a\rb\n\nc");
        assert_eq!(index.line_starts(), &[0, 2, 4, 5]);
    }

    #[test]
    fn test_line_index_trailing_newline() {
        let index = LineIndex::new("x;\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_of(3), Ok(1));
    }

    #[test]
    fn test_line_index_out_of_range() {
        let index = LineIndex::new("abc\ndef");
        assert_eq!(index.line_of(7), Ok(1));
        assert_eq!(
            index.line_of(8),
            Err(IndexError::Offset { offset: 8, len: 7 })
        );
        assert_eq!(
            index.line_start(2),
            Err(IndexError::Line {
                line: 2,
                line_count: 2
            })
        );
    }

    #[test]
    fn test_line_start_round_trips_line_of() {
        let text = "first\r\n\r\n  third\nfourth";
        let index = LineIndex::new(text);
        for line in 0..index.line_count() as u32 {
            let start = index.line_start(line).unwrap();
            assert_eq!(index.line_of(start), Ok(line));
        }
    }
}
