//! Line index over a document snapshot: byte offsets to protocol positions and back.

use std::ops::Range;

use lsp_types::Position;

/// An immutable document with a precomputed line index.
///
/// `\r\n`, bare `\r` and bare `\n` all terminate a line. Positions use
/// zero-based lines and UTF-16 code-unit columns, the way editors send them.
/// Everything above this module works on byte offsets and converts at the edge.
#[derive(Debug, Clone)]
pub struct TextDocument {
    /// Content range of every line, terminator excluded.
    lines: Vec<Range<usize>>,
    /// The full document text.
    text: String,
}

impl TextDocument {
    /// Number of lines. An empty document has one empty line.
    pub fn line_count(&self) -> usize {
        return self.lines.len();
    }

    /// Content ranges of every line, in order.
    pub fn line_ranges(&self) -> &[Range<usize>] {
        return &self.lines;
    }

    /// Index the given text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = split_lines(&text);
        return Self { lines, text };
    }

    /// Byte offset of a position.
    ///
    /// Returns `None` when the line does not exist. A character past the end of
    /// the line clamps to the line's content end; a character that lands inside
    /// a surrogate pair rounds up to the next code point.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        let line = usize::try_from(position.line).ok()?;
        let range = self.lines.get(line)?;
        let target = usize::try_from(position.character).unwrap_or(usize::MAX);
        let content = self.text.get(range.clone())?;

        let mut units = 0_usize;
        for (idx, ch) in content.char_indices() {
            if units >= target {
                return Some(range.start.saturating_add(idx));
            }
            units = units.saturating_add(ch.len_utf16());
        }
        return Some(range.end);
    }

    /// Position of a byte offset. Offsets inside a terminator report the end of
    /// that line's content; offsets past the end report the end of the document.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self
            .lines
            .partition_point(|r| return r.start <= offset)
            .saturating_sub(1);
        let Some(range) = self.lines.get(line) else {
            return Position::new(0, 0);
        };

        let end = offset.min(range.end);
        let prefix = self.text.get(range.start..end).unwrap_or("");
        let character = prefix.encode_utf16().count();
        return Position::new(to_u32(line), to_u32(character));
    }

    /// Protocol range of a byte span.
    pub fn range_of(&self, span: &Range<usize>) -> lsp_types::Range {
        return lsp_types::Range::new(self.position_at(span.start), self.position_at(span.end));
    }

    /// The full document text.
    pub fn text(&self) -> &str {
        return &self.text;
    }
}

/// Split text into line content ranges. Always yields at least one line.
fn split_lines(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0_usize;
    let mut idx = 0_usize;

    while let Some(&byte) = bytes.get(idx) {
        let terminator_len = match byte {
            b'\n' => 1,
            b'\r' if bytes.get(idx.saturating_add(1)) == Some(&b'\n') => 2,
            b'\r' => 1,
            _ => 0,
        };
        if terminator_len == 0 {
            idx = idx.saturating_add(1);
            continue;
        }
        lines.push(start..idx);
        idx = idx.saturating_add(terminator_len);
        start = idx;
    }

    lines.push(start..bytes.len());
    return lines;
}

/// Positions are `u32` on the wire; saturate documents beyond that.
fn to_u32(value: usize) -> u32 {
    return u32::try_from(value).unwrap_or(u32::MAX);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_has_one_line() {
        let document = TextDocument::new("");
        assert_eq!(document.line_ranges(), &[0..0]);
        assert_eq!(document.offset_at(Position::new(0, 5)), Some(0));
        assert_eq!(document.offset_at(Position::new(1, 0)), None);
    }

    #[test]
    fn all_terminators_split_lines() {
        let document = TextDocument::new("a\rb\nc\r\nd");
        assert_eq!(document.line_ranges(), &[0..1, 2..3, 4..5, 7..8]);
        assert_eq!(document.position_at(7), Position::new(3, 0));
    }

    #[test]
    fn trailing_terminator_opens_an_empty_line() {
        let document = TextDocument::new("FROM node\n");
        assert_eq!(document.line_count(), 2);
        assert_eq!(document.line_ranges().get(1), Some(&(10..10)));
    }

    #[test]
    fn offset_inside_crlf_reports_line_end() {
        let document = TextDocument::new("ab\r\ncd");
        assert_eq!(document.position_at(3), Position::new(0, 2));
        assert_eq!(document.position_at(4), Position::new(1, 0));
    }

    #[test]
    fn character_past_line_end_clamps() {
        let document = TextDocument::new("FROM node\nRUN x");
        assert_eq!(document.offset_at(Position::new(0, 40)), Some(9));
    }

    #[test]
    fn columns_count_utf16_units() {
        // U+1F600 is one char, four UTF-8 bytes, two UTF-16 units.
        let document = TextDocument::new("RUN \u{1F600} $x");
        assert_eq!(document.position_at(9), Position::new(0, 7));
        assert_eq!(document.offset_at(Position::new(0, 7)), Some(9));
        assert_eq!(document.offset_at(Position::new(0, 8)), Some(10));
        // Halfway through the surrogate pair rounds up.
        assert_eq!(document.offset_at(Position::new(0, 5)), Some(8));
    }

    #[test]
    fn range_round_trips_through_offsets() {
        let document = TextDocument::new("FROM node AS bootstrap\nFROM node");
        let range = document.range_of(&(13..22));
        assert_eq!(range.start, Position::new(0, 13));
        assert_eq!(range.end, Position::new(0, 22));
        assert_eq!(document.offset_at(range.start), Some(13));
    }
}
