//! Rename entry point: resolve the occurrence under the cursor and edit its whole group.

use lsp_types::{Position, Range, TextEdit};

use crate::parser;
use crate::references::{collect_occurrences, equivalence_group, occurrence_at_offset};
use crate::text::TextDocument;
use crate::types::Occurrence;

/// Replace every edit's range in the document text.
///
/// Edits are applied back to front so earlier ranges stay valid. Ranges that do
/// not resolve to offsets in the document are skipped.
pub fn apply_edits(document: &TextDocument, edits: &[TextEdit]) -> String {
    let mut spans: Vec<(usize, usize, &str)> = edits
        .iter()
        .filter_map(|edit| {
            let start = document.offset_at(edit.range.start)?;
            let end = document.offset_at(edit.range.end)?;
            return Some((start, end, edit.new_text.as_str()));
        })
        .collect();
    spans.sort_by_key(|&(start, _, _)| return std::cmp::Reverse(start));

    let mut text = document.text().to_string();
    for (start, end, new_text) in spans {
        if start <= end && text.is_char_boundary(start) && text.is_char_boundary(end) {
            text.replace_range(start..end, new_text);
        }
    }
    return text;
}

/// The renameable occurrence under the cursor, if there is one.
///
/// The cursor must fall inside the name itself: the character right after the
/// name, or any punctuation around it, resolves to nothing.
pub fn occurrence_at(document: &TextDocument, position: Position) -> Option<Occurrence> {
    let offset = document.offset_at(position)?;
    let occurrences = collect_occurrences(&parser::parse(document));
    return occurrence_at_offset(&occurrences, offset).cloned();
}

/// Ranges of every occurrence in the same group as the one under the cursor,
/// in document order. Empty when the cursor is not on a renameable name.
pub fn references(document: &TextDocument, position: Position) -> Vec<Range> {
    let Some(offset) = document.offset_at(position) else {
        return Vec::new();
    };
    let occurrences = collect_occurrences(&parser::parse(document));
    let Some(target) = occurrence_at_offset(&occurrences, offset) else {
        return Vec::new();
    };

    let group = equivalence_group(&occurrences, target.kind.family(), &target.name);
    tracing::debug!(
        name = %target.name,
        kind = ?target.kind,
        members = group.len(),
        "resolved equivalence group"
    );
    return group.iter().map(|o| return document.range_of(&o.span)).collect();
}

/// Edits renaming the stage or variable under the cursor to `new_name`.
///
/// Querying a declaration or any of its references yields the same edits in the
/// same order. `new_name` is used verbatim. The document is never modified.
pub fn rename(document: &TextDocument, position: Position, new_name: &str) -> Vec<TextEdit> {
    return references(document, position)
        .into_iter()
        .map(|range| return TextEdit::new(range, new_name.to_string()))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OccurrenceKind;

    #[test]
    fn occurrence_under_cursor() {
        let document = TextDocument::new("FROM node AS bootstrap\nCOPY --from=bootstrap a b");
        let found = occurrence_at(&document, Position::new(1, 12));
        assert_eq!(found.map(|o| return o.kind), Some(OccurrenceKind::StageReference));
        assert!(occurrence_at(&document, Position::new(1, 11)).is_none());
        assert!(occurrence_at(&document, Position::new(5, 0)).is_none());
    }

    #[test]
    fn rename_does_not_touch_document() {
        let document = TextDocument::new("ARG v\nRUN $v");
        let edits = rename(&document, Position::new(0, 4), "w");
        assert_eq!(edits.len(), 2);
        assert_eq!(document.text(), "ARG v\nRUN $v");
        assert_eq!(apply_edits(&document, &edits), "ARG w\nRUN $w");
    }

    #[test]
    fn apply_edits_handles_length_changes() {
        let document = TextDocument::new("FROM a AS s\r\nCOPY --from=s x y");
        let edits = rename(&document, Position::new(1, 12), "stage_two");
        assert_eq!(
            apply_edits(&document, &edits),
            "FROM a AS stage_two\r\nCOPY --from=stage_two x y"
        );
    }

    #[test]
    fn cursor_on_punctuation_is_empty() {
        let document = TextDocument::new("ARG v\nUSER ${v}");
        // `$`, `{` and `}`.
        for character in [5, 6, 8] {
            assert!(rename(&document, Position::new(1, character), "x").is_empty());
        }
        assert_eq!(rename(&document, Position::new(1, 7), "x").len(), 2);
    }
}
