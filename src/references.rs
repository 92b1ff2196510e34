//! Document-wide equivalence groups of stage and variable occurrences.

use crate::parser::Dockerfile;
use crate::types::{Occurrence, SymbolFamily};

/// Classify every instruction once and return all occurrences in document
/// order, with absolute spans.
pub fn collect_occurrences(dockerfile: &Dockerfile) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = dockerfile
        .instructions
        .iter()
        .flat_map(|instruction| return instruction.occurrences())
        .collect();
    occurrences.sort_by_key(|o| return o.span.start);
    return occurrences;
}

/// Every occurrence in the same family with exactly the same name.
///
/// Names are compared case-sensitively and without regard to build stages.
/// The result keeps the input's document order.
pub fn equivalence_group<'a>(
    occurrences: &'a [Occurrence],
    family: SymbolFamily,
    name: &str,
) -> Vec<&'a Occurrence> {
    return occurrences
        .iter()
        .filter(|o| return o.kind.family() == family && o.name == name)
        .collect();
}

/// The occurrence whose span contains the byte offset, if any.
pub fn occurrence_at_offset(occurrences: &[Occurrence], offset: usize) -> Option<&Occurrence> {
    return occurrences.iter().find(|o| return o.contains(offset));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use crate::text::TextDocument;
    use crate::types::OccurrenceKind;

    fn occurrences(text: &str) -> Vec<Occurrence> {
        return collect_occurrences(&parser::parse(&TextDocument::new(text)));
    }

    #[test]
    fn occurrences_are_in_document_order() {
        let found = occurrences("ENV a=$b\nFROM x AS s\nCOPY --from=s $a .");
        let spans: Vec<_> = found.iter().map(|o| return (o.kind, o.span.clone())).collect();
        assert_eq!(
            spans,
            vec![
                (OccurrenceKind::VariableDeclaration, 4..5),
                (OccurrenceKind::VariableReference, 7..8),
                (OccurrenceKind::StageDeclaration, 19..20),
                (OccurrenceKind::StageReference, 33..34),
                (OccurrenceKind::VariableReference, 36..37),
            ]
        );
    }

    #[test]
    fn group_is_family_and_name_exact() {
        let found = occurrences("FROM x AS a\nARG a\nCOPY --from=a $a ${A} .");
        let stages = equivalence_group(&found, SymbolFamily::Stage, "a");
        assert_eq!(stages.len(), 2);
        assert!(stages.iter().all(|o| return o.kind.family() == SymbolFamily::Stage));

        let variables = equivalence_group(&found, SymbolFamily::Variable, "a");
        let spans: Vec<_> = variables.iter().map(|o| return o.span.clone()).collect();
        assert_eq!(spans, vec![16..17, 33..34]);
    }

    #[test]
    fn group_spans_stages() {
        let found = occurrences("FROM a\nARG v\nFROM b\nRUN echo $v\nFROM c\nUSER ${v}");
        assert_eq!(equivalence_group(&found, SymbolFamily::Variable, "v").len(), 3);
    }

    #[test]
    fn offset_lookup_is_end_exclusive() {
        let found = occurrences("FROM node AS bootstrap");
        assert!(occurrence_at_offset(&found, 12).is_none());
        assert!(occurrence_at_offset(&found, 13).is_some());
        assert!(occurrence_at_offset(&found, 21).is_some());
        assert!(occurrence_at_offset(&found, 22).is_none());
    }
}
