//! Line-oriented tokenizer: parser directives, comments, continuations, instructions.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::classifier;
use crate::text::TextDocument;
use crate::types::{Keyword, Occurrence};

/// Byte order mark that some editors write at the start of a file.
const BOM: char = '\u{feff}';

/// Escape character used when no `escape` directive overrides it.
pub const DEFAULT_ESCAPE: char = '\\';

/// `#key=value` with optional spaces/tabs around the key and value.
/// A key containing whitespace makes the line a plain comment.
#[allow(clippy::expect_used, reason = "hardcoded pattern is a compile-time invariant")]
static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"^[ \t]*#[ \t]*([^\s=]+)[ \t]*=[ \t]*(.*?)[ \t]*$").expect("valid regex");
});

/// A parser directive from the leading comment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Directive name as written, e.g. `escape`.
    pub key: String,
    /// Absolute byte range of the key.
    pub key_span: Range<usize>,
    /// Directive value with surrounding spaces/tabs removed. May be empty.
    pub value: String,
}

/// Result of tokenizing one document.
#[derive(Debug, Clone, Default)]
pub struct Dockerfile {
    /// Directives from the leading comment block, in document order.
    pub directives: Vec<Directive>,
    /// Instructions in document order.
    pub instructions: Vec<Instruction>,
}

impl Dockerfile {
    /// Escape character in effect: the last valid `escape` directive wins.
    pub fn escape(&self) -> char {
        return self
            .directives
            .iter()
            .rev()
            .find_map(escape_from_directive)
            .unwrap_or(DEFAULT_ESCAPE);
    }
}

/// One logical instruction after continuation joining.
#[derive(Debug, Clone)]
pub struct Instruction {
    /// Argument bytes with continuation escapes and terminators removed.
    pub arguments: String,
    /// Document offset of every byte in `arguments`.
    argument_offsets: Vec<usize>,
    /// Classified keyword.
    pub keyword: Keyword,
    /// Absolute byte range of the keyword.
    pub keyword_span: Range<usize>,
    /// Keyword exactly as written.
    pub keyword_text: String,
}

impl Instruction {
    /// Map a span of `arguments` back to document offsets.
    /// A span joined across a continuation covers everything in between.
    pub fn document_span(&self, span: &Range<usize>) -> Option<Range<usize>> {
        if span.is_empty() {
            return None;
        }
        let start = *self.argument_offsets.get(span.start)?;
        let last = *self.argument_offsets.get(span.end.checked_sub(1)?)?;
        return Some(start..last.saturating_add(1));
    }

    /// Classify the arguments and return occurrences with document spans.
    pub fn occurrences(&self) -> Vec<Occurrence> {
        return classifier::classify(self.keyword, &self.arguments)
            .into_iter()
            .filter_map(|occurrence| {
                let span = self.document_span(&occurrence.span)?;
                return Some(Occurrence { span, ..occurrence });
            })
            .collect();
    }
}

/// Tokenize a document. Never fails: anything unrecognizable is either a
/// comment or an `Unknown` instruction.
pub fn parse(document: &TextDocument) -> Dockerfile {
    let text = document.text();
    let mut lines = document.line_ranges().to_vec();
    if text.starts_with(BOM)
        && let Some(first) = lines.first_mut()
    {
        first.start = BOM.len_utf8();
    }
    let mut parsed = Dockerfile::default();
    let mut escape = DEFAULT_ESCAPE;
    let mut idx = 0_usize;

    while let Some(range) = lines.get(idx) {
        let line = text.get(range.clone()).unwrap_or("");
        if line.trim().is_empty() {
            idx = idx.saturating_add(1);
            continue;
        }
        if is_comment(line) {
            if parsed.instructions.is_empty()
                && let Some(directive) = parse_directive(line, range.start)
            {
                if let Some(new_escape) = escape_from_directive(&directive) {
                    escape = new_escape;
                }
                tracing::debug!(key = %directive.key, value = %directive.value, "directive");
                parsed.directives.push(directive);
            }
            idx = idx.saturating_add(1);
            continue;
        }

        let (instruction, next) = read_instruction(text, &lines, idx, escape);
        tracing::trace!(keyword = %instruction.keyword_text, "instruction");
        parsed.instructions.push(instruction);
        idx = next;
    }

    return parsed;
}

/// Whether the first non-blank character (spaces/tabs) is `#`.
fn is_comment(line: &str) -> bool {
    return line.trim_start_matches([' ', '\t']).starts_with('#');
}

/// The escape character an `escape` directive selects, if it selects one.
fn escape_from_directive(directive: &Directive) -> Option<char> {
    if !directive.key.eq_ignore_ascii_case("escape") {
        return None;
    }
    return match directive.value.chars().next() {
        Some(c @ ('`' | '\\')) => Some(c),
        _ => None,
    };
}

/// Parse a comment line as a directive. `offset` is the line's document offset.
fn parse_directive(line: &str, offset: usize) -> Option<Directive> {
    let captures = DIRECTIVE.captures(line)?;
    let key = captures.get(1)?;
    let value = captures.get(2).map_or("", |m| return m.as_str());

    return Some(Directive {
        key: key.as_str().to_string(),
        key_span: offset.saturating_add(key.start())..offset.saturating_add(key.end()),
        value: value.to_string(),
    });
}

/// Split a physical line into the part that belongs to the instruction and
/// whether it continues onto the next line.
fn strip_continuation(line: &str, escape: char) -> (&str, bool) {
    let trimmed = line.trim_end();
    return match trimmed.strip_suffix(escape) {
        Some(body) => (body, true),
        None => (line, false),
    };
}

/// Read one instruction starting at line `first`.
/// Returns the instruction and the index of the first line after it.
fn read_instruction(
    text: &str,
    lines: &[Range<usize>],
    first: usize,
    escape: char,
) -> (Instruction, usize) {
    let first_range = lines.get(first).cloned().unwrap_or(0..0);
    let first_line = text.get(first_range.clone()).unwrap_or("");
    let (first_body, mut continues) = strip_continuation(first_line, escape);

    let indent = first_body.len().saturating_sub(first_body.trim_start().len());
    let keyword_len = first_body
        .get(indent..)
        .unwrap_or("")
        .find(char::is_whitespace)
        .unwrap_or_else(|| return first_body.len().saturating_sub(indent));
    let keyword_start = first_range.start.saturating_add(indent);
    let keyword_end = keyword_start.saturating_add(keyword_len);
    let keyword_text = text.get(keyword_start..keyword_end).unwrap_or("").to_string();

    let mut arguments = String::new();
    let mut argument_offsets = Vec::new();
    let rest = first_body.get(indent.saturating_add(keyword_len)..).unwrap_or("");
    push_segment(&mut arguments, &mut argument_offsets, rest, keyword_end);

    let mut next = first.saturating_add(1);
    while continues {
        let Some(range) = lines.get(next) else {
            break;
        };
        next = next.saturating_add(1);
        let line = text.get(range.clone()).unwrap_or("");
        // Blank and comment lines inside a continuation are dropped.
        if line.trim().is_empty() || is_comment(line) {
            continue;
        }
        let (body, more) = strip_continuation(line, escape);
        push_segment(&mut arguments, &mut argument_offsets, body, range.start);
        continues = more;
    }

    let instruction = Instruction {
        arguments,
        argument_offsets,
        keyword: Keyword::parse(&keyword_text),
        keyword_span: keyword_start..keyword_end,
        keyword_text,
    };
    return (instruction, next);
}

/// Append a line segment to the joined arguments, recording every byte's offset.
fn push_segment(arguments: &mut String, offsets: &mut Vec<usize>, segment: &str, start: usize) {
    arguments.push_str(segment);
    offsets.extend((0..segment.len()).map(|i| return start.saturating_add(i)));
}
