//! Per-instruction grammars that pick stage and variable names out of argument text.
//!
//! Classification is a pure mapping from `(keyword, arguments)` to occurrences
//! whose spans are relative to the argument text. The instruction maps them
//! back to document offsets.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Keyword, Occurrence, OccurrenceKind};

/// Flag on `COPY` naming the source stage.
const FROM_FLAG: &str = "--from=";

/// `${name}`, `${name:modifier}` or `$name`. Group 1 is the braced name,
/// group 2 the bare name. An unterminated `${name` matches neither.
#[allow(clippy::expect_used, reason = "hardcoded pattern is a compile-time invariant")]
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"\$(?:\{([A-Za-z0-9_]+)[}:]|([A-Za-z0-9_]+))").expect("valid regex");
});

/// Extract every occurrence from one instruction's arguments.
///
/// The keyword picks the declaration grammar; variable references are
/// scanned in every instruction regardless of keyword.
pub fn classify(keyword: Keyword, arguments: &str) -> Vec<Occurrence> {
    let mut occurrences = match keyword {
        Keyword::Arg | Keyword::Env => classify_variable_declaration(arguments),
        Keyword::Copy => classify_copy(arguments),
        Keyword::From => classify_from(arguments),
        _ => Vec::new(),
    };
    occurrences.extend(scan_variable_references(arguments));
    return occurrences;
}

/// `COPY [--flag...] <src>... <dest>`: the value of every leading `--from=`
/// flag is a stage reference. Positional arguments never are, and neither is
/// a value built from a variable expansion such as `--from=${base}`.
fn classify_copy(arguments: &str) -> Vec<Occurrence> {
    return tokens(arguments)
        .take_while(|token| return slice(arguments, token).starts_with("--"))
        .filter_map(|token| {
            let value = slice(arguments, &token).strip_prefix(FROM_FLAG)?;
            if value.is_empty() || value.contains('$') {
                return None;
            }
            let start = token.start.saturating_add(FROM_FLAG.len());
            return Some(occurrence(arguments, OccurrenceKind::StageReference, start..token.end));
        })
        .collect();
}

/// `FROM [--flag...] <image> [AS <name>]`.
fn classify_from(arguments: &str) -> Vec<Occurrence> {
    let mut words = tokens(arguments).skip_while(|token| return slice(arguments, token).starts_with("--"));

    let (Some(_image), Some(as_keyword), Some(name)) = (words.next(), words.next(), words.next()) else {
        return Vec::new();
    };
    if !slice(arguments, &as_keyword).eq_ignore_ascii_case("as") {
        return Vec::new();
    }
    return vec![occurrence(arguments, OccurrenceKind::StageDeclaration, name)];
}

/// `ARG <name>[=<value>]...` and `ENV <name>=<value>...`: every token's text
/// up to its first `=` is a declared name. In the legacy `ENV <name> <value>`
/// form the first token has no `=` and is the only declaration.
fn classify_variable_declaration(arguments: &str) -> Vec<Occurrence> {
    let mut words = tokens(arguments).peekable();
    let Some(first) = words.peek().cloned() else {
        return Vec::new();
    };
    if !slice(arguments, &first).contains('=') {
        return declaration(arguments, first).into_iter().collect();
    }
    return words
        .filter_map(|token| {
            let name_len = slice(arguments, &token).find('=')?;
            return declaration(arguments, token.start..token.start.saturating_add(name_len));
        })
        .collect();
}

/// A variable declaration over `span`, unless the name is empty.
fn declaration(arguments: &str, span: Range<usize>) -> Option<Occurrence> {
    if span.is_empty() {
        return None;
    }
    return Some(occurrence(arguments, OccurrenceKind::VariableDeclaration, span));
}

/// Build an occurrence whose name is the spanned text.
fn occurrence(arguments: &str, kind: OccurrenceKind, span: Range<usize>) -> Occurrence {
    return Occurrence {
        kind,
        name: slice(arguments, &span).to_string(),
        span,
    };
}

/// Every `$name` and `${name}` in the text. Quotes are not special:
/// `'$var'` and `"$var"` are both references.
pub fn scan_variable_references(arguments: &str) -> Vec<Occurrence> {
    return VARIABLE
        .captures_iter(arguments)
        .filter_map(|captures| {
            let name = captures.get(1).or_else(|| return captures.get(2))?;
            return Some(occurrence(arguments, OccurrenceKind::VariableReference, name.range()));
        })
        .collect();
}

/// Text of a span, empty if the span is not on a char boundary.
fn slice<'a>(text: &'a str, span: &Range<usize>) -> &'a str {
    return text.get(span.clone()).unwrap_or("");
}

/// Byte ranges of the whitespace-separated tokens in `text`.
fn tokens(text: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    let mut rest = 0_usize;
    return std::iter::from_fn(move || {
        let remaining = text.get(rest..)?;
        let skipped = remaining.len().saturating_sub(remaining.trim_start().len());
        let start = rest.saturating_add(skipped);
        let word = text.get(start..)?;
        if word.is_empty() {
            return None;
        }
        let len = word.find(char::is_whitespace).unwrap_or(word.len());
        rest = start.saturating_add(len);
        return Some(start..rest);
    });
}
