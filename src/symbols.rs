//! Document symbols: parser directives and instructions as navigable entries.

use lsp_types::{Location, Range, SymbolInformation, SymbolKind, Url};

use crate::parser;
use crate::text::TextDocument;

/// List the document's directives and instructions in document order.
///
/// A directive reports its key as a property; the range starts on the key's
/// first character and ends on its last (`#escape=` spans columns 1 to 6).
/// An instruction reports its keyword, uppercased, as a function; the range
/// still covers the keyword as written.
pub fn parse_symbol_information(document: &TextDocument, uri: &Url) -> Vec<SymbolInformation> {
    let dockerfile = parser::parse(document);
    let mut symbols = Vec::with_capacity(
        dockerfile
            .directives
            .len()
            .saturating_add(dockerfile.instructions.len()),
    );

    for directive in &dockerfile.directives {
        let last = directive.key_span.end.saturating_sub(1).max(directive.key_span.start);
        let range = Range::new(
            document.position_at(directive.key_span.start),
            document.position_at(last),
        );
        symbols.push(symbol(&directive.key, SymbolKind::PROPERTY, uri, range));
    }

    for instruction in &dockerfile.instructions {
        let range = document.range_of(&instruction.keyword_span);
        let name = instruction.keyword_text.to_ascii_uppercase();
        symbols.push(symbol(&name, SymbolKind::FUNCTION, uri, range));
    }

    tracing::debug!(
        directives = dockerfile.directives.len(),
        instructions = dockerfile.instructions.len(),
        "document symbols"
    );
    return symbols;
}

/// Build a top-level symbol with no container.
#[allow(deprecated, reason = "SymbolInformation still requires the deprecated field")]
fn symbol(name: &str, kind: SymbolKind, uri: &Url, range: Range) -> SymbolInformation {
    return SymbolInformation {
        container_name: None,
        deprecated: None,
        kind,
        location: Location::new(uri.clone(), range),
        name: name.to_string(),
        tags: None,
    };
}
