//! CLI commands for dockref: rename, references, symbols, scan.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dockref::config::Config;
use dockref::error::Error;
use dockref::text::TextDocument;
use dockref::{rename as engine, scanner, symbols as symbol_list};
use lsp_types::{Position, Range, SymbolInformation, SymbolKind, Url};
use serde::Serialize;

/// Exit code when the position is not on a renameable name.
const EXIT_NO_SYMBOL: u8 = 1;

/// Symbols of one build file, as listed by `scan --json`.
#[derive(Serialize)]
struct FileSymbols {
    /// Path relative to the working directory.
    path: PathBuf,
    /// Directives and instructions in document order.
    symbols: Vec<SymbolInformation>,
}

/// Fail with `InvalidPosition` when the line does not exist in the document.
/// Characters past the end of a line are left to the engine, which clamps them.
///
/// # Errors
///
/// Returns `Error::InvalidPosition` for a line past the end.
fn ensure_line_exists(file: &Path, document: &TextDocument, position: Position) -> Result<(), Error> {
    let exists = usize::try_from(position.line).is_ok_and(|line| return line < document.line_count());
    if exists {
        return Ok(());
    }
    return Err(Error::InvalidPosition {
        character: position.character,
        file: file.to_path_buf(),
        line: position.line,
        line_count: document.line_count(),
    });
}

/// Build a `file://` URI for a path on disk.
///
/// # Errors
///
/// Returns `Error::Io` if the path cannot be canonicalized,
/// or `Error::InvalidUri` if the result is not a valid file URI.
fn file_uri(path: &Path) -> Result<Url, Error> {
    let absolute = std::fs::canonicalize(path)?;
    return Url::from_file_path(&absolute).map_err(|()| return Error::InvalidUri { path: absolute.clone() });
}

/// `line:character-line:character`, zero-based.
fn format_range(range: &Range) -> String {
    return format!(
        "{}:{}-{}:{}",
        range.start.line, range.start.character, range.end.line, range.end.character
    );
}

/// Short label for the symbol kinds this crate emits.
fn kind_label(kind: SymbolKind) -> &'static str {
    if kind == SymbolKind::PROPERTY {
        return "directive";
    }
    if kind == SymbolKind::FUNCTION {
        return "instruction";
    }
    return "symbol";
}

/// Load config from the working directory and read one build file.
///
/// # Errors
///
/// Returns config errors, or read errors from `scanner::read_build_file`.
fn load_document(file: &Path) -> Result<TextDocument, Error> {
    let config = Config::load(Path::new("."))?;
    return scanner::read_build_file(file, &config);
}

/// Print every symbol in `symbols`, one per line, indented by `indent`.
fn print_symbols(symbols: &[SymbolInformation], indent: &str) {
    for symbol in symbols {
        println!(
            "{indent}{:<11} {:<12} {}",
            kind_label(symbol.kind),
            symbol.name,
            format_range(&symbol.location.range)
        );
    }
}

/// List the ranges of every occurrence grouped with the one at `position`.
///
/// # Errors
///
/// Returns read, position, or serialization errors.
pub fn references(file: &Path, position: Position, json: bool) -> Result<ExitCode, Error> {
    let document = load_document(file)?;
    ensure_line_exists(file, &document, position)?;

    let ranges = engine::references(&document, position);
    if json {
        println!("{}", serde_json::to_string_pretty(&ranges)?);
    } else {
        for range in &ranges {
            println!("{}:{}", file.display(), format_range(range));
        }
    }

    if ranges.is_empty() {
        eprintln!("no stage or variable at {}:{}", position.line, position.character);
        return Ok(ExitCode::from(EXIT_NO_SYMBOL));
    }
    return Ok(ExitCode::SUCCESS);
}

/// Compute rename edits at `position`, print them, and optionally write them back.
///
/// # Errors
///
/// Returns read, position, serialization, or write errors.
pub fn rename(
    file: &Path,
    position: Position,
    new_name: &str,
    write: bool,
    json: bool,
) -> Result<ExitCode, Error> {
    let document = load_document(file)?;
    ensure_line_exists(file, &document, position)?;

    let edits = engine::rename(&document, position, new_name);
    if edits.is_empty() {
        eprintln!("no stage or variable at {}:{}", position.line, position.character);
        return Ok(ExitCode::from(EXIT_NO_SYMBOL));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&edits)?);
    } else {
        for edit in &edits {
            println!("{}:{} {}", file.display(), format_range(&edit.range), edit.new_text);
        }
    }

    if write {
        let updated = engine::apply_edits(&document, &edits);
        std::fs::write(file, updated)?;
        let count = edits.len();
        eprintln!("Renamed {count} occurrences in {}", file.display());
    }

    return Ok(ExitCode::SUCCESS);
}

/// Walk the working directory and list the symbols of every build file.
///
/// # Errors
///
/// Returns config, scan, read, or serialization errors.
pub fn scan(json: bool) -> Result<ExitCode, Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let paths = scanner::scan(&root, &config)?;

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let disk_path = root.join(&path);
        let document = scanner::read_build_file(&disk_path, &config)?;
        let uri = file_uri(&disk_path)?;
        let symbols = symbol_list::parse_symbol_information(&document, &uri);
        files.push(FileSymbols { path, symbols });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(ExitCode::SUCCESS);
    }

    for file in &files {
        println!("{}", file.path.display());
        print_symbols(&file.symbols, "  ");
    }
    let count = files.len();
    println!();
    println!("{count} build files");
    return Ok(ExitCode::SUCCESS);
}

/// List the directives and instructions of one build file.
///
/// # Errors
///
/// Returns read, URI, or serialization errors.
pub fn symbols(file: &Path, json: bool) -> Result<ExitCode, Error> {
    let document = load_document(file)?;
    let uri = file_uri(file)?;
    let symbols = symbol_list::parse_symbol_information(&document, &uri);

    if json {
        println!("{}", serde_json::to_string_pretty(&symbols)?);
    } else {
        print_symbols(&symbols, "");
    }
    return Ok(ExitCode::SUCCESS);
}
