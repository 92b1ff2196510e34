use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::FileNotFound { path } => render_file_not_found(path),
        Error::FileTooLarge { file, size_bytes, max_bytes } => {
            render_file_too_large(file, *size_bytes, *max_bytes)
        },
        Error::InvalidPosition { character, file, line, line_count } => {
            render_invalid_position(file, *line, *character, *line_count)
        },
        Error::TomlDe(e) => render_invalid_config(&e.to_string()),
        _ => render_generic(e),
    };
}

fn render_generic(e: &Error) -> String {
    return match e {
        Error::InvalidUri { path } => format!("\
# Error: Invalid URI

`{}` cannot be expressed as a `file://` URI.
", path.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Json(e) => format!("\
# Error: JSON Output

{e}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    };
}

fn render_file_not_found(path: &std::path::Path) -> String {
    return format!("\
# Error: File Not Found

`{}` does not exist.
", path.display());
}

fn render_file_too_large(file: &std::path::Path, size_bytes: u64, max_bytes: u64) -> String {
    return format!("\
# Error: File Too Large

`{}` is {size_bytes} bytes (max {max_bytes}).

## Fix

Raise the limit in `.dockref.toml`:

    max_file_size = {size_bytes}
", file.display());
}

fn render_invalid_config(reason: &str) -> String {
    return format!("\
# Error: Invalid `.dockref.toml`

{reason}

## Accepted keys

    include = [\"services/\"]             # only scan these paths
    exclude = [\"services/legacy/\"]      # skip these paths
    file_names = [\"Dockerfile\"]         # build file names
    max_file_size = 16777216            # bytes
");
}

fn render_invalid_position(
    file: &std::path::Path,
    line: u32,
    character: u32,
    line_count: usize,
) -> String {
    let last = line_count.saturating_sub(1);
    return format!("\
# Error: Position Out Of Range

Line {line} (character {character}) is past the end of `{}`.

## Fix

Lines are zero-based; the last line is {last}.
", file.display());
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn invalid_position_names_last_line() {
        let rendered = render_error(&Error::InvalidPosition {
            character: 2,
            file: PathBuf::from("Dockerfile"),
            line: 9,
            line_count: 3,
        });
        assert!(rendered.starts_with("# Error: Position Out Of Range"));
        assert!(rendered.contains("the last line is 2"));
    }

    #[test]
    fn file_too_large_suggests_limit() {
        let rendered = render_error(&Error::FileTooLarge {
            file: PathBuf::from("Dockerfile"),
            max_bytes: 4,
            size_bytes: 22,
        });
        assert!(rendered.contains("max_file_size = 22"));
    }
}
