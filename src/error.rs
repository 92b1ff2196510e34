/// Crate-level error types for dockref diagnostics.
use std::path::PathBuf;

/// Errors from the command-line surface: reading files, loading config,
/// writing output. The rename and symbol queries themselves never fail.
/// Each variant names the file or reason so the diagnostic needs no debugger.
#[allow(clippy::error_impl_error, reason = "crate-level error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A build file named on the command line does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Build file exceeds the configured size limit.
    #[error("file too large ({size_bytes} bytes, max {max_bytes}): {}", file.display())]
    FileTooLarge {
        /// File that exceeded the size limit.
        file: PathBuf,
        /// Maximum allowed file size in bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        size_bytes: u64,
    },

    /// The requested line is past the end of the file.
    #[error("position {line}:{character} is outside {} ({line_count} lines)", file.display())]
    InvalidPosition {
        /// Zero-based character requested.
        character: u32,
        /// File the position was requested in.
        file: PathBuf,
        /// Zero-based line requested.
        line: u32,
        /// Number of lines in the file.
        line_count: usize,
    },

    /// A path could not be turned into a `file://` URI.
    #[error("cannot build a file URI for {}", path.display())]
    InvalidUri {
        /// Path that failed to convert.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of command output failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// TOML deserialization of `.dockref.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
