//! Reference resolution and rename for Dockerfiles.
//!
//! A document is tokenized into parser directives and instructions, each
//! instruction's arguments are classified into stage and variable
//! occurrences, and a rename query collects every occurrence of the same
//! name across the whole document. Every query is a pure function of an
//! immutable [`text::TextDocument`] and never fails on malformed input.

pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod references;
pub mod rename;
pub mod scanner;
pub mod symbols;
pub mod text;
pub mod types;

pub use rename::{apply_edits, occurrence_at, rename};
pub use symbols::parse_symbol_information;
pub use text::TextDocument;
