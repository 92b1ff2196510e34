mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dockref::diagnostics;
use lsp_types::Position;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `DOCKREF_LOG=debug`.
const LOG_ENV: &str = "DOCKREF_LOG";

#[derive(Parser)]
#[command(name = "dockref", version, about = "Rename build stages and variables in Dockerfiles")]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

// Positional arguments are declared in command-line order.
#[derive(Subcommand)]
enum Commands {
    /// List every occurrence of the stage or variable at a position
    References {
        /// Build file to read
        file: PathBuf,
        /// Zero-based line
        line: u32,
        /// Zero-based character (UTF-16 units)
        character: u32,
        /// Print JSON ranges
        #[arg(long)]
        json: bool,
    },
    /// Rename the stage or variable at a position
    Rename {
        /// Build file to read
        file: PathBuf,
        /// Zero-based line
        line: u32,
        /// Zero-based character (UTF-16 units)
        character: u32,
        /// Replacement name, used verbatim
        new_name: String,
        /// Print JSON text edits
        #[arg(long)]
        json: bool,
        /// Apply the edits to the file
        #[arg(long)]
        write: bool,
    },
    /// List the symbols of every build file under the working directory
    Scan {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// List the directives and instructions of a build file
    Symbols {
        /// Build file to read
        file: PathBuf,
        /// Print JSON symbol information
        #[arg(long)]
        json: bool,
    },
}

/// Send `tracing` output to stderr, filtered by `DOCKREF_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_err| return EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::References { character, file, json, line } => {
            commands::references(&file, Position::new(line, character), json)
        },
        Commands::Rename { character, file, json, line, new_name, write } => {
            commands::rename(&file, Position::new(line, character), &new_name, write, json)
        },
        Commands::Scan { json } => commands::scan(json),
        Commands::Symbols { file, json } => commands::symbols(&file, json),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(3_u8)
        },
    };
}
