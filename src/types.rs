/// Core domain types for Dockerfile instructions and symbol occurrences.
use std::ops::Range;

/// Instruction keyword, matched case-insensitively.
/// Anything the builder does not know parses as `Unknown` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `ADD <src> <dest>`
    Add,
    /// `ARG <name>[=<default>]`
    Arg,
    /// `CMD <command>`
    Cmd,
    /// `COPY [--from=<stage>] <src> <dest>`
    Copy,
    /// `ENTRYPOINT <command>`
    Entrypoint,
    /// `ENV <name>=<value>` or `ENV <name> <value>`
    Env,
    /// `EXPOSE <port>`
    Expose,
    /// `FROM <image> [AS <name>]`
    From,
    /// `HEALTHCHECK <options> CMD <command>`
    Healthcheck,
    /// `LABEL <key>=<value>`
    Label,
    /// `MAINTAINER <name>`
    Maintainer,
    /// `ONBUILD <instruction>`
    Onbuild,
    /// `RUN <command>`
    Run,
    /// `SHELL <json array>`
    Shell,
    /// `STOPSIGNAL <signal>`
    Stopsignal,
    /// Any keyword not listed here.
    Unknown,
    /// `USER <user>[:<group>]`
    User,
    /// `VOLUME <path>`
    Volume,
    /// `WORKDIR <path>`
    Workdir,
}

impl Keyword {
    /// Map the keyword as written in the document to its variant.
    pub fn parse(word: &str) -> Self {
        return match word.to_ascii_uppercase().as_str() {
            "ADD" => Self::Add,
            "ARG" => Self::Arg,
            "CMD" => Self::Cmd,
            "COPY" => Self::Copy,
            "ENTRYPOINT" => Self::Entrypoint,
            "ENV" => Self::Env,
            "EXPOSE" => Self::Expose,
            "FROM" => Self::From,
            "HEALTHCHECK" => Self::Healthcheck,
            "LABEL" => Self::Label,
            "MAINTAINER" => Self::Maintainer,
            "ONBUILD" => Self::Onbuild,
            "RUN" => Self::Run,
            "SHELL" => Self::Shell,
            "STOPSIGNAL" => Self::Stopsignal,
            "USER" => Self::User,
            "VOLUME" => Self::Volume,
            "WORKDIR" => Self::Workdir,
            _ => Self::Unknown,
        };
    }
}

/// A named span found inside an instruction's arguments.
///
/// The span covers the name characters only, never the surrounding
/// punctuation (`$`, `{`, `}`, `--from=`, `AS `).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// What kind of name this is.
    pub kind: OccurrenceKind,
    /// The literal name text.
    pub name: String,
    /// Byte range of the name. Relative to the argument text when produced by
    /// the classifier, absolute in the document once mapped by the instruction.
    pub span: Range<usize>,
}

impl Occurrence {
    /// Whether the byte offset falls inside the span (end exclusive).
    pub fn contains(&self, offset: usize) -> bool {
        return self.span.contains(&offset);
    }
}

/// Every kind of renameable occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceKind {
    /// The alias in `FROM <image> AS <name>`.
    StageDeclaration,
    /// The value of `COPY --from=<name>`.
    StageReference,
    /// The name in `ARG <name>` or `ENV <name>`.
    VariableDeclaration,
    /// A `$name` or `${name}` expansion.
    VariableReference,
}

impl OccurrenceKind {
    /// The family this kind is grouped with during rename.
    pub const fn family(self) -> SymbolFamily {
        return match self {
            Self::StageDeclaration | Self::StageReference => SymbolFamily::Stage,
            Self::VariableDeclaration | Self::VariableReference => SymbolFamily::Variable,
        };
    }
}

/// Declarations and references of the same family share one namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolFamily {
    /// Build stage names.
    Stage,
    /// `ARG` and `ENV` variables.
    Variable,
}
