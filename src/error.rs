//! Error and diagnostic types shared by the parser, the emitters and the bridge.

use std::fmt;
use std::path::PathBuf;

/// Fatal failures. Parsing errors abort a single block (and so its tier); they
/// never leak into other tiers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required tag is absent from a block.
    #[error("block at line {line}: missing required @{tag} tag")]
    MissingTag { tag: &'static str, line: usize },

    /// Delimiters or bracket syntax not found where the grammar expects them.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// Legacy bridge markers absent from the target file.
    #[error("markers not found: {marker}")]
    SpliceMarker { marker: String },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid glob pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            line,
            reason: reason.into(),
        }
    }

    /// Shift the line number of a block-relative error to the header line.
    pub(crate) fn at_line(self, base: usize) -> Self {
        match self {
            Error::MissingTag { tag, line } => Error::MissingTag {
                tag,
                line: line + base,
            },
            Error::MalformedInput { line, reason } => Error::MalformedInput {
                line: line + base,
                reason,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal diagnostics collected while parsing and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A type matched no mapping rule and was passed through.
    UnmappedType {
        surface: &'static str,
        function: String,
        ty: String,
    },
    /// A block without `@brief`; the descriptor is still usable.
    MissingBrief { function: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnmappedType {
                surface,
                function,
                ty,
            } => write!(f, "{surface}: `{ty}` in {function} has no mapping rule"),
            Warning::MissingBrief { function } => write!(f, "no brief found in {function}"),
        }
    }
}
