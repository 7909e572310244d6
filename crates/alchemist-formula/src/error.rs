//! Error taxonomy shared by the parser, the spells and the assistants.
//!
//! Every failure the engine produces is an [`AlchemyError`]. Callers that need
//! to react to the category (e.g. to pick a process exit code) use
//! [`AlchemyError::kind`], which looks through the validation wrapper added by
//! the parser.

use std::fmt;
use std::path::PathBuf;

use alchemist_git::GitError;
use thiserror::Error;

/// Errors that can occur while reading, validating or executing a formula.
#[derive(Debug, Error)]
pub enum AlchemyError {
    /// A required field was empty or absent.
    #[error("value for {field} is missing")]
    MissingValue {
        /// Name of the field as written in the formula file.
        field: &'static str,
    },

    /// A field had a structurally wrong value.
    #[error("value for {field}: {reason}")]
    InvalidValue {
        /// Name of the field as written in the formula file.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },

    /// The formula document could not be decoded into the expected shape.
    #[error("yaml decode {element}: {source}")]
    Decode {
        /// The element that was being decoded (e.g. `Formula`, `node commit`).
        element: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A command entry used a symbol that names no spell.
    #[error("unknown command {symbol:?}")]
    UnknownCommand { symbol: String },

    /// A spell failed validation at parse time.
    #[error("validate {symbol} ({position}): {source}")]
    Validate {
        /// The spell symbol, e.g. `create_file`.
        symbol: &'static str,
        /// 1-based position of the command in the formula.
        position: usize,
        #[source]
        source: Box<AlchemyError>,
    },

    /// An external process exited unsuccessfully.
    #[error("{program} {}: {source}", .args.join(" "))]
    Execution {
        program: String,
        args: Vec<String>,
        #[source]
        source: GitError,
    },

    /// A filesystem operation failed.
    #[error("{op} {}: {source}", .path.display())]
    Io {
        /// The failing operation: `stat`, `open`, `create`, `copy`, `make dir`, ...
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Streaming file content from one path to another failed.
    #[error("copy {} - {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A specialized `Result` type for formula operations.
pub type Result<T> = std::result::Result<T, AlchemyError>;

/// The category of an [`AlchemyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingValue,
    InvalidValue,
    Decode,
    Execution,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MissingValue => "missing value",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::Decode => "decode",
            ErrorKind::Execution => "execution",
            ErrorKind::Io => "i/o",
        };
        f.write_str(name)
    }
}

impl AlchemyError {
    /// Shorthand for a [`AlchemyError::MissingValue`].
    pub fn missing(field: &'static str) -> Self {
        AlchemyError::MissingValue { field }
    }

    /// Shorthand for an [`AlchemyError::InvalidValue`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        AlchemyError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`AlchemyError::Io`].
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AlchemyError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Shorthand for an [`AlchemyError::Copy`].
    pub fn copy(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AlchemyError::Copy {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    /// Shorthand for a git [`AlchemyError::Execution`].
    pub fn git(args: &[String], source: GitError) -> Self {
        AlchemyError::Execution {
            program: alchemist_git::GIT_EXE.to_string(),
            args: args.to_vec(),
            source,
        }
    }

    /// The taxonomy category of this error.
    ///
    /// Validation failures report the kind of the wrapped error; an unknown
    /// command symbol counts as a decode failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AlchemyError::MissingValue { .. } => ErrorKind::MissingValue,
            AlchemyError::InvalidValue { .. } => ErrorKind::InvalidValue,
            AlchemyError::Decode { .. } | AlchemyError::UnknownCommand { .. } => ErrorKind::Decode,
            AlchemyError::Validate { source, .. } => source.kind(),
            AlchemyError::Execution { .. } => ErrorKind::Execution,
            AlchemyError::Io { .. } | AlchemyError::Copy { .. } => ErrorKind::Io,
        }
    }
}
