use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A pattern that cannot be turned into a matching expression.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern uses the version token {count} times, only one is allowed")]
    DuplicateVersionToken { count: usize },

    #[error("pattern does not compile to a valid expression: {0}")]
    Regex(#[from] regex::Error),
}

/// Failure of a single resolution pass.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("cannot list directory {}: {source}", path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum CreateError {
    #[error("{} already exists, resolve the name again", path.display())]
    Conflict { path: PathBuf },

    #[error("invalid folder name {name:?}")]
    InvalidName { name: String },

    #[error("destination '{0}' needs a host adapter")]
    UnsupportedDestination(&'static str),

    #[error("failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("preset '{0}' already exists")]
    Duplicate(String),

    #[error("preset '{0}' not found")]
    NotFound(String),

    #[error("preset file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("preset file {} is not valid: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
