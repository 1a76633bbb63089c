//! Error types for panjob-core

use std::fmt;
use std::path::PathBuf;

use panjob_config::{ConfigError, ResolveError};
use thiserror::Error;

use crate::document::DocumentError;
use crate::invoke::InvokeError;

/// A resolved value cannot be rendered into an argument token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// Structured values (sequences, mappings, tagged values) have no token form.
    #[error("`{field}.{key}` must be a scalar to become an argument, found {found}")]
    NotScalar {
        /// Field the entry belongs to (`metadata` or `pandoc_args`)
        field: &'static str,
        /// Offending key
        key: String,
        /// Kind of value that was found
        found: &'static str,
    },

    /// A metadata key pandoc would split or drop.
    #[error("`{field}` key `{key}` cannot be passed to pandoc: keys must be non-empty and must not contain `:`")]
    InvalidKey {
        /// Field the entry belongs to
        field: &'static str,
        /// Offending key
        key: String,
    },

    /// A key that is empty once leading dashes are stripped.
    #[error("`{field}` contains an empty option name")]
    EmptyKey {
        /// Field the entry belongs to
        field: &'static str,
    },
}

impl TranslateError {
    /// Path of the offending entry, e.g. `metadata.author`.
    pub fn field(&self) -> String {
        match self {
            TranslateError::NotScalar { field, key, .. }
            | TranslateError::InvalidKey { field, key } => format!("{field}.{key}"),
            TranslateError::EmptyKey { field } => field.to_string(),
        }
    }
}

/// The kind of a per-job failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The job references a preset that does not exist
    UnknownPreset,
    /// The job has an unrecognized key or a badly shaped value
    InvalidField,
    /// A resolved value could not be rendered as an argument
    Translation,
}

impl ErrorKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownPreset => "unknown preset",
            ErrorKind::InvalidField => "invalid field",
            ErrorKind::Translation => "translation error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a single job produced no argument list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Translate(#[from] TranslateError),
}

impl JobError {
    /// Classify this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            JobError::Resolve(ResolveError::UnknownPreset { .. }) => ErrorKind::UnknownPreset,
            JobError::Resolve(ResolveError::InvalidField(_)) => ErrorKind::InvalidField,
            JobError::Translate(_) => ErrorKind::Translation,
        }
    }

    /// The offending field or key, when there is one.
    pub fn field(&self) -> Option<String> {
        match self {
            JobError::Resolve(e) => e.field().map(String::from),
            JobError::Translate(e) => Some(e.field()),
        }
    }
}

#[derive(Error, Debug)]
pub enum PanjobError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error(
        "No {} found. Searched: {}",
        crate::app_config::CONFIG_FILENAME,
        .searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
    )]
    NoConfigFile { searched: Vec<PathBuf> },

    #[error("Invalid document {}: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

pub type Result<T> = std::result::Result<T, PanjobError>;
