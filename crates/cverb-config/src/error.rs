//! Error types for preset loading, saving and checking.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Filesystem operation that a [`ConfigError::File`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    /// Reading a preset file.
    Read,
    /// Writing a preset file.
    Write,
    /// Creating a preset directory.
    CreateDir,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::CreateDir => "create directory",
        })
    }
}

/// Errors from the preset layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A preset file or directory could not be accessed.
    #[error("cannot {op} '{path}': {source}")]
    File {
        /// What was being attempted.
        op: FileOp,
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Preset text is not valid TOML or has mistyped fields.
    #[error("malformed preset TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A preset could not be rendered as TOML.
    #[error("cannot serialize preset: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No path, factory preset or preset file matched the name.
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Preset values would not build a stable reverb.
    #[error("invalid preset: {0}")]
    Invalid(#[from] ValidationError),
}

impl ConfigError {
    /// Wraps an I/O error from the filesystem operation `op` on `path`.
    pub fn file(op: FileOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            op,
            path: path.into(),
            source,
        }
    }

    /// The filesystem operation that failed, if this is a file error.
    pub fn file_op(&self) -> Option<FileOp> {
        match self {
            Self::File { op, .. } => Some(*op),
            _ => None,
        }
    }
}
