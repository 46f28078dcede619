//! Per-file injection errors.
//!
//! An `InjectError` only ever concerns one target file. Callers log it and
//! move on to the next file.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors processing a single target file.
#[derive(Error, Debug)]
pub enum InjectError {
    /// The target could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Target path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The updated content could not be written back.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The target is not valid UTF-8.
    #[error("{} is not valid UTF-8", path.display())]
    Encoding {
        /// Target path
        path: PathBuf,
        /// Decoding error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The marker pattern could not be compiled.
    #[error("Invalid marker pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl InjectError {
    /// Path of the file this error concerns, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::Encoding { path, .. } => {
                Some(path)
            }
            Self::Pattern(_) => None,
        }
    }

    /// Returns `true` for read and write failures.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Write { .. })
    }
}

/// Result alias for injection operations.
pub type Result<T> = std::result::Result<T, InjectError>;
