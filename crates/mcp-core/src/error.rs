//! Error types for MCP prompt sync.
//!
//! Only fatal preconditions and configuration problems surface as `Error`.
//! Parsing and emission degrade to partial results with diagnostics instead,
//! and per-file injection failures have their own error type in `mcp-inject`.
//!
//! # Examples
//!
//! ```
//! use mcp_core::{Error, Result};
//!
//! fn check_prefix(prefix: &str) -> Result<()> {
//!     if prefix.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "target file prefix cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_prefix("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for MCP prompt sync.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    ///
    /// Raised when configuration is invalid, missing required fields,
    /// or contains contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file {}", path.display())]
    ConfigParse {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: Box<toml::de::Error>,
    },

    /// Directory holding the target files does not exist.
    ///
    /// This is the only condition that aborts a whole run.
    #[error("Target directory not found: {}", path.display())]
    TargetDirNotFound {
        /// Expected directory path
        path: PathBuf,
    },

    /// I/O error with the path that caused it.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "empty marker".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. } | Self::ConfigParse { .. })
    }

    /// Returns `true` if the run cannot continue because of a missing
    /// precondition.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_core::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::TargetDirNotFound {
    ///     path: PathBuf::from("/work/.roo"),
    /// };
    /// assert!(err.is_fatal_precondition());
    /// ```
    #[must_use]
    pub const fn is_fatal_precondition(&self) -> bool {
        matches!(self, Self::TargetDirNotFound { .. })
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Result type alias for MCP prompt sync operations.
///
/// # Examples
///
/// ```
/// use mcp_core::{Result, Error};
///
/// fn validate_indent(value: usize) -> Result<usize> {
///     if value == 0 {
///         return Err(Error::ConfigError {
///             message: "indent must be positive".to_string(),
///         });
///     }
///     Ok(value)
/// }
///
/// assert!(validate_indent(2).is_ok());
/// assert!(validate_indent(0).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_detection() {
        let err = Error::ConfigError {
            message: "Invalid configuration".to_string(),
        };
        assert!(err.is_config_error());
        assert!(!err.is_fatal_precondition());
    }

    #[test]
    fn test_target_dir_not_found_is_fatal() {
        let err = Error::TargetDirNotFound {
            path: PathBuf::from("/missing/.roo"),
        };
        assert!(err.is_fatal_precondition());
        assert!(!err.is_config_error());
        assert!(err.to_string().contains("/missing/.roo"));
    }

    #[test]
    fn test_io_error_display_includes_path() {
        let err = Error::Io {
            path: PathBuf::from("system_prompt.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_io_error());
        let display = format!("{err}");
        assert!(display.contains("system_prompt.md"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_result_alias() {
        #[allow(clippy::unnecessary_wraps)]
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(Error::InvalidArgument("test error".to_string()))
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }
}
