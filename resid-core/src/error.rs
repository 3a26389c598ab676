//! Typed error handling for resid.
//!
//! Only input validation, directory traversal and configuration can fail.
//! Malformed header content never produces an error: unmatched lines and
//! bad literals are skipped by the extractor.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why an input path was rejected before analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputErrorKind {
    /// Path does not exist
    NotFound,
    /// Path exists but is neither a regular file nor a directory
    NotFileOrDir,
    /// Single file without an accepted header extension
    UnsupportedExtension,
}

impl fmt::Display for InputErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotFound => "path does not exist",
            Self::NotFileOrDir => "path is neither a file nor a directory",
            Self::UnsupportedExtension => "file is not a header file",
        };
        f.write_str(text)
    }
}

/// Main error type for resid operations.
#[derive(Error, Debug)]
pub enum ResidError {
    /// The configured input path is unusable
    #[error("Input error at {path}: {kind}")]
    Input { path: PathBuf, kind: InputErrorKind },

    /// I/O error when walking or reading files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl ResidError {
    /// Create an input error for a path.
    pub fn input(path: impl Into<PathBuf>, kind: InputErrorKind) -> Self {
        Self::Input {
            path: path.into(),
            kind,
        }
    }

    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an I/O error that has no underlying `std::io::Error`.
    pub fn io_message(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if analysis of other inputs can continue after this error.
    ///
    /// Unreadable headers and directories below the input root are skipped;
    /// a bad root path, config or argument is not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Input { path, .. } => Some(path),
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::InvalidArgument { .. } => None,
        }
    }
}

/// Convenience type alias for resid results.
pub type ResidResult<T> = Result<T, ResidError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> ResidResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> ResidResult<T> {
        self.map_err(|e| ResidError::io(path, e))
    }
}
