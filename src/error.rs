//! Error types for filesystem port operations
//!
//! Every failure crossing the port is an [`FsError`]. Callers on the
//! completion-callback surface only ever see its display text, so each
//! variant renders a complete, human-readable sentence that names the path.

use std::io;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FsError>;

/// Errors reported by filesystem implementers
#[derive(Debug, Error)]
pub enum FsError {
    /// The path does not resolve to anything
    #[error("No such file or directory: {path}")]
    NotFound {
        /// Path that was looked up
        path: String,
    },

    /// The process lacks permission for the operation
    #[error("Permission denied: {path}")]
    PermissionDenied {
        /// Path that was accessed
        path: String,
    },

    /// Something already occupies the path
    #[error("Path already exists: {path}")]
    AlreadyExists {
        /// Conflicting path
        path: String,
    },

    /// A path component that must be a directory is not one
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// Offending path
        path: String,
    },

    /// A file operation was attempted on a directory
    #[error("Is a directory: {path}")]
    IsADirectory {
        /// Offending path
        path: String,
    },

    /// Removal of a directory that still has entries
    #[error("Directory not empty: {path}")]
    DirectoryNotEmpty {
        /// Offending path
        path: String,
    },

    /// Disk, hardware or other OS-level I/O failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being operated on
        path: String,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// Implementer-defined failure
    #[error("{0}")]
    Other(String),
}

/// Coarse error taxonomy for callers that need to branch on failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing file or directory
    NotFound,
    /// Access was refused
    PermissionDenied,
    /// Disk or hardware failure
    Io,
    /// Anything else
    Other,
}

impl FsError {
    /// Classify an `io::Error` raised while operating on `path`
    #[must_use]
    pub fn from_io(path: impl Into<String>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            io::ErrorKind::NotADirectory => Self::NotADirectory { path },
            io::ErrorKind::IsADirectory => Self::IsADirectory { path },
            io::ErrorKind::DirectoryNotEmpty => Self::DirectoryNotEmpty { path },
            _ => Self::Io { path, source: err },
        }
    }

    /// Map this error onto the coarse taxonomy
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::Io { .. } => ErrorKind::Io,
            Self::AlreadyExists { .. }
            | Self::NotADirectory { .. }
            | Self::IsADirectory { .. }
            | Self::DirectoryNotEmpty { .. }
            | Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Check whether this error means the path does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Render a result as the string error channel: empty on success
///
/// The text for a failure is never empty, so an empty string is an
/// unambiguous success marker.
#[must_use]
pub fn error_string<T>(result: &Result<T>) -> String {
    match result {
        Ok(_) => String::new(),
        Err(e) => {
            let text = e.to_string();
            if text.is_empty() {
                "Unknown filesystem error".to_string()
            } else {
                text
            }
        }
    }
}
