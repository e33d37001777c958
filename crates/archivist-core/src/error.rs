//! Error types for archive operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::codec::ArchiveFormat;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while creating, extracting or listing archives.
///
/// Only fatal conditions are represented here. Recoverable output
/// preparation failures are collected as
/// [`OutputWarning`](crate::report::OutputWarning) values instead.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive format is unsupported or unrecognized.
    #[error("unsupported archive format")]
    UnsupportedFormat,

    /// No reader is registered for a detected format.
    #[error("no reader available for {format} archives")]
    ReaderUnavailable {
        /// The detected format.
        format: ArchiveFormat,
    },

    /// Archive is corrupted or invalid.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Entry name escapes the extraction root.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The stored entry key.
        path: PathBuf,
    },

    /// Entry name is empty after normalization.
    #[error("invalid entry name: {name:?}")]
    InvalidEntryName {
        /// The stored entry key.
        name: String,
    },

    /// Compression level outside 1-9.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },
}

impl ArchiveError {
    /// Returns `true` if this error was raised by entry name validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use archivist_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ArchiveError::UnsupportedFormat;
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::PathTraversal { .. })
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::InvalidEntryName { name } => Some(name),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}

impl From<walkdir::Error> for ArchiveError {
    fn from(err: walkdir::Error) -> Self {
        let message = err.to_string();
        err.into_io_error().map_or_else(
            || Self::Io(std::io::Error::other(format!("walkdir error: {message}"))),
            Self::Io,
        )
    }
}
