//! Operation reporting.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::dispatch::CompressionStrategy;

/// A recoverable failure that did not stop extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputWarning {
    /// The parent directory of a destination could not be created.
    DirectoryCreation {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },
    /// A pre-existing destination file could not be removed.
    StaleFileRemoval {
        /// File that could not be removed.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },
}

impl fmt::Display for OutputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryCreation { path, message } => {
                write!(f, "cannot create directory {}: {message}", path.display())
            }
            Self::StaleFileRemoval { path, message } => {
                write!(f, "cannot remove existing file {}: {message}", path.display())
            }
        }
    }
}

/// Report of an extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of file entries written.
    pub files_extracted: usize,

    /// Directory entries skipped.
    pub directories_skipped: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the operation.
    pub duration: Duration,

    /// Recoverable failures, in the order they occurred.
    pub warnings: Vec<OutputWarning>,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: OutputWarning) {
        self.warnings.push(warning);
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Report of an archive creation.
#[derive(Debug, Clone)]
pub struct CreationReport {
    /// Archive that was written.
    pub output: PathBuf,

    /// Strategy used to write it.
    pub strategy: CompressionStrategy,

    /// Number of files added.
    pub files_added: usize,

    /// Uncompressed bytes read from source files.
    pub bytes_read: u64,

    /// Size of the finished archive.
    pub bytes_compressed: u64,

    /// Duration of the operation.
    pub duration: Duration,
}

impl CreationReport {
    /// Creates an empty report for `output`.
    #[must_use]
    pub fn new(output: PathBuf, strategy: CompressionStrategy) -> Self {
        Self {
            output,
            strategy,
            files_added: 0,
            bytes_read: 0,
            bytes_compressed: 0,
            duration: Duration::ZERO,
        }
    }

    /// Compressed size as a fraction of the original, `0.0` when nothing was
    /// read.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_compressed as f64 / self.bytes_read as f64
    }
}
