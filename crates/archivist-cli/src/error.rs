//! Error conversion utilities for CLI.
//!
//! Converts archivist-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use archivist_core::ArchiveError;
use std::path::Path;

/// Converts `ArchiveError` to user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, archive: &Path) -> anyhow::Error {
    match err {
        ArchiveError::PathTraversal { path } => {
            anyhow!(
                "Security violation: Archive '{}' contains an entry escaping the output directory: '{}'\n\
                 HINT: Use --on-traversal clamp to keep such entries inside the output directory.",
                archive.display(),
                path.display()
            )
        }
        ArchiveError::InvalidEntryName { name } => {
            anyhow!(
                "Archive '{}' contains an entry with an unusable name: {name:?}",
                archive.display()
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
        ArchiveError::UnsupportedFormat => {
            anyhow!(
                "Archive format not supported: {}\n\
                 HINT: Supported formats: zip, tar, tar.gz, gz",
                archive.display()
            )
        }
        ArchiveError::ReaderUnavailable { format } => {
            anyhow!(
                "No reader available for {format} archive '{}'\n\
                 HINT: {format} archives can only be read through a registered reader.",
                archive.display()
            )
        }
        ArchiveError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be corrupted or malformed.",
                archive.display(),
                reason
            )
        }
        err @ ArchiveError::InvalidCompressionLevel { .. } => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, archive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivist_core::ArchiveFormat;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_path_traversal_error() {
        let err = ArchiveError::PathTraversal {
            path: PathBuf::from("../../../etc/passwd"),
        };
        let converted = convert_archive_error(err, Path::new("malicious.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("escaping the output directory"));
        assert!(msg.contains("malicious.zip"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_reader_unavailable() {
        let err = ArchiveError::ReaderUnavailable {
            format: ArchiveFormat::Rar,
        };
        let converted = convert_archive_error(err, Path::new("old.rar"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("No reader available for rar"));
    }

    #[test]
    fn test_convert_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ArchiveError::Io(io_err);
        let converted = convert_archive_error(err, Path::new("archive.tar.gz"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("I/O error"));
    }

    #[test]
    fn test_compression_level_keeps_source_message() {
        let err = ArchiveError::InvalidCompressionLevel { level: 12 };
        let converted = convert_archive_error(err, Path::new("out.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("out.zip"));
        assert!(msg.contains("must be 1-9"));
    }
}
