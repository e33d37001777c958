//! One-shot operations using a default [`Archiver`].
//!
//! These functions have no progress subscribers; use [`Archiver`] directly
//! to observe progress or change the configuration.

use std::path::Path;
use std::path::PathBuf;

use crate::Archiver;
use crate::CompressionKind;
use crate::CreationReport;
use crate::ExtractionReport;
use crate::Result;

/// Compresses `source` into a ZIP archive at `target`.
///
/// # Errors
///
/// Returns an error if `target` cannot be written or a source file cannot
/// be read.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = archivist_core::compress("site.zip", "./public")?;
/// println!("{} files, {} bytes", report.files_added, report.bytes_compressed);
/// # Ok(())
/// # }
/// ```
pub fn compress<P: AsRef<Path>, Q: AsRef<Path>>(target: P, source: Q) -> Result<CreationReport> {
    compress_as(target, source, CompressionKind::Zip)
}

/// Compresses `source` into `target` using the strategy for `kind`.
///
/// # Errors
///
/// Returns an error if `target` cannot be written or a source file cannot
/// be read.
pub fn compress_as<P: AsRef<Path>, Q: AsRef<Path>>(
    target: P,
    source: Q,
    kind: CompressionKind,
) -> Result<CreationReport> {
    Archiver::new().compress(target, source, kind)
}

/// Compresses `files` into a stream archive at `target`.
///
/// # Errors
///
/// Returns an error if `target` cannot be written or a file cannot be read.
pub fn compress_files<P: AsRef<Path>>(target: P, files: &[PathBuf]) -> Result<CreationReport> {
    Archiver::new().compress_files(target, files)
}

/// Extracts `source` into `target_dir`.
///
/// # Errors
///
/// Returns an error if the archive cannot be read, an entry name is
/// rejected, or a file cannot be written.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = archivist_core::uncompress("backup.tar.gz", "/tmp/restore")?;
/// for warning in &report.warnings {
///     eprintln!("warning: {warning}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn uncompress<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    target_dir: Q,
) -> Result<ExtractionReport> {
    Archiver::new().uncompress(source, target_dir)
}

/// Lists the file entries of `source`.
///
/// # Errors
///
/// Returns an error if the archive cannot be read or an entry name is
/// rejected.
pub fn list_files<P: AsRef<Path>>(source: P) -> Result<Vec<String>> {
    Archiver::new().list_files(source)
}
