//! Destination preparation before an entry is written.
//!
//! Both steps are best effort. Failures are logged and returned as
//! [`OutputWarning`] values; the subsequent write decides whether the entry
//! actually fails.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

use crate::report::OutputWarning;

/// Ensures the parent directory of `destination` exists and removes any file
/// already stored at `destination`.
///
/// Returned warnings are in the order the failures happened.
///
/// # Examples
///
/// ```no_run
/// use archivist_core::prepare::prepare;
/// use std::path::Path;
///
/// let warnings = prepare(Path::new("/tmp/out/a/b.txt"));
/// assert!(warnings.is_empty());
/// ```
#[must_use]
pub fn prepare(destination: &Path) -> Vec<OutputWarning> {
    let mut warnings = Vec::new();

    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
        && let Err(err) = fs::create_dir_all(parent)
    {
        warn!(path = %parent.display(), error = %err, "failed to create directory");
        warnings.push(OutputWarning::DirectoryCreation {
            path: parent.to_path_buf(),
            message: err.to_string(),
        });
    }

    if let Err(err) = fs::remove_file(destination)
        && err.kind() != ErrorKind::NotFound
    {
        warn!(path = %destination.display(), error = %err, "failed to remove existing file");
        warnings.push(OutputWarning::StaleFileRemoval {
            path: destination.to_path_buf(),
            message: err.to_string(),
        });
    }

    warnings
}
