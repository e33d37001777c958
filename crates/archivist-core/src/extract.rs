//! Entry-by-entry extraction and listing.
//!
//! Both loops skip directory entries and number the remaining ones from 1.
//! Extraction writes every file entry under the target directory; listing
//! only collects the sanitized names.

use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ArchiveError;
use crate::Result;
use crate::codec::ArchiveReader;
use crate::config::ArchiverConfig;
use crate::config::ListTotal;
use crate::config::TraversalPolicy;
use crate::prepare::prepare;
use crate::progress::ProgressEmitter;
use crate::progress::ProgressTracker;
use crate::report::ExtractionReport;
use crate::sanitize::normalize;
use crate::sanitize::sanitize;

/// Extracts every file entry of `reader` below `target_dir`.
///
/// Existing files are replaced. Each written entry publishes a progress
/// event whose `total` equals its `current`, since the final count is not
/// known while streaming; a completion event follows the last entry.
/// Recoverable preparation failures go to the report and, as they happen,
/// to warning subscribers.
///
/// # Errors
///
/// Returns the first fatal error: an entry name rejected by the traversal
/// policy, an unreadable archive or a failed content write. No completion
/// event is published in that case.
pub fn uncompress(
    reader: &mut dyn ArchiveReader,
    target_dir: &Path,
    config: &ArchiverConfig,
    emitter: &mut ProgressEmitter,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let format = reader.format();
    debug!(target = %target_dir.display(), %format, "extracting");

    let mut report = ExtractionReport::new();
    let mut tracker = ProgressTracker::new(emitter);

    reader.for_each_entry(&mut |entry| {
        if entry.is_directory() {
            report.directories_skipped += 1;
            return Ok(());
        }

        let relative = sanitize(entry.key(), config.traversal_policy)?;
        let destination = target_dir.join(relative);

        for warning in prepare(&destination) {
            tracker.warn(&warning);
            report.add_warning(warning);
        }

        let written = entry.write_to(&destination)?;
        report.files_extracted += 1;
        report.bytes_written += written;

        let current = tracker.advance();
        debug!(key = entry.key(), destination = %destination.display(), bytes = written, "extracted");
        tracker.publish(current, destination);
        Ok(())
    })?;

    tracker.complete();
    report.duration = start.elapsed();

    info!(
        files = report.files_extracted,
        bytes = report.bytes_written,
        warnings = report.warnings.len(),
        "extraction complete"
    );
    Ok(report)
}

/// Returns the sanitized names of every file entry of `reader`.
///
/// Names use the native separator. Keys rejected by the traversal policy
/// are listed as stored rather than failing, since nothing is written. One
/// progress event is published per entry; there is no completion event.
///
/// # Errors
///
/// Returns an error if the archive cannot be read or an entry name is
/// empty.
pub fn list_files(
    reader: &mut dyn ArchiveReader,
    config: &ArchiverConfig,
    emitter: &mut ProgressEmitter,
) -> Result<Vec<String>> {
    let exact_total = match config.list_total {
        ListTotal::Exact => Some(reader.file_count()?),
        ListTotal::Legacy => None,
    };

    let mut names = Vec::new();
    let mut tracker = ProgressTracker::new(emitter);

    reader.for_each_entry(&mut |entry| {
        if entry.is_directory() {
            return Ok(());
        }

        let name = listing_name(entry.key(), config.traversal_policy)?;
        let current = tracker.advance();
        let total = exact_total.unwrap_or(current + 2);
        tracker.publish(total, name.clone());
        names.push(name_string(name));
        Ok(())
    })?;

    debug!(entries = tracker.processed(), "listed archive");
    Ok(names)
}

/// Listing writes nothing, so a key the policy would reject is shown as
/// stored (with native separators) instead of failing the whole listing.
fn listing_name(key: &str, policy: TraversalPolicy) -> Result<PathBuf> {
    match sanitize(key, policy) {
        Err(ArchiveError::PathTraversal { .. }) => {
            warn!(key, "entry escapes the extraction root");
            Ok(PathBuf::from(normalize(key)))
        }
        other => other,
    }
}

fn name_string(path: PathBuf) -> String {
    path.into_os_string()
        .into_string()
        .unwrap_or_else(|raw| raw.to_string_lossy().into_owned())
}
