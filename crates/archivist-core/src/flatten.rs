//! Directory flattening for the stream compression path.
//!
//! The order produced here is part of the on-disk layout of stream archives,
//! so it must stay stable: within every directory, subdirectories are fully
//! expanded first (in file-name order), then the directory's own files are
//! appended (in file-name order).

use std::cmp::Ordering;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use walkdir::DirEntry;
use walkdir::WalkDir;

use crate::Result;

/// Expands `path_base` into the list of files below it.
///
/// - a directory yields every descendant file, subdirectories before files
/// - an existing file yields itself
/// - a missing path yields an empty list
///
/// Symlinks are listed as files only when `follow_symlinks` is set and they
/// resolve to a file.
///
/// # Errors
///
/// Returns an error if a directory below `path_base` cannot be read.
///
/// # Examples
///
/// ```no_run
/// use archivist_core::flatten::flatten;
/// use std::path::Path;
///
/// for file in flatten(Path::new("./project"), false)? {
///     println!("{}", file.display());
/// }
/// # Ok::<(), archivist_core::ArchiveError>(())
/// ```
pub fn flatten(path_base: &Path, follow_symlinks: bool) -> Result<Vec<PathBuf>> {
    let exists = if follow_symlinks {
        path_base.exists()
    } else {
        path_base.symlink_metadata().is_ok()
    };
    if !exists {
        debug!(path = %path_base.display(), "nothing to flatten");
        return Ok(Vec::new());
    }

    let walker = WalkDir::new(path_base)
        .follow_links(follow_symlinks)
        .sort_by(directories_first);

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    debug!(path = %path_base.display(), files = files.len(), "flattened");
    Ok(files)
}

fn directories_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    b_dir
        .cmp(&a_dir)
        .then_with(|| a.file_name().cmp(b.file_name()))
}
