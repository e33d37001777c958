//! Entry name normalization.
//!
//! Archive keys always use `/` as separator. [`normalize`] only swaps the
//! separator; [`sanitize`] additionally turns the key into a relative path
//! that is safe to join with an extraction root, according to a
//! [`TraversalPolicy`].

use std::path::MAIN_SEPARATOR_STR;
use std::path::PathBuf;

use crate::ArchiveError;
use crate::Result;
use crate::config::TraversalPolicy;

/// Replaces every `/` in an entry key with the native separator.
///
/// # Examples
///
/// ```
/// use archivist_core::sanitize::normalize;
/// use std::path::MAIN_SEPARATOR;
///
/// assert_eq!(normalize("a/b/c.txt"), format!("a{MAIN_SEPARATOR}b{MAIN_SEPARATOR}c.txt"));
/// ```
#[must_use]
pub fn normalize(entry_key: &str) -> String {
    entry_key.replace('/', MAIN_SEPARATOR_STR)
}

/// Converts an entry key into a relative path under the extraction root.
///
/// Both `/` and `\` separate segments. Empty and `.` segments are dropped.
/// `..` segments and rooted keys (leading separator or a drive letter such
/// as `C:`) are handled by `policy`.
///
/// # Errors
///
/// - [`ArchiveError::PathTraversal`] when `policy` is
///   [`TraversalPolicy::Reject`] and the key is rooted or contains `..`
/// - [`ArchiveError::InvalidEntryName`] when nothing is left of the key
///
/// # Examples
///
/// ```
/// use archivist_core::TraversalPolicy;
/// use archivist_core::sanitize::sanitize;
/// use std::path::PathBuf;
///
/// let path = sanitize("a/b/c.txt", TraversalPolicy::Reject)?;
/// assert_eq!(path, PathBuf::from("a").join("b").join("c.txt"));
///
/// assert!(sanitize("../etc/passwd", TraversalPolicy::Reject).is_err());
/// assert_eq!(
///     sanitize("a/../../etc/passwd", TraversalPolicy::Clamp)?,
///     PathBuf::from("etc").join("passwd")
/// );
/// # Ok::<(), archivist_core::ArchiveError>(())
/// ```
pub fn sanitize(entry_key: &str, policy: TraversalPolicy) -> Result<PathBuf> {
    let traversal = || ArchiveError::PathTraversal {
        path: PathBuf::from(entry_key),
    };

    if policy == TraversalPolicy::Reject && is_rooted(entry_key) {
        return Err(traversal());
    }

    let mut parts: Vec<&str> = Vec::new();
    for (index, segment) in entry_key.split(['/', '\\']).enumerate() {
        match segment {
            "" | "." => {}
            ".." => match policy {
                TraversalPolicy::Reject => return Err(traversal()),
                TraversalPolicy::Clamp => {
                    parts.pop();
                }
                TraversalPolicy::Allow => parts.push(segment),
            },
            _ if index == 0 && is_drive_prefix(segment) => {}
            _ => parts.push(segment),
        }
    }

    if parts.is_empty() {
        return Err(ArchiveError::InvalidEntryName {
            name: entry_key.to_string(),
        });
    }

    Ok(parts.into_iter().collect())
}

fn is_rooted(key: &str) -> bool {
    key.starts_with(['/', '\\'])
        || key
            .split(['/', '\\'])
            .next()
            .is_some_and(is_drive_prefix)
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
