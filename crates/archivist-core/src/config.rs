//! Configuration for archive operations.

use crate::ArchiveError;
use crate::Result;

/// How entry names that point outside the extraction root are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraversalPolicy {
    /// Fail with [`ArchiveError::PathTraversal`] on `..` or rooted keys.
    #[default]
    Reject,
    /// Resolve `..` lexically, never climbing above the extraction root.
    Clamp,
    /// Keep `..` segments as stored. Rooted keys are still made relative.
    Allow,
}

/// How the `total` field of listing progress events is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListTotal {
    /// Number of file entries, counted before the first event.
    #[default]
    Exact,
    /// Historical approximation: `current + 2`.
    Legacy,
}

/// Configuration shared by compression, extraction and listing.
///
/// # Examples
///
/// ```
/// use archivist_core::ArchiverConfig;
/// use archivist_core::TraversalPolicy;
///
/// let config = ArchiverConfig::default()
///     .with_traversal_policy(TraversalPolicy::Clamp)
///     .with_compression_level(9);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ArchiverConfig {
    /// Compression level (1-9) for both zip and gzip output.
    ///
    /// Default: `6`.
    pub compression_level: u8,

    /// Follow symlinks while flattening or walking source trees.
    ///
    /// Default: `false`.
    pub follow_symlinks: bool,

    /// Handling of entry names that escape the extraction root.
    ///
    /// Default: [`TraversalPolicy::Reject`].
    pub traversal_policy: TraversalPolicy,

    /// Total reported by listing progress events.
    ///
    /// Default: [`ListTotal::Exact`].
    pub list_total: ListTotal,
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            compression_level: 6,
            follow_symlinks: false,
            traversal_policy: TraversalPolicy::Reject,
            list_total: ListTotal::Exact,
        }
    }
}

impl ArchiverConfig {
    /// Creates a new `ArchiverConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    ///
    /// Out-of-range values are reported by [`validate`](Self::validate).
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets whether to follow symlinks.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets the traversal policy.
    #[must_use]
    pub fn with_traversal_policy(mut self, policy: TraversalPolicy) -> Self {
        self.traversal_policy = policy;
        self
    }

    /// Sets the listing total mode.
    #[must_use]
    pub fn with_list_total(mut self, mode: ListTotal) -> Self {
        self.list_total = mode;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidCompressionLevel`] if the level is not
    /// in 1-9.
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.compression_level) {
            return Err(ArchiveError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }
        Ok(())
    }
}
