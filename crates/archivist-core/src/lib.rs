//! File archiving with progress reporting.
//!
//! `archivist-core` compresses directories or file lists into zip or
//! gzip-compressed tar archives, extracts and lists zip, tar, tar.gz and
//! bare gzip files, and reports per-file progress to registered callbacks.
//!
//! Compression follows one of two strategies. Zip output keeps the directory
//! tree; every other kind flattens the source and stores files under their
//! base names. Entry names read from archives are sanitized before they
//! touch the filesystem, and `..` segments are rejected by default.
//!
//! # Examples
//!
//! ```no_run
//! use archivist_core::Archiver;
//! use archivist_core::CompressionKind;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut archiver = Archiver::new();
//! archiver.on_progress(|event| println!("{}", event.file_name.display()));
//!
//! archiver.compress("logs.tgz", "/var/log/app", CompressionKind::GZip)?;
//! for name in archiver.list_files("logs.tgz")? {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archiver;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod flatten;
pub mod prepare;
pub mod progress;
pub mod report;
pub mod sanitize;

pub use api::compress;
pub use api::compress_as;
pub use api::compress_files;
pub use api::list_files;
pub use api::uncompress;
pub use archiver::Archiver;
pub use codec::ArchiveFormat;
pub use config::ArchiverConfig;
pub use config::ListTotal;
pub use config::TraversalPolicy;
pub use dispatch::CompressionKind;
pub use dispatch::CompressionStrategy;
pub use error::ArchiveError;
pub use error::Result;
pub use progress::CompletionEvent;
pub use progress::ProgressEvent;
pub use report::CreationReport;
pub use report::ExtractionReport;
pub use report::OutputWarning;
