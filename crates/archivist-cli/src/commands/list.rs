//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use archivist_core::Archiver;
use archivist_core::ArchiverConfig;
use archivist_core::ListTotal;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let list_total = if args.legacy_total {
        ListTotal::Legacy
    } else {
        ListTotal::Exact
    };
    let mut archiver = Archiver::with_config(ArchiverConfig::default().with_list_total(list_total));

    let progress = (show_progress && CliProgress::should_show()).then(|| CliProgress::new("Listing"));
    if let Some(progress) = &progress {
        progress.attach(&mut archiver);
    }

    let names = add_archive_context(archiver.list_files(&args.archive), &args.archive)?;
    drop(progress);

    formatter.format_listing(&args.archive, &names)
}
