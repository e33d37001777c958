//! CLI argument parsing using clap.

use archivist_core::CompressionKind;
use archivist_core::TraversalPolicy;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "archivist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress files or directories into an archive
    Compress(CompressArgs),
    /// Extract archive contents
    Extract(ExtractArgs),
    /// List archive contents without extraction
    List(ListArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct CompressArgs {
    /// Output archive file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Source files or directories to archive
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Archive kind (default: inferred from OUTPUT, zip otherwise)
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    /// Compression level (1-9)
    #[arg(short = 'l', long, default_value = "6", value_parser = clap::value_parser!(u8).range(1..=9))]
    pub level: u8,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// How to handle entry names that climb out of OUTPUT_DIR
    #[arg(long, value_enum, default_value_t = TraversalArg::Reject)]
    pub on_traversal: TraversalArg,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Report progress totals as current + 2 instead of the entry count
    #[arg(long)]
    pub legacy_total: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// ZIP container, keeps the directory tree
    Zip,
    /// Gzip-compressed stream of files
    #[value(alias = "gz")]
    Gzip,
    /// Same stream layout as gzip
    Tar,
    /// Same stream layout as gzip
    Rar,
    /// Same stream layout as gzip
    Unknown,
}

impl From<KindArg> for CompressionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Zip => Self::Zip,
            KindArg::Gzip => Self::GZip,
            KindArg::Tar => Self::Tar,
            KindArg::Rar => Self::Rar,
            KindArg::Unknown => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraversalArg {
    /// Fail on the first entry that would escape
    Reject,
    /// Resolve `..` without leaving the output directory
    Clamp,
    /// Keep `..` segments as stored (unsafe)
    Allow,
}

impl From<TraversalArg> for TraversalPolicy {
    fn from(arg: TraversalArg) -> Self {
        match arg {
            TraversalArg::Reject => Self::Reject,
            TraversalArg::Clamp => Self::Clamp,
            TraversalArg::Allow => Self::Allow,
        }
    }
}
