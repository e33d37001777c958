//! Rendering of command results.
//!
//! Human output is styled with `console`. With `--json`, each command prints
//! a single JSON document on stdout and side messages go to stderr.

mod formatter;
mod human;
mod json;

pub use formatter::OutputFormatter;

use human::HumanFormatter;
use json::JsonFormatter;

/// How results reach the user, derived from the global flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human { verbose: bool, quiet: bool },
    Json,
}

impl OutputMode {
    /// `--json` wins over the verbosity flags.
    pub const fn from_flags(json: bool, verbose: bool, quiet: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Human { verbose, quiet }
        }
    }

    pub fn formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            Self::Human { verbose, quiet } => Box::new(HumanFormatter::new(verbose, quiet)),
            Self::Json => Box::new(JsonFormatter),
        }
    }

    /// Progress bars would corrupt JSON output and are noise in quiet mode.
    pub const fn allows_progress(self) -> bool {
        matches!(self, Self::Human { quiet: false, .. })
    }
}
