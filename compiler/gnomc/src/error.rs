//! Driver errors.

use std::io;
use std::path::PathBuf;

/// Why a `gnomc` invocation could not run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no command given")]
    MissingCommand,

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("unknown option `{option}` for `gnomc {command}`")]
    UnknownOption {
        command: &'static str,
        option: String,
    },

    #[error("`gnomc {0}` needs an input file")]
    MissingInput(&'static str),

    #[error("unexpected argument `{0}`")]
    ExtraArgument(String),

    #[error("cannot read `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CliError {
    /// Errors caused by a malformed command line, worth a usage reminder.
    pub fn is_usage(&self) -> bool {
        !matches!(self, CliError::Read { .. })
    }
}
