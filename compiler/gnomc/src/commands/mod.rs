//! Command-line commands.

use std::path::PathBuf;

use crate::CliError;

mod lex;

pub use lex::{lex_file, lex_source, LexOptions, LexSummary};

/// A parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Lex { path: PathBuf, options: LexOptions },
}

/// Parse the arguments after the program name.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Command, CliError> {
    let Some((command, rest)) = args.split_first() else {
        return Err(CliError::MissingCommand);
    };
    match command.as_ref() {
        "help" | "--help" | "-h" => Ok(Command::Help),
        "lex" => parse_lex(rest),
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

fn parse_lex<S: AsRef<str>>(args: &[S]) -> Result<Command, CliError> {
    let mut options = LexOptions::default();
    let mut path = None;

    for arg in args.iter().map(AsRef::as_ref) {
        match arg {
            "--raw" => options.raw = true,
            "--stats" => options.stats = true,
            flag if flag.starts_with('-') => {
                return Err(CliError::UnknownOption {
                    command: "lex",
                    option: flag.to_string(),
                });
            }
            file if path.is_none() => path = Some(PathBuf::from(file)),
            extra => return Err(CliError::ExtraArgument(extra.to_string())),
        }
    }

    let path = path.ok_or(CliError::MissingInput("lex"))?;
    Ok(Command::Lex { path, options })
}

pub fn print_usage() {
    eprintln!("gnom front-end driver");
    eprintln!();
    eprintln!("Usage: gnomc <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  lex <file>    List the tokens of a source file");
    eprintln!("  help          Show this message");
    eprintln!();
    eprintln!("Options for `lex`:");
    eprintln!("  --raw         List raw tokens, trivia included, without merging");
    eprintln!("  --stats       Append a histogram of token kinds");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=gnom_lexer=trace) for tracing output.");
}

#[cfg(test)]
mod tests;
