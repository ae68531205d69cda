//! gnom front-end CLI.

use std::process::ExitCode;

use gnomc::commands::{lex_file, parse_args, print_usage, Command};

fn main() -> ExitCode {
    gnomc::init_tracing();
    gnomc::install_assertion_hook();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err}");
            if err.is_usage() {
                eprintln!();
                print_usage();
            }
            return ExitCode::from(2);
        }
    };

    match command {
        Command::Help => {
            print_usage();
            ExitCode::SUCCESS
        }
        Command::Lex { path, options } => match lex_file(&path, options) {
            // Lexical errors were already reported next to the listing.
            Ok(summary) if summary.errors > 0 => ExitCode::FAILURE,
            Ok(_) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}
