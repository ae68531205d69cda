use pretty_assertions::assert_eq;

use super::*;

fn parse(args: &[&str]) -> Result<Command, CliError> {
    parse_args(args)
}

#[test]
fn lex_with_defaults() {
    assert!(matches!(
        parse(&["lex", "main.c"]),
        Ok(Command::Lex { ref path, options }) if path == &PathBuf::from("main.c") && options == LexOptions::default()
    ));
}

#[test]
fn lex_flags_in_any_position() {
    let Ok(Command::Lex { path, options }) = parse(&["lex", "--stats", "a.c", "--raw"]) else {
        panic!("lex command not recognised");
    };
    assert_eq!(path, PathBuf::from("a.c"));
    assert_eq!(
        options,
        LexOptions {
            raw: true,
            stats: true
        }
    );
}

#[test]
fn help() {
    assert!(matches!(parse(&["--help"]), Ok(Command::Help)));
    assert!(matches!(parse(&["help"]), Ok(Command::Help)));
}

#[test]
fn usage_errors() {
    assert!(matches!(parse(&[]), Err(CliError::MissingCommand)));
    assert!(matches!(parse(&["build"]), Err(CliError::UnknownCommand(c)) if c == "build"));
    assert!(matches!(parse(&["lex"]), Err(CliError::MissingInput("lex"))));
    assert!(matches!(
        parse(&["lex", "--fast", "a.c"]),
        Err(CliError::UnknownOption { command: "lex", ref option }) if option == "--fast"
    ));
    assert!(matches!(parse(&["lex", "a.c", "b.c"]), Err(CliError::ExtraArgument(a)) if a == "b.c"));
}

#[test]
fn error_messages() {
    let err = CliError::UnknownOption {
        command: "lex",
        option: "-x".to_string(),
    };
    assert_eq!(err.to_string(), "unknown option `-x` for `gnomc lex`");
    assert!(err.is_usage());
    assert_eq!(
        CliError::MissingInput("lex").to_string(),
        "`gnomc lex` needs an input file"
    );
}
