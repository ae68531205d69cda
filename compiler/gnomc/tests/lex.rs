// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests for `gnomc lex`.
//!
//! The listing is produced into a [`MemorySink`] so the exact bytes that
//! would reach stdout and stderr can be compared.

use std::io::Write;

use gnom_arena::Arena;
use gnom_stream::{Console, MemorySink, StreamHandle};
use gnomc::commands::{lex_file, lex_source, LexOptions, LexSummary};
use gnomc::CliError;
use pretty_assertions::assert_eq;

struct Run {
    summary: LexSummary,
    output: String,
    error: String,
}

fn run(source: &str, options: LexOptions) -> Run {
    let arena = Arena::new();
    let mut console = Console::new(&arena, MemorySink::new());
    let summary = lex_source(source.as_bytes(), options, &mut console);
    let sink = console.into_sink();
    Run {
        summary,
        output: sink.captured_text(StreamHandle::Output),
        error: sink.captured_text(StreamHandle::Error),
    }
}

// === Filtered listing ===

#[test]
fn lists_significant_tokens() {
    let run = run("int x = 0x1F;\n", LexOptions::default());
    assert_eq!(
        run.output,
        "1:0\tint\n\
         1:4\tidentifier\t\"x\"\n\
         1:6\t=\n\
         1:8\tinteger literal\t31\n\
         1:12\t;\n"
    );
    assert_eq!(run.error, "");
    assert_eq!(
        run.summary,
        LexSummary {
            tokens: 5,
            errors: 0,
            lines: 2
        }
    );
}

#[test]
fn compound_operators_and_payloads() {
    let run = run("a <<= 'b' ... 2.5", LexOptions::default());
    assert_eq!(
        run.output,
        "1:0\tidentifier\t\"a\"\n\
         1:2\t<<=\n\
         1:6\tcharacter literal\t'b'\n\
         1:10\t...\n\
         1:14\tf64 literal\t2.5\n"
    );
}

#[test]
fn errors_are_listed_and_reported() {
    let run = run("x = \"open", LexOptions::default());
    assert_eq!(run.summary.errors, 1);
    assert!(run
        .output
        .ends_with("1:4\terror\tunterminated string literal\n"));
    assert_eq!(run.error, "[ERROR] 1:4: unterminated string literal\n");
}

#[test]
fn unterminated_comment_warns() {
    let run = run("x /* never closed", LexOptions::default());
    assert_eq!(run.summary.errors, 0);
    assert_eq!(run.error, "[WARNING] 1:17: unterminated block comment\n");
}

// === Raw listing ===

#[test]
fn raw_listing_keeps_trivia() {
    let run = run("a  +=\n// hi\n", LexOptions {
        raw: true,
        stats: false,
    });
    assert_eq!(
        run.output,
        "1:0\tidentifier\t\"a\"\n\
         1:1\twhitespace\t2\n\
         1:3\t+\n\
         1:4\t=\n\
         1:5\tend of line\n\
         2:0\tcomment\t\" hi\"\n\
         2:5\tend of line\n"
    );
    assert_eq!(run.summary.lines, 3);
}

#[test]
fn raw_unterminated_comment_warns_at_the_comment() {
    let run = run("/* x", LexOptions {
        raw: true,
        stats: false,
    });
    assert_eq!(run.error, "[WARNING] 1:0: unterminated block comment\n");
}

// === Statistics ===

#[test]
fn histogram_orders_by_count() {
    let run = run("a = b + c;", LexOptions {
        raw: false,
        stats: true,
    });
    let histogram = run.output.split("-- token kinds --\n").nth(1).unwrap();
    assert_eq!(histogram, "3\tidentifier\n1\t+\n1\t=\n1\t;\n");
}

// === Files ===

#[test]
fn lex_file_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("gnomc-lex-{}.c", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"return 0;\n").unwrap();
    drop(file);

    let summary = lex_file(&path, LexOptions::default()).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(summary.tokens, 3);
    assert_eq!(summary.errors, 0);
}

#[test]
fn missing_file_is_a_read_error() {
    let path = std::env::temp_dir().join("gnomc-this-file-does-not-exist.c");
    let err = lex_file(&path, LexOptions::default()).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
    assert!(!err.is_usage());
    assert!(err.to_string().starts_with("cannot read `"));
}

#[test]
fn large_input_flushes_in_pieces() {
    let source = "x;\n".repeat(20_000);
    let arena = Arena::new();
    let mut console = Console::new(&arena, MemorySink::new());
    let summary = lex_source(source.as_bytes(), LexOptions::default(), &mut console);
    assert_eq!(summary.tokens, 40_000);
    let sink = console.into_sink();
    let output = sink.captured(StreamHandle::Output);
    assert!(output.starts_with(b"1:0\tidentifier\t\"x\"\n1:1\t;\n2:0\t"));
    assert_eq!(output.iter().filter(|&&b| b == b'\n').count(), 40_000);
    assert!(sink.writes() > 1);
}
