use gnom_arena::Arena;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn labels_are_upper_case() {
    assert_eq!(Severity::Warning.to_string(), "WARNING");
    assert_eq!(Severity::Error.to_string(), "ERROR");
    assert_eq!(Severity::Fatal.to_string(), "FATAL");
}

#[test]
fn only_warnings_are_deferred() {
    assert!(!Severity::Warning.flushes_immediately());
    assert!(Severity::Error.flushes_immediately());
    assert!(Severity::Fatal.flushes_immediately());
}

#[test]
fn report_line_format() {
    let arena = Arena::new();
    let mut stream = ByteStream::new(&arena);
    let written = render_report(&mut stream, Severity::Error, "bad token %u", &[Arg::U32(3)]);
    assert_eq!(stream.to_vec(), b"[ERROR] bad token 3\n");
    assert_eq!(written, stream.len());
}

#[test]
fn assertion_banner() {
    let arena = Arena::new();
    let mut stream = ByteStream::new(&arena);
    let report = AssertionReport {
        condition: "size != 0",
        file: "arena.rs",
        line: 72,
    };
    let written = report.render(&mut stream);
    let text = String::from_utf8_lossy(&stream.to_vec()).into_owned();
    assert_eq!(
        text,
        "*********** [ASSERTION FAILED] ***********\n\
         The assertion 'size != 0' failed.\n\
         File: arena.rs,\n\
         Line: 72\n"
    );
    assert_eq!(written, text.len());
}
