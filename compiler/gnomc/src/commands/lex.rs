//! `gnomc lex`: list the tokens of a file.

use std::path::Path;

use gnom_arena::Arena;
use gnom_lexer::Tokenizer;
use gnom_lexer_core::{Lexer, Token, TokenFlags, TokenKind, TokenValue};
use gnom_stream::{Arg, ByteStream, Console, OutputSink, Severity, StdSink};
use rustc_hash::FxHashMap;

use crate::CliError;

/// Listing bytes buffered before the print stream is flushed mid-run.
const FLUSH_THRESHOLD: usize = 64 * 1024;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LexOptions {
    /// List raw tokens instead of filtered ones.
    pub raw: bool,
    /// Append a token-kind histogram.
    pub stats: bool,
}

/// What a lex run saw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LexSummary {
    /// Tokens listed, end of stream excluded.
    pub tokens: usize,
    /// Error tokens among them.
    pub errors: usize,
    /// Line the lexer finished on.
    pub lines: u32,
}

/// Lex the file at `path`, printing to stdout and reports to stderr.
pub fn lex_file(path: &Path, options: LexOptions) -> Result<LexSummary, CliError> {
    let source = std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "lexing file");

    let arena = Arena::new();
    let mut console = Console::new(&arena, StdSink);
    let summary = lex_source(&source, options, &mut console);
    console.flush();
    Ok(summary)
}

/// Lex `source`, writing the listing to the console's print stream.
///
/// Each token is one line: `line:column`, the kind, and the payload if
/// there is one, separated by tabs. Error tokens are also reported on the
/// error stream. Nothing is flushed at the end; that is up to the caller.
pub fn lex_source<S: OutputSink>(
    source: &[u8],
    options: LexOptions,
    console: &mut Console<'_, S>,
) -> LexSummary {
    let arena = Arena::new();
    let stream = ByteStream::from_bytes(&arena, source);
    let mut histogram: FxHashMap<TokenKind, usize> = FxHashMap::default();
    let mut summary = LexSummary::default();

    let mut record = |token: &Token<'_>, console: &mut Console<'_, S>| {
        list_token(token, console);
        summary.tokens += 1;
        if let Some(err) = token.error() {
            summary.errors += 1;
            let message = err.to_string();
            console.report(
                Severity::Error,
                "%u:%u: %S",
                &[token.line.into(), token.column.into(), message.as_str().into()],
            );
        }
        if options.stats {
            *histogram.entry(token.kind).or_default() += 1;
        }
        if console.output().pending() >= FLUSH_THRESHOLD {
            console.flush_output();
        }
    };

    let end = if options.raw {
        let mut lexer = Lexer::new(&stream);
        loop {
            let token = lexer.next_raw();
            if token.is(TokenKind::EndOfStream) {
                break token;
            }
            if token.flags.contains(TokenFlags::UNTERMINATED) {
                unterminated_comment(&token, console);
            }
            record(&token, console);
        }
    } else {
        let mut tokenizer = Tokenizer::new(&stream);
        loop {
            let token = tokenizer.next_token();
            if token.is(TokenKind::EndOfStream) {
                if token.flags.contains(TokenFlags::UNTERMINATED) {
                    unterminated_comment(&token, console);
                }
                break token;
            }
            record(&token, console);
        }
    };
    summary.lines = end.line;

    if options.stats {
        print_histogram(histogram, console);
    }
    tracing::debug!(
        tokens = summary.tokens,
        errors = summary.errors,
        lines = summary.lines,
        "lexing done"
    );
    summary
}

fn unterminated_comment<S: OutputSink>(token: &Token<'_>, console: &mut Console<'_, S>) {
    console.report(
        Severity::Warning,
        "%u:%u: unterminated block comment",
        &[token.line.into(), token.column.into()],
    );
}

/// One listing line. Text payloads are copied straight out of the input
/// stream's blocks.
fn list_token<S: OutputSink>(token: &Token<'_>, console: &mut Console<'_, S>) {
    console.print(
        "%u:%u\t%S",
        &[token.line.into(), token.column.into(), token.kind.name().into()],
    );
    match token.value {
        TokenValue::None => {}
        TokenValue::Int(value) => {
            console.print("\t%U", &[value.into()]);
        }
        TokenValue::F32(value) => print_display(console, value),
        TokenValue::F64(value) => print_display(console, value),
        TokenValue::Text(text) => {
            console.print("\t\"%S\"", &[Arg::Interval(text)]);
        }
        TokenValue::Whitespace(run) => {
            console.print("\t%u", &[run.into()]);
        }
        TokenValue::Char { bytes, width } => {
            console.print("\t'%S'", &[Arg::Bytes(&bytes[..usize::from(width)])]);
        }
        TokenValue::Error(err) => print_display(console, err),
    }
    console.print("\n", &[]);
}

/// Values the formatter has no specifier for go through `Display`.
fn print_display<S: OutputSink>(console: &mut Console<'_, S>, value: impl std::fmt::Display) {
    let text = value.to_string();
    console.print("\t%S", &[text.as_str().into()]);
}

/// Kinds by descending count, ties in declaration order.
fn print_histogram<S: OutputSink>(histogram: FxHashMap<TokenKind, usize>, console: &mut Console<'_, S>) {
    let mut counts: Vec<(TokenKind, usize)> = histogram.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    console.print("\n-- token kinds --\n", &[]);
    for (kind, count) in counts {
        console.print("%U\t%S\n", &[count.into(), kind.name().into()]);
    }
}
