//! Raw tokenizer for the gnom front end.
//!
//! [`Lexer`] scans a [`ByteStream`](gnom_stream::ByteStream) one raw token
//! at a time: every byte of the input belongs to exactly one raw token,
//! whitespace, line breaks and comments included. Text payloads
//! (identifiers, strings, comments) are [`Interval`](gnom_stream::Interval)s
//! into the input stream, never copies.
//!
//! Lexical errors are tokens of kind [`TokenKind::Error`] carrying a
//! [`LexErrorKind`]; scanning always continues past them.
//!
//! Trivia filtering, compound operators and keywords are layered on top by
//! `gnom_lexer`.

mod lex_error;
mod lexer;
mod token;

pub use lex_error::LexErrorKind;
pub use lexer::Lexer;
pub use token::{Span, Token, TokenFlags, TokenKind, TokenValue};
