//! Token consumer interface for the gnom front end.
//!
//! [`Tokenizer`] wraps the raw [`Lexer`](gnom_lexer_core::Lexer) and hands
//! a parser the tokens it cares about:
//!
//! - whitespace, line breaks and comments are dropped and recorded in the
//!   flags of the next token;
//! - adjacent operator characters are merged into compound operators
//!   (`+=`, `->`, `>>=`, `...`, ...);
//! - identifiers that spell a C keyword become keyword tokens.
//!
//! The tokenizer is `Copy`, so lookahead is "copy, scan, discard" and
//! costs no allocation.

mod keywords;
mod tokenizer;

pub use gnom_lexer_core::{LexErrorKind, Span, Token, TokenFlags, TokenKind, TokenValue};
pub use tokenizer::{Tokenizer, UnexpectedToken};
