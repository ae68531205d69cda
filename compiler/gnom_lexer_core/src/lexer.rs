//! Raw scanner producing one token per call.
//!
//! The scanner walks a [`ByteStream`] through a `Copy` cursor with a
//! two-byte lookahead (`peek[0]` is the current byte, `peek[1]` the one
//! after it). The lookahead is refilled after every single-byte advance.
//! Because the whole state is `Copy`, peeking is "copy, scan, discard".
//!
//! # Design
//!
//! [`Lexer::next_raw`] dispatches on the current byte and calls a focused
//! method that advances past the lexeme and returns its kind and payload.
//! Every byte of input ends up in exactly one token: trivia is reported,
//! not skipped, and error tokens still cover the bytes they consumed.

use gnom_arena::Iter;
use gnom_stream::{ByteStream, Interval};

use crate::lex_error::LexErrorKind;
use crate::token::{Span, Token, TokenFlags, TokenKind, TokenValue};

mod number;

/// Kind, payload and flags of one scanned lexeme. The position is filled
/// in by [`Lexer::next_raw`].
struct Lexeme<'s> {
    kind: TokenKind,
    value: TokenValue<'s>,
    flags: TokenFlags,
}

impl<'s> Lexeme<'s> {
    fn new(kind: TokenKind, value: TokenValue<'s>) -> Self {
        Self {
            kind,
            value,
            flags: TokenFlags::empty(),
        }
    }

    fn plain(kind: TokenKind) -> Self {
        Self::new(kind, TokenValue::None)
    }

    fn error(err: LexErrorKind) -> Self {
        Self::new(TokenKind::Error, TokenValue::Error(err))
    }
}

/// Raw tokenizer over a byte stream.
#[derive(Clone, Copy, Debug)]
pub struct Lexer<'s> {
    /// Positioned at `peek[0]`.
    cursor: Iter<'s, u8>,
    /// Current and next byte; `0` past the end.
    peek: [u8; 2],
    line: u32,
    column: u32,
}

impl<'s> Lexer<'s> {
    /// Start scanning at the beginning of `stream`, on line 1, column 0.
    pub fn new(stream: &'s ByteStream<'_>) -> Self {
        let mut lexer = Lexer {
            cursor: stream.iter(),
            peek: [0; 2],
            line: 1,
            column: 0,
        };
        lexer.refill();
        lexer
    }

    /// Current line (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Current column (0-based, in bytes).
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Byte offset of the current byte.
    pub fn offset(&self) -> usize {
        self.cursor.index()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_exhausted()
    }

    /// Two-byte lookahead.
    pub fn peek_bytes(&self) -> [u8; 2] {
        self.peek
    }

    fn refill(&mut self) {
        self.peek = [
            self.cursor.current().copied().unwrap_or(0),
            self.cursor.peek_forward(1).copied().unwrap_or(0),
        ];
    }

    /// Step over `n` bytes, keeping line and column up to date.
    ///
    /// Leaving a `\n` starts a new line; every other byte bumps the column.
    /// Stops early at the end of the stream.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.is_at_end() {
                return;
            }
            if self.peek[0] == b'\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
            self.cursor.advance();
            self.refill();
        }
    }

    /// Advance while `pred` holds for the current byte. Returns the count.
    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let mut count = 0;
        while !self.is_at_end() && pred(self.peek[0]) {
            self.advance(1);
            count += 1;
        }
        count
    }

    /// Interval from `start` (a cursor snapshot) to the current position.
    fn interval_from(&self, start: &Iter<'s, u8>) -> Interval<'s> {
        Interval::starting_at(start, self.offset() - start.index())
    }

    /// Scan the next raw token.
    ///
    /// At the end of the stream this keeps returning an empty
    /// [`TokenKind::EndOfStream`] token.
    pub fn next_raw(&mut self) -> Token<'s> {
        let start = self.offset();
        let (line, column) = (self.line, self.column);
        let lexeme = self.scan();
        let token = Token {
            kind: lexeme.kind,
            value: lexeme.value,
            span: Span::new(start, self.offset()),
            line,
            column,
            flags: lexeme.flags,
        };
        tracing::trace!(kind = ?token.kind, start, len = token.len(), "raw token");
        token
    }

    /// The token [`next_raw`](Self::next_raw) would return, without
    /// consuming it.
    pub fn peek_raw(&self) -> Token<'s> {
        let mut ahead = *self;
        ahead.next_raw()
    }

    fn scan(&mut self) -> Lexeme<'s> {
        if self.is_at_end() {
            return Lexeme::plain(TokenKind::EndOfStream);
        }
        match self.peek[0] {
            b' ' | b'\t' | 0x0B => self.whitespace(),
            b'\n' => {
                self.advance(1);
                Lexeme::plain(TokenKind::EndOfLine)
            }
            b'\r' => self.carriage_return(),
            b'/' if matches!(self.peek[1], b'/' | b'*') => self.comment(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),
            b'0'..=b'9' => self.number(),
            b'.' if self.peek[1].is_ascii_digit() => self.number(),
            b'"' => self.string(),
            b'\'' => self.char_literal(),
            byte => {
                self.advance(1);
                Lexeme::plain(TokenKind::from_punct(byte).unwrap_or(TokenKind::Unknown))
            }
        }
    }

    // ─── Trivia ───────────────────────────────────────────────────────

    fn whitespace(&mut self) -> Lexeme<'s> {
        let run = self.eat_while(|byte| matches!(byte, b' ' | b'\t' | 0x0B));
        Lexeme::new(
            TokenKind::Whitespace,
            TokenValue::Whitespace(u32::try_from(run).unwrap_or(u32::MAX)),
        )
    }

    /// `\r\n` is one line break; a lone `\r` is not.
    fn carriage_return(&mut self) -> Lexeme<'s> {
        if self.peek[1] == b'\n' {
            self.advance(2);
            Lexeme::plain(TokenKind::EndOfLine)
        } else {
            self.advance(1);
            Lexeme::plain(TokenKind::Unknown)
        }
    }

    /// Line or block comment. The text excludes the opener and closer and,
    /// for line comments, the line break.
    fn comment(&mut self) -> Lexeme<'s> {
        let block = self.peek[1] == b'*';
        self.advance(2);
        let body = self.cursor;

        if !block {
            while !self.is_at_end() && self.peek[0] != b'\n' && self.peek != *b"\r\n" {
                self.advance(1);
            }
            return Lexeme::new(TokenKind::Comment, TokenValue::Text(self.interval_from(&body)));
        }

        loop {
            if self.is_at_end() {
                let mut lexeme =
                    Lexeme::new(TokenKind::Comment, TokenValue::Text(self.interval_from(&body)));
                lexeme.flags |= TokenFlags::UNTERMINATED;
                return lexeme;
            }
            if self.peek == *b"*/" {
                let text = self.interval_from(&body);
                self.advance(2);
                return Lexeme::new(TokenKind::Comment, TokenValue::Text(text));
            }
            self.advance(1);
        }
    }

    // ─── Identifiers & Literals ───────────────────────────────────────

    fn identifier(&mut self) -> Lexeme<'s> {
        let body = self.cursor;
        self.eat_while(|byte| byte.is_ascii_alphanumeric() || byte == b'_');
        Lexeme::new(TokenKind::Identifier, TokenValue::Text(self.interval_from(&body)))
    }

    /// String literal. Backslash escapes are stepped over, not decoded.
    fn string(&mut self) -> Lexeme<'s> {
        self.advance(1);
        let body = self.cursor;
        loop {
            if self.is_at_end() {
                return Lexeme::error(LexErrorKind::UnterminatedString);
            }
            match self.peek[0] {
                b'"' => break,
                b'\\' => self.advance(2),
                _ => self.advance(1),
            }
        }
        let text = self.interval_from(&body);
        self.advance(1);
        Lexeme::new(TokenKind::StringLit, TokenValue::Text(text))
    }

    /// Character literal: one byte, one simple escape, or one UTF-8
    /// encoded character of two to four bytes.
    fn char_literal(&mut self) -> Lexeme<'s> {
        self.advance(1);
        if self.is_at_end() || self.peek[0] == b'\n' {
            return Lexeme::error(LexErrorKind::UnterminatedChar);
        }

        let mut bytes = [0u8; 4];
        let width = match self.peek[0] {
            b'\'' => {
                self.advance(1);
                return Lexeme::error(LexErrorKind::EmptyCharLiteral);
            }
            b'\\' => {
                if self.cursor.peek_forward(1).is_none() {
                    self.advance(1);
                    return Lexeme::error(LexErrorKind::UnterminatedChar);
                }
                let escape = self.peek[1];
                self.advance(2);
                bytes[0] = match escape {
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'r' => b'\r',
                    b'v' => 0x0B,
                    b'0' => 0,
                    b'\\' => b'\\',
                    b'\'' => b'\'',
                    b'"' => b'"',
                    other => {
                        return self.char_error(LexErrorKind::InvalidEscape {
                            escape: char::from(other),
                        })
                    }
                };
                1
            }
            lead @ 0xC0..=0xF7 => {
                let width = match lead {
                    0xC0..=0xDF => 2,
                    0xE0..=0xEF => 3,
                    _ => 4,
                };
                bytes[0] = lead;
                self.advance(1);
                for slot in &mut bytes[1..width] {
                    if self.is_at_end() || !(0x80..=0xBF).contains(&self.peek[0]) {
                        return self.char_error(LexErrorKind::MalformedChar);
                    }
                    *slot = self.peek[0];
                    self.advance(1);
                }
                width
            }
            byte => {
                bytes[0] = byte;
                self.advance(1);
                1
            }
        };

        if self.is_at_end() || self.peek[0] != b'\'' {
            return match self.closing_quote_distance() {
                Some(distance) => {
                    self.advance(distance);
                    Lexeme::error(LexErrorKind::MultiCharLiteral)
                }
                None => Lexeme::error(LexErrorKind::UnterminatedChar),
            };
        }
        self.advance(1);
        Lexeme::new(
            TokenKind::CharLit,
            TokenValue::Char {
                bytes,
                width: width as u8,
            },
        )
    }

    /// Bytes up to and including the next unescaped `'` on this line.
    fn closing_quote_distance(&self) -> Option<usize> {
        let mut ahead = self.cursor;
        let mut distance = 0;
        let mut escaped = false;
        while let Some(&byte) = ahead.current() {
            distance += 1;
            match byte {
                b'\n' => return None,
                b'\'' if !escaped => return Some(distance),
                _ => {}
            }
            escaped = byte == b'\\' && !escaped;
            ahead.advance();
        }
        None
    }

    /// Error inside a character literal; swallow the closing quote if it
    /// is right here so the literal stays one token.
    fn char_error(&mut self, err: LexErrorKind) -> Lexeme<'s> {
        if !self.is_at_end() && self.peek[0] == b'\'' {
            self.advance(1);
        }
        Lexeme::error(err)
    }
}
