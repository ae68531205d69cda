//! Filtered token stream.
//!
//! The raw layer reports every byte, one operator character at a time.
//! This layer skips trivia, glues operator characters back together by
//! peeking at the next raw token and committing only when it extends the
//! current operator, and resolves keywords.

use gnom_lexer_core::{LexErrorKind, Lexer, Span, Token, TokenFlags, TokenKind, TokenValue};
use gnom_stream::ByteStream;

use crate::keywords;

/// Token consumer interface over a byte stream.
#[derive(Clone, Copy, Debug)]
pub struct Tokenizer<'s> {
    lexer: Lexer<'s>,
}

/// A required token kind that was not there.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("{}:{}: expected {expected}, found {}", .found.line, .found.column, .found.kind)]
pub struct UnexpectedToken<'s> {
    pub expected: TokenKind,
    pub found: Token<'s>,
}

impl<'s> Tokenizer<'s> {
    pub fn new(stream: &'s ByteStream<'_>) -> Self {
        Tokenizer {
            lexer: Lexer::new(stream),
        }
    }

    /// The underlying raw lexer, positioned after the last token returned.
    pub fn raw(&self) -> &Lexer<'s> {
        &self.lexer
    }

    /// Next significant token.
    ///
    /// Whitespace, line breaks and comments in front of it are folded into
    /// its flags. An unterminated block comment passes its `UNTERMINATED`
    /// flag on to the token after it, which is always end of stream.
    pub fn next_token(&mut self) -> Token<'s> {
        let mut flags = TokenFlags::empty();
        loop {
            let raw = self.lexer.next_raw();
            match raw.kind {
                TokenKind::Whitespace => flags |= TokenFlags::SPACE_BEFORE,
                TokenKind::EndOfLine => flags |= TokenFlags::NEWLINE_BEFORE,
                TokenKind::Comment => {
                    flags |= TokenFlags::COMMENT_BEFORE | (raw.flags & TokenFlags::UNTERMINATED);
                }
                _ => {
                    let mut token = self.cook(raw);
                    token.flags |= flags;
                    tracing::trace!(kind = ?token.kind, line = token.line, column = token.column, "token");
                    return token;
                }
            }
        }
    }

    /// The token [`next_token`](Self::next_token) would return, without
    /// consuming it.
    pub fn peek_token(&self) -> Token<'s> {
        let mut ahead = *self;
        ahead.next_token()
    }

    /// Next token, which must be of kind `kind`.
    ///
    /// On a mismatch the offending token is reported. With `force` it is
    /// consumed anyway, so the caller can resynchronise; without it the
    /// tokenizer is left where it was.
    pub fn require_token(
        &mut self,
        kind: TokenKind,
        force: bool,
    ) -> Result<Token<'s>, UnexpectedToken<'s>> {
        let mut ahead = *self;
        let token = ahead.next_token();
        if token.kind == kind {
            *self = ahead;
            return Ok(token);
        }
        tracing::debug!(expected = ?kind, found = ?token.kind, force, "unexpected token");
        if force {
            *self = ahead;
        }
        Err(UnexpectedToken {
            expected: kind,
            found: token,
        })
    }

    fn cook(&mut self, token: Token<'s>) -> Token<'s> {
        match token.kind {
            TokenKind::Identifier => match token.text().and_then(keywords::lookup) {
                Some(kind) => Token {
                    kind,
                    value: TokenValue::None,
                    ..token
                },
                None => token,
            },
            kind if kind.is_operator() => self.merge_operator(token),
            _ => token,
        }
    }

    /// Extend `token` with following operator characters for as long as
    /// they form a longer operator.
    fn merge_operator(&mut self, mut token: Token<'s>) -> Token<'s> {
        loop {
            let next = self.lexer.peek_raw();
            if token.is(TokenKind::Dot) && next.is(TokenKind::Dot) {
                return self.ellipsis(token, next);
            }
            let Some(kind) = compound(token.kind, next.kind) else {
                return token;
            };
            self.lexer.next_raw();
            token.kind = kind;
            token.span = token.span.merge(next.span);
        }
    }

    /// `..` has been seen; only a third `.` makes it a token.
    ///
    /// The third dot is checked as a byte, since a raw token would read
    /// `.5` in `...5` as a number.
    fn ellipsis(&mut self, first: Token<'s>, second: Token<'s>) -> Token<'s> {
        self.lexer.next_raw();
        if !self.lexer.is_at_end() && self.lexer.peek_bytes()[0] == b'.' {
            self.lexer.advance(1);
            return Token {
                kind: TokenKind::Ellipsis,
                span: Span::new(first.span.start, second.span.end + 1),
                ..first
            };
        }
        Token {
            kind: TokenKind::Error,
            value: TokenValue::Error(LexErrorKind::IncompleteEllipsis),
            span: first.span.merge(second.span),
            ..first
        }
    }
}

/// Operator formed by `first` directly followed by `second`.
fn compound(first: TokenKind, second: TokenKind) -> Option<TokenKind> {
    use TokenKind as K;

    let kind = match (first, second) {
        (K::Plus, K::Plus) => K::Increment,
        (K::Plus, K::Equals) => K::PlusEquals,
        (K::Minus, K::Minus) => K::Decrement,
        (K::Minus, K::Equals) => K::MinusEquals,
        (K::Minus, K::Greater) => K::Arrow,
        (K::Star, K::Equals) => K::StarEquals,
        (K::Slash, K::Equals) => K::SlashEquals,
        (K::Percent, K::Equals) => K::PercentEquals,
        (K::Equals, K::Equals) => K::EqualsEquals,
        (K::Bang, K::Equals) => K::BangEquals,
        (K::Greater, K::Equals) => K::GreaterEquals,
        (K::Greater, K::Greater) => K::ShiftRight,
        (K::ShiftRight, K::Equals) => K::ShiftRightEquals,
        (K::Less, K::Equals) => K::LessEquals,
        (K::Less, K::Less) => K::ShiftLeft,
        (K::ShiftLeft, K::Equals) => K::ShiftLeftEquals,
        (K::Ampersand, K::Ampersand) => K::LogicalAnd,
        (K::Ampersand, K::Equals) => K::AndEquals,
        (K::Pipe, K::Pipe) => K::LogicalOr,
        (K::Pipe, K::Equals) => K::OrEquals,
        (K::Caret, K::Equals) => K::XorEquals,
        _ => return None,
    };
    Some(kind)
}

impl<'s> Iterator for Tokenizer<'s> {
    type Item = Token<'s>;

    /// Significant tokens up to, not including, end of stream.
    fn next(&mut self) -> Option<Token<'s>> {
        let token = self.next_token();
        (!token.is(TokenKind::EndOfStream)).then_some(token)
    }
}
