//! Lexical error reasons carried by error tokens.

/// Why a token was classified as [`TokenKind::Error`](crate::TokenKind::Error).
///
/// Errors never stop the lexer. Numeric errors in particular are only
/// reported after the whole lexeme has been consumed, so the next token
/// starts where it would have without the error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    // === String/Char Errors ===
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("empty character literal")]
    EmptyCharLiteral,
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("invalid escape sequence `\\{escape}`")]
    InvalidEscape { escape: char },
    #[error("malformed UTF-8 sequence in character literal")]
    MalformedChar,
    /// More than one character before the closing quote, as in `'ab'`.
    #[error("character literal holds more than one character")]
    MultiCharLiteral,

    // === Numeric Errors ===
    #[error("integer literal does not fit in 64 bits")]
    IntOverflow,
    #[error("digit `{digit}` is not valid in base {radix}")]
    InvalidDigitForRadix { digit: char, radix: u32 },
    #[error("missing digits after radix prefix")]
    MissingDigits,
    #[error("missing digits in exponent")]
    EmptyExponent,
    #[error("exponent does not fit in 16 bits")]
    ExponentOverflow,
    #[error("float literal out of range")]
    FloatOverflow,

    // === Operator Errors ===
    /// `..` not followed by a third `.`.
    #[error("incomplete `...`")]
    IncompleteEllipsis,
}
