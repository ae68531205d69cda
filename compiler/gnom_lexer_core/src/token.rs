//! Token representation shared by the raw and filtered layers.

use std::fmt;

use bitflags::bitflags;
use gnom_stream::Interval;

use crate::lex_error::LexErrorKind;

/// Token kind.
///
/// The raw layer only produces the single-character operator kinds;
/// compound operators and keywords come from the filtered layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    // === Trivia and control ===
    Unknown,
    Whitespace,
    EndOfLine,
    Comment,
    EndOfStream,
    Error,

    // === Literals ===
    Identifier,
    StringLit,
    CharLit,
    IntLit,
    F32Lit,
    F64Lit,

    // === Single-character operators and punctuation ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equals,
    Bang,
    Greater,
    Less,
    Ampersand,
    Pipe,
    Tilde,
    Caret,
    Question,
    Colon,
    Dot,
    Comma,
    Semicolon,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,

    // === Compound operators ===
    Increment,
    PlusEquals,
    Decrement,
    MinusEquals,
    Arrow,
    StarEquals,
    SlashEquals,
    PercentEquals,
    EqualsEquals,
    BangEquals,
    GreaterEquals,
    ShiftRight,
    ShiftRightEquals,
    LessEquals,
    ShiftLeft,
    ShiftLeftEquals,
    LogicalAnd,
    AndEquals,
    LogicalOr,
    OrEquals,
    XorEquals,
    Ellipsis,

    // === Keywords ===
    Auto,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Register,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,
}

impl TokenKind {
    /// Whitespace, line breaks and comments.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::EndOfLine | TokenKind::Comment
        )
    }

    /// Operators and punctuation, single-character or compound.
    pub fn is_operator(self) -> bool {
        (TokenKind::Plus..=TokenKind::Ellipsis).contains(&self)
    }

    pub fn is_keyword(self) -> bool {
        (TokenKind::Auto..=TokenKind::While).contains(&self)
    }

    /// Kind of the operator or punctuation character `byte`.
    pub fn from_punct(byte: u8) -> Option<TokenKind> {
        Some(match byte {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'=' => TokenKind::Equals,
            b'!' => TokenKind::Bang,
            b'>' => TokenKind::Greater,
            b'<' => TokenKind::Less,
            b'&' => TokenKind::Ampersand,
            b'|' => TokenKind::Pipe,
            b'~' => TokenKind::Tilde,
            b'^' => TokenKind::Caret,
            b'?' => TokenKind::Question,
            b':' => TokenKind::Colon,
            b'.' => TokenKind::Dot,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b'{' => TokenKind::OpenBrace,
            b'}' => TokenKind::CloseBrace,
            b'[' => TokenKind::OpenBracket,
            b']' => TokenKind::CloseBracket,
            _ => return None,
        })
    }

    /// Human-readable name: the lexeme for operators and keywords, a
    /// description for everything else.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Unknown => "unknown",
            TokenKind::Whitespace => "whitespace",
            TokenKind::EndOfLine => "end of line",
            TokenKind::Comment => "comment",
            TokenKind::EndOfStream => "end of stream",
            TokenKind::Error => "error",
            TokenKind::Identifier => "identifier",
            TokenKind::StringLit => "string literal",
            TokenKind::CharLit => "character literal",
            TokenKind::IntLit => "integer literal",
            TokenKind::F32Lit => "f32 literal",
            TokenKind::F64Lit => "f64 literal",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Equals => "=",
            TokenKind::Bang => "!",
            TokenKind::Greater => ">",
            TokenKind::Less => "<",
            TokenKind::Ampersand => "&",
            TokenKind::Pipe => "|",
            TokenKind::Tilde => "~",
            TokenKind::Caret => "^",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Increment => "++",
            TokenKind::PlusEquals => "+=",
            TokenKind::Decrement => "--",
            TokenKind::MinusEquals => "-=",
            TokenKind::Arrow => "->",
            TokenKind::StarEquals => "*=",
            TokenKind::SlashEquals => "/=",
            TokenKind::PercentEquals => "%=",
            TokenKind::EqualsEquals => "==",
            TokenKind::BangEquals => "!=",
            TokenKind::GreaterEquals => ">=",
            TokenKind::ShiftRight => ">>",
            TokenKind::ShiftRightEquals => ">>=",
            TokenKind::LessEquals => "<=",
            TokenKind::ShiftLeft => "<<",
            TokenKind::ShiftLeftEquals => "<<=",
            TokenKind::LogicalAnd => "&&",
            TokenKind::AndEquals => "&=",
            TokenKind::LogicalOr => "||",
            TokenKind::OrEquals => "|=",
            TokenKind::XorEquals => "^=",
            TokenKind::Ellipsis => "...",
            TokenKind::Auto => "auto",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Char => "char",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Default => "default",
            TokenKind::Do => "do",
            TokenKind::Double => "double",
            TokenKind::Else => "else",
            TokenKind::Enum => "enum",
            TokenKind::Extern => "extern",
            TokenKind::Float => "float",
            TokenKind::For => "for",
            TokenKind::Goto => "goto",
            TokenKind::If => "if",
            TokenKind::Inline => "inline",
            TokenKind::Int => "int",
            TokenKind::Long => "long",
            TokenKind::Register => "register",
            TokenKind::Return => "return",
            TokenKind::Short => "short",
            TokenKind::Signed => "signed",
            TokenKind::Sizeof => "sizeof",
            TokenKind::Static => "static",
            TokenKind::Struct => "struct",
            TokenKind::Switch => "switch",
            TokenKind::Typedef => "typedef",
            TokenKind::Union => "union",
            TokenKind::Unsigned => "unsigned",
            TokenKind::Void => "void",
            TokenKind::Volatile => "volatile",
            TokenKind::While => "while",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_keyword() || self.is_operator() {
            write!(f, "`{}`", self.name())
        } else {
            f.write_str(self.name())
        }
    }
}

bitflags! {
    /// Trivia and diagnostics context of a token.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u8 {
        /// Whitespace preceded this token.
        const SPACE_BEFORE = 1 << 0;
        /// A line break preceded this token.
        const NEWLINE_BEFORE = 1 << 1;
        /// A comment preceded this token.
        const COMMENT_BEFORE = 1 << 2;
        /// A block comment ran into the end of the stream without its
        /// closer. Set on the comment itself, and by the filtered layer on
        /// the end-of-stream token after it.
        const UNTERMINATED = 1 << 3;
    }
}

/// Byte range `[start, end)` of a token in its input stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub const fn len(self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both.
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Payload of a token. Exactly one applies per kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenValue<'s> {
    None,
    /// Integer magnitude.
    Int(u64),
    F32(f32),
    F64(f64),
    /// Identifier, string or comment text. Strings and comments exclude
    /// their delimiters.
    Text(Interval<'s>),
    /// Length of a whitespace run.
    Whitespace(u32),
    /// A character literal: up to four bytes (one UTF-8 character or a
    /// decoded escape) and how many are used.
    Char { bytes: [u8; 4], width: u8 },
    Error(LexErrorKind),
}

impl fmt::Display for TokenValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::None => Ok(()),
            TokenValue::Int(value) => write!(f, "{value}"),
            TokenValue::F32(value) => write!(f, "{value}"),
            TokenValue::F64(value) => write!(f, "{value}"),
            TokenValue::Text(text) => write!(f, "{:?}", text.to_string_lossy()),
            TokenValue::Whitespace(len) => write!(f, "{len}"),
            TokenValue::Char { bytes, width } => {
                let used = &bytes[..usize::from(*width)];
                write!(f, "{:?}", String::from_utf8_lossy(used))
            }
            TokenValue::Error(err) => write!(f, "{err}"),
        }
    }
}

/// A token with its payload, position and trivia flags.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token<'s> {
    pub kind: TokenKind,
    pub value: TokenValue<'s>,
    pub span: Span,
    /// 1-based line of the first byte.
    pub line: u32,
    /// 0-based column (byte offset in the line) of the first byte.
    pub column: u32,
    pub flags: TokenFlags,
}

impl<'s> Token<'s> {
    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Bytes of input this token covers.
    #[inline]
    pub fn len(&self) -> usize {
        self.span.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Text payload, if any.
    pub fn text(&self) -> Option<Interval<'s>> {
        match self.value {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Lexical error reason, if this is an error token.
    pub fn error(&self) -> Option<LexErrorKind> {
        match self.value {
            TokenValue::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.line, self.column, self.kind)?;
        match self.value {
            TokenValue::None => Ok(()),
            value => write!(f, " {value}"),
        }
    }
}

#[cfg(test)]
mod tests;
