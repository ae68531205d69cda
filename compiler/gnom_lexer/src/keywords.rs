//! C keyword resolution.
//!
//! Identifier text lives in the block-chained input stream, so it may be
//! split across blocks. Every keyword is 2-8 bytes long; anything outside
//! that range is rejected on length alone, and the rest is copied into a
//! stack buffer and matched against the keywords of its length.

use gnom_lexer_core::TokenKind;
use gnom_stream::Interval;

const MAX_KEYWORD_LEN: usize = 8;

/// Keyword kind for an identifier's text, if it spells one.
pub(crate) fn lookup(text: Interval<'_>) -> Option<TokenKind> {
    let len = text.len();
    if !(2..=MAX_KEYWORD_LEN).contains(&len) {
        return None;
    }
    let mut buf = [0u8; MAX_KEYWORD_LEN];
    for (slot, byte) in buf.iter_mut().zip(text.bytes()) {
        *slot = byte;
    }
    lookup_bytes(&buf[..len])
}

/// Length-bucketed match over the keyword table.
fn lookup_bytes(text: &[u8]) -> Option<TokenKind> {
    if !text.first().is_some_and(u8::is_ascii_lowercase) {
        return None;
    }

    let kind = match text.len() {
        2 => match text {
            b"do" => TokenKind::Do,
            b"if" => TokenKind::If,
            _ => return None,
        },
        3 => match text {
            b"for" => TokenKind::For,
            b"int" => TokenKind::Int,
            _ => return None,
        },
        4 => match text {
            b"auto" => TokenKind::Auto,
            b"case" => TokenKind::Case,
            b"char" => TokenKind::Char,
            b"else" => TokenKind::Else,
            b"enum" => TokenKind::Enum,
            b"goto" => TokenKind::Goto,
            b"long" => TokenKind::Long,
            b"void" => TokenKind::Void,
            _ => return None,
        },
        5 => match text {
            b"break" => TokenKind::Break,
            b"const" => TokenKind::Const,
            b"float" => TokenKind::Float,
            b"short" => TokenKind::Short,
            b"union" => TokenKind::Union,
            b"while" => TokenKind::While,
            _ => return None,
        },
        6 => match text {
            b"double" => TokenKind::Double,
            b"extern" => TokenKind::Extern,
            b"inline" => TokenKind::Inline,
            b"return" => TokenKind::Return,
            b"signed" => TokenKind::Signed,
            b"sizeof" => TokenKind::Sizeof,
            b"static" => TokenKind::Static,
            b"struct" => TokenKind::Struct,
            b"switch" => TokenKind::Switch,
            _ => return None,
        },
        7 => match text {
            b"default" => TokenKind::Default,
            b"typedef" => TokenKind::Typedef,
            _ => return None,
        },
        8 => match text {
            b"continue" => TokenKind::Continue,
            b"register" => TokenKind::Register,
            b"unsigned" => TokenKind::Unsigned,
            b"volatile" => TokenKind::Volatile,
            _ => return None,
        },
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests;
