use gnom_arena::Arena;
use gnom_stream::ByteStream;
use pretty_assertions::assert_eq;

use super::*;

// === Byte table ===

const KEYWORDS: [TokenKind; 33] = [
    TokenKind::Auto,
    TokenKind::Break,
    TokenKind::Case,
    TokenKind::Char,
    TokenKind::Const,
    TokenKind::Continue,
    TokenKind::Default,
    TokenKind::Do,
    TokenKind::Double,
    TokenKind::Else,
    TokenKind::Enum,
    TokenKind::Extern,
    TokenKind::Float,
    TokenKind::For,
    TokenKind::Goto,
    TokenKind::If,
    TokenKind::Inline,
    TokenKind::Int,
    TokenKind::Long,
    TokenKind::Register,
    TokenKind::Return,
    TokenKind::Short,
    TokenKind::Signed,
    TokenKind::Sizeof,
    TokenKind::Static,
    TokenKind::Struct,
    TokenKind::Switch,
    TokenKind::Typedef,
    TokenKind::Union,
    TokenKind::Unsigned,
    TokenKind::Void,
    TokenKind::Volatile,
    TokenKind::While,
];

#[test]
fn every_keyword_resolves_to_its_own_kind() {
    for kind in KEYWORDS {
        assert!(kind.is_keyword());
        assert_eq!(lookup_bytes(kind.name().as_bytes()), Some(kind), "{kind:?}");
    }
    let range = TokenKind::While as usize - TokenKind::Auto as usize + 1;
    assert_eq!(range, KEYWORDS.len());
}

#[test]
fn non_keywords() {
    assert_eq!(lookup_bytes(b"main"), None);
    assert_eq!(lookup_bytes(b"i"), None);
    assert_eq!(lookup_bytes(b"iff"), None);
    assert_eq!(lookup_bytes(b"_if"), None);
    assert_eq!(lookup_bytes(b"restrict"), None);
}

#[test]
fn keywords_are_case_sensitive() {
    assert_eq!(lookup_bytes(b"If"), None);
    assert_eq!(lookup_bytes(b"WHILE"), None);
}

// === Interval lookup ===

fn lookup_str(text: &str, block_size: u32) -> Option<TokenKind> {
    let arena = Arena::new();
    let mut stream = ByteStream::with_block_size(&arena, block_size);
    stream.push_bytes(text.as_bytes());
    let interval = stream.interval(0, text.len())?;
    lookup(interval)
}

#[test]
fn keyword_split_across_blocks() {
    assert_eq!(lookup_str("volatile", 3), Some(TokenKind::Volatile));
    assert_eq!(lookup_str("do", 1), Some(TokenKind::Do));
}

#[test]
fn long_identifier_is_rejected_by_length() {
    assert_eq!(lookup_str("unsigned_", 4), None);
    assert_eq!(lookup_str("registers", 64), None);
}

#[test]
fn keyword_prefix_is_not_a_keyword() {
    assert_eq!(lookup_str("whil", 64), None);
    assert_eq!(lookup_str("in", 64), None);
}
