use gnom_arena::Arena;
use gnom_stream::ByteStream;
use pretty_assertions::assert_eq;

use super::*;

// === TokenKind ===

#[test]
fn kind_is_one_byte() {
    assert_eq!(std::mem::size_of::<TokenKind>(), 1);
}

#[test]
fn category_ranges() {
    assert!(TokenKind::Plus.is_operator());
    assert!(TokenKind::CloseBracket.is_operator());
    assert!(TokenKind::Ellipsis.is_operator());
    assert!(!TokenKind::Identifier.is_operator());
    assert!(!TokenKind::Auto.is_operator());

    assert!(TokenKind::Auto.is_keyword());
    assert!(TokenKind::While.is_keyword());
    assert!(!TokenKind::Ellipsis.is_keyword());

    assert!(TokenKind::Comment.is_trivia());
    assert!(TokenKind::EndOfLine.is_trivia());
    assert!(!TokenKind::EndOfStream.is_trivia());
    assert!(!TokenKind::Error.is_trivia());
}

#[test]
fn punct_round_trips_through_name() {
    for byte in 0u8..=127 {
        if let Some(kind) = TokenKind::from_punct(byte) {
            assert_eq!(kind.name().as_bytes(), [byte], "{kind:?}");
            assert!(kind.is_operator());
        }
    }
    assert_eq!(TokenKind::from_punct(b'#'), None);
    assert_eq!(TokenKind::from_punct(b'a'), None);
}

#[test]
fn display_quotes_lexemes_only() {
    assert_eq!(TokenKind::ShiftLeftEquals.to_string(), "`<<=`");
    assert_eq!(TokenKind::Sizeof.to_string(), "`sizeof`");
    assert_eq!(TokenKind::IntLit.to_string(), "integer literal");
    assert_eq!(TokenKind::EndOfStream.to_string(), "end of stream");
}

// === Span ===

#[test]
fn span_len_and_merge() {
    let a = Span::new(2, 5);
    let b = Span::new(7, 9);
    assert_eq!(a.len(), 3);
    assert!(!a.is_empty());
    assert!(Span::new(4, 4).is_empty());
    assert_eq!(a.merge(b), Span::new(2, 9));
    assert_eq!(b.merge(a), Span::new(2, 9));
}

// === TokenFlags ===

#[test]
fn flags_combine() {
    let flags = TokenFlags::SPACE_BEFORE | TokenFlags::COMMENT_BEFORE;
    assert!(flags.contains(TokenFlags::SPACE_BEFORE));
    assert!(!flags.contains(TokenFlags::NEWLINE_BEFORE));
    assert_eq!(TokenFlags::default(), TokenFlags::empty());
}

// === Token ===

#[test]
fn token_display() {
    let arena = Arena::new();
    let stream = ByteStream::from_bytes(&arena, b"count");
    let text = stream.interval(0, 5);
    assert!(text.is_some());
    let Some(text) = text else { return };

    let ident = Token {
        kind: TokenKind::Identifier,
        value: TokenValue::Text(text),
        span: Span::new(0, 5),
        line: 3,
        column: 4,
        flags: TokenFlags::empty(),
    };
    assert_eq!(ident.to_string(), "3:4 identifier \"count\"");
    assert_eq!(ident.text(), Some(text));
    assert_eq!(ident.error(), None);
    assert!(ident.is(TokenKind::Identifier));

    let semi = Token {
        kind: TokenKind::Semicolon,
        value: TokenValue::None,
        span: Span::new(5, 6),
        line: 1,
        column: 0,
        flags: TokenFlags::empty(),
    };
    assert_eq!(semi.to_string(), "1:0 `;`");
}

#[test]
fn value_display() {
    assert_eq!(TokenValue::Int(42).to_string(), "42");
    assert_eq!(TokenValue::F64(2.5).to_string(), "2.5");
    assert_eq!(
        TokenValue::Char {
            bytes: [b'x', 0, 0, 0],
            width: 1
        }
        .to_string(),
        "\"x\""
    );
    assert_eq!(
        TokenValue::Error(LexErrorKind::EmptyCharLiteral).to_string(),
        LexErrorKind::EmptyCharLiteral.to_string()
    );
}
