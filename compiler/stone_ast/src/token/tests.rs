use super::*;

#[test]
fn test_keyword_round_trip() {
    for &kw in TokenKind::KEYWORDS {
        assert!(kw.is_keyword());
        assert_eq!(TokenKind::keyword(kw.spelling()), Some(kw));
    }
}

#[test]
fn test_non_keywords() {
    assert_eq!(TokenKind::keyword("main"), None);
    assert_eq!(TokenKind::keyword("Fun"), None);
    assert!(!TokenKind::Identifier.is_keyword());
    assert!(TokenKind::RParen.is_punctuation());
    assert!(!TokenKind::Eof.is_punctuation());
}

#[test]
fn test_display() {
    assert_eq!(TokenKind::RParen.to_string(), ")");
    assert_eq!(TokenKind::KwFun.to_string(), "fun");
    assert_eq!(TokenKind::Eof.to_string(), "end of file");
}
