//! Lexer through the public API

#![allow(clippy::unwrap_used)]

use basic_syntax::parser::{LexMode, LexState, lex_token, tokenize};
use basic_syntax::{CasePolicy, Point, SyntaxKind, TextSize};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("123", SyntaxKind::NUMBER)]
#[case("1.5E-3", SyntaxKind::NUMBER)]
#[case(".25", SyntaxKind::NUMBER)]
#[case("\"A B\"", SyntaxKind::STRING)]
#[case("NAME$", SyntaxKind::IDENT)]
#[case("COUNT%", SyntaxKind::IDENT)]
#[case("goto", SyntaxKind::GOTO_KW)]
#[case("Mod", SyntaxKind::MOD_KW)]
#[case("CHR$", SyntaxKind::BUILTIN_FN)]
#[case("<>", SyntaxKind::NEQ)]
#[case(">=", SyntaxKind::GT_EQ)]
#[case("^", SyntaxKind::CARET)]
#[case("' a comment", SyntaxKind::COMMENT)]
#[case("\r\n", SyntaxKind::NEWLINE)]
#[case(" \t", SyntaxKind::WHITESPACE)]
fn test_single_token(#[case] input: &str, #[case] expected: SyntaxKind) {
    let tokens = tokenize(input);
    assert_eq!(tokens.len(), 1, "{input:?} lexed as {tokens:?}");
    assert_eq!(tokens[0].kind, expected);
    assert!(!tokens[0].is_error);
    assert_eq!(tokens[0].text, input.as_bytes());
}

#[rstest]
#[case("@")]
#[case("\u{e9}")]
#[case("?")]
fn test_unrecognised_character_is_error_token(#[case] input: &str) {
    let tokens = tokenize(input);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, SyntaxKind::ERROR);
    assert!(tokens[0].is_error);
}

#[test]
fn test_tokens_cover_input() {
    let source = "10 IF A$ <> \"Y\" THEN PRINT CHR$(65); : REM done\n20 DATA 1,2\n";
    let tokens = tokenize(source);
    let mut offset = TextSize::new(0);
    for token in &tokens {
        assert_eq!(token.range.start(), offset);
        offset = token.range.end();
    }
    assert_eq!(offset, TextSize::of(source));
}

#[test]
fn test_lex_token_resumes_inside_remark() {
    let src = b"10 REM GOTO 20\n30 GOTO 10";
    // Restarting at "GOTO" in remark mode keeps it as comment text
    let state = LexState::new(TextSize::new(7), LexMode::Remark, Point::new(0, 7));
    let (token, next) = lex_token(src, state, CasePolicy::Insensitive).unwrap();
    assert_eq!(token.kind, SyntaxKind::REM_TEXT);
    assert_eq!(token.text, b"GOTO 20");
    assert_eq!(token.start, Point::new(0, 7));
    assert_eq!(next.mode, LexMode::Remark);

    let (newline, next) = lex_token(src, next, CasePolicy::Insensitive).unwrap();
    assert_eq!(newline.kind, SyntaxKind::NEWLINE);
    assert_eq!(next.mode, LexMode::Normal);
    assert_eq!(next.point, Point::new(1, 0));

    // The same bytes in normal mode are a keyword
    let state = LexState::new(TextSize::new(7), LexMode::Normal, Point::new(0, 7));
    let (token, _) = lex_token(src, state, CasePolicy::Insensitive).unwrap();
    assert_eq!(token.kind, SyntaxKind::GOTO_KW);
}

#[test]
fn test_lex_token_at_end_of_input() {
    let src = b"END";
    let state = LexState::new(TextSize::of("END"), LexMode::Normal, Point::new(0, 3));
    assert!(lex_token(src, state, CasePolicy::Insensitive).is_none());
}
