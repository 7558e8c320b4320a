//! Parsing well-formed programs

#![allow(clippy::unwrap_used)]

use basic_syntax::{SyntaxKind, parse};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::helpers::source_fixtures::{GUESSING_GAME, SHORT_PROGRAM};
use crate::helpers::{assert_well_formed, find_all, find_kind};

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_print_string_line() {
    let tree = parse(r#"10 PRINT "HI""#);
    assert!(!tree.has_error());

    let root = tree.root_node();
    assert_eq!(root.kind(), SyntaxKind::SOURCE_FILE);
    assert_eq!(root.named_children().count(), 1);

    let line = root.child(0).unwrap();
    assert_eq!(line.kind(), SyntaxKind::LINE_STATEMENT);
    let label = line.child_by_field_name("label").unwrap();
    assert_eq!(label.kind(), SyntaxKind::NUMBER);
    assert_eq!(label.text(), "10");

    let print = find_kind(&tree, SyntaxKind::PRINT_STATEMENT).unwrap();
    let arguments: Vec<_> = print.named_children().collect();
    assert_eq!(arguments.len(), 1);
    assert_eq!(arguments[0].kind(), SyntaxKind::STRING);
    assert_eq!(arguments[0].text(), "\"HI\"");
}

#[test]
fn test_unterminated_string_line() {
    let source = r#"10 PRINT "HI"#;
    let tree = parse(source);
    assert!(tree.has_error());
    assert_eq!(tree.text(), source);

    let string = find_kind(&tree, SyntaxKind::STRING).unwrap();
    assert!(string.is_error());
    assert_eq!(u32::from(string.start_byte()), 9);
    assert_eq!(u32::from(string.end_byte()), source.len() as u32);
    assert_eq!(
        tree.errors().iter().map(|e| e.code.as_str()).collect::<Vec<_>>(),
        vec!["E0102"]
    );
}

// ============================================================================
// Statement shapes
// ============================================================================

#[rstest]
#[case("10 GOTO 100", "(goto_statement target: (number))")]
#[case("10 GOSUB 100", "(gosub_statement target: (number))")]
#[case("10 RETURN", "(return_statement)")]
#[case("10 END", "(end_statement)")]
#[case("10 STOP", "(stop_statement)")]
#[case("10 RESTORE", "(restore_statement)")]
#[case("10 RESTORE 200", "(restore_statement target: (number))")]
#[case("10 REM HELLO, WORLD", "(rem_statement text: (comment_text))")]
#[case("10 REM", "(rem_statement)")]
#[case("10 NEXT", "(next_statement)")]
#[case("10 NEXT I, J", "(next_statement variable: (identifier) variable: (identifier))")]
#[case(
    "10 DATA 1, TWO, \"3\"",
    "(data_statement (number) (data_item) (string))"
)]
#[case("10 READ A, B$", "(read_statement variable: (identifier) variable: (identifier))")]
#[case(
    "10 INPUT \"NAME\"; N$",
    "(input_statement prompt: (string) variable: (identifier))"
)]
#[case(
    "10 ON X GOTO 100, 200",
    "(on_statement selector: (identifier) target: (number) target: (number))"
)]
#[case(
    "10 DIM A(10), B(2, 3)",
    "(dim_statement (array_declaration name: (identifier) dimension: (number)) (array_declaration name: (identifier) dimension: (number) dimension: (number)))"
)]
#[case(
    "10 FOR I = 1 TO 10 STEP 2",
    "(for_statement variable: (identifier) start: (number) end: (number) step: (number))"
)]
#[case(
    "10 LET X = 1",
    "(let_statement variable: (identifier) value: (number))"
)]
#[case("10 X = 1", "(let_statement variable: (identifier) value: (number))")]
#[case(
    "10 A(1) = 2",
    "(let_statement variable: (array_access name: (identifier) argument: (number)) value: (number))"
)]
#[case(
    "10 IF X THEN 100",
    "(if_statement condition: (identifier) consequence: (number))"
)]
#[case(
    "10 IF X GOTO 100",
    "(if_statement condition: (identifier) consequence: (number))"
)]
#[case(
    "10 IF X THEN END ELSE 20",
    "(if_statement condition: (identifier) consequence: (end_statement) alternative: (number))"
)]
fn test_statement_shape(#[case] source: &str, #[case] statement: &str) {
    let tree = parse(source);
    assert!(!tree.has_error(), "{}", tree.dump());
    assert_eq!(
        tree.to_sexp(),
        format!("(source_file (line_statement label: (number) {statement}))")
    );
}

#[test]
fn test_dangling_else_binds_to_inner_if() {
    let tree = parse("10 IF A THEN IF B THEN 20 ELSE 30");
    assert!(!tree.has_error());
    let ifs = find_all(&tree, SyntaxKind::IF_STATEMENT);
    assert_eq!(ifs.len(), 2);
    assert!(ifs[0].child_by_field_name("alternative").is_none());
    assert_eq!(
        ifs[1].child_by_field_name("alternative").unwrap().text(),
        "30"
    );
}

#[test]
fn test_statements_separated_by_colons() {
    let tree = parse("10 A = 1: PRINT A: END");
    let line = tree.root_node().child(0).unwrap();
    let statements: Vec<_> = line
        .named_children()
        .filter(|n| n.kind().is_statement())
        .map(|n| n.kind())
        .collect();
    assert_eq!(
        statements,
        vec![
            SyntaxKind::LET_STATEMENT,
            SyntaxKind::PRINT_STATEMENT,
            SyntaxKind::END_STATEMENT
        ]
    );
}

#[test]
fn test_line_without_label_and_blank_lines() {
    let tree = parse("PRINT 1\n\n\n20 END\n");
    assert!(!tree.has_error());
    let lines = find_all(&tree, SyntaxKind::LINE_STATEMENT);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].child_by_field_name("label").is_none());
}

// ============================================================================
// Expressions
// ============================================================================

#[rstest]
#[case(
    "1 + 2 * 3",
    "(binary_expression left: (number) right: (binary_expression left: (number) right: (number)))"
)]
#[case(
    "1 - 2 - 3",
    "(binary_expression left: (binary_expression left: (number) right: (number)) right: (number))"
)]
#[case(
    "2 ^ 3 ^ 2",
    "(binary_expression left: (number) right: (binary_expression left: (number) right: (number)))"
)]
#[case(
    "-2 ^ 2",
    "(binary_expression left: (unary_expression argument: (number)) right: (number))"
)]
#[case(
    "A OR B AND C",
    "(binary_expression left: (identifier) right: (binary_expression left: (identifier) right: (identifier)))"
)]
#[case(
    "A < 1 AND NOT B",
    "(binary_expression left: (binary_expression left: (identifier) right: (number)) right: (unary_expression argument: (identifier)))"
)]
#[case(
    "A MOD 2 = 0",
    "(binary_expression left: (binary_expression left: (identifier) right: (number)) right: (number))"
)]
#[case(
    "(1 + 2) * 3",
    "(binary_expression left: (parenthesized_expression (binary_expression left: (number) right: (number))) right: (number))"
)]
#[case(
    "LEFT$(A$, 2)",
    "(function_call function: (function_name) argument: (identifier) argument: (number))"
)]
#[case("RND()", "(function_call function: (function_name))")]
#[case(
    "B(I, J + 1)",
    "(array_access name: (identifier) argument: (identifier) argument: (binary_expression left: (identifier) right: (number)))"
)]
fn test_expression_shape(#[case] expression: &str, #[case] expected: &str) {
    let tree = parse(format!("10 X = {expression}"));
    assert!(!tree.has_error(), "{}", tree.dump());
    assert_eq!(
        tree.to_sexp(),
        format!(
            "(source_file (line_statement label: (number) (let_statement variable: (identifier) value: {expected})))"
        )
    );
}

#[test]
fn test_operator_field() {
    let tree = parse("10 X = A <> B");
    let binary = find_kind(&tree, SyntaxKind::BINARY_EXPRESSION).unwrap();
    assert_eq!(
        binary.child_by_field_name("operator").unwrap().kind(),
        SyntaxKind::NEQ
    );
}

// ============================================================================
// Whole programs
// ============================================================================

#[rstest]
#[case(GUESSING_GAME)]
#[case(SHORT_PROGRAM)]
#[case("")]
#[case("\n\n")]
#[case("10 END\r\n20 END\r\n")]
fn test_program_parses_cleanly(#[case] source: &str) {
    let tree = parse(source);
    assert!(!tree.has_error(), "{}", tree.dump());
    assert!(tree.errors().is_empty());
    assert_eq!(tree.text(), source);
    assert_well_formed(&tree, source.as_bytes());
}

#[test]
fn test_guessing_game_lines() {
    let tree = parse(GUESSING_GAME);
    let labels: Vec<String> = find_all(&tree, SyntaxKind::LINE_STATEMENT)
        .iter()
        .map(|line| line.child_by_field_name("label").unwrap().text())
        .collect();
    assert_eq!(labels.len(), 15);
    assert_eq!(labels.first().map(String::as_str), Some("10"));
    assert_eq!(labels.last().map(String::as_str), Some("300"));
}

#[test]
fn test_comments_are_trivia() {
    let tree = parse("10 END ' stop here\n");
    let comment = find_kind(&tree, SyntaxKind::COMMENT).unwrap();
    assert!(comment.is_trivia());
    assert_eq!(comment.text(), "' stop here");
    assert!(!tree.to_sexp().contains("comment"));
}

#[test]
fn test_parse_accepts_invalid_utf8() {
    let source: &[u8] = b"10 PRINT \"\xff\"\n20 END";
    let tree = parse(source);
    assert_well_formed(&tree, source);
    let end = find_kind(&tree, SyntaxKind::END_STATEMENT).unwrap();
    assert!(!end.has_error());
}

#[test]
fn test_long_lists_keep_every_element() {
    let mut source = String::new();
    for line in 1..=20_000 {
        source.push_str(&format!("{line} PRINT {line}\n"));
    }
    source.push_str("20001 DATA ");
    source.push_str(&vec!["7"; 5_000].join(", "));
    source.push_str("\n20002 PRINT 1");
    source.push_str(&": PRINT 2".repeat(2_000));
    source.push('\n');

    let tree = parse(&source);
    assert!(!tree.has_error());
    assert_eq!(tree.text(), source);
    // One line node and one newline per line
    assert_eq!(tree.root_node().child_count(), 2 * 20_002);

    let data = find_kind(&tree, SyntaxKind::DATA_STATEMENT).unwrap();
    assert_eq!(data.named_children().count(), 5_000);
    assert_eq!(find_all(&tree, SyntaxKind::PRINT_STATEMENT).len(), 20_000 + 2_001);
}
