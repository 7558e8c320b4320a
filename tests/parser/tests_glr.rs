//! Ambiguities resolved by the GLR engine

#![allow(clippy::unwrap_used)]

use basic_syntax::{ParseOptions, Parser, SyntaxKind, parse};
use pretty_assertions::assert_eq;

use crate::helpers::source_fixtures::GUESSING_GAME;
use crate::helpers::{assert_same_tree, find_kind};

#[test]
fn test_name_followed_by_parentheses_is_array_access() {
    let tree = parse("10 PRINT A (1)");
    assert!(!tree.has_error());
    assert_eq!(
        tree.to_sexp(),
        "(source_file (line_statement label: (number) \
         (print_statement (array_access name: (identifier) argument: (number)))))"
    );
}

#[test]
fn test_array_access_wins_with_following_lines() {
    let tree = parse("10 PRINT A (1)\n20 PRINT B(2, 3)\n30 END\n");
    assert!(!tree.has_error());
    let print = find_kind(&tree, SyntaxKind::PRINT_STATEMENT).unwrap();
    let access = print.named_children().next().unwrap();
    assert_eq!(access.kind(), SyntaxKind::ARRAY_ACCESS);
    assert_eq!(access.text(), "A (1)");
    assert!(find_kind(&tree, SyntaxKind::END_STATEMENT).is_some());
}

#[test]
fn test_subscripted_assignment_is_not_ambiguous_in_result() {
    let tree = parse("10 X = B(I, J + 1)");
    assert!(!tree.has_error());
    let access = find_kind(&tree, SyntaxKind::ARRAY_ACCESS).unwrap();
    assert_eq!(access.child_by_field_name("name").unwrap().text(), "B");
    assert_eq!(access.named_children().count(), 3);
}

#[test]
fn test_single_version_takes_preferred_action() {
    // Without room to fork the engine commits to the name as a whole item
    let parser = Parser::with_options(ParseOptions::default().with_max_versions(1));
    let tree = parser.parse("10 PRINT A (1)");
    assert!(!tree.has_error());
    assert!(find_kind(&tree, SyntaxKind::ARRAY_ACCESS).is_none());
    assert!(find_kind(&tree, SyntaxKind::PARENTHESIZED_EXPRESSION).is_some());
}

#[test]
fn test_parse_is_deterministic() {
    let sources = [
        GUESSING_GAME,
        "10 PRINT A (1); B (2)\n20 IF A THEN IF B THEN 10 ELSE 20\n",
        "10 PRINT (((\n20 X = = 3\n",
    ];
    for source in sources {
        let first = parse(source);
        let second = parse(source);
        assert_same_tree(&first, &second, source);
        assert_eq!(first.to_sexp(), second.to_sexp());
        assert_eq!(first.errors(), second.errors());
    }
}
