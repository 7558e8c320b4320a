//! Node navigation and rendering

#![allow(clippy::unwrap_used)]

use basic_syntax::tree::WalkEvent;
use basic_syntax::{SyntaxKind, parse};
use pretty_assertions::assert_eq;

use crate::helpers::find_kind;
use crate::helpers::source_fixtures::GUESSING_GAME;

#[test]
fn test_fields_and_named_children() {
    let tree = parse("10 FOR I = 1 TO N STEP -1");
    let for_statement = find_kind(&tree, SyntaxKind::FOR_STATEMENT).unwrap();
    assert_eq!(for_statement.child_by_field_name("variable").unwrap().text(), "I");
    assert_eq!(for_statement.child_by_field_name("start").unwrap().text(), "1");
    assert_eq!(for_statement.child_by_field_name("end").unwrap().text(), "N");
    let step = for_statement.child_by_field_name("step").unwrap();
    assert_eq!(step.kind(), SyntaxKind::UNARY_EXPRESSION);
    assert_eq!(step.field_name(), Some("step"));

    // Keywords are anonymous
    let named: Vec<_> = for_statement.named_children().map(|n| n.kind()).collect();
    assert_eq!(
        named,
        vec![
            SyntaxKind::IDENT,
            SyntaxKind::NUMBER,
            SyntaxKind::IDENT,
            SyntaxKind::UNARY_EXPRESSION,
        ]
    );
}

#[test]
fn test_repeated_fields() {
    let tree = parse("10 ON X GOTO 100, 200, 300");
    let on = find_kind(&tree, SyntaxKind::ON_STATEMENT).unwrap();
    let targets: Vec<_> = on.children_by_field_name("target").map(|n| n.text()).collect();
    assert_eq!(targets, vec!["100", "200", "300"]);
    assert_eq!(on.child_by_field_name("selector").unwrap().text(), "X");
}

#[test]
fn test_parent_and_ancestors() {
    let tree = parse("10 PRINT 1\n20 LET A = (B + 1) * 2");
    let plus = find_kind(&tree, SyntaxKind::PLUS).unwrap();
    let kinds: Vec<_> = plus.ancestors().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::BINARY_EXPRESSION,
            SyntaxKind::PARENTHESIZED_EXPRESSION,
            SyntaxKind::BINARY_EXPRESSION,
            SyntaxKind::LET_STATEMENT,
            SyntaxKind::LINE_STATEMENT,
            SyntaxKind::SOURCE_FILE,
        ]
    );
    assert_eq!(tree.root_node().parent(), None);
}

#[test]
fn test_skip_subtree_in_walk() {
    let tree = parse(GUESSING_GAME);
    let mut labels = Vec::new();
    let mut walk = tree.root_node().preorder();
    while let Some(event) = walk.next() {
        let WalkEvent::Enter(node) = event else {
            continue;
        };
        if node.kind() == SyntaxKind::LINE_STATEMENT {
            labels.push(node.child_by_field_name("label").unwrap().text());
            walk.skip_subtree();
        }
    }
    assert_eq!(labels.len(), 15);
    assert_eq!(labels.first().map(String::as_str), Some("10"));
    assert_eq!(labels.last().map(String::as_str), Some("300"));
}

#[test]
fn test_sexp_shows_missing_and_error_nodes() {
    assert_eq!(
        parse("10 GOTO").to_sexp(),
        "(source_file (line_statement label: (number) (goto_statement target: (MISSING number))))"
    );

    let tree = parse("10 PRINT )");
    assert!(tree.to_sexp().contains("(ERROR)"));
    let error = find_kind(&tree, SyntaxKind::ERROR).unwrap();
    assert!(
        error
            .ancestors()
            .any(|node| node.kind() == SyntaxKind::LINE_STATEMENT)
    );
}

#[test]
fn test_dump_lists_every_node() {
    let tree = parse("10 GOTO 100");
    let dump = tree.dump();
    assert!(dump.starts_with("source_file@0..11\n"));
    assert!(dump.contains("    label: number@0..2 \"10\"\n"));
    assert!(dump.contains("      target: number@8..11 \"100\"\n"));
    let nodes = tree.root_node().preorder_nodes().count();
    assert_eq!(dump.lines().count(), nodes);
}
