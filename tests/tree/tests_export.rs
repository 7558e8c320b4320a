//! Rowan export, positions and tree comparison

#![allow(clippy::unwrap_used)]

use basic_syntax::parser::RowanNode;
use basic_syntax::{LineIndex, Point, SyntaxKind, TextRange, TextSize, parse};
use pretty_assertions::assert_eq;

use crate::helpers::source_fixtures::{GUESSING_GAME, WITH_ERRORS};

#[test]
fn test_rowan_tree_round_trips_text() {
    for source in [GUESSING_GAME, WITH_ERRORS, ""] {
        let tree = parse(source);
        let root = tree.to_rowan();
        assert_eq!(root.kind(), SyntaxKind::SOURCE_FILE);
        assert_eq!(root.text().to_string(), source);
    }
}

#[test]
fn test_rowan_tree_mirrors_node_kinds() {
    let tree = parse(GUESSING_GAME);
    let ours: Vec<SyntaxKind> = tree
        .root_node()
        .preorder_nodes()
        .filter(|node| !node.is_leaf())
        .map(|node| node.kind())
        .collect();
    let rowan: Vec<SyntaxKind> = tree.to_rowan().descendants().map(|node| node.kind()).collect();
    assert_eq!(ours, rowan);
}

#[test]
fn test_rowan_keeps_error_and_missing_tokens() {
    let tree = parse("10 GOTO\n20 PRINT @");
    let root = RowanNode::new_root(tree.to_green());
    let tokens: Vec<_> = root
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .map(|token| (token.kind(), token.text().to_string()))
        .collect();
    assert!(tokens.contains(&(SyntaxKind::NUMBER, String::new())));
    assert!(tokens.contains(&(SyntaxKind::ERROR, "@".to_string())));
}

#[test]
fn test_error_positions_through_line_index() {
    let index = LineIndex::new(WITH_ERRORS.as_bytes());
    let tree = parse(WITH_ERRORS);
    let rows: Vec<u32> = tree
        .errors()
        .iter()
        .map(|error| index.point(error.range.start()).row)
        .collect();
    assert_eq!(rows, vec![0, 1, 2, 3]);

    let invalid = tree.errors().pop().unwrap();
    assert_eq!(index.point(invalid.range.start()), Point::new(3, 9));
    assert_eq!(invalid.range.len(), TextSize::new(1));
}

#[test]
fn test_changed_ranges_between_unrelated_trees() {
    let a = parse("10 PRINT 1\n");
    let b = parse("10 PRINT 1\n");
    assert!(b.changed_ranges(&a).is_empty());

    let c = parse("10 PRINT 2\n");
    assert_eq!(
        c.changed_ranges(&a),
        vec![TextRange::new(TextSize::new(0), TextSize::new(11))]
    );
}

#[test]
fn test_structural_equality_ignores_identity() {
    let a = parse(GUESSING_GAME);
    let b = parse(GUESSING_GAME);
    assert!(a.structurally_eq(&b));
    assert!(!a.structurally_eq(&parse(WITH_ERRORS)));
    assert!(!parse("10 A = 1").structurally_eq(&parse("10 B = 1")));
}
