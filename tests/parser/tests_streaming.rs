//! Pull-based input and batch parsing

#![allow(clippy::unwrap_used)]

use basic_syntax::{Parser, parse};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tokio_util::sync::CancellationToken;

use crate::helpers::assert_same_tree;
use crate::helpers::source_fixtures::{GUESSING_GAME, SHORT_PROGRAM, WITH_ERRORS};

fn chunks(source: &str, size: usize) -> Vec<Vec<u8>> {
    source.as_bytes().chunks(size).map(<[u8]>::to_vec).collect()
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(7)]
#[case(64)]
fn test_chunked_source_matches_buffer(#[case] size: usize) {
    let parser = Parser::new();
    for source in [GUESSING_GAME, SHORT_PROGRAM, WITH_ERRORS] {
        let streamed = parser
            .parse_source(chunks(source, size).into_iter(), &CancellationToken::new())
            .unwrap();
        assert_eq!(streamed.text(), source);
        assert_same_tree(&streamed, &parse(source), &format!("chunks of {size}"));
        assert_eq!(streamed.errors(), parse(source).errors());
    }
}

#[test]
fn test_empty_chunks_are_skipped() {
    let pieces = ["", "10 PRI", "", "", "NT \"A", "\"", ""];
    let tree = Parser::new()
        .parse_source(pieces.into_iter(), &CancellationToken::new())
        .unwrap();
    assert_eq!(tree.text(), "10 PRINT \"A\"");
    assert!(!tree.has_error());
}

#[test]
fn test_cancelled_stream_returns_none() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = Parser::new().parse_source(chunks(SHORT_PROGRAM, 4).into_iter(), &cancel);
    assert!(result.is_none());
}

#[test]
fn test_parse_many_keeps_order() {
    let sources = [GUESSING_GAME, SHORT_PROGRAM, WITH_ERRORS, ""];
    let trees = Parser::new().parse_many(&sources);
    assert_eq!(trees.len(), sources.len());
    for (tree, source) in trees.iter().zip(sources) {
        assert_eq!(tree.text(), source);
        assert_same_tree(tree, &parse(source), source);
    }
    assert!(trees[2].has_error());
    assert!(!trees[0].has_error());
}
