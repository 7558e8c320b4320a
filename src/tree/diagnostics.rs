//! Diagnostics derived from ERROR and MISSING nodes

use rowan::WalkEvent;

use super::node::Node;
use crate::parser::SyntaxKind;
use crate::parser::errors::{ErrorCode, SyntaxError};

pub(crate) fn collect(root: Node<'_>) -> Vec<SyntaxError> {
    let mut errors = Vec::new();
    if !root.has_error() {
        return errors;
    }

    let mut parents: Vec<Node<'_>> = Vec::new();
    let mut walk = root.preorder();
    while let Some(event) = walk.next() {
        let node = match event {
            WalkEvent::Enter(node) => node,
            WalkEvent::Leave(_) => {
                parents.pop();
                continue;
            }
        };
        parents.push(node);
        if !node.has_error() {
            walk.skip_subtree();
            continue;
        }
        if node.is_missing() {
            let parent = parents.len().checked_sub(2).map(|i| parents[i]);
            errors.push(missing_error(node, parent));
        } else if node.is_error() && !node.is_leaf() {
            errors.push(error_node(node));
            walk.skip_subtree();
        } else if node.is_error() {
            errors.push(lexical_error(node));
        }
    }
    errors
}

fn lexical_error(leaf: Node<'_>) -> SyntaxError {
    if leaf.kind() == SyntaxKind::STRING {
        SyntaxError::builder(ErrorCode::E0102)
            .range(leaf.byte_range())
            .hint("add a closing '\"'")
            .build()
    } else {
        SyntaxError::builder(ErrorCode::E0101)
            .message(format!("invalid character {:?}", leaf.text()))
            .range(leaf.byte_range())
            .build()
    }
}

fn error_node(node: Node<'_>) -> SyntaxError {
    let significant: Vec<Node<'_>> = node.leaves().filter(|leaf| !leaf.is_trivia()).collect();

    if !significant.is_empty() && significant.iter().all(|leaf| leaf.is_error()) {
        if let [leaf] = significant.as_slice() {
            return lexical_error(*leaf);
        }
        return SyntaxError::builder(ErrorCode::E0101)
            .message(format!("invalid input {:?}", node.text()))
            .range(node.byte_range())
            .build();
    }

    match significant.first() {
        Some(first) if first.kind() == SyntaxKind::R_PAREN => {
            SyntaxError::builder(ErrorCode::E0203)
                .range(node.byte_range())
                .hint("remove the ')' or add a matching '('")
                .build()
        }
        Some(first) => SyntaxError::builder(ErrorCode::E0901)
            .message(format!("unexpected {}", describe(*first)))
            .range(node.byte_range())
            .build(),
        None => SyntaxError::new(
            ErrorCode::E0901.default_message(),
            node.byte_range(),
            ErrorCode::E0901,
        ),
    }
}

fn missing_error(leaf: Node<'_>, parent: Option<Node<'_>>) -> SyntaxError {
    let kind = leaf.kind();
    let jump = parent.is_some_and(|parent| {
        matches!(
            parent.kind(),
            SyntaxKind::GOTO_STATEMENT
                | SyntaxKind::GOSUB_STATEMENT
                | SyntaxKind::ON_STATEMENT
                | SyntaxKind::RESTORE_STATEMENT
        )
    });
    let code = if kind == SyntaxKind::NUMBER && jump {
        ErrorCode::E0304
    } else {
        ErrorCode::for_missing(kind)
    };

    let mut builder = SyntaxError::builder(code).range(leaf.byte_range());
    if code == ErrorCode::E0902 {
        builder = builder.message(format!("expected '{}'", kind.name()));
    }
    if code == ErrorCode::E0202 {
        let open = parent.and_then(|parent| {
            parent
                .children()
                .filter(|child| child.kind() == SyntaxKind::L_PAREN)
                .last()
        });
        if let Some(open) = open {
            builder = builder.related("opening parenthesis here", open.byte_range());
        }
        builder = builder.hint("add ')' to close the expression");
    }
    builder.build()
}

fn describe(leaf: Node<'_>) -> String {
    match leaf.kind() {
        SyntaxKind::NEWLINE => "end of line".to_string(),
        kind if kind.is_keyword() => format!("keyword '{}'", kind.name()),
        kind if kind.is_punct() => format!("'{}'", kind.name()),
        _ => format!("{} {:?}", leaf.kind_name(), leaf.text()),
    }
}
