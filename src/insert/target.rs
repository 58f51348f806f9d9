use tree_sitter::Node;

use super::template::TargetKind;
use crate::document::{Span, TextDocument};
use crate::oracle::Semantics;
use crate::resolve::enclosing_class_component;
use crate::syntax::{find_ancestor_where, is_class_like, Direction, ParsedSource};

/// Where a stub lands for one JSX site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionTarget {
    pub kind: TargetKind,
    /// The enclosing component.
    pub enclosing: Span,
    /// The class member or body statement the stub goes in front of.
    pub sibling: Span,
}

impl InsertionTarget {
    pub fn insertion_offset(&self) -> usize {
        self.sibling.start
    }
}

/// Locate the component around `anchor` and the node the stub precedes.
///
/// A framework class wins over any function around it. `class_hint` is the
/// span completion found for that class, taken before the accepted text
/// went in, so only its start is compared. When a class around `anchor`
/// in `parsed` still starts there the oracle is not asked again. Without
/// a class, the outermost function or variable statement holding a block
/// around `anchor` is the component.
pub fn locate_target(
    semantics: &mut Semantics<'_>,
    doc: &TextDocument,
    parsed: &ParsedSource,
    anchor: usize,
    class_hint: Option<Span>,
) -> Option<InsertionTarget> {
    let hinted = class_hint.and_then(|hint| {
        let class = hinted_class(parsed, hint, anchor);
        if class.is_none() {
            tracing::debug!(?hint, anchor, "class hint does not match the source");
        }
        class
    });
    let class = hinted.or_else(|| enclosing_class_component(semantics, doc, parsed, anchor));
    match class {
        Some(class) => class_target(class, anchor),
        None => function_target(parsed, anchor),
    }
}

/// The class-like node around `anchor` that starts where `hint` does.
fn hinted_class(parsed: &ParsedSource, hint: Span, anchor: usize) -> Option<Node<'_>> {
    if hint.start > anchor {
        return None;
    }
    let chain = parsed.chain_at(anchor);
    find_ancestor_where(&chain, Direction::Outward, |n| {
        is_class_like(n.kind()) && n.start_byte() == hint.start
    })
}

fn class_target(class: Node<'_>, anchor: usize) -> Option<InsertionTarget> {
    let body = class.child_by_field_name("body")?;
    let mut cursor = body.walk();
    let member = body
        .named_children(&mut cursor)
        .filter(|m| m.kind() != "comment")
        .find(|m| m.start_byte() <= anchor && anchor < m.end_byte())?;
    Some(InsertionTarget {
        kind: TargetKind::Class,
        enclosing: span(class),
        sibling: span(member),
    })
}

fn function_target(parsed: &ParsedSource, anchor: usize) -> Option<InsertionTarget> {
    let chain = parsed.chain_at(anchor);
    let component = find_ancestor_where(&chain, Direction::Inward, |n| {
        matches!(
            n.kind(),
            "function_declaration" | "lexical_declaration" | "variable_declaration"
        )
    })?;

    let below = chain.below(component);
    let block = below.iter().position(|n| n.kind() == "statement_block")?;
    let statement = below.get(block + 1)?;
    Some(InsertionTarget {
        kind: TargetKind::Function,
        enclosing: span(component),
        sibling: span(*statement),
    })
}

fn span(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}
