//! Fresh-per-query syntax trees and the walks the resolver needs.
//!
//! Trees are rebuilt for every request: the document may have changed
//! between a hover and the next completion, so nothing here is cached.

mod chain;
mod params;

pub use chain::{find_ancestor_where, Direction, NodeChain};
pub use params::extract_declared_parameter_names;

use tree_sitter::{Node, Tree};

use crate::document::TextDocument;
use crate::error::PropscopeError;
use crate::parser::{parse_text, SourceKind};
use crate::util::txt;

/// Stand-in for a trigger character so the element around it still parses.
const PLACEHOLDER: u8 = b'_';

/// A parsed snapshot: the exact text the tree was built from plus the tree.
pub struct ParsedSource {
    text: String,
    tree: Tree,
}

impl ParsedSource {
    pub fn parse(text: impl Into<String>, kind: SourceKind) -> Result<Self, PropscopeError> {
        let text = text.into();
        let tree = parse_text(&text, kind)?;
        Ok(Self { text, tree })
    }

    pub fn parse_document(doc: &TextDocument) -> Result<Self, PropscopeError> {
        Self::parse(doc.text(), SourceKind::for_uri(doc.uri()))
    }

    /// Parse `doc` with the trigger character just before `offset` replaced
    /// by an identifier character.
    ///
    /// `<Button #` does not parse as an element; `<Button _` does, and the
    /// replacement keeps every byte offset stable.
    pub fn parse_with_placeholder(
        doc: &TextDocument,
        offset: usize,
        triggers: &[char],
    ) -> Result<Self, PropscopeError> {
        let mut text = doc.text().to_string();
        let before = text.get(..offset).and_then(|head| head.chars().next_back());
        if let Some(c) = before.filter(|c| triggers.contains(c)) {
            let at = offset - c.len_utf8();
            let placeholder = String::from(PLACEHOLDER as char).repeat(c.len_utf8());
            text.replace_range(at..offset, &placeholder);
        }
        Self::parse(text, SourceKind::for_uri(doc.uri()))
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn src(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn node_text(&self, node: Node) -> &str {
        txt(node, self.src())
    }

    /// Enclosing nodes of `offset`, outermost first.
    pub fn chain_at(&self, offset: usize) -> NodeChain<'_> {
        NodeChain::build(self.root(), offset)
    }
}

/// Returns `true` for nodes that open a JSX element and carry its tag name.
pub fn is_jsx_opening(kind: &str) -> bool {
    matches!(kind, "jsx_opening_element" | "jsx_self_closing_element")
}

/// Returns `true` for class declarations and class expressions.
pub fn is_class_like(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration" | "class" | "abstract_class_declaration"
    )
}

/// Nodes referenced in a class's `extends` clause (`React.Component`, `PureComponent`).
pub fn heritage_references(class: Node) -> Vec<Node> {
    let mut refs = Vec::new();
    let mut cursor = class.walk();
    for child in class.named_children(&mut cursor) {
        if child.kind() != "class_heritage" {
            continue;
        }
        let mut inner = child.walk();
        for clause in child.named_children(&mut inner) {
            if clause.kind() != "extends_clause" {
                continue;
            }
            let mut values = clause.walk();
            refs.extend(clause.children_by_field_name("value", &mut values));
        }
    }
    refs
}
