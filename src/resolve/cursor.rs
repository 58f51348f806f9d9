use tree_sitter::Node;

use super::names::{match_component_name, props_owner};
use crate::catalog::Registry;
use crate::completion::TRIGGER_CHARACTERS;
use crate::document::{Position, TextDocument};
use crate::oracle::Semantics;
use crate::syntax::{
    find_ancestor_where, heritage_references, is_class_like, is_jsx_opening, Direction,
    ParsedSource,
};

/// Registry name of the library component whose JSX element encloses `pos`.
///
/// Lowercase tags (`<div>`) are host elements and never resolve.
pub fn resolve_closest_component_at_cursor(
    semantics: &mut Semantics<'_>,
    registry: &Registry,
    doc: &TextDocument,
    pos: Position,
) -> Option<String> {
    let offset = doc.offset_at(pos);
    let parsed = ParsedSource::parse_with_placeholder(doc, offset, TRIGGER_CHARACTERS).ok()?;
    closest_component_in(semantics, registry, doc, &parsed, offset)
}

/// [`resolve_closest_component_at_cursor`] over an existing parse of `doc`.
pub fn closest_component_in(
    semantics: &mut Semantics<'_>,
    registry: &Registry,
    doc: &TextDocument,
    parsed: &ParsedSource,
    offset: usize,
) -> Option<String> {
    let chain = parsed.chain_at(offset);
    let element = find_ancestor_where(&chain, Direction::Outward, |n| is_jsx_opening(n.kind()))?;
    let tag = tag_identifier(element.child_by_field_name("name")?)?;

    let tag_text = parsed.node_text(tag);
    if !tag_text.chars().next().is_some_and(char::is_uppercase) {
        return None;
    }

    let symbol = semantics.resolve_library_symbol(doc, doc.position_at(tag.start_byte()))?;
    let candidate = props_owner(&symbol.text).unwrap_or_else(|| symbol.text.clone());
    let matched = match_component_name(registry, &candidate, &symbol.module.folder);
    if matched.is_none() {
        tracing::debug!(
            tag = tag_text,
            declared = %symbol.text,
            folder = %symbol.module.folder,
            "element does not map to a tracked component"
        );
    }
    matched.map(str::to_string)
}

/// The identifier to resolve for a tag name: the last segment of
/// `Table.Column`, the whole of `Affix`.
fn tag_identifier(name: Node<'_>) -> Option<Node<'_>> {
    match name.kind() {
        "member_expression" => name.child_by_field_name("property"),
        "nested_identifier" => name.named_child(name.named_child_count().checked_sub(1)?),
        _ => Some(name),
    }
}

/// Nearest enclosing class whose `extends` target resolves into the UI
/// framework's declarations.
///
/// Each candidate class costs one or two oracle round-trips per heritage
/// reference.
pub fn enclosing_class_component<'t>(
    semantics: &mut Semantics<'_>,
    doc: &TextDocument,
    parsed: &'t ParsedSource,
    offset: usize,
) -> Option<Node<'t>> {
    let chain = parsed.chain_at(offset);
    find_ancestor_where(&chain, Direction::Outward, |node| {
        is_class_like(node.kind())
            && heritage_references(node).into_iter().any(|reference| {
                let anchor = tag_identifier(reference).unwrap_or(reference);
                semantics.resolves_to_framework(doc, doc.position_at(anchor.start_byte()))
            })
    })
}
