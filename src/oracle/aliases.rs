use std::borrow::Cow;
use std::collections::HashSet;

use tree_sitter::Node;

use super::{ancestors, node_around, trimmed_span, LibrarySymbol, Location, Semantics};
use crate::document::{Position, TextDocument};
use crate::syntax::ParsedSource;
use crate::util::is_identifier;

/// Upper bound on definition hops through user code.
const MAX_ALIAS_HOPS: usize = 16;

impl Semantics<'_> {
    /// Follow "go to definition" through re-exports and aliases in user code
    /// until it lands in the component library.
    ///
    /// Each hop queries at the end of the previous target's name. A
    /// `(uri, position)` pair is never queried twice, so cycles end in
    /// `None`. Landing in any other dependency also ends in `None`.
    pub fn resolve_through_user_aliases(
        &mut self,
        doc: &TextDocument,
        pos: Position,
    ) -> Option<LibrarySymbol> {
        let mut visited: HashSet<(String, Position)> = HashSet::new();
        let mut current: Cow<'_, TextDocument> = Cow::Borrowed(doc);
        let mut pos = pos;

        for _ in 0..MAX_ALIAS_HOPS {
            if self.is_cancelled() {
                return None;
            }
            if !visited.insert((current.uri().to_string(), pos)) {
                tracing::debug!(uri = %current.uri(), ?pos, "alias cycle");
                return None;
            }

            let defs = self.find_definitions(&current, pos);
            if let Some(lib) = defs.iter().find(|d| self.layout.is_library_owned(&d.path())) {
                return self.library_symbol(lib);
            }
            let user = defs
                .into_iter()
                .find(|d| self.layout.is_user_owned(&d.path()))?;

            pos = user.target_range().end;
            if user.uri != current.uri() {
                current = Cow::Owned(self.open(&user.uri)?);
            }
        }

        tracing::debug!(uri = %doc.uri(), "alias chain too long");
        None
    }

    /// Read the declared name at a library location.
    pub(super) fn library_symbol(&mut self, location: &Location) -> Option<LibrarySymbol> {
        let module = self.layout.library_module(&location.path())?;
        let target = self.open(&location.uri)?;
        let text = symbol_text(&target, location)?;
        Some(LibrarySymbol {
            text,
            location: location.clone(),
            module,
        })
    }
}

/// The identifier a location names.
///
/// A precise range yields the identifier directly. A coarse range (a
/// whole line or declaration) is narrowed through the syntax tree to the
/// nearest declaration's name.
fn symbol_text(doc: &TextDocument, location: &Location) -> Option<String> {
    let range = location.target_range();
    let raw = doc.text_in(range).trim();
    if is_identifier(raw) {
        return Some(raw.to_string());
    }

    let parsed = ParsedSource::parse_document(doc).ok()?;
    let span = trimmed_span(doc, range);
    let node = node_around(&parsed, span)?;
    let name = ancestors(node).find_map(declared_name)?;
    let text = parsed.node_text(name);
    (!text.is_empty()).then(|| text.to_string())
}

/// Name node of a declaration, looking through `export` and `declare`
/// wrappers and variable statements.
fn declared_name(node: Node<'_>) -> Option<Node<'_>> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(name);
    }
    if let Some(inner) = node.child_by_field_name("declaration") {
        return declared_name(inner);
    }
    if node.kind() == "ambient_declaration" {
        return declared_name(node.named_child(0)?);
    }
    if matches!(node.kind(), "lexical_declaration" | "variable_declaration") {
        let mut cursor = node.walk();
        let declarator = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "variable_declarator")?;
        return declarator.child_by_field_name("name");
    }
    None
}
