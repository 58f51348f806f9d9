//! The boundary to the host's semantic index.
//!
//! [`SemanticOracle`] is what a host implements; [`Semantics`] wraps one
//! for the engine. Every call through `Semantics` honours cancellation and
//! turns host failures into empty results, so a broken provider shows up
//! as "nothing found" rather than an error.

mod aliases;
pub mod command;
pub mod location;
mod paths;

pub use location::{Location, SymbolInfo};
pub use paths::{LibraryLayout, LibraryModule};

use tree_sitter::Node;

use crate::cancel::CancellationToken;
use crate::document::{Position, Range, Span, TextDocument};
use crate::error::PropscopeError;
use crate::syntax::ParsedSource;

/// Definition, type-definition and symbol queries against some host.
pub trait SemanticOracle {
    fn definition(&mut self, doc: &TextDocument, pos: Position)
        -> Result<Vec<Location>, PropscopeError>;

    fn type_definition(
        &mut self,
        doc: &TextDocument,
        pos: Position,
    ) -> Result<Vec<Location>, PropscopeError>;

    fn document_symbols(&mut self, uri: &str) -> Result<Vec<SymbolInfo>, PropscopeError>;

    /// Load a document the index points at (declaration files, alias targets).
    fn open(&mut self, uri: &str) -> Result<TextDocument, PropscopeError>;
}

/// A symbol resolved into the component library's installed package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySymbol {
    /// Declared name at the resolved location (`Affix`, `onChange`, `AffixProps`).
    pub text: String,
    pub location: Location,
    pub module: LibraryModule,
}

/// Request-scoped access to the oracle.
pub struct Semantics<'a> {
    oracle: &'a mut dyn SemanticOracle,
    layout: &'a LibraryLayout,
    cancel: &'a CancellationToken,
}

impl<'a> Semantics<'a> {
    pub fn new(
        oracle: &'a mut dyn SemanticOracle,
        layout: &'a LibraryLayout,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            oracle,
            layout,
            cancel,
        }
    }

    pub fn layout(&self) -> &LibraryLayout {
        self.layout
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn find_definitions(&mut self, doc: &TextDocument, pos: Position) -> Vec<Location> {
        if self.is_cancelled() {
            return Vec::new();
        }
        self.oracle.definition(doc, pos).unwrap_or_else(|e| {
            tracing::debug!(uri = %doc.uri(), ?pos, error = %e, "definition query failed");
            Vec::new()
        })
    }

    pub fn find_definition(&mut self, doc: &TextDocument, pos: Position) -> Option<Location> {
        self.find_definitions(doc, pos).into_iter().next()
    }

    pub fn find_type_definitions(&mut self, doc: &TextDocument, pos: Position) -> Vec<Location> {
        if self.is_cancelled() {
            return Vec::new();
        }
        self.oracle.type_definition(doc, pos).unwrap_or_else(|e| {
            tracing::debug!(uri = %doc.uri(), ?pos, error = %e, "type definition query failed");
            Vec::new()
        })
    }

    pub fn find_type_definition(&mut self, doc: &TextDocument, pos: Position) -> Option<Location> {
        self.find_type_definitions(doc, pos).into_iter().next()
    }

    pub fn find_document_symbols(&mut self, uri: &str) -> Option<Vec<SymbolInfo>> {
        if self.is_cancelled() {
            return None;
        }
        match self.oracle.document_symbols(uri) {
            Ok(symbols) => Some(symbols),
            Err(e) => {
                tracing::debug!(uri, error = %e, "document symbol query failed");
                None
            }
        }
    }

    pub fn open(&mut self, uri: &str) -> Option<TextDocument> {
        if self.is_cancelled() {
            return None;
        }
        match self.oracle.open(uri) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::debug!(uri, error = %e, "could not open document");
                None
            }
        }
    }

    /// Library symbol behind `pos`, type definition first.
    ///
    /// Both lookups are attempted in turn; the type definition wins when
    /// both land in the library.
    pub fn resolve_library_symbol(
        &mut self,
        doc: &TextDocument,
        pos: Position,
    ) -> Option<LibrarySymbol> {
        self.resolve_type_definition_in_library(doc, pos)
            .or_else(|| self.resolve_through_user_aliases(doc, pos))
    }

    pub fn resolve_type_definition_in_library(
        &mut self,
        doc: &TextDocument,
        pos: Position,
    ) -> Option<LibrarySymbol> {
        let target = self
            .find_type_definitions(doc, pos)
            .into_iter()
            .find(|loc| self.layout.is_library_owned(&loc.path()))?;
        self.library_symbol(&target)
    }

    /// Text of the library declaration behind `pos`, widened to the whole
    /// property or method signature.
    ///
    /// Hosts report anything from the bare name to the full line; the
    /// syntax tree of the declaration file settles the exact extent.
    pub fn library_declaration(&mut self, doc: &TextDocument, pos: Position) -> Option<String> {
        let mut candidates = self.find_definitions(doc, pos);
        candidates.extend(self.find_type_definitions(doc, pos));
        let target = candidates
            .into_iter()
            .find(|loc| self.layout.is_library_owned(&loc.path()))?;

        let decl_doc = self.open(&target.uri)?;
        let span = trimmed_span(&decl_doc, target.range);
        if let Ok(parsed) = ParsedSource::parse_document(&decl_doc) {
            let signature = node_around(&parsed, span).and_then(|node| {
                ancestors(node).find(|n| {
                    matches!(n.kind(), "property_signature" | "method_signature")
                })
            });
            if let Some(sig) = signature {
                return Some(parsed.node_text(sig).to_string());
            }
        }
        let raw = &decl_doc.text()[span.start..span.end];
        (!raw.is_empty()).then(|| raw.to_string())
    }

    /// Does any location behind `pos` sit inside the UI framework's own
    /// declarations?
    pub fn resolves_to_framework(&mut self, doc: &TextDocument, pos: Position) -> bool {
        let type_defs = self.find_type_definitions(doc, pos);
        if type_defs
            .iter()
            .any(|loc| self.layout.is_framework_owned(&loc.path()))
        {
            return true;
        }
        self.find_definitions(doc, pos)
            .iter()
            .any(|loc| self.layout.is_framework_owned(&loc.path()))
    }

    /// Name of the innermost declaration enclosing `location`, per the
    /// target document's symbol tree.
    pub fn enclosing_symbol_name(&mut self, location: &Location) -> Option<String> {
        let symbols = self.find_document_symbols(&location.uri)?;
        location::enclosing_symbol(&symbols, &location.target_range()).map(|s| s.name.clone())
    }
}

/// `range` as a byte span with surrounding whitespace and trailing
/// separators removed.
fn trimmed_span(doc: &TextDocument, range: Range) -> Span {
    let span = doc.span_of(range);
    if span.start >= span.end {
        return Span::new(span.start, span.start);
    }
    let raw = &doc.text()[span.start..span.end];
    let lead = raw.len() - raw.trim_start().len();
    let body = raw.trim().trim_end_matches([';', ',']).trim_end();
    Span::new(span.start + lead, span.start + lead + body.len())
}

/// Smallest named node covering `span`.
fn node_around<'t>(parsed: &'t ParsedSource, span: Span) -> Option<Node<'t>> {
    parsed
        .root()
        .named_descendant_for_byte_range(span.start, span.end)
}

/// `node` and its ancestors, innermost first.
fn ancestors<'t>(node: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    std::iter::successors(Some(node), |n| n.parent())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeOracle, AFFIX_DTS, AFFIX_URI, REACT_DTS, REACT_URI};

    const APP_URI: &str = "file:///p/src/App.tsx";

    fn at(doc: &TextDocument, needle: &str) -> Position {
        doc.position_at(doc.text().find(needle).unwrap())
    }

    #[test]
    fn type_definition_wins_over_definition() {
        let app = TextDocument::new(APP_URI, "<Affix onChange={go} />");
        let affix = TextDocument::new(AFFIX_URI, AFFIX_DTS);
        let mut oracle = FakeOracle::new()
            .with_library()
            .definition(APP_URI, "Affix", FakeOracle::word_location(&affix, "AffixProps"))
            .type_definition(APP_URI, "Affix", FakeOracle::word_location(&affix, "Affix extends"));
        let layout = LibraryLayout::default();
        let cancel = CancellationToken::new();
        let mut sem = Semantics::new(&mut oracle, &layout, &cancel);

        let sym = sem.resolve_library_symbol(&app, at(&app, "Affix")).unwrap();
        assert_eq!(sym.text, "Affix");
    }

    #[test]
    fn definition_used_when_type_definition_misses() {
        let app = TextDocument::new(APP_URI, "<Affix onChange={go} />");
        let affix = TextDocument::new(AFFIX_URI, AFFIX_DTS);
        let mut oracle = FakeOracle::new()
            .with_library()
            .definition(APP_URI, "onChange", FakeOracle::word_location(&affix, "onChange"));
        let layout = LibraryLayout::default();
        let cancel = CancellationToken::new();
        let mut sem = Semantics::new(&mut oracle, &layout, &cancel);

        let sym = sem.resolve_library_symbol(&app, at(&app, "onChange")).unwrap();
        assert_eq!(sym.text, "onChange");
        assert_eq!(sym.module.file, "index.d.ts");
    }

    #[test]
    fn host_failures_read_as_empty() {
        let app = TextDocument::new(APP_URI, "<Affix />");
        let mut oracle = FakeOracle::new().failing();
        let layout = LibraryLayout::default();
        let cancel = CancellationToken::new();
        let mut sem = Semantics::new(&mut oracle, &layout, &cancel);

        assert!(sem.find_definitions(&app, at(&app, "Affix")).is_empty());
        assert!(sem.find_document_symbols(APP_URI).is_none());
        assert!(sem.resolve_library_symbol(&app, at(&app, "Affix")).is_none());
    }

    #[test]
    fn declaration_widens_to_signature() {
        let app = TextDocument::new(APP_URI, "<Affix onChange={go} />");
        let affix = TextDocument::new(AFFIX_URI, AFFIX_DTS);
        let mut oracle = FakeOracle::new()
            .with_library()
            .definition(APP_URI, "onChange", FakeOracle::word_location(&affix, "onChange"));
        let layout = LibraryLayout::default();
        let cancel = CancellationToken::new();
        let mut sem = Semantics::new(&mut oracle, &layout, &cancel);

        let decl = sem.library_declaration(&app, at(&app, "onChange")).unwrap();
        assert_eq!(decl, "onChange?: (affixed?: boolean) => void");
    }

    #[test]
    fn declaration_from_whole_line_range() {
        let app = TextDocument::new(APP_URI, "<Affix onChange={go} />");
        let affix = TextDocument::new(AFFIX_URI, AFFIX_DTS);
        let mut oracle = FakeOracle::new()
            .with_library()
            .definition(APP_URI, "onChange", FakeOracle::line_location(&affix, "onChange?"));
        let layout = LibraryLayout::default();
        let cancel = CancellationToken::new();
        let mut sem = Semantics::new(&mut oracle, &layout, &cancel);

        let decl = sem.library_declaration(&app, at(&app, "onChange")).unwrap();
        assert!(decl.starts_with("onChange?: (affixed?: boolean)"));
    }

    #[test]
    fn framework_base_class_detection() {
        let app = TextDocument::new(APP_URI, "class App extends React.Component {}");
        let react = TextDocument::new(REACT_URI, REACT_DTS);
        let mut oracle = FakeOracle::new()
            .with_library()
            .definition(APP_URI, "Component", FakeOracle::word_location(&react, "Component"));
        let layout = LibraryLayout::default();
        let cancel = CancellationToken::new();
        let mut sem = Semantics::new(&mut oracle, &layout, &cancel);

        assert!(sem.resolves_to_framework(&app, at(&app, "Component")));
        assert!(!sem.resolves_to_framework(&app, at(&app, "App")));
    }

    #[test]
    fn enclosing_symbol_from_symbol_tree() {
        let affix = TextDocument::new(AFFIX_URI, AFFIX_DTS);
        let props = FakeOracle::line_location(&affix, "export interface AffixProps");
        let on_change = FakeOracle::word_location(&affix, "onChange");
        let interface_range = Range::new(props.range.start, Position::new(11, 1));
        let mut oracle = FakeOracle::new().symbols(
            AFFIX_URI,
            vec![
                SymbolInfo {
                    name: "AffixProps".to_string(),
                    kind: 11,
                    range: interface_range,
                    container_name: None,
                },
                SymbolInfo {
                    name: "onChange".to_string(),
                    kind: 7,
                    range: FakeOracle::line_location(&affix, "onChange?").range,
                    container_name: Some("AffixProps".to_string()),
                },
            ],
        );
        let layout = LibraryLayout::default();
        let cancel = CancellationToken::new();
        let mut sem = Semantics::new(&mut oracle, &layout, &cancel);

        assert_eq!(
            sem.enclosing_symbol_name(&on_change).as_deref(),
            Some("onChange")
        );
        let whole_line = FakeOracle::line_location(&affix, "onChange?");
        assert_eq!(
            sem.enclosing_symbol_name(&whole_line).as_deref(),
            Some("AffixProps")
        );
    }
}
