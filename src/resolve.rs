//! From a cursor position to registry names.

mod cursor;
mod names;

pub use cursor::{
    closest_component_in, enclosing_class_component, resolve_closest_component_at_cursor,
};
pub use names::{
    classify_symbol, match_component_name, normalize_name, props_owner, SymbolKind, PROPS_SUFFIX,
};

use crate::document::{Position, Range, TextDocument};
use crate::oracle::{LibrarySymbol, Semantics};

/// The library symbol under a cursor, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    pub kind: SymbolKind,
    /// The word as written at the cursor.
    pub word: String,
    /// Range of that word in the queried document.
    pub word_range: Range,
    pub library: LibrarySymbol,
}

impl ResolvedSymbol {
    /// Declared name in the library.
    pub fn raw_name(&self) -> &str {
        &self.library.text
    }
}

/// Resolve the word at `pos` into the component library and classify it.
///
/// `None` when there is no word, or the word does not lead into the
/// library.
pub fn resolve_symbol_at(
    semantics: &mut Semantics<'_>,
    doc: &TextDocument,
    pos: Position,
) -> Option<ResolvedSymbol> {
    let word_range = doc.word_range_at(pos)?;
    let word = doc.text_in(word_range).to_string();
    let library = semantics.resolve_library_symbol(doc, word_range.start)?;
    Some(ResolvedSymbol {
        kind: classify_symbol(&library.text),
        word,
        word_range,
        library,
    })
}
