//! Hover documentation for library components and their attributes.

use serde::Serialize;

use crate::card::{attribute_card, component_header, HoverBlock};
use crate::document::{Position, Range, TextDocument};
use crate::error::PropscopeError;
use crate::resolve::{
    match_component_name, props_owner, resolve_closest_component_at_cursor, resolve_symbol_at,
    ResolvedSymbol, SymbolKind,
};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    pub blocks: Vec<HoverBlock>,
    pub range: Option<Range>,
}

impl Hover {
    pub fn to_markdown(&self) -> String {
        self.blocks
            .iter()
            .map(HoverBlock::to_markdown)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Host entry point: never fails, logs what went wrong instead.
pub fn provide_hover(
    session: &mut Session<'_>,
    doc: &TextDocument,
    pos: Position,
) -> Option<Hover> {
    match build_hover(session, doc, pos) {
        Ok(hover) => hover,
        Err(e @ PropscopeError::RegistryMiss(_)) => {
            tracing::error!(uri = %doc.uri(), ?pos, error = %e, "hover registry mismatch");
            None
        }
        Err(e) => {
            tracing::debug!(uri = %doc.uri(), ?pos, error = %e, "hover failed");
            None
        }
    }
}

/// Documentation for the word at `pos`.
///
/// `Ok(None)` means there is nothing to show. `Err(RegistryMiss)` means a
/// library symbol was classified but the registry has no entry for it.
pub fn build_hover(
    session: &mut Session<'_>,
    doc: &TextDocument,
    pos: Position,
) -> Result<Option<Hover>, PropscopeError> {
    let Some(symbol) = resolve_symbol_at(&mut session.semantics, doc, pos) else {
        return Ok(None);
    };
    tracing::debug!(
        word = %symbol.word,
        declared = %symbol.raw_name(),
        kind = ?symbol.kind,
        "hover symbol"
    );

    let blocks = match symbol.kind {
        SymbolKind::Attribute => attribute_hover(session, doc, pos, &symbol)?,
        SymbolKind::Component => Some(component_hover(session, &symbol)?),
    };

    Ok(blocks
        .filter(|b| !b.is_empty())
        .map(|blocks| Hover {
            blocks,
            range: Some(symbol.word_range),
        }))
}

fn attribute_hover(
    session: &mut Session<'_>,
    doc: &TextDocument,
    pos: Position,
    symbol: &ResolvedSymbol,
) -> Result<Option<Vec<HoverBlock>>, PropscopeError> {
    let registry = session.catalog.registry();
    let component =
        match resolve_closest_component_at_cursor(&mut session.semantics, registry, doc, pos) {
            Some(name) => name,
            None => {
                // Outside JSX: the declaring props interface names the component.
                let Some(container) = session
                    .semantics
                    .enclosing_symbol_name(&symbol.library.location)
                else {
                    return Ok(None);
                };
                let owner = props_owner(&container).unwrap_or(container);
                match match_component_name(registry, &owner, &symbol.library.module.folder) {
                    Some(name) => name.to_string(),
                    None => return Err(PropscopeError::RegistryMiss(owner)),
                }
            }
        };

    let language = session.settings.language;
    Ok(session
        .catalog
        .prop_doc(language, &component, &symbol.word)
        .map(|doc| attribute_card(doc, language)))
}

fn component_hover(
    session: &Session<'_>,
    symbol: &ResolvedSymbol,
) -> Result<Vec<HoverBlock>, PropscopeError> {
    let registry = session.catalog.registry();
    let name = match_component_name(registry, symbol.raw_name(), &symbol.library.module.folder)
        .ok_or_else(|| PropscopeError::RegistryMiss(symbol.raw_name().to_string()))?;
    let entry = registry
        .get(name)
        .ok_or_else(|| PropscopeError::RegistryMiss(name.to_string()))?;

    let language = session.settings.language;
    let version = session.catalog.version();
    let mut blocks = vec![HoverBlock::markdown(component_header(
        name,
        &entry.doc_alias(),
        language,
        version,
    ))];
    if let Some(table) = session.catalog.table(language, name) {
        blocks.push(HoverBlock::markdown(table));
    }
    Ok(blocks)
}
