//! Handler-attribute completion inside library JSX elements.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::card::{completion_card, HoverBlock};
use crate::document::{Position, Range, Span, TextDocument};
use crate::error::PropscopeError;
use crate::insert::derive_handler_name;
use crate::resolve::{closest_component_in, enclosing_class_component};
use crate::session::Session;
use crate::syntax::ParsedSource;

/// Characters that open the completion list.
pub const TRIGGER_CHARACTERS: &[char] = &['!', '#'];

/// Command the host runs after an entry is accepted.
pub const AFTER_COMPLETION_COMMAND: &str = "propscope.afterCompletion";

/// What accepting an entry inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertMode {
    /// `!`: the full binding with a derived handler name.
    Direct,
    /// `#`: the bare attribute; the handler name is asked for afterwards.
    Inquiry,
}

impl InsertMode {
    /// No trigger (manual invocation) counts as `#`.
    pub fn from_trigger(trigger: Option<char>) -> Option<Self> {
        match trigger {
            Some('!') => Some(Self::Direct),
            Some('#') | None => Some(Self::Inquiry),
            Some(_) => None,
        }
    }
}

/// Arguments of [`AFTER_COMPLETION_COMMAND`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterCompletion {
    /// The trigger character, in the document as it was when completing.
    pub trigger_range: Range,
    pub uri: String,
    pub attribute: String,
    pub mode: InsertMode,
    /// Byte span of the enclosing framework class, if any, in the buffer
    /// as it was before acceptance. Insertion re-checks its start against
    /// a fresh parse and uses it in place of another framework lookup.
    pub class_component: Option<Span>,
}

impl AfterCompletion {
    /// Positional command arguments:
    /// `[triggerRange, uri, attribute, mode, classComponent]`.
    pub fn to_arguments(&self) -> Result<Vec<Value>, PropscopeError> {
        let encode = |v: Result<Value, serde_json::Error>| {
            v.map_err(|e| PropscopeError::Edit(format!("encode command arguments: {e}")))
        };
        Ok(vec![
            encode(serde_json::to_value(self.trigger_range))?,
            Value::String(self.uri.clone()),
            Value::String(self.attribute.clone()),
            encode(serde_json::to_value(self.mode))?,
            encode(serde_json::to_value(self.class_component))?,
        ])
    }

    pub fn from_arguments(args: &[Value]) -> Result<Self, PropscopeError> {
        let [range, uri, attribute, mode, class] = args else {
            return Err(PropscopeError::Edit(format!(
                "{AFTER_COMPLETION_COMMAND} takes 5 arguments, got {}",
                args.len()
            )));
        };
        let decode = |e: serde_json::Error| {
            PropscopeError::Edit(format!("decode command arguments: {e}"))
        };
        Ok(Self {
            trigger_range: Range::deserialize(range).map_err(decode)?,
            uri: String::deserialize(uri).map_err(decode)?,
            attribute: String::deserialize(attribute).map_err(decode)?,
            mode: InsertMode::deserialize(mode).map_err(decode)?,
            class_component: Option::<Span>::deserialize(class).map_err(decode)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    pub label: String,
    pub insert_text: String,
    pub documentation: Vec<HoverBlock>,
    pub command: AfterCompletion,
}

/// Entries for every configurable attribute of the enclosing component.
///
/// Empty outside a tracked component's element.
pub fn list_completions(
    session: &mut Session<'_>,
    doc: &TextDocument,
    pos: Position,
    trigger: Option<char>,
) -> Vec<CompletionEntry> {
    let Some(mode) = InsertMode::from_trigger(trigger) else {
        return Vec::new();
    };
    let offset = doc.offset_at(pos);
    let parsed = match ParsedSource::parse_with_placeholder(doc, offset, TRIGGER_CHARACTERS) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(uri = %doc.uri(), error = %e, "completion parse failed");
            return Vec::new();
        }
    };

    let registry = session.catalog.registry();
    let Some(component) =
        closest_component_in(&mut session.semantics, registry, doc, &parsed, offset)
    else {
        return Vec::new();
    };
    let Some(attributes) = session.catalog.attributes(&component) else {
        return Vec::new();
    };

    let class_component = enclosing_class_component(&mut session.semantics, doc, &parsed, offset)
        .map(|class| Span::new(class.start_byte(), class.end_byte()));
    let member = if class_component.is_some() { "this." } else { "" };
    let trigger_range = trigger_range_before(doc, offset);
    let language = session.settings.language;

    tracing::debug!(component = %component, count = attributes.len(), ?mode, "completions");
    attributes
        .iter()
        .map(|attribute| {
            let insert_text = match mode {
                InsertMode::Direct => {
                    let handler = derive_handler_name(&session.settings.handler_prefix, attribute);
                    format!("{attribute}={{{member}{handler}}} ")
                }
                InsertMode::Inquiry => attribute.clone(),
            };
            let documentation = session
                .catalog
                .prop_doc(language, &component, attribute)
                .map(|d| completion_card(d, language))
                .unwrap_or_default();
            CompletionEntry {
                label: attribute.clone(),
                insert_text,
                documentation,
                command: AfterCompletion {
                    trigger_range,
                    uri: doc.uri().to_string(),
                    attribute: attribute.clone(),
                    mode,
                    class_component,
                },
            }
        })
        .collect()
}

/// Range of the trigger character just before `offset`; empty at `offset`
/// when there is none.
fn trigger_range_before(doc: &TextDocument, offset: usize) -> Range {
    let before = doc.text()[..offset].chars().next_back();
    match before {
        Some(c) if TRIGGER_CHARACTERS.contains(&c) => {
            doc.range_of(Span::new(offset - c.len_utf8(), offset))
        }
        _ => {
            let at = doc.position_at(offset);
            Range::new(at, at)
        }
    }
}
