//! Scripted oracle and declaration fixtures shared by unit tests.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::document::{Position, Range, TextDocument};
use crate::error::PropscopeError;
use crate::oracle::command::{HostCommands, DEFINITION_COMMAND, DOCUMENT_SYMBOL_COMMAND};
use crate::oracle::{Location, SemanticOracle, SymbolInfo};

pub const AFFIX_URI: &str = "file:///p/node_modules/antd/lib/affix/index.d.ts";

pub const AFFIX_DTS: &str = "\
import * as React from 'react';
export interface AffixProps {
    /** offset from the top of the viewport */
    offsetTop?: number;
    offsetBottom?: number;
    style?: React.CSSProperties;
    /** callback for when affix state is changed */
    onChange?: (affixed?: boolean) => void;
    target?: () => Window | HTMLElement | null;
    prefixCls?: string;
    className?: string;
}
declare class Affix extends React.Component<AffixProps, AffixState> {
    render(): JSX.Element;
}
export default Affix;
";

pub const REACT_URI: &str = "file:///p/node_modules/@types/react/index.d.ts";

pub const REACT_DTS: &str = "\
declare namespace React {
    class Component<P, S> {
        constructor(props: Readonly<P>);
    }
    class PureComponent<P = {}, S = {}> extends Component<P, S> {}
}
";

/// Oracle answering from tables keyed by `(uri, word under the cursor)`.
///
/// The word is read from the queried document unless a host buffer is
/// pinned for its URI; then it is read from that buffer, the way an editor
/// answers from the text it holds regardless of any private copy.
#[derive(Default)]
pub struct FakeOracle {
    definitions: HashMap<(String, String), Vec<Location>>,
    type_definitions: HashMap<(String, String), Vec<Location>>,
    symbols: HashMap<String, Vec<SymbolInfo>>,
    docs: HashMap<String, TextDocument>,
    host_buffers: HashMap<String, TextDocument>,
    failing: bool,
    calls: usize,
}

impl FakeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doc(mut self, doc: TextDocument) -> Self {
        self.docs.insert(doc.uri().to_string(), doc);
        self
    }

    /// Answer queries on `doc.uri()` against `doc`'s text only.
    pub fn host_buffer(mut self, doc: TextDocument) -> Self {
        self.host_buffers.insert(doc.uri().to_string(), doc);
        self
    }

    pub fn definition(mut self, uri: &str, word: &str, loc: Location) -> Self {
        self.definitions
            .entry((uri.to_string(), word.to_string()))
            .or_default()
            .push(loc);
        self
    }

    pub fn type_definition(mut self, uri: &str, word: &str, loc: Location) -> Self {
        self.type_definitions
            .entry((uri.to_string(), word.to_string()))
            .or_default()
            .push(loc);
        self
    }

    pub fn symbols(mut self, uri: &str, symbols: Vec<SymbolInfo>) -> Self {
        self.symbols.insert(uri.to_string(), symbols);
        self
    }

    /// Every query fails, as a crashed provider would.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Location of the first occurrence of `word` in `doc`.
    pub fn word_location(doc: &TextDocument, word: &str) -> Location {
        let start = doc
            .text()
            .find(word)
            .unwrap_or_else(|| panic!("`{word}` not in {}", doc.uri()));
        let range = doc.range_of(crate::document::Span::new(start, start + word.len()));
        Location::new(doc.uri(), range)
    }

    /// Location covering the whole line holding the first `needle`.
    pub fn line_location(doc: &TextDocument, needle: &str) -> Location {
        let line = doc
            .text()
            .lines()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("`{needle}` not in {}", doc.uri())) as u32;
        let width = doc.line_text(line as usize).encode_utf16().count() as u32;
        Location::new(
            doc.uri(),
            Range::new(Position::new(line, 0), Position::new(line, width)),
        )
    }

    /// Affix declaration file plus the React base classes.
    pub fn with_library(self) -> Self {
        self.with_doc(TextDocument::new(AFFIX_URI, AFFIX_DTS))
            .with_doc(TextDocument::new(REACT_URI, REACT_DTS))
    }

    fn lookup(
        &mut self,
        table: fn(&Self) -> &HashMap<(String, String), Vec<Location>>,
        doc: &TextDocument,
        pos: Position,
    ) -> Result<Vec<Location>, PropscopeError> {
        self.calls += 1;
        if self.failing {
            return Err(PropscopeError::Oracle("provider crashed".to_string()));
        }
        let buffer = self.host_buffers.get(doc.uri()).unwrap_or(doc);
        let Some(range) = buffer.word_range_at(pos) else {
            return Ok(Vec::new());
        };
        let key = (doc.uri().to_string(), buffer.text_in(range).to_string());
        Ok(table(self).get(&key).cloned().unwrap_or_default())
    }
}

impl SemanticOracle for FakeOracle {
    fn definition(
        &mut self,
        doc: &TextDocument,
        pos: Position,
    ) -> Result<Vec<Location>, PropscopeError> {
        self.lookup(|o| &o.definitions, doc, pos)
    }

    fn type_definition(
        &mut self,
        doc: &TextDocument,
        pos: Position,
    ) -> Result<Vec<Location>, PropscopeError> {
        self.lookup(|o| &o.type_definitions, doc, pos)
    }

    fn document_symbols(&mut self, uri: &str) -> Result<Vec<SymbolInfo>, PropscopeError> {
        self.calls += 1;
        if self.failing {
            return Err(PropscopeError::Oracle("provider crashed".to_string()));
        }
        Ok(self.symbols.get(uri).cloned().unwrap_or_default())
    }

    fn open(&mut self, uri: &str) -> Result<TextDocument, PropscopeError> {
        self.docs
            .get(uri)
            .cloned()
            .ok_or_else(|| PropscopeError::Oracle(format!("unknown document {uri}")))
    }
}

/// Editor host behind the internal-command bridge.
///
/// Holds its own copy of every buffer and answers a definition query with
/// the table entry for the word at the queried position in that copy.
/// Accepts both calling conventions.
#[derive(Default)]
pub struct ScriptedHost {
    buffers: HashMap<String, TextDocument>,
    definitions: HashMap<(String, String), Vec<Location>>,
    queries: Vec<(String, String, Position)>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffer(mut self, doc: TextDocument) -> Self {
        self.buffers.insert(doc.uri().to_string(), doc);
        self
    }

    /// Affix declaration file plus the React base classes.
    pub fn with_library(self) -> Self {
        self.with_buffer(TextDocument::new(AFFIX_URI, AFFIX_DTS))
            .with_buffer(TextDocument::new(REACT_URI, REACT_DTS))
    }

    pub fn definition(mut self, uri: &str, word: &str, loc: Location) -> Self {
        self.definitions
            .entry((uri.to_string(), word.to_string()))
            .or_default()
            .push(loc);
        self
    }

    /// `(command, uri, position)` of every positional query, in order.
    pub fn queries(&self) -> &[(String, String, Position)] {
        &self.queries
    }
}

fn from_host_position(value: &Value) -> Option<Position> {
    let line = value.get("lineNumber")?.as_u64()?;
    let column = value.get("column")?.as_u64()?;
    Some(Position::new(
        u32::try_from(line.checked_sub(1)?).ok()?,
        u32::try_from(column.checked_sub(1)?).ok()?,
    ))
}

impl HostCommands for ScriptedHost {
    fn execute(&mut self, command: &str, args: Vec<Value>) -> Result<Value, PropscopeError> {
        let (uri, position) = match args.as_slice() {
            [Value::Object(named)] => (named.get("resource"), named.get("position")),
            [uri, position] => (Some(uri), Some(position)),
            [uri] => (Some(uri), None),
            _ => return Err(PropscopeError::Oracle("bad arguments".to_string())),
        };
        let uri = uri
            .and_then(Value::as_str)
            .ok_or_else(|| PropscopeError::Oracle("missing resource".to_string()))?;
        if command == DOCUMENT_SYMBOL_COMMAND {
            return Ok(json!([]));
        }
        let pos = position
            .and_then(from_host_position)
            .ok_or_else(|| PropscopeError::Oracle("missing position".to_string()))?;
        self.queries.push((command.to_string(), uri.to_string(), pos));
        if command != DEFINITION_COMMAND {
            return Ok(json!([]));
        }

        let word = self
            .buffers
            .get(uri)
            .and_then(|buffer| Some(buffer.text_in(buffer.word_range_at(pos)?).to_string()));
        let found = word
            .and_then(|w| self.definitions.get(&(uri.to_string(), w)))
            .cloned()
            .unwrap_or_default();
        Ok(Value::Array(
            found
                .iter()
                .map(|loc| json!({ "uri": loc.uri, "range": loc.range }))
                .collect(),
        ))
    }

    fn read_document(&mut self, uri: &str) -> Result<String, PropscopeError> {
        self.buffers
            .get(uri)
            .map(|doc| doc.text().to_string())
            .ok_or_else(|| PropscopeError::Oracle(format!("unknown document {uri}")))
    }
}
