//! Oracle over an editor host's internal semantic commands.
//!
//! Hosts changed how those commands take arguments: older ones want a
//! flat positional list, newer ones a single named-argument object. The
//! convention is chosen once when the oracle is built and used for every
//! call after that.

use serde_json::{json, Map, Value};

use super::location::{decode_locations, decode_symbols, Location, SymbolInfo};
use super::SemanticOracle;
use crate::document::{Position, TextDocument};
use crate::error::PropscopeError;

pub const DEFINITION_COMMAND: &str = "_executeDefinitionProvider";
pub const TYPE_DEFINITION_COMMAND: &str = "_executeTypeDefinitionProvider";
pub const DOCUMENT_SYMBOL_COMMAND: &str = "_executeDocumentSymbolProvider";

/// The raw command surface of an editor host.
pub trait HostCommands {
    fn execute(&mut self, command: &str, args: Vec<Value>) -> Result<Value, PropscopeError>;

    /// Current text of the document at `uri`, opening it if needed.
    fn read_document(&mut self, uri: &str) -> Result<String, PropscopeError>;
}

/// How arguments are laid out for a host command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallConvention {
    /// One object: `{ "resource": .., "position": .. }`.
    Named,
    /// Values in order: `resource, position`.
    Positional,
}

impl CallConvention {
    pub fn encode(self, entries: Vec<(&str, Value)>) -> Vec<Value> {
        match self {
            Self::Named => {
                let map: Map<String, Value> = entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect();
                vec![Value::Object(map)]
            }
            Self::Positional => entries.into_iter().map(|(_, v)| v).collect(),
        }
    }
}

/// Host positions are 1-based.
fn host_position(pos: Position) -> Value {
    json!({ "lineNumber": pos.line + 1, "column": pos.character + 1 })
}

pub struct CommandOracle<H> {
    host: H,
    convention: CallConvention,
}

impl<H: HostCommands> CommandOracle<H> {
    /// Pick the calling convention the host accepts.
    ///
    /// Each convention is tried with a definition query at the start of
    /// `sample`; the first one that does not fail wins.
    pub fn probe(mut host: H, sample: &TextDocument) -> Result<Self, PropscopeError> {
        let mut failures = Vec::new();
        for convention in [CallConvention::Named, CallConvention::Positional] {
            let args = convention.encode(vec![
                ("resource", json!(sample.uri())),
                ("position", host_position(Position::default())),
            ]);
            match host.execute(DEFINITION_COMMAND, args) {
                Ok(_) => {
                    tracing::debug!(?convention, "host calling convention selected");
                    return Ok(Self { host, convention });
                }
                Err(e) => failures.push(format!("{convention:?}: {e}")),
            }
        }
        Err(PropscopeError::Oracle(format!(
            "host rejected every calling convention ({})",
            failures.join("; ")
        )))
    }

    pub fn convention(&self) -> CallConvention {
        self.convention
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn locations(
        &mut self,
        command: &str,
        doc: &TextDocument,
        pos: Position,
    ) -> Result<Vec<Location>, PropscopeError> {
        let args = self.convention.encode(vec![
            ("resource", json!(doc.uri())),
            ("position", host_position(pos)),
        ]);
        let value = self.host.execute(command, args)?;
        Ok(decode_locations(&value))
    }
}

impl<H: HostCommands> SemanticOracle for CommandOracle<H> {
    fn definition(
        &mut self,
        doc: &TextDocument,
        pos: Position,
    ) -> Result<Vec<Location>, PropscopeError> {
        self.locations(DEFINITION_COMMAND, doc, pos)
    }

    fn type_definition(
        &mut self,
        doc: &TextDocument,
        pos: Position,
    ) -> Result<Vec<Location>, PropscopeError> {
        self.locations(TYPE_DEFINITION_COMMAND, doc, pos)
    }

    fn document_symbols(&mut self, uri: &str) -> Result<Vec<SymbolInfo>, PropscopeError> {
        let args = self.convention.encode(vec![("resource", json!(uri))]);
        let value = self.host.execute(DOCUMENT_SYMBOL_COMMAND, args)?;
        Ok(decode_symbols(&value))
    }

    fn open(&mut self, uri: &str) -> Result<TextDocument, PropscopeError> {
        let text = self.host.read_document(uri)?;
        Ok(TextDocument::new(uri, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts only one convention and records every call.
    struct PickyHost {
        accepts: CallConvention,
        calls: Vec<(String, Vec<Value>)>,
    }

    impl PickyHost {
        fn accepts(&self, args: &[Value]) -> bool {
            let named = args.len() == 1 && args[0].is_object();
            match self.accepts {
                CallConvention::Named => named,
                CallConvention::Positional => !named,
            }
        }
    }

    impl HostCommands for PickyHost {
        fn execute(&mut self, command: &str, args: Vec<Value>) -> Result<Value, PropscopeError> {
            let ok = self.accepts(&args);
            self.calls.push((command.to_string(), args));
            if !ok {
                return Err(PropscopeError::Oracle("bad arguments".to_string()));
            }
            Ok(json!([{
                "uri": { "scheme": "file", "path": "/p/node_modules/antd/lib/affix/index.d.ts" },
                "range": { "startLineNumber": 2, "startColumn": 5, "endLineNumber": 2, "endColumn": 13 }
            }]))
        }

        fn read_document(&mut self, _uri: &str) -> Result<String, PropscopeError> {
            Ok("export {}".to_string())
        }
    }

    fn sample() -> TextDocument {
        TextDocument::new("file:///p/src/App.tsx", "<Affix />")
    }

    #[test]
    fn positional_convention_when_named_fails() {
        let host = PickyHost {
            accepts: CallConvention::Positional,
            calls: Vec::new(),
        };
        let mut oracle = CommandOracle::probe(host, &sample()).unwrap();
        assert_eq!(oracle.convention(), CallConvention::Positional);

        let locs = oracle.definition(&sample(), Position::new(0, 2)).unwrap();
        assert_eq!(locs[0].range.start, Position::new(1, 4));

        let (_, args) = oracle.host.calls.last().unwrap();
        assert_eq!(args[0], json!("file:///p/src/App.tsx"));
        assert_eq!(args[1], json!({ "lineNumber": 1, "column": 3 }));
    }

    #[test]
    fn named_convention_preferred() {
        let host = PickyHost {
            accepts: CallConvention::Named,
            calls: Vec::new(),
        };
        let oracle = CommandOracle::probe(host, &sample()).unwrap();
        assert_eq!(oracle.convention(), CallConvention::Named);
        assert_eq!(oracle.host.calls.len(), 1);
    }

    #[test]
    fn construction_fails_when_host_rejects_everything() {
        struct Broken;
        impl HostCommands for Broken {
            fn execute(&mut self, _: &str, _: Vec<Value>) -> Result<Value, PropscopeError> {
                Err(PropscopeError::Oracle("down".to_string()))
            }
            fn read_document(&mut self, _: &str) -> Result<String, PropscopeError> {
                Err(PropscopeError::Oracle("down".to_string()))
            }
        }
        assert!(CommandOracle::probe(Broken, &sample()).is_err());
    }

    #[test]
    fn named_encoding_builds_one_object() {
        let args = CallConvention::Named.encode(vec![("resource", json!("u")), ("position", json!(1))]);
        assert_eq!(args, vec![json!({ "resource": "u", "position": 1 })]);
    }
}
