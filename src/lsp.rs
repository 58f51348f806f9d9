use std::collections::HashMap;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use serde_json::{json, Value};

use crate::document::{Position, TextDocument};
use crate::error::PropscopeError;
use crate::oracle::location::{decode_locations, decode_symbols};
use crate::oracle::{Location, SemanticOracle, SymbolInfo};
use crate::util::{path_to_uri, uri_to_path};

/// Text the server currently holds for one document.
struct Synced {
    version: i32,
    text: String,
}

/// Blocking LSP client that talks to `typescript-language-server` via stdio.
pub struct LspClient {
    child: Child,
    stdin: BufWriter<std::process::ChildStdin>,
    stdout: BufReader<std::process::ChildStdout>,
    next_id: i64,
    synced: HashMap<String, Synced>,
    type_definition_supported: bool,
}

impl LspClient {
    /// Spawn the language server and perform the initialize handshake.
    pub fn start(root: &Path) -> Result<Self, PropscopeError> {
        let mut child = Command::new("typescript-language-server")
            .arg("--stdio")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| PropscopeError::Lsp(format!("spawn failed: {e}")))?;

        let stdin = BufWriter::new(
            child
                .stdin
                .take()
                .ok_or_else(|| PropscopeError::Lsp("no stdin".to_string()))?,
        );
        let stdout = BufReader::new(
            child
                .stdout
                .take()
                .ok_or_else(|| PropscopeError::Lsp("no stdout".to_string()))?,
        );

        let mut client = Self {
            child,
            stdin,
            stdout,
            next_id: 1,
            synced: HashMap::new(),
            type_definition_supported: false,
        };

        let init_params = json!({
            "processId": std::process::id(),
            "rootUri": path_to_uri(root),
            "rootPath": root.to_string_lossy(),
            "capabilities": {
                "textDocument": {
                    "definition": { "linkSupport": true },
                    "typeDefinition": { "linkSupport": true },
                    "documentSymbol": { "hierarchicalDocumentSymbolSupport": true },
                }
            },
        });
        let resp = client.request("initialize", &init_params)?;
        client.type_definition_supported = supports_type_definition(&resp);
        client.notify("initialized", &json!({}))?;
        tracing::debug!(
            root = %root.display(),
            type_definition = client.type_definition_supported,
            "language server ready"
        );

        Ok(client)
    }

    /// Gracefully shut down the language server.
    pub fn shutdown(mut self) {
        let _ = self.request("shutdown", &Value::Null);
        let _ = self.notify("exit", &Value::Null);
        let _ = self.child.wait();
    }

    /// Make the server's copy of `doc` match ours.
    ///
    /// The first sync opens the document and waits on a hover round-trip
    /// so the server has processed it before any real query.
    fn sync(&mut self, doc: &TextDocument) -> Result<(), PropscopeError> {
        let uri = doc.uri().to_string();
        if let Some(synced) = self.synced.get_mut(&uri) {
            if synced.text == doc.text() {
                return Ok(());
            }
            synced.version += 1;
            synced.text = doc.text().to_string();
            let params = json!({
                "textDocument": { "uri": &uri, "version": synced.version },
                "contentChanges": [{ "text": doc.text() }],
            });
            return self.notify("textDocument/didChange", &params);
        }

        let params = json!({
            "textDocument": {
                "uri": &uri,
                "languageId": language_id(Path::new(&uri_to_path(&uri))),
                "version": 1,
                "text": doc.text(),
            }
        });
        self.notify("textDocument/didOpen", &params)?;

        let hover_params = json!({
            "textDocument": { "uri": &uri },
            "position": { "line": 0, "character": 0 },
        });
        let _ = self.request("textDocument/hover", &hover_params);

        self.synced.insert(
            uri,
            Synced {
                version: 1,
                text: doc.text().to_string(),
            },
        );
        Ok(())
    }

    fn locations(
        &mut self,
        method: &str,
        doc: &TextDocument,
        pos: Position,
    ) -> Result<Vec<Location>, PropscopeError> {
        self.sync(doc)?;
        let params = json!({
            "textDocument": { "uri": doc.uri() },
            "position": pos,
        });
        let result = self.request(method, &params)?;
        Ok(decode_locations(&result))
    }

    /// Send a JSON-RPC request and wait for the matching response.
    fn request(&mut self, method: &str, params: &Value) -> Result<Value, PropscopeError> {
        let id = self.next_id;
        self.next_id += 1;

        let msg = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        self.send(&msg)?;

        // Read responses, answering server requests and skipping notifications.
        loop {
            let body = self.read_message()?;
            let parsed: Value = serde_json::from_str(&body)
                .map_err(|e| PropscopeError::Lsp(format!("json: {e}")))?;

            if parsed.get("id").and_then(Value::as_i64) == Some(id) {
                if let Some(err) = parsed.get("error") {
                    return Err(PropscopeError::Lsp(format!("{method}: {err}")));
                }
                return Ok(parsed.get("result").cloned().unwrap_or(Value::Null));
            }

            // Server-initiated request: answer null so it does not block on us.
            if parsed.get("id").is_some() && parsed.get("method").is_some() {
                let response = json!({
                    "jsonrpc": "2.0",
                    "id": parsed["id"],
                    "result": null,
                });
                self.send(&response)?;
            }
        }
    }

    fn notify(&mut self, method: &str, params: &Value) -> Result<(), PropscopeError> {
        let msg = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        });
        self.send(&msg)
    }

    /// Write a JSON-RPC message with Content-Length header.
    fn send(&mut self, msg: &Value) -> Result<(), PropscopeError> {
        let body = serde_json::to_string(msg)
            .map_err(|e| PropscopeError::Lsp(format!("serialize: {e}")))?;
        let header = format!("Content-Length: {}\r\n\r\n", body.len());
        self.stdin
            .write_all(header.as_bytes())
            .and_then(|()| self.stdin.write_all(body.as_bytes()))
            .and_then(|()| self.stdin.flush())
            .map_err(|e| PropscopeError::Lsp(format!("write: {e}")))
    }

    /// Read one JSON-RPC message from stdout (Content-Length framing).
    fn read_message(&mut self) -> Result<String, PropscopeError> {
        read_framed(&mut self.stdout)
    }
}

impl SemanticOracle for LspClient {
    fn definition(
        &mut self,
        doc: &TextDocument,
        pos: Position,
    ) -> Result<Vec<Location>, PropscopeError> {
        self.locations("textDocument/definition", doc, pos)
    }

    fn type_definition(
        &mut self,
        doc: &TextDocument,
        pos: Position,
    ) -> Result<Vec<Location>, PropscopeError> {
        if !self.type_definition_supported {
            return Ok(Vec::new());
        }
        self.locations("textDocument/typeDefinition", doc, pos)
    }

    fn document_symbols(&mut self, uri: &str) -> Result<Vec<SymbolInfo>, PropscopeError> {
        let doc = self.open(uri)?;
        self.sync(&doc)?;
        let params = json!({ "textDocument": { "uri": uri } });
        let result = self.request("textDocument/documentSymbol", &params)?;
        Ok(decode_symbols(&result))
    }

    fn open(&mut self, uri: &str) -> Result<TextDocument, PropscopeError> {
        if let Some(synced) = self.synced.get(uri) {
            return Ok(TextDocument::new(uri, synced.text.clone()));
        }
        let path = uri_to_path(uri);
        let text = std::fs::read_to_string(&path).map_err(|e| PropscopeError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(TextDocument::new(uri, text))
    }
}

impl Drop for LspClient {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn read_framed(reader: &mut impl BufRead) -> Result<String, PropscopeError> {
    let mut content_length: Option<usize> = None;

    // Headers end at an empty line.
    loop {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| PropscopeError::Lsp(format!("read header: {e}")))?;

        if line.is_empty() {
            return Err(PropscopeError::Lsp("server closed stdout".to_string()));
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }

        if let Some(val) = trimmed.strip_prefix("Content-Length: ") {
            content_length = val.parse().ok();
        }
    }

    let len =
        content_length.ok_or_else(|| PropscopeError::Lsp("missing Content-Length".to_string()))?;

    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .map_err(|e| PropscopeError::Lsp(format!("read body: {e}")))?;

    String::from_utf8(buf).map_err(|e| PropscopeError::Lsp(format!("utf8: {e}")))
}

/// `typeDefinitionProvider` may be a bool or an options object.
fn supports_type_definition(init: &Value) -> bool {
    match init.pointer("/capabilities/typeDefinitionProvider") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Object(_)) => true,
        _ => false,
    }
}

/// Map file extension to LSP `languageId`.
fn language_id(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ts" | "mts" | "cts") => "typescript",
        Some("tsx") => "typescriptreact",
        Some("jsx") => "javascriptreact",
        _ => "javascript",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_id_mapping() {
        assert_eq!(language_id(Path::new("a.ts")), "typescript");
        assert_eq!(language_id(Path::new("index.d.ts")), "typescript");
        assert_eq!(language_id(Path::new("a.tsx")), "typescriptreact");
        assert_eq!(language_id(Path::new("a.jsx")), "javascriptreact");
        assert_eq!(language_id(Path::new("a.js")), "javascript");
    }

    #[test]
    fn framed_messages() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":null}"#;
        let raw = format!("Content-Length: {}\r\n\r\n{body}", body.len());
        let mut reader = std::io::Cursor::new(raw.into_bytes());
        assert_eq!(read_framed(&mut reader).unwrap(), body);
        assert!(read_framed(&mut reader).is_err());
    }

    #[test]
    fn framed_message_without_length_is_rejected() {
        let mut reader = std::io::Cursor::new(b"X-Other: 1\r\n\r\n{}".to_vec());
        assert!(read_framed(&mut reader).is_err());
    }

    #[test]
    fn type_definition_capability_shapes() {
        assert!(supports_type_definition(
            &json!({ "capabilities": { "typeDefinitionProvider": true } })
        ));
        assert!(supports_type_definition(
            &json!({ "capabilities": { "typeDefinitionProvider": { "workDoneProgress": false } } })
        ));
        assert!(!supports_type_definition(&json!({ "capabilities": {} })));
    }
}
