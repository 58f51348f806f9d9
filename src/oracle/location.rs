use serde::Deserialize;
use serde_json::Value;

use crate::document::{Position, Range};
use crate::util::uri_to_path;

/// A place a semantic query points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub uri: String,
    /// Full extent of the target. Some hosts report whole lines here.
    pub range: Range,
    /// The precise name range, when the host reports one.
    pub selection_range: Option<Range>,
}

impl Location {
    pub fn new(uri: impl Into<String>, range: Range) -> Self {
        Self {
            uri: uri.into(),
            range,
            selection_range: None,
        }
    }

    pub fn with_selection(mut self, selection: Range) -> Self {
        self.selection_range = Some(selection);
        self
    }

    /// Filesystem path with `/` separators.
    pub fn path(&self) -> String {
        uri_to_path(&self.uri)
    }

    /// The most precise range available.
    pub fn target_range(&self) -> Range {
        self.selection_range.unwrap_or(self.range)
    }
}

/// A declaration reported by a document-symbol query, flattened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: u32,
    pub range: Range,
    pub container_name: Option<String>,
}

/// Result shapes hosts have used for definition queries.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLocation {
    /// LSP `LocationLink`.
    Link {
        #[serde(rename = "targetUri")]
        target_uri: RawUri,
        #[serde(rename = "targetRange")]
        target_range: Range,
        #[serde(rename = "targetSelectionRange", default)]
        target_selection_range: Option<Range>,
    },
    /// Editor-internal link with 1-based line/column ranges.
    Legacy {
        uri: RawUri,
        range: LegacyRange,
        #[serde(rename = "targetSelectionRange", default)]
        target_selection_range: Option<LegacyRange>,
    },
    /// LSP `Location`.
    Plain { uri: RawUri, range: Range },
}

/// URIs arrive either as strings or as `{ scheme, path }` objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawUri {
    Text(String),
    Parts { scheme: String, path: String },
}

impl RawUri {
    fn into_string(self) -> String {
        match self {
            Self::Text(uri) => uri,
            Self::Parts { scheme, path } => format!("{scheme}://{path}"),
        }
    }
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
struct LegacyRange {
    start_line_number: u32,
    start_column: u32,
    end_line_number: u32,
    end_column: u32,
}

impl From<LegacyRange> for Range {
    fn from(r: LegacyRange) -> Self {
        Range::new(
            Position::new(
                r.start_line_number.saturating_sub(1),
                r.start_column.saturating_sub(1),
            ),
            Position::new(
                r.end_line_number.saturating_sub(1),
                r.end_column.saturating_sub(1),
            ),
        )
    }
}

impl From<RawLocation> for Location {
    fn from(raw: RawLocation) -> Self {
        match raw {
            RawLocation::Link {
                target_uri,
                target_range,
                target_selection_range,
            } => Location {
                uri: target_uri.into_string(),
                range: target_range,
                selection_range: target_selection_range,
            },
            RawLocation::Legacy {
                uri,
                range,
                target_selection_range,
            } => Location {
                uri: uri.into_string(),
                range: range.into(),
                selection_range: target_selection_range.map(Into::into),
            },
            RawLocation::Plain { uri, range } => Location::new(uri.into_string(), range),
        }
    }
}

/// Normalize a definition-style response: `null`, one location, or a list.
///
/// Entries in an unrecognized shape are skipped.
pub(crate) fn decode_locations(value: &Value) -> Vec<Location> {
    let items: Vec<&Value> = match value {
        Value::Null => return Vec::new(),
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    items
        .into_iter()
        .filter_map(|item| match RawLocation::deserialize(item) {
            Ok(raw) => Some(Location::from(raw)),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unrecognized location shape");
                None
            }
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSymbol {
    /// Hierarchical `DocumentSymbol`.
    Tree {
        name: String,
        kind: u32,
        range: Range,
        #[serde(default)]
        children: Vec<RawSymbol>,
    },
    /// Flat `SymbolInformation`.
    Flat {
        name: String,
        kind: u32,
        location: RawSymbolLocation,
        #[serde(rename = "containerName", default)]
        container_name: Option<String>,
    },
}

#[derive(Deserialize)]
struct RawSymbolLocation {
    range: Range,
}

/// Normalize a document-symbol response into a flat list, parents first.
pub(crate) fn decode_symbols(value: &Value) -> Vec<SymbolInfo> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for item in items {
        match RawSymbol::deserialize(item) {
            Ok(raw) => flatten_symbol(raw, None, &mut out),
            Err(e) => tracing::debug!(error = %e, "skipping unrecognized symbol shape"),
        }
    }
    out
}

fn flatten_symbol(raw: RawSymbol, container: Option<&str>, out: &mut Vec<SymbolInfo>) {
    match raw {
        RawSymbol::Tree {
            name,
            kind,
            range,
            children,
        } => {
            out.push(SymbolInfo {
                name: name.clone(),
                kind,
                range,
                container_name: container.map(String::from),
            });
            for child in children {
                flatten_symbol(child, Some(&name), out);
            }
        }
        RawSymbol::Flat {
            name,
            kind,
            location,
            container_name,
        } => out.push(SymbolInfo {
            name,
            kind,
            range: location.range,
            container_name,
        }),
    }
}

/// The innermost symbol strictly enclosing `range`.
pub(crate) fn enclosing_symbol<'a>(symbols: &'a [SymbolInfo], range: &Range) -> Option<&'a SymbolInfo> {
    symbols
        .iter()
        .filter(|s| s.range != *range && s.range.contains_range(range))
        .min_by_key(|s| {
            (
                s.range.end.line - s.range.start.line,
                s.range.end.character.abs_diff(s.range.start.character),
            )
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
        Range::new(Position::new(sl, sc), Position::new(el, ec))
    }

    #[test]
    fn plain_location_array() {
        let json = json!([{
            "uri": "file:///p/node_modules/antd/lib/affix/index.d.ts",
            "range": { "start": { "line": 4, "character": 2 }, "end": { "line": 4, "character": 10 } }
        }]);
        let locs = decode_locations(&json);
        assert_eq!(locs.len(), 1);
        assert_eq!(locs[0].range, range(4, 2, 4, 10));
        assert_eq!(locs[0].path(), "/p/node_modules/antd/lib/affix/index.d.ts");
        assert!(locs[0].selection_range.is_none());
    }

    #[test]
    fn location_link() {
        let json = json!({
            "targetUri": "file:///a.d.ts",
            "targetRange": { "start": { "line": 1, "character": 0 }, "end": { "line": 1, "character": 40 } },
            "targetSelectionRange": { "start": { "line": 1, "character": 4 }, "end": { "line": 1, "character": 12 } }
        });
        let locs = decode_locations(&json);
        assert_eq!(locs[0].uri, "file:///a.d.ts");
        assert_eq!(locs[0].target_range(), range(1, 4, 1, 12));
    }

    #[test]
    fn legacy_one_based_link_with_uri_object() {
        let json = json!([{
            "uri": { "scheme": "file", "path": "/a.d.ts" },
            "range": { "startLineNumber": 3, "startColumn": 1, "endLineNumber": 3, "endColumn": 30 },
            "targetSelectionRange": { "startLineNumber": 3, "startColumn": 5, "endLineNumber": 3, "endColumn": 13 }
        }]);
        let locs = decode_locations(&json);
        assert_eq!(locs[0].uri, "file:///a.d.ts");
        assert_eq!(locs[0].range, range(2, 0, 2, 29));
        assert_eq!(locs[0].target_range(), range(2, 4, 2, 12));
    }

    #[test]
    fn null_and_garbage() {
        assert!(decode_locations(&Value::Null).is_empty());
        assert!(decode_locations(&json!([{ "nope": 1 }])).is_empty());
    }

    #[test]
    fn hierarchical_symbols_flatten_with_containers() {
        let json = json!([{
            "name": "AffixProps", "kind": 11,
            "range": { "start": { "line": 0, "character": 0 }, "end": { "line": 5, "character": 1 } },
            "selectionRange": { "start": { "line": 0, "character": 17 }, "end": { "line": 0, "character": 27 } },
            "children": [{
                "name": "onChange", "kind": 7,
                "range": { "start": { "line": 2, "character": 4 }, "end": { "line": 2, "character": 45 } },
                "selectionRange": { "start": { "line": 2, "character": 4 }, "end": { "line": 2, "character": 12 } }
            }]
        }]);
        let symbols = decode_symbols(&json);
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[1].container_name.as_deref(), Some("AffixProps"));

        let hit = enclosing_symbol(&symbols, &range(2, 4, 2, 12)).unwrap();
        assert_eq!(hit.name, "onChange");
        let hit = enclosing_symbol(&symbols, &range(2, 4, 2, 45)).unwrap();
        assert_eq!(hit.name, "AffixProps");
    }

    #[test]
    fn flat_symbols() {
        let json = json!([{
            "name": "AffixProps", "kind": 11, "containerName": "",
            "location": { "uri": "file:///a.d.ts", "range": { "start": { "line": 0, "character": 0 }, "end": { "line": 5, "character": 1 } } }
        }]);
        let symbols = decode_symbols(&json);
        assert_eq!(symbols[0].name, "AffixProps");
        assert_eq!(symbols[0].range, range(0, 0, 5, 1));
    }
}
