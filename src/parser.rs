use tree_sitter::{Language, Parser, Tree};

use crate::error::PropscopeError;

/// Grammar used to parse a source, chosen from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// TSX grammar; also used for plain JS so JSX parses.
    Tsx,
    /// TypeScript grammar, for `.ts` sources and declaration files.
    TypeScript,
}

impl SourceKind {
    /// Detect the grammar from a file extension.
    pub fn from_extension(ext: &str) -> Result<Self, PropscopeError> {
        match ext {
            "tsx" | "jsx" | "js" | "mjs" | "cjs" => Ok(Self::Tsx),
            "ts" | "mts" | "cts" => Ok(Self::TypeScript),
            _ => Err(PropscopeError::UnsupportedExtension(ext.to_string())),
        }
    }

    /// Grammar for a document URI; unknown extensions parse as TSX.
    pub fn for_uri(uri: &str) -> Self {
        let name = uri.rsplit('/').next().unwrap_or(uri);
        let ext = name.rsplit_once('.').map_or("", |(_, ext)| ext);
        Self::from_extension(ext).unwrap_or(Self::Tsx)
    }

    fn language(self) -> Language {
        match self {
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}

/// Parse `source` into a fresh tree. Trees are never cached or reused.
pub fn parse_text(source: &str, kind: SourceKind) -> Result<Tree, PropscopeError> {
    let mut parser = Parser::new();
    parser
        .set_language(&kind.language())
        .map_err(|e| PropscopeError::ParseFailed(e.to_string()))?;

    parser
        .parse(source, None)
        .ok_or_else(|| PropscopeError::ParseFailed(format!("{kind:?} source")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_mapping() {
        assert_eq!(SourceKind::from_extension("tsx").unwrap(), SourceKind::Tsx);
        assert_eq!(SourceKind::from_extension("jsx").unwrap(), SourceKind::Tsx);
        assert_eq!(SourceKind::from_extension("js").unwrap(), SourceKind::Tsx);
        assert_eq!(
            SourceKind::from_extension("ts").unwrap(),
            SourceKind::TypeScript
        );
        assert!(SourceKind::from_extension("py").is_err());
    }

    #[test]
    fn uri_mapping_handles_declaration_files() {
        assert_eq!(
            SourceKind::for_uri("file:///p/node_modules/antd/lib/affix/index.d.ts"),
            SourceKind::TypeScript
        );
        assert_eq!(SourceKind::for_uri("file:///p/src/App.jsx"), SourceKind::Tsx);
        assert_eq!(SourceKind::for_uri("untitled:Untitled-1"), SourceKind::Tsx);
    }

    #[test]
    fn parses_jsx() {
        let tree = parse_text("const a = <Button onClick={go} />;", SourceKind::Tsx).unwrap();
        assert!(!tree.root_node().has_error());
    }
}
