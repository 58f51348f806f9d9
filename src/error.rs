/// Errors produced by propscope while resolving symbols or editing documents.
#[derive(Debug, thiserror::Error)]
pub enum PropscopeError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("unsupported extension: .{0}")]
    UnsupportedExtension(String),

    #[error("parse failed: {0}")]
    ParseFailed(String),

    #[error("resource {name}: {source}")]
    Resource {
        name: String,
        source: serde_json::Error,
    },

    #[error("component `{0}` is registered twice")]
    DuplicateComponent(String),

    /// A symbol was classified but the registry has no entry for it.
    #[error("no registry entry matches `{0}`")]
    RegistryMiss(String),

    #[error("oracle: {0}")]
    Oracle(String),

    #[error("lsp: {0}")]
    Lsp(String),

    #[error("edit: {0}")]
    Edit(String),

    #[error("config: {0}")]
    Config(String),
}
