//! `propscope`: hover documentation, attribute completion and handler
//! scaffolding for a JSX component library.
//!
//! The engine resolves which library component and attribute sit under a
//! cursor by combining a semantic oracle (a language server or an editor
//! host) with a local tree-sitter parse, then renders documentation cards
//! from embedded per-version tables or synthesizes handler stubs in the
//! surrounding class or function component.

pub mod cancel;
pub mod card;
pub mod catalog;
pub mod completion;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod hover;
pub mod insert;
pub mod logging;
pub mod lsp;
pub mod oracle;
pub mod parser;
pub mod resolve;
pub mod session;
pub mod syntax;
pub mod util;

#[cfg(test)]
mod testing;

pub use cancel::CancellationToken;
pub use error::PropscopeError;
pub use session::Session;
