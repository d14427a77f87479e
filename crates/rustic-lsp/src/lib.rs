//! Rustic Language Server Protocol (LSP) implementation.
//!
//! Exposes the Rustic refactorings to editors:
//!
//! - **Diagnostics**: parse errors displayed inline
//! - **Code actions**: "Convert to tuple struct" on named-field structs and
//!   enum variants, run through `workspace/executeCommand`
//! - **Document symbols**: the structure view
//!
//! The server communicates via stdin/stdout using the LSP protocol over
//! JSON-RPC, powered by the `tower-lsp` framework.

pub mod analysis;
pub mod server;

use tower_lsp::{LspService, Server};

use server::RusticBackend;

pub use server::CONVERT_TO_TUPLE_COMMAND;

/// Run the Rustic LSP server on stdin/stdout.
///
/// This is the entry point called by `rustic lsp`. It runs the event loop
/// until the client disconnects.
pub async fn run_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| RusticBackend::new(client));
    Server::new(stdin, stdout, socket).serve(service).await;
}
