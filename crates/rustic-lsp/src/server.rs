//! Tower-lsp Backend implementation for the Rustic language server.
//!
//! Implements the LSP `LanguageServer` trait with support for:
//! - textDocument/didOpen, didChange, didClose (parse diagnostics)
//! - textDocument/codeAction ("Convert to tuple struct")
//! - workspace/executeCommand (`rustic.convertToTuple`)
//! - textDocument/documentSymbol (structure view)
//!
//! Documents live in a [`Workspace`] that also holds every `.rs` file of
//! the workspace folder, so conversions see usages in unopened files.

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, info, warn};

use rustic_ide::discovery::load_dir;
use rustic_ide::symbols::file_structure;
use rustic_ide::{
    convert_to_tuple, convert_to_tuple_available, CancellationToken, ConvertConfig, FilePosition,
    RefactorError, RusticConfig, Snapshot, SourceChange, Workspace,
};

use crate::analysis::{self, path_of, position_to_offset};

/// Command run by the "Convert to tuple struct" code action. Its single
/// argument is a `TextDocumentPositionParams`.
pub const CONVERT_TO_TUPLE_COMMAND: &str = "rustic.convertToTuple";

const CONVERT_TO_TUPLE_TITLE: &str = "Convert to tuple struct";

/// The Rustic LSP server backend.
pub struct RusticBackend {
    client: Client,
    workspace: Workspace,
    config: RwLock<ConvertConfig>,
    /// Token of the conversion in flight; document edits cancel it.
    inflight: Mutex<CancellationToken>,
}

impl RusticBackend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            workspace: Workspace::new(),
            config: RwLock::new(ConvertConfig::default()),
            inflight: Mutex::new(CancellationToken::new()),
        }
    }

    /// Store a document's text and publish its parse diagnostics.
    async fn update_and_publish(&self, uri: Url, text: String) {
        self.inflight.lock().cancel();
        let file = self.workspace.set_file(path_of(&uri), text);
        let diagnostics = {
            let snapshot = self.workspace.snapshot();
            match snapshot.file(file) {
                Some(source) => analysis::parse_diagnostics(&uri, source),
                None => Vec::new(),
            }
        };
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    /// A fresh token for a new conversion, cancelling the previous one.
    fn begin_conversion(&self) -> CancellationToken {
        let mut inflight = self.inflight.lock();
        inflight.cancel();
        *inflight = CancellationToken::new();
        inflight.clone()
    }

    /// Compute the conversion and its workspace edit under one snapshot;
    /// the position is resolved against that same snapshot.
    fn compute_conversion(
        &self,
        params: &TextDocumentPositionParams,
        cancel: &CancellationToken,
    ) -> std::result::Result<(SourceChange, WorkspaceEdit), RefactorError> {
        let config = self.config.read().clone();
        let snapshot = self.workspace.snapshot();
        let position = file_position(&snapshot, params).ok_or(RefactorError::UnknownFile)?;
        let change = convert_to_tuple(&snapshot, position, &config, cancel)?;
        let edit = analysis::workspace_edit(&snapshot, &change);
        Ok((change, edit))
    }

    /// A user-facing explanation of a failed conversion.
    fn failure_message(&self, err: &RefactorError) -> String {
        let RefactorError::UnsupportedUsage(diags) = err else {
            return format!("Cannot convert to tuple struct: {err}");
        };
        let snapshot = self.workspace.snapshot();
        let mut message = format!("Cannot convert to tuple struct: {err}");
        for diag in diags {
            let Some(file) = snapshot.file(diag.file) else {
                continue;
            };
            let (line, col) = file.line_index().line_col(diag.range.start().into());
            message.push_str(&format!(
                "\n{}:{line}:{col}: {}",
                file.path().display(),
                diag.message
            ));
        }
        message
    }

    async fn run_convert_to_tuple(&self, params: TextDocumentPositionParams) {
        let cancel = self.begin_conversion();
        let (change, edit) = match self.compute_conversion(&params, &cancel) {
            Ok(computed) => computed,
            Err(RefactorError::Cancelled) => {
                debug!("conversion cancelled by a document change");
                return;
            }
            Err(err) => {
                let message = self.failure_message(&err);
                self.client.show_message(MessageType::WARNING, message).await;
                return;
            }
        };

        match self.client.apply_edit(edit).await {
            Ok(response) if response.applied => {
                // Open documents are also resynced by didChange; this keeps
                // unopened files current.
                match self.workspace.apply(&change) {
                    Ok(revision) => info!(revision, "converted to tuple struct"),
                    Err(err) => debug!("workspace already resynced: {err}"),
                }
            }
            Ok(response) => {
                let reason = response.failure_reason.unwrap_or_default();
                self.client
                    .show_message(
                        MessageType::WARNING,
                        format!("The editor rejected the conversion. {reason}"),
                    )
                    .await;
            }
            Err(err) => warn!("workspace/applyEdit failed: {err}"),
        }
    }
}

fn file_position(snapshot: &Snapshot<'_>, params: &TextDocumentPositionParams) -> Option<FilePosition> {
    let file = snapshot.file_id(&path_of(&params.text_document.uri))?;
    let offset = position_to_offset(snapshot.file(file)?.text(), params.position)?;
    Some(FilePosition { file, offset })
}

#[tower_lsp::async_trait]
impl LanguageServer for RusticBackend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options.clone() {
            match RusticConfig::from_json(options) {
                Ok(config) => *self.config.write() = config.convert_to_tuple,
                Err(err) => warn!("ignoring initialization options: {err}"),
            }
        }

        #[allow(deprecated)] // `root_uri` is the fallback for clients without folders
        let root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .map(|folder| folder.uri.clone())
            .or(params.root_uri);
        if let Some(root) = root.and_then(|uri| uri.to_file_path().ok()) {
            match load_dir(&self.workspace, &root) {
                Ok(files) => info!(root = %root.display(), files = files.len(), "indexed workspace"),
                Err(err) => warn!(root = %root.display(), "failed to index workspace: {err}"),
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                document_symbol_provider: Some(OneOf::Left(true)),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![CONVERT_TO_TUPLE_COMMAND.to_string()],
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "rustic-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Rustic LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.inflight.lock().cancel();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let text = params.text_document.text;
        self.update_and_publish(uri, text).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        // Full sync: the first change carries the whole document.
        if let Some(change) = params.content_changes.into_iter().next() {
            self.update_and_publish(uri, change.text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        let path = path_of(&uri);

        // Fall back to the saved text, or forget a file that was never saved.
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                self.workspace.set_file(path, text);
            }
            Err(_) => {
                let file = self.workspace.snapshot().file_id(&path);
                if let Some(file) = file {
                    self.workspace.remove_file(file);
                }
            }
        }

        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let position = TextDocumentPositionParams {
            text_document: params.text_document,
            position: params.range.start,
        };
        let available = {
            let snapshot = self.workspace.snapshot();
            file_position(&snapshot, &position)
                .is_some_and(|file_position| convert_to_tuple_available(&snapshot, file_position))
        };
        if !available {
            return Ok(None);
        }

        let Ok(argument) = serde_json::to_value(&position) else {
            return Ok(None);
        };
        let action = CodeAction {
            title: CONVERT_TO_TUPLE_TITLE.to_string(),
            kind: Some(CodeActionKind::REFACTOR_REWRITE),
            command: Some(Command {
                title: CONVERT_TO_TUPLE_TITLE.to_string(),
                command: CONVERT_TO_TUPLE_COMMAND.to_string(),
                arguments: Some(vec![argument]),
            }),
            ..Default::default()
        };
        Ok(Some(vec![CodeActionOrCommand::CodeAction(action)]))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        if params.command != CONVERT_TO_TUPLE_COMMAND {
            return Err(Error::invalid_params(format!(
                "unknown command `{}`",
                params.command
            )));
        }
        let argument = params
            .arguments
            .into_iter()
            .next()
            .ok_or_else(|| Error::invalid_params("missing position argument"))?;
        let position: TextDocumentPositionParams = serde_json::from_value(argument)
            .map_err(|err| Error::invalid_params(err.to_string()))?;
        self.run_convert_to_tuple(position).await;
        Ok(None)
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let path = path_of(&params.text_document.uri);
        let snapshot = self.workspace.snapshot();
        let Some(file) = snapshot.file_id(&path).and_then(|id| snapshot.file(id)) else {
            return Ok(None);
        };
        let structure = file_structure(&file.syntax());
        let symbols = analysis::document_symbols(file.text(), &structure);
        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri() -> Url {
        Url::parse("file:///project/src/main.rs").unwrap()
    }

    async fn open(server: &RusticBackend, text: &str) {
        server
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri: uri(),
                    language_id: "rust".to_string(),
                    version: 1,
                    text: text.to_string(),
                },
            })
            .await;
    }

    fn action_params(line: u32, character: u32) -> CodeActionParams {
        let position = Position::new(line, character);
        CodeActionParams {
            text_document: TextDocumentIdentifier { uri: uri() },
            range: Range::new(position, position),
            context: CodeActionContext::default(),
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        }
    }

    /// Verify that the server advertises the expected capabilities.
    #[tokio::test]
    async fn server_capabilities() {
        let (service, _) = tower_lsp::LspService::new(|client| RusticBackend::new(client));
        let server = service.inner();
        let result = server
            .initialize(InitializeParams::default())
            .await
            .unwrap();

        let caps = result.capabilities;
        assert!(caps.text_document_sync.is_some());
        assert!(caps.document_symbol_provider.is_some());
        assert!(caps.code_action_provider.is_some());
        let commands = caps.execute_command_provider.unwrap().commands;
        assert_eq!(commands, vec![CONVERT_TO_TUPLE_COMMAND.to_string()]);
    }

    #[tokio::test]
    async fn initialization_options_configure_conversions() {
        let (service, _) = tower_lsp::LspService::new(|client| RusticBackend::new(client));
        let server = service.inner();
        let params = InitializeParams {
            initialization_options: Some(serde_json::json!({
                "convert-to-tuple": { "collapse-rest-min": 4 }
            })),
            ..Default::default()
        };
        server.initialize(params).await.unwrap();
        assert_eq!(server.config.read().collapse_rest_min, 4);
    }

    #[tokio::test]
    async fn code_action_offered_on_named_structs_only() {
        let (service, _) = tower_lsp::LspService::new(|client| RusticBackend::new(client));
        let server = service.inner();
        open(server, "struct Named { a: i32 }\nstruct Tuple(i32);").await;

        let actions = server.code_action(action_params(0, 8)).await.unwrap().unwrap();
        assert_eq!(actions.len(), 1);
        let CodeActionOrCommand::CodeAction(action) = &actions[0] else {
            panic!("expected a code action");
        };
        assert_eq!(action.title, "Convert to tuple struct");
        let command = action.command.as_ref().unwrap();
        assert_eq!(command.command, CONVERT_TO_TUPLE_COMMAND);

        assert!(server.code_action(action_params(1, 8)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn document_symbols_follow_the_open_text() {
        let (service, _) = tower_lsp::LspService::new(|client| RusticBackend::new(client));
        let server = service.inner();
        open(server, "struct P { x: i32 }\nfn main() {}").await;

        let response = server
            .document_symbol(DocumentSymbolParams {
                text_document: TextDocumentIdentifier { uri: uri() },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap();
        let Some(DocumentSymbolResponse::Nested(symbols)) = response else {
            panic!("expected nested symbols");
        };
        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["P", "main"]);
        assert_eq!(symbols[0].children.as_ref().unwrap()[0].name, "x");
    }

    #[tokio::test]
    async fn conversion_reads_position_and_text_from_one_revision() {
        let (service, _) = tower_lsp::LspService::new(|client| RusticBackend::new(client));
        let server = service.inner();
        open(server, "struct S { a: i32 }\nfn f(s: S) -> i32 { s.a }").await;
        let params = TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: uri() },
            position: Position::new(0, 7),
        };

        let (change, edit) = server
            .compute_conversion(&params, &CancellationToken::new())
            .unwrap();
        assert_eq!(change.base_revision, server.workspace.revision());
        let changes = edit.changes.unwrap();
        let mut texts: Vec<&str> = changes[&uri()].iter().map(|e| e.new_text.as_str()).collect();
        texts.sort();
        assert_eq!(texts, ["(i32);", "0"]);

        // The same position in the new text is no longer on the struct.
        open(server, "fn f() {}\nstruct S { a: i32 }").await;
        let err = server
            .compute_conversion(&params, &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, RefactorError::NotApplicable(_)));
    }

    #[tokio::test]
    async fn unknown_commands_are_rejected() {
        let (service, _) = tower_lsp::LspService::new(|client| RusticBackend::new(client));
        let server = service.inner();
        let result = server
            .execute_command(ExecuteCommandParams {
                command: "rustic.unknown".to_string(),
                arguments: vec![],
                work_done_progress_params: Default::default(),
            })
            .await;
        assert!(result.is_err());
    }
}
