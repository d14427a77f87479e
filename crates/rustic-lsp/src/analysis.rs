//! Conversions between workspace data and LSP types.
//!
//! Offsets in the workspace are byte offsets; LSP positions are 0-based
//! lines and UTF-16 code units within the line.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rowan::{TextRange, TextSize};
use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticRelatedInformation, DiagnosticSeverity, DocumentSymbol, Location,
    Position, Range, SymbolKind, TextEdit, Url, WorkspaceEdit,
};

use rustic_ide::symbols::{StructureKind, StructureNode};
use rustic_ide::{SourceChange, Snapshot, SourceFile};

/// Convert a byte offset to an LSP position.
pub fn offset_to_position(source: &str, offset: TextSize) -> Position {
    let mut offset = usize::from(offset).min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &source[..offset];

    let line = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let character: u32 = source[line_start..offset]
        .chars()
        .map(|c| c.len_utf16() as u32)
        .sum();

    Position { line, character }
}

/// Convert an LSP position back to a byte offset.
///
/// A character past the end of its line maps to the end of the line; a
/// line past the end of the text is `None`.
pub fn position_to_offset(source: &str, position: Position) -> Option<TextSize> {
    let line_start = if position.line == 0 {
        0
    } else {
        source
            .match_indices('\n')
            .nth(position.line as usize - 1)
            .map(|(i, _)| i + 1)?
    };
    let line = &source[line_start..];
    let line = &line[..line.find('\n').unwrap_or(line.len())];

    let mut utf16 = 0u32;
    for (byte, c) in line.char_indices() {
        if utf16 >= position.character {
            return Some(TextSize::from((line_start + byte) as u32));
        }
        utf16 += c.len_utf16() as u32;
    }
    Some(TextSize::from((line_start + line.len()) as u32))
}

pub fn range_to_lsp(source: &str, range: TextRange) -> Range {
    Range::new(
        offset_to_position(source, range.start()),
        offset_to_position(source, range.end()),
    )
}

/// The workspace path of a document. Non-file URIs keep their text.
pub fn path_of(uri: &Url) -> PathBuf {
    uri.to_file_path()
        .unwrap_or_else(|_| PathBuf::from(uri.as_str()))
}

/// Inverse of [`path_of`].
pub fn uri_of(path: &Path) -> Option<Url> {
    Url::from_file_path(path)
        .ok()
        .or_else(|| Url::parse(path.to_str()?).ok())
}

/// Parse errors of `file` as LSP diagnostics.
pub fn parse_diagnostics(uri: &Url, file: &SourceFile) -> Vec<Diagnostic> {
    let source = file.text();
    file.parse()
        .errors()
        .iter()
        .map(|error| {
            let span = TextRange::new(error.span.start.into(), error.span.end.into());
            let related_information = error.related.as_ref().map(|(message, span)| {
                vec![DiagnosticRelatedInformation {
                    location: Location {
                        uri: uri.clone(),
                        range: range_to_lsp(
                            source,
                            TextRange::new(span.start.into(), span.end.into()),
                        ),
                    },
                    message: message.clone(),
                }]
            });
            Diagnostic {
                range: range_to_lsp(source, span),
                severity: Some(DiagnosticSeverity::ERROR),
                source: Some("rustic".to_string()),
                message: error.message.clone(),
                related_information,
                ..Default::default()
            }
        })
        .collect()
}

/// The structure view of a file.
pub fn document_symbols(source: &str, nodes: &[StructureNode]) -> Vec<DocumentSymbol> {
    nodes.iter().map(|node| document_symbol(source, node)).collect()
}

fn document_symbol(source: &str, node: &StructureNode) -> DocumentSymbol {
    let children = document_symbols(source, &node.children);
    #[allow(deprecated)] // `deprecated` is required by the struct
    DocumentSymbol {
        name: node.name.clone(),
        detail: node.detail.clone(),
        kind: symbol_kind(node.kind),
        tags: None,
        deprecated: None,
        range: range_to_lsp(source, node.range),
        selection_range: range_to_lsp(source, node.selection_range),
        children: if children.is_empty() {
            None
        } else {
            Some(children)
        },
    }
}

fn symbol_kind(kind: StructureKind) -> SymbolKind {
    match kind {
        StructureKind::Module => SymbolKind::MODULE,
        StructureKind::Struct => SymbolKind::STRUCT,
        StructureKind::Field => SymbolKind::FIELD,
        StructureKind::Enum => SymbolKind::ENUM,
        StructureKind::Variant => SymbolKind::ENUM_MEMBER,
        StructureKind::Trait => SymbolKind::INTERFACE,
        StructureKind::Impl => SymbolKind::OBJECT,
        StructureKind::Function => SymbolKind::FUNCTION,
        StructureKind::Const => SymbolKind::CONSTANT,
        StructureKind::Static => SymbolKind::VARIABLE,
        StructureKind::TypeAlias => SymbolKind::TYPE_PARAMETER,
    }
}

/// Express a computed change as a workspace edit against `snapshot`.
///
/// Files whose path has no URI form are skipped.
pub fn workspace_edit(snapshot: &Snapshot<'_>, change: &SourceChange) -> WorkspaceEdit {
    let mut changes: HashMap<Url, Vec<TextEdit>> = HashMap::new();
    for (&file, edits) in &change.file_edits {
        let Some(source) = snapshot.file(file) else {
            continue;
        };
        let Some(uri) = uri_of(source.path()) else {
            continue;
        };
        let text = source.text();
        changes.insert(
            uri,
            edits
                .iter()
                .map(|edit| TextEdit {
                    range: range_to_lsp(text, edit.range),
                    new_text: edit.replacement.clone(),
                })
                .collect(),
        );
    }
    WorkspaceEdit::new(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustic_ide::Workspace;

    #[test]
    fn offset_to_position_multiline() {
        let source = "line1\nline2\nline3";
        assert_eq!(offset_to_position(source, TextSize::from(0)), Position::new(0, 0));
        assert_eq!(offset_to_position(source, TextSize::from(6)), Position::new(1, 0));
        assert_eq!(offset_to_position(source, TextSize::from(14)), Position::new(2, 2));
    }

    #[test]
    fn positions_count_utf16_units() {
        // 'é' is two bytes and one UTF-16 unit.
        let source = "let é = 1;\nx";
        assert_eq!(offset_to_position(source, TextSize::from(6)), Position::new(0, 5));
        assert_eq!(position_to_offset(source, Position::new(0, 5)), Some(TextSize::from(6)));
    }

    #[test]
    fn position_to_offset_clamps_to_line_end() {
        let source = "ab\ncd";
        assert_eq!(position_to_offset(source, Position::new(1, 1)), Some(TextSize::from(4)));
        assert_eq!(position_to_offset(source, Position::new(0, 9)), Some(TextSize::from(2)));
        assert_eq!(position_to_offset(source, Position::new(1, 9)), Some(TextSize::from(5)));
        assert_eq!(position_to_offset(source, Position::new(2, 0)), None);
    }

    #[test]
    fn parse_errors_become_diagnostics() {
        let ws = Workspace::new();
        let file = ws.set_file("/tmp/a.rs", "struct S {");
        let snapshot = ws.snapshot();
        let uri = Url::parse("file:///tmp/a.rs").unwrap();
        let diags = parse_diagnostics(&uri, snapshot.file(file).unwrap());
        assert!(!diags.is_empty());
        assert_eq!(diags[0].severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diags[0].source.as_deref(), Some("rustic"));
    }

    #[test]
    fn structure_maps_to_nested_symbols() {
        let source = "struct P { x: i32 }\nenum E { A }";
        let parse = rustic_parser::parse(source);
        let nodes = rustic_ide::symbols::file_structure(&parse.syntax());
        let symbols = document_symbols(source, &nodes);
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].kind, SymbolKind::STRUCT);
        assert_eq!(symbols[0].selection_range, Range::new(Position::new(0, 7), Position::new(0, 8)));
        let fields = symbols[0].children.as_ref().unwrap();
        assert_eq!(fields[0].name, "x");
        assert_eq!(fields[0].detail.as_deref(), Some("i32"));
        assert_eq!(symbols[1].children.as_ref().unwrap()[0].kind, SymbolKind::ENUM_MEMBER);
    }

    #[test]
    fn workspace_edit_uses_file_uris() {
        let ws = Workspace::new();
        let file = ws.set_file("/tmp/a.rs", "struct S { a: i32 }");
        let snapshot = ws.snapshot();
        let mut change = SourceChange::new(snapshot.revision());
        change.push(
            file,
            rustic_ide::TextEdit::replace(TextRange::new(TextSize::from(8), TextSize::from(19)), "(i32);"),
        );
        let edit = workspace_edit(&snapshot, &change);
        let changes = edit.changes.unwrap();
        let edits = &changes[&Url::parse("file:///tmp/a.rs").unwrap()];
        assert_eq!(edits[0].range, Range::new(Position::new(0, 8), Position::new(0, 19)));
        assert_eq!(edits[0].new_text, "(i32);");
    }
}
