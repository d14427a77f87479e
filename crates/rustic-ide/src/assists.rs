//! The "convert to tuple struct" assist.
//!
//! Turns a struct or enum variant with named fields into its positional
//! form and rewrites every usage in the workspace: literals, patterns and
//! field accesses. Either every usage can be rewritten and the whole change
//! is produced, or the assist fails and nothing is touched.

use rowan::{TextSize, TokenAtOffset};
use rustc_hash::FxHashMap;
use rustic_parser::ast::item::Variant;
use rustic_parser::ast::AstNode;
use rustic_parser::{SyntaxKind, SyntaxNode};
use tracing::{debug, info, warn};

use crate::cancel::CancellationToken;
use crate::classify::{classify, Site};
use crate::config::ConvertConfig;
use crate::decls::DeclTable;
use crate::edit::SourceChange;
use crate::error::RefactorError;
use crate::plan::{plan_conversion, ConversionPlan};
use crate::references::ReferenceIndex;
use crate::rewrite::{declaration_edit, FileRewriter};
use crate::shape::{ConvertTarget, StructShape};
use crate::workspace::{FileId, Snapshot, Workspace};

/// A caret position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FilePosition {
    pub file: FileId,
    pub offset: TextSize,
}

/// The struct or variant declaration enclosing the caret.
fn target_at(decls: &DeclTable, position: FilePosition) -> Option<ConvertTarget> {
    let root = decls.root(position.file)?;
    if position.offset > root.text_range().end() {
        return None;
    }
    let token = match root.token_at_offset(position.offset) {
        TokenAtOffset::None => return None,
        TokenAtOffset::Single(token) => token,
        // Between two tokens, prefer the one that is not whitespace.
        TokenAtOffset::Between(left, right) => {
            if right.kind().is_trivia() {
                left
            } else {
                right
            }
        }
    };
    let node = token
        .parent_ancestors()
        .find(|n| matches!(n.kind(), SyntaxKind::STRUCT_DEF | SyntaxKind::VARIANT))?;
    target_of_node(decls, position.file, &node)
}

fn target_of_node(decls: &DeclTable, file: FileId, node: &SyntaxNode) -> Option<ConvertTarget> {
    match node.kind() {
        SyntaxKind::STRUCT_DEF => decls.decl_at(file, node).map(ConvertTarget::Struct),
        SyntaxKind::VARIANT => {
            let variant = Variant::cast(node.clone())?;
            let parent_enum = variant.parent_enum()?;
            let parent = decls.decl_at(file, parent_enum.syntax())?;
            let index = parent_enum.variants().position(|v| v.syntax() == node)?;
            Some(ConvertTarget::Variant { parent, index })
        }
        _ => None,
    }
}

fn plan_at(
    decls: &DeclTable,
    position: FilePosition,
) -> Result<(ConvertTarget, ConversionPlan), RefactorError> {
    let target = target_at(decls, position).ok_or_else(|| {
        RefactorError::NotApplicable("no struct or enum variant at the cursor".to_string())
    })?;
    let shape = StructShape::of_target(decls, target).ok_or_else(|| {
        RefactorError::NotApplicable("the declaration is incomplete".to_string())
    })?;
    Ok((target, plan_conversion(&shape)?))
}

/// Whether the assist applies at `position`.
pub fn convert_to_tuple_available(snapshot: &Snapshot<'_>, position: FilePosition) -> bool {
    let decls = DeclTable::build(snapshot);
    plan_at(&decls, position).is_ok()
}

/// Compute the change converting the declaration at `position`.
///
/// The snapshot's read lock is held for the whole computation. Nothing is
/// applied; see [`run_convert_to_tuple`].
pub fn convert_to_tuple(
    snapshot: &Snapshot<'_>,
    position: FilePosition,
    config: &ConvertConfig,
    cancel: &CancellationToken,
) -> Result<SourceChange, RefactorError> {
    let decls = DeclTable::build(snapshot);
    let (target, plan) = plan_at(&decls, position)?;
    let target_name = target.display_name(&decls);
    debug!(decl = %target_name, fields = plan.len(), "planning conversion");

    let field_names: Vec<String> = plan.fields.iter().map(|f| f.name.clone()).collect();
    let references = ReferenceIndex::new(&decls).find(target, &field_names, cancel)?;

    let mut sites: FxHashMap<FileId, Vec<Site>> = FxHashMap::default();
    let mut unsupported = Vec::new();
    for reference in &references {
        cancel.check()?;
        match classify(reference, &plan) {
            Ok(site) => sites.entry(site.file).or_default().push(site),
            Err(diag) => unsupported.push(diag),
        }
    }
    if !unsupported.is_empty() {
        for diag in &unsupported {
            warn!(decl = %target_name, "{diag}");
        }
        return Err(RefactorError::UnsupportedUsage(unsupported));
    }
    debug!(
        decl = %target_name,
        references = references.len(),
        "classified references"
    );

    let mut change = SourceChange::new(snapshot.revision());
    let mut files: Vec<FileId> = sites.keys().copied().collect();
    files.sort();
    for file in files {
        cancel.check()?;
        let source = snapshot.file(file).ok_or(RefactorError::UnknownFile)?;
        let edits = FileRewriter::new(source.text()).rewrite(&sites[&file], &plan, config)?;
        for edit in edits {
            change.push(file, edit);
        }
    }

    let decl_file = decls.data(target.owner()).file;
    let decl_edit = declaration_edit(&decls, target, &plan).ok_or_else(|| {
        RefactorError::NotApplicable("the declaration is incomplete".to_string())
    })?;
    change.push(decl_file, decl_edit);

    change.validate(|file| snapshot.file(file).map(|f| f.len()))?;
    debug!(
        decl = %target_name,
        files = change.file_edits.len(),
        edits = change.edit_count(),
        "computed conversion"
    );
    Ok(change)
}

/// Compute the conversion under the read lock, then commit it under the
/// write lock. Returns the new workspace revision.
pub fn run_convert_to_tuple(
    workspace: &Workspace,
    position: FilePosition,
    config: &ConvertConfig,
    cancel: &CancellationToken,
) -> Result<u64, RefactorError> {
    let change = {
        let snapshot = workspace.snapshot();
        convert_to_tuple(&snapshot, position, config, cancel)?
    };
    cancel.check()?;
    let revision = workspace.apply(&change)?;
    info!(revision, edits = change.edit_count(), "converted to tuple struct");
    Ok(revision)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ws: &Workspace, file: FileId, needle: &str) -> FilePosition {
        let snap = ws.snapshot();
        let text = snap.file(file).unwrap().text();
        let offset = text.find(needle).unwrap() as u32;
        FilePosition {
            file,
            offset: offset.into(),
        }
    }

    #[test]
    fn availability_follows_the_caret() {
        let ws = Workspace::new();
        let file = ws.set_file(
            "a.rs",
            "struct Named { a: i32 }\nstruct Tuple(i32);\nenum E { V { x: u8 }, W(u8) }\nfn f() {}",
        );
        let snap_available = |needle: &str| {
            let position = at(&ws, file, needle);
            convert_to_tuple_available(&ws.snapshot(), position)
        };
        assert!(snap_available("Named"));
        assert!(snap_available("a: i32"));
        assert!(!snap_available("Tuple"));
        assert!(snap_available("V {"));
        assert!(!snap_available("W("));
        assert!(!snap_available("fn f"));
    }

    #[test]
    fn second_conversion_is_not_applicable() {
        let ws = Workspace::new();
        let file = ws.set_file("a.rs", "struct S { a: i32 }");
        let config = ConvertConfig::default();
        let cancel = CancellationToken::new();
        run_convert_to_tuple(&ws, at(&ws, file, "S"), &config, &cancel).unwrap();
        assert_eq!(ws.snapshot().file(file).unwrap().text(), "struct S(i32);");
        let err = run_convert_to_tuple(&ws, at(&ws, file, "S"), &config, &cancel).unwrap_err();
        assert!(matches!(err, RefactorError::NotApplicable(_)));
    }
}
