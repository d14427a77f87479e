//! In-memory workspace of parsed source files.
//!
//! The workspace is the single owner of file texts. Analyses run against a
//! [`Snapshot`] (a read guard, so nothing can change underneath them);
//! [`Workspace::apply`] takes the write lock, checks that the change was
//! computed against the current revision, and commits every file or none.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::{RwLock, RwLockReadGuard};
use rowan::TextSize;
use rustc_hash::FxHashMap;
use rustic_common::LineIndex;
use rustic_parser::{Parse, SyntaxNode};
use tracing::{debug, warn};

use crate::edit::{apply_edits, SourceChange};
use crate::error::RefactorError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

/// A file's text together with its parse.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    parse: Parse,
    line_index: LineIndex,
}

impl SourceFile {
    fn new(path: PathBuf, text: String) -> Self {
        let parse = rustic_parser::parse(&text);
        let line_index = LineIndex::new(&text);
        SourceFile {
            path,
            text,
            parse,
            line_index,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parse(&self) -> &Parse {
        &self.parse
    }

    /// A fresh root of this file's syntax tree.
    pub fn syntax(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct WorkspaceState {
    files: BTreeMap<FileId, SourceFile>,
    by_path: FxHashMap<PathBuf, FileId>,
    revision: u64,
    next_id: u32,
}

#[derive(Debug, Default)]
pub struct Workspace {
    state: RwLock<WorkspaceState>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, or replace the text of the file already at `path`.
    pub fn set_file(&self, path: impl Into<PathBuf>, text: impl Into<String>) -> FileId {
        let path = path.into();
        let mut state = self.state.write();
        let id = match state.by_path.get(&path) {
            Some(&id) => id,
            None => {
                let id = FileId(state.next_id);
                state.next_id += 1;
                state.by_path.insert(path.clone(), id);
                id
            }
        };
        state.files.insert(id, SourceFile::new(path, text.into()));
        state.revision += 1;
        id
    }

    /// Replace the text of a known file.
    pub fn set_text(&self, file: FileId, text: impl Into<String>) -> Result<(), RefactorError> {
        let mut state = self.state.write();
        let path = state
            .files
            .get(&file)
            .map(|f| f.path.clone())
            .ok_or(RefactorError::UnknownFile)?;
        state.files.insert(file, SourceFile::new(path, text.into()));
        state.revision += 1;
        Ok(())
    }

    pub fn remove_file(&self, file: FileId) -> Option<SourceFile> {
        let mut state = self.state.write();
        let removed = state.files.remove(&file)?;
        state.by_path.remove(&removed.path);
        state.revision += 1;
        Some(removed)
    }

    /// Take the read lock for the duration of an analysis.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.state.read(),
        }
    }

    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    /// Commit a change computed against the current revision.
    ///
    /// All new texts are computed before any file is touched; on any error
    /// the workspace is left exactly as it was. Returns the new revision.
    pub fn apply(&self, change: &SourceChange) -> Result<u64, RefactorError> {
        let mut state = self.state.write();
        if change.base_revision != state.revision {
            warn!(
                expected = change.base_revision,
                found = state.revision,
                "rejecting change computed against a stale snapshot"
            );
            return Err(RefactorError::StaleSnapshot {
                expected: change.base_revision,
                found: state.revision,
            });
        }

        let mut staged = Vec::with_capacity(change.file_edits.len());
        for (&file, edits) in &change.file_edits {
            let current = state.files.get(&file).ok_or(RefactorError::UnknownFile)?;
            let text = apply_edits(&current.text, edits)?;
            staged.push((file, current.path.clone(), text));
        }

        for (file, path, text) in staged {
            state.files.insert(file, SourceFile::new(path, text));
        }
        state.revision += 1;
        debug!(
            revision = state.revision,
            files = change.file_edits.len(),
            "applied source change"
        );
        Ok(state.revision)
    }
}

/// A consistent, read-locked view of the workspace.
pub struct Snapshot<'a> {
    state: RwLockReadGuard<'a, WorkspaceState>,
}

impl Snapshot<'_> {
    pub fn revision(&self) -> u64 {
        self.state.revision
    }

    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.state.files.get(&id)
    }

    pub fn file_id(&self, path: &Path) -> Option<FileId> {
        self.state.by_path.get(path).copied()
    }

    /// Files in id order.
    pub fn files(&self) -> impl Iterator<Item = (FileId, &SourceFile)> + '_ {
        self.state.files.iter().map(|(&id, file)| (id, file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::TextEdit;
    use rowan::TextRange;

    #[test]
    fn set_file_reuses_ids_by_path() {
        let ws = Workspace::new();
        let a = ws.set_file("a.rs", "struct A;");
        let b = ws.set_file("b.rs", "struct B;");
        assert_ne!(a, b);
        assert_eq!(ws.set_file("a.rs", "struct A2;"), a);
        let snap = ws.snapshot();
        assert_eq!(snap.file(a).unwrap().text(), "struct A2;");
        assert_eq!(snap.file_id(Path::new("b.rs")), Some(b));
        assert_eq!(snap.revision(), 3);
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let ws = Workspace::new();
        let a = ws.set_file("a.rs", "fn a() {}");
        let b = ws.set_file("b.rs", "fn b() {}");
        let mut change = SourceChange::new(ws.revision());
        change.push(a, TextEdit::replace(TextRange::new(3.into(), 4.into()), "x"));
        change.push(b, TextEdit::replace(TextRange::new(3.into(), 40.into()), "y"));
        assert_eq!(ws.apply(&change), Err(RefactorError::EditOutOfBounds));

        let snap = ws.snapshot();
        assert_eq!(snap.file(a).unwrap().text(), "fn a() {}");
        assert_eq!(snap.file(b).unwrap().text(), "fn b() {}");
    }

    #[test]
    fn apply_rejects_stale_changes() {
        let ws = Workspace::new();
        let a = ws.set_file("a.rs", "fn a() {}");
        let mut change = SourceChange::new(ws.revision());
        change.push(a, TextEdit::replace(TextRange::new(3.into(), 4.into()), "x"));
        ws.set_text(a, "fn b() {}").unwrap();
        assert!(matches!(
            ws.apply(&change),
            Err(RefactorError::StaleSnapshot { .. })
        ));
    }

    #[test]
    fn apply_reparses_and_bumps_revision() {
        let ws = Workspace::new();
        let a = ws.set_file("a.rs", "fn a() {}");
        let before = ws.revision();
        let mut change = SourceChange::new(before);
        change.push(a, TextEdit::replace(TextRange::new(3.into(), 4.into()), "main"));
        assert_eq!(ws.apply(&change), Ok(before + 1));
        let snap = ws.snapshot();
        let file = snap.file(a).unwrap();
        assert_eq!(file.text(), "fn main() {}");
        assert_eq!(file.syntax().to_string(), "fn main() {}");
    }
}
