//! Text edits and multi-file changes.
//!
//! A [`SourceChange`] is computed against one workspace revision and is
//! either applied completely or not at all (see
//! [`Workspace::apply`](crate::workspace::Workspace::apply)).

use std::collections::BTreeMap;

use rowan::{TextRange, TextSize};

use crate::error::RefactorError;
use crate::workspace::FileId;

/// Replace `range` with `replacement`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(range: TextRange, replacement: impl Into<String>) -> Self {
        TextEdit {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::replace(TextRange::empty(offset), text)
    }
}

/// Sort `edits` by position and reject overlapping or out-of-bounds ones.
///
/// Two insertions at the same offset are ambiguous and count as an
/// overlap; an insertion touching a replaced range does not.
pub fn normalize_edits(edits: &mut [TextEdit], text_len: TextSize) -> Result<(), RefactorError> {
    edits.sort_by_key(|e| (e.range.start(), e.range.end()));
    for edit in edits.iter() {
        if edit.range.end() > text_len {
            return Err(RefactorError::EditOutOfBounds);
        }
    }
    for pair in edits.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.range.end() > b.range.start() || (a.range == b.range && a.range.is_empty()) {
            return Err(RefactorError::OverlappingEdits);
        }
    }
    Ok(())
}

/// Apply edits to `text`, producing the new text.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<String, RefactorError> {
    let mut edits = edits.to_vec();
    normalize_edits(&mut edits, TextSize::of(text))?;
    let mut out = String::with_capacity(text.len());
    let mut last = 0usize;
    for edit in &edits {
        let start = usize::from(edit.range.start());
        let end = usize::from(edit.range.end());
        let (Some(before), true) = (text.get(last..start), text.is_char_boundary(end)) else {
            return Err(RefactorError::EditOutOfBounds);
        };
        out.push_str(before);
        out.push_str(&edit.replacement);
        last = end;
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Edits for several files, computed against `base_revision`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceChange {
    pub base_revision: u64,
    pub file_edits: BTreeMap<FileId, Vec<TextEdit>>,
}

impl SourceChange {
    pub fn new(base_revision: u64) -> Self {
        SourceChange {
            base_revision,
            file_edits: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, file: FileId, edit: TextEdit) {
        self.file_edits.entry(file).or_default().push(edit);
    }

    pub fn is_empty(&self) -> bool {
        self.file_edits.values().all(Vec::is_empty)
    }

    /// Total number of edits across files.
    pub fn edit_count(&self) -> usize {
        self.file_edits.values().map(Vec::len).sum()
    }

    /// Sort every file's edits and check them against the file lengths.
    pub fn validate(
        &mut self,
        text_len: impl Fn(FileId) -> Option<TextSize>,
    ) -> Result<(), RefactorError> {
        for (&file, edits) in self.file_edits.iter_mut() {
            let len = text_len(file).ok_or(RefactorError::UnknownFile)?;
            normalize_edits(edits, len)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    #[test]
    fn applies_in_any_order() {
        let edits = vec![
            TextEdit::replace(range(6, 11), "there"),
            TextEdit::replace(range(0, 5), "hi"),
        ];
        assert_eq!(apply_edits("hello world", &edits).unwrap(), "hi there");
    }

    #[test]
    fn adjacent_edits_are_fine() {
        let edits = vec![
            TextEdit::replace(range(0, 2), "x"),
            TextEdit::replace(range(2, 4), "y"),
            TextEdit::insert(4.into(), "!"),
        ];
        assert_eq!(apply_edits("abcd", &edits).unwrap(), "xy!");
    }

    #[test]
    fn rejects_overlaps() {
        let edits = vec![
            TextEdit::replace(range(0, 3), "x"),
            TextEdit::replace(range(2, 4), "y"),
        ];
        assert_eq!(
            apply_edits("abcd", &edits),
            Err(RefactorError::OverlappingEdits)
        );
        let inserts = vec![TextEdit::insert(1.into(), "a"), TextEdit::insert(1.into(), "b")];
        assert_eq!(
            apply_edits("abcd", &inserts),
            Err(RefactorError::OverlappingEdits)
        );
    }

    #[test]
    fn rejects_out_of_bounds() {
        let edits = vec![TextEdit::replace(range(2, 9), "x")];
        assert_eq!(apply_edits("abcd", &edits), Err(RefactorError::EditOutOfBounds));
        // Inside a multi-byte character.
        let edits = vec![TextEdit::replace(range(1, 2), "x")];
        assert_eq!(apply_edits("é", &edits), Err(RefactorError::EditOutOfBounds));
    }

    #[test]
    fn validate_reports_unknown_files() {
        let mut change = SourceChange::new(0);
        change.push(FileId(3), TextEdit::insert(0.into(), "x"));
        assert_eq!(change.edit_count(), 1);
        assert_eq!(change.validate(|_| None), Err(RefactorError::UnknownFile));
    }
}
