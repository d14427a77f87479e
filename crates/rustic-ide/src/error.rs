//! Errors of the refactoring pipeline.

use std::fmt;

use rowan::TextRange;
use thiserror::Error;

use crate::workspace::FileId;

/// A reference the rewriter cannot handle, with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageDiagnostic {
    pub file: FileId,
    pub range: TextRange,
    pub message: String,
}

impl UsageDiagnostic {
    pub fn new(file: FileId, range: TextRange, message: impl Into<String>) -> Self {
        UsageDiagnostic {
            file,
            range,
            message: message.into(),
        }
    }
}

impl fmt::Display for UsageDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{}: {}",
            self.file.0,
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RefactorError {
    #[error("{0}")]
    NotApplicable(String),

    #[error("{} usage(s) cannot be converted", .0.len())]
    UnsupportedUsage(Vec<UsageDiagnostic>),

    #[error("the refactoring was cancelled")]
    Cancelled,

    #[error("the workspace changed (expected revision {expected}, found {found})")]
    StaleSnapshot { expected: u64, found: u64 },

    #[error("computed edits overlap")]
    OverlappingEdits,

    #[error("an edit lies outside its file")]
    EditOutOfBounds,

    #[error("unknown file")]
    UnknownFile,
}

impl RefactorError {
    /// The usage diagnostics carried by an `UnsupportedUsage` error.
    pub fn diagnostics(&self) -> &[UsageDiagnostic] {
        match self {
            RefactorError::UnsupportedUsage(diags) => diags,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::TextSize;

    #[test]
    fn messages_are_terse() {
        let diag = UsageDiagnostic::new(
            FileId(0),
            TextRange::new(TextSize::from(3), TextSize::from(7)),
            "used inside a macro",
        );
        let err = RefactorError::UnsupportedUsage(vec![diag.clone(), diag]);
        assert_eq!(err.to_string(), "2 usage(s) cannot be converted");
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(
            RefactorError::StaleSnapshot {
                expected: 1,
                found: 2
            }
            .to_string(),
            "the workspace changed (expected revision 1, found 2)"
        );
        assert!(RefactorError::Cancelled.diagnostics().is_empty());
    }
}
