use serde::Serialize;

/// Half-open byte range `start..end` in a source file.
///
/// Lexer and parser positions are always byte offsets; [`LineIndex`] turns
/// them into line and column numbers for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start ({start}) must be <= end ({end})");
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Like a range check, but `end` counts: a caret right after the last
    /// character is still on the token.
    pub fn touches(&self, offset: u32) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Line starts of one text, for offset to line/column conversion.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Never empty; line 1 starts at 0.
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i as u32 + 1))
            .collect();
        Self { line_starts }
    }

    /// 1-based line and byte column of `offset`.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        (line as u32 + 1, offset - self.line_starts[line] + 1)
    }

    /// Inverse of [`LineIndex::line_col`]. `None` for a missing line; the
    /// column is not checked against the line length.
    pub fn offset(&self, line: u32, col: u32) -> Option<u32> {
        if line == 0 || col == 0 {
            return None;
        }
        let start = *self.line_starts.get(line as usize - 1)?;
        Some(start + col - 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_arithmetic() {
        let span = Span::new(5, 10);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::new(4, 4).is_empty());
        assert_eq!(span.merge(Span::new(8, 15)), Span::new(5, 15));
    }

    #[test]
    fn span_touches_is_end_inclusive() {
        let span = Span::new(3, 6);
        assert!(span.touches(3));
        assert!(span.touches(6));
        assert!(!span.touches(7));
        assert!(!span.touches(2));
    }

    #[test]
    fn line_col_per_line() {
        let idx = LineIndex::new("fn a()\n{}\n\nb");
        assert_eq!(idx.line_count(), 4);
        assert_eq!(idx.line_col(0), (1, 1));
        assert_eq!(idx.line_col(7), (2, 1));
        assert_eq!(idx.line_col(8), (2, 2));
        assert_eq!(idx.line_col(11), (4, 1));
    }

    #[test]
    fn line_index_offset_roundtrips_line_col() {
        let src = "struct S {\n    a: i32,\n}\n";
        let idx = LineIndex::new(src);
        assert_eq!(idx.offset(2, 5), Some(15));
        assert_eq!(idx.line_col(15), (2, 5));
        assert_eq!(idx.offset(9, 1), None);
        assert_eq!(idx.offset(0, 1), None);
    }
}
