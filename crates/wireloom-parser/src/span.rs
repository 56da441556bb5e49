//! Source positions.
//!
//! Two coordinate systems are used side by side:
//!
//! - [`Span`]: a half-open byte range, used while lexing and for labelling
//!   source snippets.
//! - [`Position`] / [`CodeRange`]: line/column coordinates handed to editor
//!   tooling. Lines are 1-based, columns are 0-based and counted in
//!   characters.

use std::ops::Range;

use serde::Serialize;

/// A half-open byte range in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a union of two spans (encompassing both)
    pub fn union(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A line/column location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 0-based column, counted in characters.
    pub column: usize,
    /// Absolute byte offset, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: Option<usize>) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    fn key(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

/// A pair of positions. `end` points just past the last character.
///
/// Both ends are treated as inclusive by [`CodeRange::contains`], so a
/// cursor sitting right after a token still selects it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CodeRange {
    pub start: Position,
    pub end: Position,
}

impl CodeRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Empty range at the very start of the text (line 1, column 0).
    pub fn start_of_input() -> Self {
        let start = Position::new(1, 0, Some(0));
        Self { start, end: start }
    }

    /// Returns `true` when `(line, column)` lies between `start` and `end`,
    /// both inclusive.
    pub fn contains(&self, line: usize, column: usize) -> bool {
        let point = (line, column);
        self.start.key() <= point && point <= self.end.key()
    }

    /// Smallest range covering both `self` and `other`.
    pub fn union(&self, other: CodeRange) -> CodeRange {
        let start = if other.start.key() < self.start.key() {
            other.start
        } else {
            self.start
        };
        let end = if other.end.key() > self.end.key() {
            other.end
        } else {
            self.end
        };
        CodeRange { start, end }
    }

    /// Byte span covered by this range. Empty when offsets are unknown.
    pub fn span(&self) -> Span {
        match (self.start.offset, self.end.offset) {
            (Some(start), Some(end)) if start <= end => Span::new(start..end),
            (Some(start), _) => Span::new(start..start),
            _ => Span::default(),
        }
    }
}

/// Byte offset to line/column conversion for one source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    pub fn new(source: &'src str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Position of a byte offset. Offsets past the end clamp to the end.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count());
        Position::new(line + 1, column, Some(offset))
    }

    pub fn range(&self, span: Span) -> CodeRange {
        CodeRange::new(self.position(span.start()), self.position(span.end()))
    }

    /// Leading whitespace of a 1-based line; empty for lines out of range.
    pub fn indentation(&self, line: usize) -> &'src str {
        let Some(&start) = line.checked_sub(1).and_then(|i| self.line_starts.get(i)) else {
            return "";
        };
        let rest = &self.source[start..];
        let width = rest
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(rest.len());
        &rest[..width]
    }
}
