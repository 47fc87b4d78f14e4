/// Position tracking for diagnostics
///
/// Stores the source location (line/column) of nodes for LSP features
/// like hover, go-to-definition, and error reporting.
/// A span representing a range in source code (0-indexed for LSP compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A position in source code (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Check if a position falls within this span
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_contains_is_inclusive() {
        let span = Span::new(Position::new(1, 4), Position::new(2, 0));
        assert!(span.contains(Position::new(1, 4)));
        assert!(span.contains(Position::new(1, 80)));
        assert!(span.contains(Position::new(2, 0)));
        assert!(!span.contains(Position::new(2, 1)));
        assert!(!span.contains(Position::new(0, 9)));
    }
}
