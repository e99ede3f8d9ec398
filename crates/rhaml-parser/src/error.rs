//! Construction-time error type.
//!
//! Everything that can go wrong while turning template text into a document
//! tree is reported as a [`SyntaxError`]. Render-time failures live in the
//! engine crate; a template that parses cleanly can still fail to render.

use crate::ast::Pos;

/// A syntax error in template source.
///
/// Always carries the 1-based line and column of the offending source
/// location. Raised during tokenizing or parsing; a failed parse never
/// produces a partial document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (line {line}, column {col})")]
pub struct SyntaxError {
    pub line: usize,
    pub col: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(pos: Pos, message: impl Into<String>) -> Self {
        Self {
            line: pos.line,
            col: pos.col,
            message: message.into(),
        }
    }

    /// Source position the error points at.
    pub fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            col: self.col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = SyntaxError::new(Pos { line: 3, col: 7 }, "inconsistent indentation");
        assert_eq!(
            err.to_string(),
            "inconsistent indentation (line 3, column 7)"
        );
    }
}
