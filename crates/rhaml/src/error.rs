//! Error types for template rendering.
//!
//! Construction-time problems surface as [`SyntaxError`] (re-exported from
//! the parser crate); everything that can only be discovered while rendering
//! against live data is a [`RenderError`]. [`Error`] unifies the two for
//! callers that parse and render in one step.

use rhaml_parser::SyntaxError;
use thiserror::Error;

/// Error raised while rendering a compiled template against a scope.
///
/// Every variant carries the 1-based source position of the template
/// expression that failed, so callers can point users back at the template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The scope could not resolve an expression referenced by the template.
    #[error("can't resolve `{expr}`: {message} (line {line}, column {col})")]
    UnresolvedExpression {
        expr: String,
        message: String,
        line: usize,
        col: usize,
    },

    /// A `:name` filter block named a filter the engine doesn't know.
    #[error("unknown filter `{name}` (line {line}, column {col})")]
    UnknownFilter {
        name: String,
        line: usize,
        col: usize,
    },

    /// A loop expression evaluated to something that can't be iterated.
    #[error("can't iterate over `{expr}`: {message} (line {line}, column {col})")]
    LoopTarget {
        expr: String,
        message: String,
        line: usize,
        col: usize,
    },
}

impl RenderError {
    /// The 1-based template position where the failing construct appears.
    pub fn pos(&self) -> (usize, usize) {
        match self {
            RenderError::UnresolvedExpression { line, col, .. }
            | RenderError::UnknownFilter { line, col, .. }
            | RenderError::LoopTarget { line, col, .. } => (*line, *col),
        }
    }
}

/// Combined error for one-shot parse-and-render entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// The template source failed to parse or compile.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The template parsed but couldn't be rendered against the given data.
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_display_includes_position() {
        let err = RenderError::UnknownFilter {
            name: "markdown".into(),
            line: 4,
            col: 1,
        };
        let text = err.to_string();
        assert!(text.contains("markdown"));
        assert!(text.contains("line 4"));
    }

    #[test]
    fn unified_error_wraps_both_sides() {
        let syn: Error = SyntaxError::new(rhaml_parser::Pos::new(1, 1), "bad").into();
        assert!(matches!(syn, Error::Syntax(_)));
        let ren: Error = RenderError::UnknownFilter {
            name: "x".into(),
            line: 1,
            col: 1,
        }
        .into();
        assert!(matches!(ren, Error::Render(_)));
    }
}
