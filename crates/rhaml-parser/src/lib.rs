//! Tokenizer and parser for an indentation-structured HTML template
//! language.
//!
//! Templates are plain text where nesting is expressed by indentation
//! instead of closing tags. This crate turns template source into a
//! [`Document`] tree in two passes:
//!
//! 1. [`tokenize`] splits the source into logical lines, merging `|`
//!    continuations and multiline attribute lists, and assigns each line an
//!    indentation depth.
//! 2. [`parse`] builds the tree, parsing element headers, attribute lists,
//!    control blocks, comments, filters and doctype lines along the way.
//!
//! The crate is purely syntactic. It knows nothing about HTML output or
//! expression evaluation; those live in the engine crate that consumes the
//! [`Document`].
//!
//! ```
//! use rhaml_parser::{parse_document, Node};
//!
//! let doc = parse_document("%ul\n  %li one\n  %li two", 2).unwrap();
//! assert!(matches!(&doc.nodes[0], Node::Element(el) if el.tag == "ul"));
//! ```

mod ast;
mod error;
mod interpolate;
mod lexer;
mod parser;

pub use ast::{
    AttrValue, ControlBlock, ControlKind, Document, Element, ElseBranch, EscapeMode, FilterLine,
    Inline, Node, Pos, TextSegment, Trim,
};
pub use error::SyntaxError;
pub use interpolate::{is_dynamic, split as split_interpolations};
pub use lexer::{tokenize, LineKind, LogicalLine};
pub use parser::parse;

/// Tokenizes and parses template source in one step.
///
/// `tab_width` is the column width a tab character counts for when
/// measuring indentation.
///
/// # Errors
///
/// Returns the first [`SyntaxError`] found, with a 1-based line and column.
pub fn parse_document(text: &str, tab_width: usize) -> Result<Document, SyntaxError> {
    parse(&tokenize(text, tab_width)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_document_wires_both_passes() {
        let doc = parse_document("%p hi", 2).unwrap();
        assert_eq!(doc.nodes.len(), 1);
    }

    #[test]
    fn errors_carry_positions() {
        let err = parse_document("%p ok\n\t%b tab", 2).unwrap_err();
        assert_eq!(err.line, 2);
    }
}
