//! The document tree.
//!
//! A parsed template is an immutable tree of [`Node`] values whose nesting
//! mirrors the indentation of the source. Nodes own their children
//! exclusively; the tree is acyclic and freely shareable once built.
//!
//! Expressions are never evaluated here. Every dynamic part of the tree
//! (interpolations, attribute values, code lines, control conditions) is
//! stored as source text plus its position, to be resolved per render by the
//! engine crate.

use std::fmt;

/// A 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

/// One piece of a text run: either literal text or an embedded `#{...}`
/// expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    Literal(String),
    Interp { expr: String, pos: Pos },
}

/// Whether a rendered value gets HTML-escaped.
///
/// `Default` follows the engine-wide `escape_html` option; `Always` and
/// `Never` come from the `&=` / `!=` (or `&` / `!`) markers and win over the
/// option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeMode {
    #[default]
    Default,
    Always,
    Never,
}

/// Whitespace-trim modifiers attached to an element header.
///
/// `outer` (`>`) removes the newline-plus-indent runs around the tag itself;
/// `inner` (`<`) removes them just inside the tag. Recorded at parse time,
/// applied by the renderer, since trimming depends on adjacent siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Trim {
    pub outer: bool,
    pub inner: bool,
}

/// An attribute value as written in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Quoted string literal.
    Literal(String),
    /// Bare boolean attribute (`%input{checked: true}` or `(checked)`).
    Flag,
    /// Expression evaluated against the scope per render.
    Expr { expr: String, pos: Pos },
}

/// Inline content on an element header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// `%p some #{text}`
    Text {
        segments: Vec<TextSegment>,
        escape: EscapeMode,
    },
    /// `%p= expr` (or `%p~ expr` with `preserve`)
    Output {
        expr: String,
        escape: EscapeMode,
        preserve: bool,
        pos: Pos,
    },
}

/// An element node: tag name, shorthand id/classes, attribute list, trim
/// flags and either inline content or nested children (never both).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, AttrValue)>,
    pub self_closing: bool,
    pub trim: Trim,
    pub inline: Option<Inline>,
    pub children: Vec<Node>,
    pub pos: Pos,
}

/// The kind of a control block, with its parsed head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    If { cond: String },
    Unless { cond: String },
    While { cond: String },
    For { bindings: Vec<String>, iterable: String },
}

/// An `- elsif cond` / `- else` branch following a control block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElseBranch {
    /// `Some` for `elsif`, `None` for the final `else`.
    pub cond: Option<String>,
    pub pos: Pos,
    pub children: Vec<Node>,
}

/// A control block and its alternative branches.
///
/// Branches always immediately follow the primary block at the same depth;
/// the parser rejects a dangling `- else` with no opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlBlock {
    pub kind: ControlKind,
    pub pos: Pos,
    pub children: Vec<Node>,
    pub else_branches: Vec<ElseBranch>,
}

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text {
        segments: Vec<TextSegment>,
        escape: EscapeMode,
        pos: Pos,
    },
    /// `= expr` — evaluated, result appended to output.
    CodeOutput {
        expr: String,
        escape: EscapeMode,
        preserve: bool,
        pos: Pos,
    },
    /// `- expr` — evaluated for side effect, result discarded.
    CodeSilent { expr: String, pos: Pos },
    Control(ControlBlock),
    /// Visible `/ ...` comment. Silent `-#` comments never enter the tree.
    Comment {
        /// Condition of a `/[if IE]` downlevel-revealed comment.
        condition: Option<String>,
        inline: Option<String>,
        children: Vec<Node>,
        pos: Pos,
    },
    /// `:name` filter block; the body is raw, unparsed text.
    Filter {
        name: String,
        body: Vec<FilterLine>,
        pos: Pos,
    },
    /// `!!! variant`
    Doctype { variant: String, pos: Pos },
}

impl Node {
    /// Source position of the node's first line.
    pub fn pos(&self) -> Pos {
        match self {
            Node::Element(el) => el.pos,
            Node::Text { pos, .. }
            | Node::CodeOutput { pos, .. }
            | Node::CodeSilent { pos, .. }
            | Node::Comment { pos, .. }
            | Node::Filter { pos, .. }
            | Node::Doctype { pos, .. } => *pos,
            Node::Control(block) => block.pos,
        }
    }
}

/// One raw line of a filter body, with the position of its first
/// character in the source. Relative indentation is already baked into
/// `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterLine {
    pub text: String,
    pub pos: Pos,
}

/// A fully parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub nodes: Vec<Node>,
}
