//! HTML rendering engine for an indentation-structured template language.
//!
//! Templates describe an HTML document by indentation instead of closing
//! tags:
//!
//! ```text
//! %ul#nav
//!   - for item in items
//!     %li.entry= item.title
//! ```
//!
//! A template compiles once into an [`Engine`] and then renders any number
//! of times against a [`Scope`], a caller-supplied resolver that gives
//! every `= expr`, `#{expr}` and condition its value. [`MapScope`] covers
//! the common case of a flat map of [`serde_json::Value`]s.
//!
//! ```
//! use rhaml::{Engine, Locals, MapScope, Options};
//! use serde_json::json;
//!
//! let engine = Engine::new(
//!     "%ul\n  - for item in items\n    %li= item",
//!     Options::default(),
//! ).unwrap();
//!
//! let mut scope = MapScope::new();
//! scope.insert("items", json!(["one", "two"]));
//!
//! let html = engine.render(&scope, Locals::new()).unwrap();
//! assert_eq!(html, "<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>\n");
//! ```
//!
//! Parsing lives in the `rhaml-parser` crate; this crate compiles its
//! document tree into a render program and executes that program per call.
//! Construction errors are [`SyntaxError`]s with template positions;
//! render-time failures (unresolved names, unknown filters, bad loop
//! targets) are [`RenderError`]s.

mod engine;
mod error;
mod options;
mod program;
mod render;
mod scope;

pub use engine::{render_str, Engine};
pub use error::{Error, RenderError};
pub use options::{Format, Options};
pub use program::{Instr, Program};
pub use render::escape::escape;
pub use rhaml_parser::{Document, FilterLine, Node, Pos, SyntaxError};
pub use scope::{is_truthy, Locals, MapScope, Scope, ScopeError};
