//! The engine facade.

use rhaml_parser::{parse_document, SyntaxError};

use crate::error::{Error, RenderError};
use crate::options::Options;
use crate::program::{compile, validate, Program};
use crate::render::execute;
use crate::scope::{Locals, Scope};

/// A compiled template.
///
/// Construction parses and compiles the template text once; the result is
/// immutable and can be rendered any number of times, from any number of
/// threads, each render only reading the shared program.
///
/// ```
/// use rhaml::{Engine, Locals, MapScope, Options};
/// use serde_json::json;
///
/// let engine = Engine::new("%p Hello #{name}", Options::default()).unwrap();
/// let mut scope = MapScope::new();
/// scope.insert("name", json!("World"));
/// let html = engine.render(&scope, Locals::new()).unwrap();
/// assert_eq!(html, "<p>Hello World</p>\n");
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    program: Program,
    options: Options,
}

impl Engine {
    /// Parses and compiles `template`.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] with a 1-based line and column for any
    /// malformed input: bad indentation, unbalanced attribute lists,
    /// dangling `- else`, empty filter bodies, content in void elements.
    pub fn new(template: &str, options: Options) -> Result<Self, SyntaxError> {
        let doc = parse_document(template, options.default_indent_depth)?;
        validate(&doc)?;
        let program = compile(doc);
        tracing::debug!(instructions = program.instrs.len(), "template compiled");
        Ok(Engine { program, options })
    }

    /// The options this engine was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Renders the template against `scope` with per-call `locals`.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when an expression can't be resolved, a
    /// filter name is unknown, or a loop target isn't iterable. A failed
    /// render produces no output.
    pub fn render(&self, scope: &dyn Scope, locals: Locals) -> Result<String, RenderError> {
        let output = execute(&self.program, scope, locals, &self.options)?;
        tracing::debug!(bytes = output.len(), "template rendered");
        Ok(output)
    }
}

/// Parses, compiles and renders in one step.
///
/// For repeated rendering of the same template, build an [`Engine`] once
/// instead.
pub fn render_str(
    template: &str,
    options: Options,
    scope: &dyn Scope,
    locals: Locals,
) -> Result<String, Error> {
    let engine = Engine::new(template, options)?;
    Ok(engine.render(scope, locals)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::MapScope;
    use serde_json::json;

    #[test]
    fn construct_rejects_bad_templates() {
        assert!(Engine::new("%p ok\n    %b jump", Options::default()).is_err());
        assert!(Engine::new("%img content", Options::default()).is_err());
    }

    #[test]
    fn render_str_round_trip() {
        let mut scope = MapScope::new();
        scope.insert("name", json!("World"));
        let html = render_str("%p Hello #{name}", Options::default(), &scope, Locals::new())
            .unwrap();
        assert_eq!(html, "<p>Hello World</p>\n");
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
