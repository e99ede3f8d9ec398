//! Render program execution.
//!
//! [`execute`] walks a compiled [`Program`] depth first against one
//! [`Scope`] and produces the output buffer. Everything here is per-call
//! state; the program itself is never mutated, which is what makes one
//! engine shareable across concurrent renders.

pub mod attributes;
pub mod doctype;
pub mod escape;
pub mod filters;

use rhaml_parser::{AttrValue, EscapeMode, FilterLine, Pos, TextSegment};
use serde_json::Value;

use crate::error::RenderError;
use crate::options::Options;
use crate::program::{Arm, Cond, ElementInstr, Instr, Program};
use crate::scope::{is_truthy, Locals, Scope, ScopeError};

use self::attributes::Resolved;

/// Runs a compiled program and returns the rendered output.
pub fn execute(
    program: &Program,
    scope: &dyn Scope,
    locals: Locals,
    options: &Options,
) -> Result<String, RenderError> {
    let mut ctx = Ctx {
        scope,
        locals,
        options,
        out: String::new(),
        depth: 0,
        join_next: false,
    };
    ctx.run(&program.instrs)?;
    Ok(ctx.out)
}

/// Per-render mutable state.
struct Ctx<'a> {
    scope: &'a dyn Scope,
    locals: Locals,
    options: &'a Options,
    out: String,
    depth: usize,
    /// Set by an outer-trimmed element boundary: the next emitted line
    /// joins the previous one instead of starting fresh.
    join_next: bool,
}

impl Ctx<'_> {
    fn run(&mut self, instrs: &[Instr]) -> Result<(), RenderError> {
        for instr in instrs {
            self.exec(instr)?;
        }
        Ok(())
    }

    fn exec(&mut self, instr: &Instr) -> Result<(), RenderError> {
        match instr {
            Instr::Doctype { variant, .. } => {
                if let Some(decl) = doctype::doctype(variant, self.options) {
                    self.emit_line(&decl);
                }
                Ok(())
            }
            Instr::Text {
                segments, escape, ..
            } => {
                let text = self.render_segments(segments, *escape)?;
                self.emit_line(&text);
                Ok(())
            }
            Instr::Output {
                expr,
                escape,
                preserve,
                pos,
            } => {
                let text = self.eval_to_text(expr, *pos, *escape, *preserve)?;
                self.emit_line(&text);
                Ok(())
            }
            Instr::Silent { expr, pos } => {
                self.eval(expr, *pos)?;
                Ok(())
            }
            Instr::Element(el) => self.exec_element(el),
            Instr::Branch { arms, .. } => self.exec_branch(arms),
            Instr::While { cond, body, .. } => {
                while self.eval_cond(cond)? {
                    self.run(body)?;
                }
                Ok(())
            }
            Instr::Loop {
                bindings,
                iterable,
                body,
                pos,
            } => self.exec_loop(bindings, iterable, body, *pos),
            Instr::Comment {
                condition,
                inline,
                body,
                ..
            } => self.exec_comment(condition.as_deref(), inline.as_deref(), body),
            Instr::Filter { name, body, pos } => self.exec_filter(name, body, *pos),
        }
    }

    // -- lines ------------------------------------------------------------

    fn emit_line(&mut self, text: &str) {
        if self.join_next {
            self.join_next = false;
            if self.out.ends_with('\n') {
                self.out.pop();
            }
        } else if !text.is_empty() {
            for _ in 0..self.depth * self.options.default_indent_depth {
                self.out.push(' ');
            }
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    // -- expressions ------------------------------------------------------

    fn eval(&self, expr: &str, pos: Pos) -> Result<Value, RenderError> {
        self.scope
            .resolve(expr, &self.locals)
            .map_err(|err| self.unresolved(expr, pos, err))
    }

    fn unresolved(&self, expr: &str, pos: Pos, err: ScopeError) -> RenderError {
        RenderError::UnresolvedExpression {
            expr: expr.to_string(),
            message: err.message,
            line: pos.line,
            col: pos.col,
        }
    }

    fn eval_cond(&self, cond: &Cond) -> Result<bool, RenderError> {
        let value = self.eval(&cond.expr, cond.pos)?;
        Ok(is_truthy(&value) != cond.negate)
    }

    fn eval_to_text(
        &self,
        expr: &str,
        pos: Pos,
        escape: EscapeMode,
        preserve: bool,
    ) -> Result<String, RenderError> {
        let value = self.eval(expr, pos)?;
        let mut text = value_to_text(&value);
        if self.should_escape(escape) {
            text = escape::escape(&text).into_owned();
        }
        if preserve {
            text = text.replace('\n', "&#x000A;");
        }
        Ok(text)
    }

    fn should_escape(&self, mode: EscapeMode) -> bool {
        match mode {
            EscapeMode::Default => self.options.escape_html,
            EscapeMode::Always => true,
            EscapeMode::Never => false,
        }
    }

    /// Renders text segments. Under `Default` and `Never` the escape mode
    /// governs interpolated values only and literal text passes through
    /// untouched; `Always` force-escapes the whole run, literals included.
    fn render_segments(
        &self,
        segments: &[TextSegment],
        escape: EscapeMode,
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        for segment in segments {
            match segment {
                TextSegment::Literal(text) => match escape {
                    EscapeMode::Always => escape::escape_into(&mut out, text),
                    EscapeMode::Default | EscapeMode::Never => out.push_str(text),
                },
                TextSegment::Interp { expr, pos } => {
                    out.push_str(&self.eval_to_text(expr, *pos, escape, false)?);
                }
            }
        }
        Ok(out)
    }

    // -- elements ---------------------------------------------------------

    fn exec_element(&mut self, el: &ElementInstr) -> Result<(), RenderError> {
        let mut open = String::with_capacity(el.tag.len() + 16);
        open.push('<');
        open.push_str(&el.tag);
        let resolved = self.resolve_attrs(&el.attrs)?;
        let merged = attributes::merge(el.id.as_deref(), &el.classes, resolved);
        attributes::write_attrs(&mut open, &merged, self.options);

        if el.trim.outer {
            self.join_next = true;
        }

        if el.void || el.self_closing {
            open.push_str(if self.options.format.is_xhtml() {
                " />"
            } else {
                ">"
            });
            self.emit_line(&open);
        } else if let Some(inline) = &el.inline {
            open.push('>');
            let content = match inline {
                rhaml_parser::Inline::Text { segments, escape } => {
                    self.render_segments(segments, *escape)?
                }
                rhaml_parser::Inline::Output {
                    expr,
                    escape,
                    preserve,
                    pos,
                } => {
                    let preserve = *preserve || self.options.preserves(&el.tag);
                    self.eval_to_text(expr, *pos, *escape, preserve)?
                }
            };
            open.push_str(&content);
            open.push_str("</");
            open.push_str(&el.tag);
            open.push('>');
            self.emit_line(&open);
        } else if el.body.is_empty() {
            open.push_str("></");
            open.push_str(&el.tag);
            open.push('>');
            self.emit_line(&open);
        } else if self.options.preserves(&el.tag) {
            // Preserved content keeps its own whitespace: no indentation,
            // closing tag glued to the last content line.
            let mut inner = self.sub_render(&el.body)?;
            if inner.ends_with('\n') {
                inner.pop();
            }
            open.push('>');
            open.push_str(&inner);
            open.push_str("</");
            open.push_str(&el.tag);
            open.push('>');
            self.emit_line(&open);
        } else if el.trim.inner {
            let mut inner = self.sub_render(&el.body)?;
            while inner.ends_with('\n') || inner.ends_with(' ') {
                inner.pop();
            }
            open.push('>');
            open.push_str(&inner);
            open.push_str("</");
            open.push_str(&el.tag);
            open.push('>');
            self.emit_line(&open);
        } else {
            open.push('>');
            self.emit_line(&open);
            self.depth += 1;
            self.run(&el.body)?;
            self.depth -= 1;
            self.emit_line(&format!("</{}>", el.tag));
        }

        if el.trim.outer {
            self.join_next = true;
        }
        Ok(())
    }

    /// Renders instructions into a fresh buffer at depth zero, sharing the
    /// current locals.
    fn sub_render(&mut self, instrs: &[Instr]) -> Result<String, RenderError> {
        let mut sub = Ctx {
            scope: self.scope,
            locals: self.locals.clone(),
            options: self.options,
            out: String::new(),
            depth: 0,
            join_next: false,
        };
        sub.run(instrs)?;
        Ok(sub.out)
    }

    fn resolve_attrs(
        &self,
        attrs: &[(String, AttrValue)],
    ) -> Result<Vec<(String, Resolved)>, RenderError> {
        attrs
            .iter()
            .map(|(name, value)| {
                let resolved = match value {
                    AttrValue::Literal(text) => Resolved::Text(text.clone()),
                    AttrValue::Flag => Resolved::Flag,
                    AttrValue::Expr { expr, pos } => match self.eval(expr, *pos)? {
                        Value::Null | Value::Bool(false) => Resolved::Omit,
                        Value::Bool(true) => Resolved::Flag,
                        other => Resolved::Text(value_to_text(&other)),
                    },
                };
                Ok((name.clone(), resolved))
            })
            .collect()
    }

    // -- control flow -----------------------------------------------------

    fn exec_branch(&mut self, arms: &[Arm]) -> Result<(), RenderError> {
        for arm in arms {
            let taken = match &arm.cond {
                Some(cond) => self.eval_cond(cond)?,
                None => true,
            };
            if taken {
                return self.run(&arm.body);
            }
        }
        Ok(())
    }

    fn exec_loop(
        &mut self,
        bindings: &[String],
        iterable: &str,
        body: &[Instr],
        pos: Pos,
    ) -> Result<(), RenderError> {
        let target = self.eval(iterable, pos)?;
        let loop_error = |message: String| RenderError::LoopTarget {
            expr: iterable.to_string(),
            message,
            line: pos.line,
            col: pos.col,
        };

        self.locals.push_frame();
        let result = (|| {
            match &target {
                Value::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        match bindings {
                            [var] => self.locals.set(var.clone(), item.clone()),
                            [index_var, var] => {
                                self.locals.set(index_var.clone(), Value::from(index));
                                self.locals.set(var.clone(), item.clone());
                            }
                            _ => {}
                        }
                        self.run(body)?;
                    }
                }
                Value::Object(map) => {
                    for (key, value) in map {
                        match bindings {
                            [var] => self.locals.set(var.clone(), Value::String(key.clone())),
                            [key_var, value_var] => {
                                self.locals
                                    .set(key_var.clone(), Value::String(key.clone()));
                                self.locals.set(value_var.clone(), value.clone());
                            }
                            _ => {}
                        }
                        self.run(body)?;
                    }
                }
                other => {
                    return Err(loop_error(format!(
                        "expected an array or object, got {}",
                        json_kind(other)
                    )));
                }
            }
            Ok(())
        })();
        self.locals.pop_frame();
        result
    }

    // -- comments and filters ---------------------------------------------

    fn exec_comment(
        &mut self,
        condition: Option<&str>,
        inline: Option<&str>,
        body: &[Instr],
    ) -> Result<(), RenderError> {
        let (open, close) = match condition {
            Some(cond) => (format!("<!--[{cond}]>"), "<![endif]-->".to_string()),
            None => ("<!--".to_string(), "-->".to_string()),
        };
        if let Some(text) = inline {
            self.emit_line(&format!("{open} {text} {close}"));
        } else {
            self.emit_line(&open);
            self.depth += 1;
            self.run(body)?;
            self.depth -= 1;
            self.emit_line(&close);
        }
        Ok(())
    }

    fn exec_filter(
        &mut self,
        name: &str,
        body: &[FilterLine],
        pos: Pos,
    ) -> Result<(), RenderError> {
        // The escaped filter escapes the whole body at once, so its
        // interpolations resolve raw first.
        let segment_escape = if name == "escaped" {
            EscapeMode::Never
        } else {
            EscapeMode::Default
        };
        let mut lines = Vec::with_capacity(body.len());
        for line in body {
            let segments = rhaml_parser::split_interpolations(&line.text, line.pos)
                .map_err(|err| RenderError::UnresolvedExpression {
                    expr: line.text.clone(),
                    message: format!("malformed interpolation in filter body: {}", err.message),
                    line: err.line,
                    col: err.col,
                })?;
            lines.push(self.render_segments(&segments, segment_escape)?);
        }
        let rendered = filters::apply(name, &lines, self.options).ok_or_else(|| {
            RenderError::UnknownFilter {
                name: name.to_string(),
                line: pos.line,
                col: pos.col,
            }
        })?;
        for line in rendered {
            if line.is_empty() {
                self.out.push('\n');
            } else {
                self.emit_line(&line);
            }
        }
        Ok(())
    }
}

/// Output formatting for resolved values. `null` disappears, strings are
/// verbatim, everything else uses its JSON text.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_text_forms() {
        assert_eq!(value_to_text(&Value::Null), "");
        assert_eq!(value_to_text(&json!("hi")), "hi");
        assert_eq!(value_to_text(&json!(3)), "3");
        assert_eq!(value_to_text(&json!(true)), "true");
        assert_eq!(value_to_text(&json!([1, 2])), "[1,2]");
    }
}
