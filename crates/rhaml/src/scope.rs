//! Expression resolution.
//!
//! Templates don't embed a scripting language. Every `= expr`, attribute
//! expression and condition is handed as an opaque string to a caller
//! supplied [`Scope`], together with the current [`Locals`]. The scope
//! decides what the expression means and returns a [`serde_json::Value`].
//!
//! [`MapScope`] is the built-in implementation: a flat map of named values
//! plus support for literals, `!` negation and dotted path traversal. It
//! covers most templates; anything richer (method calls, arithmetic) needs
//! a custom [`Scope`].

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

/// Why a scope could not produce a value for an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ScopeError {
    pub message: String,
}

impl ScopeError {
    pub fn new(message: impl Into<String>) -> Self {
        ScopeError {
            message: message.into(),
        }
    }
}

/// Resolves template expressions to values.
///
/// Implementations must be thread safe so a compiled template can be shared
/// across threads and rendered concurrently.
pub trait Scope: Send + Sync {
    /// Evaluates `expr` and returns its value.
    ///
    /// `locals` holds loop bindings and per-render locals; implementations
    /// should consult it before their own data so that loop variables shadow
    /// outer names.
    fn resolve(&self, expr: &str, locals: &Locals) -> Result<Value, ScopeError>;
}

/// A stack of name-to-value frames.
///
/// The base frame holds per-render locals passed by the caller. Each loop
/// iteration pushes a frame with its bindings, so inner bindings shadow
/// outer ones and disappear when the loop ends.
#[derive(Debug, Clone, Default)]
pub struct Locals {
    frames: Vec<HashMap<String, Value>>,
}

impl Locals {
    /// An empty locals stack with one base frame.
    pub fn new() -> Self {
        Locals {
            frames: vec![HashMap::new()],
        }
    }

    /// Seeds the base frame from an existing map.
    pub fn from_map(map: HashMap<String, Value>) -> Self {
        Locals { frames: vec![map] }
    }

    /// Sets `name` in the innermost frame.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        if self.frames.is_empty() {
            self.frames.push(HashMap::new());
        }
        self.frames
            .last_mut()
            .map(|frame| frame.insert(name.into(), value));
    }

    /// Looks `name` up from the innermost frame outwards.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub(crate) fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub(crate) fn pop_frame(&mut self) {
        self.frames.pop();
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Locals {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Locals::from_map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Whether a value counts as true in a condition.
///
/// Only `null` and `false` are falsy; `0`, `""` and empty collections are
/// truthy.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// The built-in map-backed scope.
///
/// Supported expression forms:
///
/// - string literals in single or double quotes
/// - integer and float literals, `true`, `false`, `nil` and `null`
/// - bare names, looked up in the locals first and then the map
/// - dotted paths (`user.address.city`) traversing objects, with numeric
///   segments indexing into arrays
/// - `!expr`, negating the truthiness of any of the above
///
/// Anything else, method calls in particular, is a [`ScopeError`].
#[derive(Debug, Clone, Default)]
pub struct MapScope {
    values: HashMap<String, Value>,
}

impl MapScope {
    pub fn new() -> Self {
        MapScope::default()
    }

    /// Inserts a value, replacing any previous binding of `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    fn lookup_root(&self, name: &str, locals: &Locals) -> Option<Value> {
        locals
            .get(name)
            .or_else(|| self.values.get(name))
            .cloned()
    }
}

impl FromIterator<(String, Value)> for MapScope {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        MapScope {
            values: iter.into_iter().collect(),
        }
    }
}

impl Scope for MapScope {
    fn resolve(&self, expr: &str, locals: &Locals) -> Result<Value, ScopeError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(ScopeError::new("empty expression"));
        }

        if let Some(inner) = expr.strip_prefix('!') {
            let value = self.resolve(inner, locals)?;
            return Ok(Value::Bool(!is_truthy(&value)));
        }

        if let Some(lit) = parse_literal(expr) {
            return Ok(lit);
        }

        if expr.contains('(') {
            return Err(ScopeError::new(
                "method calls are not supported by the map scope",
            ));
        }

        let mut parts = expr.split('.');
        let root = parts.next().unwrap_or_default();
        if !is_identifier(root) {
            return Err(ScopeError::new(format!("malformed expression `{}`", expr)));
        }
        let mut current = self
            .lookup_root(root, locals)
            .ok_or_else(|| ScopeError::new(format!("`{}` is not defined", root)))?;

        for part in parts {
            current = match &current {
                Value::Object(map) => map.get(part).cloned().ok_or_else(|| {
                    ScopeError::new(format!("`{}` has no member `{}`", expr, part))
                })?,
                Value::Array(items) => {
                    let index: usize = part.parse().map_err(|_| {
                        ScopeError::new(format!("`{}` is not an array index in `{}`", part, expr))
                    })?;
                    items.get(index).cloned().ok_or_else(|| {
                        ScopeError::new(format!("index {} out of bounds in `{}`", index, expr))
                    })?
                }
                other => {
                    return Err(ScopeError::new(format!(
                        "can't take `{}` of {} in `{}`",
                        part,
                        type_name(other),
                        expr
                    )));
                }
            };
        }
        Ok(current)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_literal(expr: &str) -> Option<Value> {
    match expr {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "nil" | "null" => return Some(Value::Null),
        _ => {}
    }
    let bytes = expr.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'"' || bytes[0] == b'\'') && bytes[bytes.len() - 1] == bytes[0]
    {
        return Some(Value::String(expr[1..expr.len() - 1].to_string()));
    }
    if bytes[0].is_ascii_digit() || (bytes[0] == b'-' && bytes.len() > 1) {
        if let Ok(n) = expr.parse::<i64>() {
            return Some(Value::Number(n.into()));
        }
        if let Ok(f) = expr.parse::<f64>() {
            return serde_json::Number::from_f64(f).map(Value::Number);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scope() -> MapScope {
        let mut s = MapScope::new();
        s.insert("name", json!("World"));
        s.insert("count", json!(3));
        s.insert("user", json!({"address": {"city": "Leiden"}, "tags": ["a", "b"]}));
        s.insert("flag", json!(false));
        s
    }

    #[test]
    fn bare_name() {
        assert_eq!(
            scope().resolve("name", &Locals::new()).unwrap(),
            json!("World")
        );
    }

    #[test]
    fn locals_shadow_scope_values() {
        let mut locals = Locals::new();
        locals.set("name", json!("shadowed"));
        assert_eq!(
            scope().resolve("name", &locals).unwrap(),
            json!("shadowed")
        );
    }

    #[test]
    fn frames_pop_cleanly() {
        let mut locals = Locals::new();
        locals.set("x", json!(1));
        locals.push_frame();
        locals.set("x", json!(2));
        assert_eq!(locals.get("x"), Some(&json!(2)));
        locals.pop_frame();
        assert_eq!(locals.get("x"), Some(&json!(1)));
    }

    #[test]
    fn dotted_path_into_objects() {
        assert_eq!(
            scope().resolve("user.address.city", &Locals::new()).unwrap(),
            json!("Leiden")
        );
    }

    #[test]
    fn dotted_path_into_arrays() {
        assert_eq!(
            scope().resolve("user.tags.1", &Locals::new()).unwrap(),
            json!("b")
        );
    }

    #[test]
    fn missing_member_is_an_error() {
        let err = scope()
            .resolve("user.address.zip", &Locals::new())
            .unwrap_err();
        assert!(err.message.contains("no member"));
    }

    #[test]
    fn undefined_root_is_an_error() {
        let err = scope().resolve("missing", &Locals::new()).unwrap_err();
        assert!(err.message.contains("not defined"));
    }

    #[test]
    fn literals() {
        let s = scope();
        let l = Locals::new();
        assert_eq!(s.resolve("'hi'", &l).unwrap(), json!("hi"));
        assert_eq!(s.resolve("\"hi\"", &l).unwrap(), json!("hi"));
        assert_eq!(s.resolve("42", &l).unwrap(), json!(42));
        assert_eq!(s.resolve("-1", &l).unwrap(), json!(-1));
        assert_eq!(s.resolve("2.5", &l).unwrap(), json!(2.5));
        assert_eq!(s.resolve("true", &l).unwrap(), json!(true));
        assert_eq!(s.resolve("nil", &l).unwrap(), Value::Null);
    }

    #[test]
    fn negation_inverts_truthiness() {
        let s = scope();
        let l = Locals::new();
        assert_eq!(s.resolve("!flag", &l).unwrap(), json!(true));
        assert_eq!(s.resolve("!name", &l).unwrap(), json!(false));
        assert_eq!(s.resolve("!!flag", &l).unwrap(), json!(false));
    }

    #[test]
    fn method_calls_are_rejected() {
        let err = scope()
            .resolve("name.upcase()", &Locals::new())
            .unwrap_err();
        assert!(err.message.contains("method calls"));
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!(0)));
        assert!(is_truthy(&json!("")));
        assert!(is_truthy(&json!([])));
    }
}
