//! Attribute merging and serialization.
//!
//! Expression values are resolved by the renderer before they reach this
//! module; everything here works on plain strings and flags.

use crate::options::Options;
use crate::render::escape::escape_attr_into;

/// A single attribute value after expression resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Renders as `name="value"`.
    Text(String),
    /// A true boolean. Renders bare under HTML 5, expanded elsewhere.
    Flag,
    /// A false or nil value. The attribute is dropped entirely.
    Omit,
}

/// Merges shorthand id/classes with the resolved attribute list.
///
/// Class values concatenate, space-joined, shorthand first then list order.
/// The id and every other repeated attribute keep their first position but
/// take the last value. Omitted values drop the pair unless an earlier
/// occurrence survives.
pub fn merge(
    id: Option<&str>,
    classes: &[String],
    resolved: Vec<(String, Resolved)>,
) -> Vec<(String, Resolved)> {
    let mut class_parts: Vec<String> = classes.to_vec();
    let mut id_value: Option<Resolved> = id.map(|v| Resolved::Text(v.to_string()));
    let mut rest: Vec<(String, Resolved)> = Vec::new();

    for (name, value) in resolved {
        match name.as_str() {
            "class" => {
                if let Resolved::Text(text) = value {
                    if !text.is_empty() {
                        class_parts.push(text);
                    }
                }
            }
            "id" => {
                id_value = match value {
                    Resolved::Omit => id_value,
                    other => Some(other),
                };
            }
            _ => match rest.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = value,
                None => rest.push((name, value)),
            },
        }
    }

    let mut merged = Vec::with_capacity(rest.len() + 2);
    if let Some(value) = id_value {
        merged.push(("id".to_string(), value));
    }
    if !class_parts.is_empty() {
        merged.push(("class".to_string(), Resolved::Text(class_parts.join(" "))));
    }
    merged.extend(rest.into_iter().filter(|(_, v)| *v != Resolved::Omit));
    merged
}

/// Serializes merged attributes, leading space included.
pub fn write_attrs(out: &mut String, attrs: &[(String, Resolved)], options: &Options) {
    let q = options.attr_wrapper;
    for (name, value) in attrs {
        match value {
            Resolved::Text(text) => {
                out.push(' ');
                out.push_str(name);
                out.push('=');
                out.push(q);
                escape_attr_into(out, text, q);
                out.push(q);
            }
            Resolved::Flag => {
                out.push(' ');
                out.push_str(name);
                if !options.format.is_html5() {
                    out.push('=');
                    out.push(q);
                    out.push_str(name);
                    out.push(q);
                }
            }
            Resolved::Omit => {}
        }
    }
}
