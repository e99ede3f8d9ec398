//! HTML escaping.

use std::borrow::Cow;

/// Appends `text` to `out`, replacing the four HTML-special characters.
pub fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Appends an attribute value, additionally escaping the quote character
/// wrapping the value. `"` is already in the default set, so this only
/// matters for a single-quote wrapper.
pub fn escape_attr_into(out: &mut String, text: &str, wrapper: char) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' if wrapper == '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

/// Escapes `text`, borrowing when nothing needs replacing.
pub fn escape(text: &str) -> Cow<'_, str> {
    if text.bytes().any(|b| matches!(b, b'&' | b'<' | b'>' | b'"')) {
        let mut out = String::with_capacity(text.len() + 8);
        escape_into(&mut out, text);
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    }
}
