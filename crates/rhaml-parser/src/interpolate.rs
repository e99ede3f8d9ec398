//! `#{...}` interpolation scanning.
//!
//! Splits a text run into literal and expression segments. Used by the
//! parser for text lines and inline element content, and again at render
//! time by filters that interpolate their raw bodies.

use crate::ast::{Pos, TextSegment};
use crate::error::SyntaxError;

/// Splits `text` into literal / interpolation segments.
///
/// `\#{` escapes the marker and yields a literal `#{`. Braces nest inside an
/// expression, and quoted strings inside an expression may contain unbalanced
/// braces. `pos` is the position of the first character of `text` and is used
/// both for error reporting and for the position recorded on each segment.
///
/// # Errors
///
/// Returns a [`SyntaxError`] when a `#{` has no matching `}`.
pub fn split(text: &str, pos: Pos) -> Result<Vec<TextSegment>, SyntaxError> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && matches_interp(bytes, i + 1) {
            literal.push_str("#{");
            i += 3;
            continue;
        }
        if matches_interp(bytes, i) {
            let open = i;
            i += 2;
            let mut depth = 1usize;
            let mut string_type = 0u8;
            let start = i;
            while i < bytes.len() && depth > 0 {
                let ch = bytes[i];
                if string_type != 0 {
                    match ch {
                        b'\\' => i += 1,
                        _ if ch == string_type => string_type = 0,
                        _ => {}
                    }
                } else {
                    match ch {
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        b'"' | b'\'' => string_type = ch,
                        _ => {}
                    }
                }
                if depth > 0 {
                    i += 1;
                }
            }
            if depth > 0 {
                return Err(SyntaxError::new(
                    Pos::new(pos.line, pos.col + open),
                    "unterminated interpolation",
                ));
            }
            if !literal.is_empty() {
                segments.push(TextSegment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(TextSegment::Interp {
                expr: text[start..i].trim().to_string(),
                pos: Pos::new(pos.line, pos.col + open),
            });
            i += 1; // past the closing brace
            continue;
        }
        // UTF-8 safe: copy the whole char, not just the byte.
        let ch = text[i..].chars().next().unwrap();
        literal.push(ch);
        i += ch.len_utf8();
    }

    if !literal.is_empty() {
        segments.push(TextSegment::Literal(literal));
    }
    Ok(segments)
}

/// Whether `text` contains any live (unescaped) interpolation marker.
pub fn is_dynamic(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if matches_interp(bytes, i) {
            return true;
        }
        i += 1;
    }
    false
}

fn matches_interp(bytes: &[u8], i: usize) -> bool {
    bytes.get(i) == Some(&b'#') && bytes.get(i + 1) == Some(&b'{')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(col: usize) -> Pos {
        Pos::new(1, col)
    }

    #[test]
    fn plain_text_is_one_literal() {
        let segs = split("hello world", at(1)).unwrap();
        assert_eq!(segs, vec![TextSegment::Literal("hello world".into())]);
    }

    #[test]
    fn splits_around_interpolation() {
        let segs = split("Hello #{name}!", at(1)).unwrap();
        assert_eq!(
            segs,
            vec![
                TextSegment::Literal("Hello ".into()),
                TextSegment::Interp {
                    expr: "name".into(),
                    pos: at(7),
                },
                TextSegment::Literal("!".into()),
            ]
        );
    }

    #[test]
    fn column_offsets_account_for_base_position() {
        let segs = split("#{x}", at(4)).unwrap();
        assert_eq!(
            segs,
            vec![TextSegment::Interp {
                expr: "x".into(),
                pos: at(4),
            }]
        );
    }

    #[test]
    fn escaped_marker_is_literal() {
        let segs = split(r"a \#{b} c", at(1)).unwrap();
        assert_eq!(segs, vec![TextSegment::Literal("a #{b} c".into())]);
    }

    #[test]
    fn nested_braces_stay_inside_the_expression() {
        let segs = split("#{a { b } c}", at(1)).unwrap();
        assert_eq!(
            segs,
            vec![TextSegment::Interp {
                expr: "a { b } c".into(),
                pos: at(1),
            }]
        );
    }

    #[test]
    fn braces_in_strings_do_not_close() {
        let segs = split("#{'}'}", at(1)).unwrap();
        assert_eq!(
            segs,
            vec![TextSegment::Interp {
                expr: "'}'".into(),
                pos: at(1),
            }]
        );
    }

    #[test]
    fn unterminated_interpolation_errors_with_position() {
        let err = split("ok #{broken", at(1)).unwrap_err();
        assert_eq!(err.col, 4);
        assert!(err.message.contains("unterminated interpolation"));
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(split("", at(1)).unwrap().is_empty());
    }

    #[test]
    fn dynamic_detection() {
        assert!(is_dynamic("a #{b}"));
        assert!(!is_dynamic("plain"));
        assert!(!is_dynamic(r"a \#{b}"));
    }

    #[test]
    fn multibyte_literals_survive() {
        let segs = split("héllo #{x}", at(1)).unwrap();
        assert_eq!(segs[0], TextSegment::Literal("héllo ".into()));
    }
}
