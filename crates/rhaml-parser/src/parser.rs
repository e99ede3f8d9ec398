//! Parser: logical lines to the document tree.
//!
//! The parser walks the tokenizer's output once, attaching each line as a
//! child of the nearest shallower line. Structural rules are enforced here:
//! children must be exactly one level deeper than their parent, `- else` and
//! `- elsif` must follow a matching block at the same depth, attribute lists
//! must balance, and filter blocks must have a body. Filter bodies are kept
//! as raw text; everything else is parsed into [`Node`] variants.

use crate::ast::{
    AttrValue, ControlBlock, ControlKind, Document, Element, ElseBranch, EscapeMode, FilterLine,
    Inline, Node, Pos, TextSegment, Trim,
};
use crate::error::SyntaxError;
use crate::interpolate;
use crate::lexer::{LineKind, LogicalLine};

/// Parses a logical-line sequence into a document tree.
///
/// # Errors
///
/// Returns a [`SyntaxError`] pointing at the offending line for any of the
/// structural violations described in the module docs.
pub fn parse(lines: &[LogicalLine]) -> Result<Document, SyntaxError> {
    let mut idx = 0;
    let nodes = parse_level(lines, &mut idx, 0)?;
    debug_assert_eq!(idx, lines.len());
    Ok(Document { nodes })
}

fn parse_level(
    lines: &[LogicalLine],
    idx: &mut usize,
    depth: usize,
) -> Result<Vec<Node>, SyntaxError> {
    let mut nodes: Vec<Node> = Vec::new();

    while *idx < lines.len() {
        let line = &lines[*idx];
        if line.kind == LineKind::Blank {
            // Blank lines only matter inside filter bodies, which consume
            // them before we get here.
            *idx += 1;
            continue;
        }
        if line.depth < depth {
            break;
        }
        if line.depth > depth {
            let message = if line.depth == depth + 1 {
                "illegal nesting: the line above this one can't have nested content".to_string()
            } else {
                format!(
                    "illegal nesting: indentation jumped from level {} to {}",
                    depth, line.depth
                )
            };
            return Err(SyntaxError::new(line.pos, message));
        }

        match line.kind {
            LineKind::Element => {
                let mut el = parse_element_header(&line.payload, line.pos)?;
                *idx += 1;
                let children = parse_level(lines, idx, depth + 1)?;
                if !children.is_empty() {
                    if el.self_closing {
                        return Err(SyntaxError::new(
                            el.pos,
                            "illegal nesting: nesting within a self-closing tag",
                        ));
                    }
                    if el.inline.is_some() {
                        return Err(SyntaxError::new(
                            el.pos,
                            "illegal nesting: content can't be both inline and nested",
                        ));
                    }
                }
                el.children = children;
                nodes.push(Node::Element(el));
            }
            LineKind::Output => {
                nodes.push(parse_output(&line.payload, line.pos)?);
                *idx += 1;
            }
            LineKind::SilentCode => {
                parse_silent(lines, idx, depth, &mut nodes)?;
            }
            LineKind::SilentComment => {
                // The comment line and its whole subtree are discarded.
                *idx += 1;
                while *idx < lines.len()
                    && (lines[*idx].kind == LineKind::Blank || lines[*idx].depth > depth)
                {
                    *idx += 1;
                }
            }
            LineKind::Comment => {
                nodes.push(parse_comment(lines, idx, depth)?);
            }
            LineKind::Filter => {
                nodes.push(parse_filter(lines, idx, depth)?);
            }
            LineKind::Doctype => {
                let variant = line.payload[3..].trim().to_string();
                nodes.push(Node::Doctype {
                    variant,
                    pos: line.pos,
                });
                *idx += 1;
            }
            LineKind::Text => {
                nodes.push(parse_text(&line.payload, line.pos)?);
                *idx += 1;
            }
            LineKind::Blank => unreachable!(),
        }
    }

    Ok(nodes)
}

fn parse_text(payload: &str, pos: Pos) -> Result<Node, SyntaxError> {
    let (escape, rest, consumed) = match payload.as_bytes()[0] {
        b'&' => (EscapeMode::Always, &payload[1..], 1),
        b'!' => (EscapeMode::Never, &payload[1..], 1),
        // `\` makes the rest of the line literal, spaces included.
        b'\\' => (EscapeMode::Default, &payload[1..], 1),
        _ => (EscapeMode::Default, payload, 0),
    };
    let (rest, consumed) = match rest.strip_prefix(' ') {
        Some(stripped) if consumed > 0 && payload.as_bytes()[0] != b'\\' => {
            (stripped, consumed + 1)
        }
        _ => (rest, consumed),
    };
    let segments = interpolate::split(rest, Pos::new(pos.line, pos.col + consumed))?;
    Ok(Node::Text {
        segments,
        escape,
        pos,
    })
}

fn parse_output(payload: &str, pos: Pos) -> Result<Node, SyntaxError> {
    let (escape, preserve, marker_len) = if let Some(_rest) = payload.strip_prefix("&=") {
        (EscapeMode::Always, false, 2)
    } else if payload.starts_with("!=") {
        (EscapeMode::Never, false, 2)
    } else if payload.starts_with('~') {
        (EscapeMode::Default, true, 1)
    } else {
        (EscapeMode::Default, false, 1)
    };
    let expr = payload[marker_len..].trim();
    if expr.is_empty() {
        return Err(SyntaxError::new(pos, "there's no expression to output"));
    }
    Ok(Node::CodeOutput {
        expr: expr.to_string(),
        escape,
        preserve,
        pos,
    })
}

fn parse_silent(
    lines: &[LogicalLine],
    idx: &mut usize,
    depth: usize,
    nodes: &mut Vec<Node>,
) -> Result<(), SyntaxError> {
    let line = &lines[*idx];
    let rest = line.payload[1..].trim();
    let (word, tail) = match rest.find(char::is_whitespace) {
        Some(at) => (&rest[..at], rest[at..].trim_start()),
        None => (rest, ""),
    };

    match word {
        "if" | "unless" | "while" => {
            if tail.is_empty() {
                return Err(SyntaxError::new(
                    line.pos,
                    format!("missing condition for `- {}`", word),
                ));
            }
            let kind = match word {
                "if" => ControlKind::If {
                    cond: tail.to_string(),
                },
                "unless" => ControlKind::Unless {
                    cond: tail.to_string(),
                },
                _ => ControlKind::While {
                    cond: tail.to_string(),
                },
            };
            let pos = line.pos;
            *idx += 1;
            let children = parse_level(lines, idx, depth + 1)?;
            nodes.push(Node::Control(ControlBlock {
                kind,
                pos,
                children,
                else_branches: Vec::new(),
            }));
        }
        "for" => {
            let kind = parse_for_head(tail, line.pos)?;
            let pos = line.pos;
            *idx += 1;
            let children = parse_level(lines, idx, depth + 1)?;
            nodes.push(Node::Control(ControlBlock {
                kind,
                pos,
                children,
                else_branches: Vec::new(),
            }));
        }
        "elsif" | "else" => {
            let pos = line.pos;
            let cond = if word == "elsif" {
                if tail.is_empty() {
                    return Err(SyntaxError::new(pos, "missing condition for `- elsif`"));
                }
                Some(tail.to_string())
            } else {
                if !tail.is_empty() {
                    return Err(SyntaxError::new(pos, "unexpected content after `- else`"));
                }
                None
            };
            let block = match nodes.last_mut() {
                Some(Node::Control(block)) => block,
                _ => {
                    return Err(SyntaxError::new(
                        pos,
                        format!("`- {}` has no matching `- if` at this level", word),
                    ));
                }
            };
            match (&block.kind, word) {
                (ControlKind::If { .. }, _) => {}
                (ControlKind::Unless { .. }, "else") => {}
                _ => {
                    return Err(SyntaxError::new(
                        pos,
                        format!("`- {}` can't follow this kind of block", word),
                    ));
                }
            }
            if block.else_branches.iter().any(|b| b.cond.is_none()) {
                return Err(SyntaxError::new(
                    pos,
                    format!("`- {}` can't follow `- else`", word),
                ));
            }
            *idx += 1;
            let children = parse_level(lines, idx, depth + 1)?;
            // Re-borrow: parse_level needed `nodes` free.
            if let Some(Node::Control(block)) = nodes.last_mut() {
                block.else_branches.push(ElseBranch {
                    cond,
                    pos,
                    children,
                });
            }
        }
        _ => {
            if rest.is_empty() {
                return Err(SyntaxError::new(line.pos, "there's no code to run"));
            }
            nodes.push(Node::CodeSilent {
                expr: rest.to_string(),
                pos: line.pos,
            });
            *idx += 1;
        }
    }
    Ok(())
}

fn parse_for_head(tail: &str, pos: Pos) -> Result<ControlKind, SyntaxError> {
    let (left, right) = tail
        .split_once(" in ")
        .ok_or_else(|| SyntaxError::new(pos, "expected `- for <var> in <expression>`"))?;
    let bindings: Vec<String> = left
        .split(',')
        .map(|b| b.trim().to_string())
        .collect();
    if bindings.is_empty()
        || bindings.len() > 2
        || bindings.iter().any(|b| b.is_empty() || !is_identifier(b))
    {
        return Err(SyntaxError::new(
            pos,
            "loop bindings must be one or two identifiers",
        ));
    }
    let iterable = right.trim();
    if iterable.is_empty() {
        return Err(SyntaxError::new(pos, "missing loop expression"));
    }
    Ok(ControlKind::For {
        bindings,
        iterable: iterable.to_string(),
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_comment(
    lines: &[LogicalLine],
    idx: &mut usize,
    depth: usize,
) -> Result<Node, SyntaxError> {
    let line = &lines[*idx];
    let mut rest = &line.payload[1..];
    let mut condition = None;
    if let Some(inner) = rest.strip_prefix('[') {
        let close = inner.find(']').ok_or_else(|| {
            SyntaxError::new(line.pos, "unterminated condition in conditional comment")
        })?;
        condition = Some(inner[..close].to_string());
        rest = &inner[close + 1..];
    }
    let inline = rest.trim();
    let inline = (!inline.is_empty()).then(|| inline.to_string());
    let pos = line.pos;
    *idx += 1;
    let children = parse_level(lines, idx, depth + 1)?;
    if inline.is_some() && !children.is_empty() {
        return Err(SyntaxError::new(
            pos,
            "illegal nesting: comment can't have both inline text and nested content",
        ));
    }
    Ok(Node::Comment {
        condition,
        inline,
        children,
        pos,
    })
}

fn parse_filter(
    lines: &[LogicalLine],
    idx: &mut usize,
    depth: usize,
) -> Result<Node, SyntaxError> {
    let line = &lines[*idx];
    let name = line.payload[1..].trim().to_string();
    if name.is_empty() || !is_identifier(&name.replace('-', "_")) {
        return Err(SyntaxError::new(line.pos, "invalid filter name"));
    }
    let pos = line.pos;
    *idx += 1;

    // The body is every following deeper line, plus blank lines surrounded
    // by body lines. Raw text: relative indentation is reconstructed from
    // the shallowest body line.
    let mut body_lines: Vec<&LogicalLine> = Vec::new();
    while *idx < lines.len() {
        let l = &lines[*idx];
        if l.kind == LineKind::Blank {
            let continues = lines[*idx..]
                .iter()
                .find(|n| n.kind != LineKind::Blank)
                .is_some_and(|n| n.depth > depth);
            if !continues {
                break;
            }
            body_lines.push(l);
            *idx += 1;
        } else if l.depth > depth {
            body_lines.push(l);
            *idx += 1;
        } else {
            break;
        }
    }

    let base = body_lines
        .iter()
        .filter(|l| l.kind != LineKind::Blank)
        .map(|l| l.indent_width)
        .min();
    let base = match base {
        Some(b) => b,
        None => {
            return Err(SyntaxError::new(
                pos,
                format!("filter `{}` has no body", name),
            ));
        }
    };

    let body = body_lines
        .iter()
        .map(|l| {
            if l.kind == LineKind::Blank {
                FilterLine {
                    text: String::new(),
                    pos: l.pos,
                }
            } else {
                let pad = l.indent_width.saturating_sub(base);
                let mut text = " ".repeat(pad);
                text.push_str(&l.payload);
                // Position of the padded line's first char, so columns
                // inside the body map back to the source.
                FilterLine {
                    text,
                    pos: Pos::new(l.pos.line, l.pos.col.saturating_sub(pad).max(1)),
                }
            }
        })
        .collect();

    Ok(Node::Filter { name, body, pos })
}

// ---------------------------------------------------------------------------
// Element headers
// ---------------------------------------------------------------------------

fn parse_element_header(payload: &str, pos: Pos) -> Result<Element, SyntaxError> {
    let bytes = payload.as_bytes();
    let mut i = 0;

    let tag = if bytes[0] == b'%' {
        i = 1;
        let start = i;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        if i == start {
            return Err(SyntaxError::new(pos, "invalid tag name"));
        }
        payload[start..i].to_string()
    } else {
        "div".to_string()
    };

    let mut el = Element {
        tag,
        id: None,
        classes: Vec::new(),
        attrs: Vec::new(),
        self_closing: false,
        trim: Trim::default(),
        inline: None,
        children: Vec::new(),
        pos,
    };

    // Shorthands and attribute groups, in any order.
    loop {
        match bytes.get(i) {
            Some(b'.') => {
                i += 1;
                let name = read_name(payload, &mut i);
                if name.is_empty() {
                    return Err(SyntaxError::new(
                        at_col(pos, i),
                        "illegal element: classes and ids must have values",
                    ));
                }
                el.classes.push(name);
            }
            Some(b'#') => {
                i += 1;
                let name = read_name(payload, &mut i);
                if name.is_empty() {
                    return Err(SyntaxError::new(
                        at_col(pos, i),
                        "illegal element: classes and ids must have values",
                    ));
                }
                el.id = Some(name);
            }
            Some(b'{') => parse_hash_attrs(payload, &mut i, pos, &mut el.attrs, None)?,
            Some(b'(') => parse_paren_attrs(payload, &mut i, pos, &mut el.attrs)?,
            _ => break,
        }
    }

    // Trailing modifiers.
    loop {
        match bytes.get(i) {
            Some(b'/') => el.self_closing = true,
            Some(b'>') => el.trim.outer = true,
            Some(b'<') => el.trim.inner = true,
            _ => break,
        }
        i += 1;
    }

    // Inline content: code output marker or plain text.
    let (escape, output, preserve) = match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'&'), Some(b'=')) => (EscapeMode::Always, true, false),
        (Some(b'!'), Some(b'=')) => (EscapeMode::Never, true, false),
        (Some(b'='), _) => (EscapeMode::Default, true, false),
        (Some(b'~'), _) => (EscapeMode::Default, true, true),
        (Some(b'&'), _) => (EscapeMode::Always, false, false),
        (Some(b'!'), _) => (EscapeMode::Never, false, false),
        (Some(b' '), _) | (None, _) => (EscapeMode::Default, false, false),
        (Some(_), _) => {
            return Err(SyntaxError::new(
                at_col(pos, i),
                "unexpected character in element header",
            ));
        }
    };
    match (bytes.get(i), output) {
        (Some(b'&' | b'!'), true) => i += 2,
        (Some(b'=' | b'~'), true) | (Some(b'&' | b'!'), false) => i += 1,
        _ => {}
    }

    let rest = payload[i..].trim_start();
    let rest_col = pos.col + payload.len() - rest.len();
    if output {
        if rest.is_empty() {
            return Err(SyntaxError::new(pos, "there's no expression to output"));
        }
        el.inline = Some(Inline::Output {
            expr: rest.trim_end().to_string(),
            escape,
            preserve,
            pos: Pos::new(pos.line, rest_col),
        });
    } else if !rest.is_empty() {
        if el.self_closing {
            return Err(SyntaxError::new(
                pos,
                "self-closing tags can't have content",
            ));
        }
        let segments = interpolate::split(rest.trim_end(), Pos::new(pos.line, rest_col))?;
        el.inline = Some(Inline::Text { segments, escape });
    }

    Ok(el)
}

fn at_col(pos: Pos, offset: usize) -> Pos {
    Pos::new(pos.line, pos.col + offset)
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn read_name(payload: &str, i: &mut usize) -> String {
    let bytes = payload.as_bytes();
    let start = *i;
    while *i < bytes.len() && is_name_byte(bytes[*i]) {
        *i += 1;
    }
    payload[start..*i].to_string()
}

fn parse_hash_attrs(
    payload: &str,
    i: &mut usize,
    pos: Pos,
    attrs: &mut Vec<(String, AttrValue)>,
    key_prefix: Option<&str>,
) -> Result<(), SyntaxError> {
    let open = *i;
    let close = matching_close(payload, open, pos)?;
    let inner = &payload[open + 1..close];
    let inner_offset = open + 1;
    *i = close + 1;

    for (offset, pair) in split_top_level(inner, b',') {
        let pair_trim = pair.trim();
        if pair_trim.is_empty() {
            continue;
        }
        let pair_pos = at_col(pos, inner_offset + offset);
        let (key, value, value_offset) = split_pair(pair, pair_pos)?;
        let key = match key_prefix {
            Some(prefix) => format!("{}-{}", prefix, key).replace('_', "-"),
            None => key,
        };
        let lead = value.len() - value.trim_start().len();
        let value = value.trim();
        let value_pos = at_col(pos, inner_offset + offset + value_offset + lead);
        if value.starts_with('{') {
            // Nested hash: flatten to `key-subkey` attributes.
            let mut j = 0;
            parse_hash_attrs(value, &mut j, value_pos, attrs, Some(&key))?;
            continue;
        }
        attrs.push((key, parse_attr_value(value, value_pos)?));
    }
    Ok(())
}

/// Finds the byte index of the delimiter closing the group opened at `open`,
/// skipping over nested brackets and quoted strings.
fn matching_close(payload: &str, open: usize, pos: Pos) -> Result<usize, SyntaxError> {
    let bytes = payload.as_bytes();
    let mut depth = 0usize;
    let mut string_type = 0u8;
    let mut i = open;
    while i < bytes.len() {
        let ch = bytes[i];
        if string_type != 0 {
            match ch {
                b'\\' => i += 1,
                _ if ch == string_type => string_type = 0,
                _ => {}
            }
        } else {
            match ch {
                b'(' | b'{' | b'[' => depth += 1,
                b')' | b'}' | b']' => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        SyntaxError::new(at_col(pos, i), "unbalanced attribute delimiters")
                    })?;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                b'"' | b'\'' => string_type = ch,
                _ => {}
            }
        }
        i += 1;
    }
    Err(SyntaxError::new(
        at_col(pos, open),
        "unbalanced attribute delimiters",
    ))
}

/// Splits `inner` at top-level occurrences of `sep`, yielding each piece with
/// its byte offset into `inner`.
fn split_top_level(inner: &str, sep: u8) -> Vec<(usize, &str)> {
    let bytes = inner.as_bytes();
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut string_type = 0u8;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let ch = bytes[i];
        if string_type != 0 {
            match ch {
                b'\\' => i += 1,
                _ if ch == string_type => string_type = 0,
                _ => {}
            }
        } else {
            match ch {
                b'(' | b'{' | b'[' => depth += 1,
                b')' | b'}' | b']' => depth = depth.saturating_sub(1),
                b'"' | b'\'' => string_type = ch,
                _ if ch == sep && depth == 0 => {
                    out.push((start, &inner[start..i]));
                    start = i + 1;
                }
                _ => {}
            }
        }
        i += 1;
    }
    out.push((start, &inner[start..]));
    out
}

/// Splits one `key: value` / `:key => value` / `'key' => value` pair.
/// Returns the key, the value slice and the value's byte offset into `pair`.
fn split_pair<'a>(pair: &'a str, pos: Pos) -> Result<(String, &'a str, usize), SyntaxError> {
    let trimmed_start = pair.len() - pair.trim_start().len();
    let s = pair.trim_start();
    let bytes = s.as_bytes();

    let (key, after_key) = if bytes[0] == b':' {
        let mut i = 1;
        let key = read_name(s, &mut i);
        if key.is_empty() {
            return Err(SyntaxError::new(pos, "invalid attribute key"));
        }
        (key, i)
    } else if bytes[0] == b'"' || bytes[0] == b'\'' {
        let close = find_string_end(s, 0)
            .ok_or_else(|| SyntaxError::new(pos, "unterminated attribute key"))?;
        (unescape_quoted(&s[1..close]), close + 1)
    } else {
        let mut i = 0;
        let key = read_name(s, &mut i);
        if key.is_empty() {
            return Err(SyntaxError::new(pos, "invalid attribute key"));
        }
        (key, i)
    };

    let rest = &s[after_key..];
    let sep_len = if rest.trim_start().starts_with("=>") {
        let lead = rest.len() - rest.trim_start().len();
        lead + 2
    } else if rest.starts_with(':') {
        1
    } else {
        return Err(SyntaxError::new(
            pos,
            "expected `:` or `=>` between attribute key and value",
        ));
    };

    let value_offset = trimmed_start + after_key + sep_len;
    Ok((key, &pair[value_offset..], value_offset))
}

fn find_string_end(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b if b == quote => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

fn unescape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('\'' | '"' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_attr_value(value: &str, pos: Pos) -> Result<AttrValue, SyntaxError> {
    if value.is_empty() {
        return Err(SyntaxError::new(pos, "missing attribute value"));
    }
    let bytes = value.as_bytes();
    if bytes[0] == b'"' || bytes[0] == b'\'' {
        let close = find_string_end(value, 0)
            .ok_or_else(|| SyntaxError::new(pos, "unterminated attribute value"))?;
        if !value[close + 1..].trim().is_empty() {
            return Err(SyntaxError::new(pos, "unexpected content after attribute value"));
        }
        return Ok(AttrValue::Literal(unescape_quoted(&value[1..close])));
    }
    if value == "true" {
        return Ok(AttrValue::Flag);
    }
    Ok(AttrValue::Expr {
        expr: value.to_string(),
        pos,
    })
}

fn parse_paren_attrs(
    payload: &str,
    i: &mut usize,
    pos: Pos,
    attrs: &mut Vec<(String, AttrValue)>,
) -> Result<(), SyntaxError> {
    let open = *i;
    let close = matching_close(payload, open, pos)?;
    let inner = &payload[open + 1..close];
    let inner_offset = open + 1;
    *i = close + 1;

    let bytes = inner.as_bytes();
    let mut j = 0;
    while j < bytes.len() {
        while j < bytes.len() && bytes[j] == b' ' {
            j += 1;
        }
        if j >= bytes.len() {
            break;
        }
        let key_pos = at_col(pos, inner_offset + j);
        let key = read_name(inner, &mut j);
        if key.is_empty() {
            return Err(SyntaxError::new(key_pos, "invalid attribute key"));
        }
        if bytes.get(j) != Some(&b'=') {
            attrs.push((key, AttrValue::Flag));
            continue;
        }
        j += 1;
        let value_pos = at_col(pos, inner_offset + j);
        if matches!(bytes.get(j), Some(b'"') | Some(b'\'')) {
            let end = find_string_end(inner, j)
                .ok_or_else(|| SyntaxError::new(value_pos, "unterminated attribute value"))?;
            attrs.push((key, AttrValue::Literal(unescape_quoted(&inner[j + 1..end]))));
            j = end + 1;
        } else {
            let start = j;
            while j < bytes.len() && bytes[j] != b' ' {
                j += 1;
            }
            if start == j {
                return Err(SyntaxError::new(value_pos, "missing attribute value"));
            }
            attrs.push((
                key,
                AttrValue::Expr {
                    expr: inner[start..j].to_string(),
                    pos: value_pos,
                },
            ));
        }
    }
    Ok(())
}
