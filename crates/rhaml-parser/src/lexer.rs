//! Tokenizer: raw template text to logical lines.
//!
//! A logical line is one semantic unit of source. It may span several
//! physical lines: a run of lines each ending in `|` merges into one, and an
//! element header whose attribute list is still open at end of line continues
//! onto the following lines until the brackets balance.
//!
//! The tokenizer also establishes the indentation unit from the first
//! indented line and converts indentation into a depth; inconsistent
//! indentation is a [`SyntaxError`] here rather than a parse-time surprise.

use crate::ast::Pos;
use crate::error::SyntaxError;

/// Classification of a logical line, decided by its leading characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `%tag`, `.class`, `#id`
    Element,
    /// `- code` (including control-flow openers)
    SilentCode,
    /// `-#` — discarded together with its subtree by the parser
    SilentComment,
    /// `= expr`, `~ expr`, `&= expr`, `!= expr`
    Output,
    /// `/ comment`
    Comment,
    /// `:name`
    Filter,
    /// `!!! variant`
    Doctype,
    /// Plain text (including `&`/`!`/`\` prefixed lines)
    Text,
    /// Whitespace-only line, kept as a zero-content marker
    Blank,
}

/// One classified, depth-tagged unit of source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub depth: usize,
    /// Indentation measured in columns (tabs expand to the default indent
    /// depth). Used to reconstruct raw filter bodies.
    pub indent_width: usize,
    pub kind: LineKind,
    /// Line content with indentation stripped.
    pub payload: String,
    /// Position of the first physical line; the column points past the
    /// indentation.
    pub pos: Pos,
}

struct RawLine {
    lineno: usize,
    indent: String,
    payload: String,
}

/// Converts template text into a sequence of logical lines.
///
/// `default_indent_depth` is the column width of a tab character, matching
/// the engine option of the same name.
///
/// # Errors
///
/// Returns a [`SyntaxError`] on an unterminated attribute list, mixed or
/// inconsistent indentation, or an indent that is not a whole multiple of
/// the established unit.
pub fn tokenize(text: &str, default_indent_depth: usize) -> Result<Vec<LogicalLine>, SyntaxError> {
    let raw = split_physical(text);
    let merged = merge_pipe_continuations(raw);
    let merged = merge_attribute_continuations(merged)?;
    assign_depths(merged, default_indent_depth.max(1))
}

fn split_physical(text: &str) -> Vec<RawLine> {
    let mut out = Vec::new();
    let mut lines: Vec<&str> = text.split('\n').collect();
    // A trailing newline produces an empty final fragment, not a blank line.
    if text.ends_with('\n') {
        lines.pop();
    }
    for (i, line) in lines.into_iter().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let indent_len = line
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(line.len());
        let (indent, payload) = line.split_at(indent_len);
        out.push(RawLine {
            lineno: i + 1,
            indent: indent.to_string(),
            payload: payload.to_string(),
        });
    }
    out
}

fn ends_with_pipe(payload: &str) -> bool {
    payload.trim_end().ends_with('|')
}

fn strip_pipe(payload: &str) -> &str {
    payload
        .trim_end()
        .strip_suffix('|')
        .map(str::trim_end)
        .unwrap_or(payload)
}

fn merge_pipe_continuations(raw: Vec<RawLine>) -> Vec<RawLine> {
    let mut out: Vec<RawLine> = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter().peekable();
    while let Some(line) = iter.next() {
        if !ends_with_pipe(&line.payload) {
            out.push(line);
            continue;
        }
        let mut parts = vec![strip_pipe(&line.payload).to_string()];
        while let Some(next) = iter.next_if(|n| ends_with_pipe(&n.payload)) {
            parts.push(strip_pipe(&next.payload).to_string());
        }
        out.push(RawLine {
            lineno: line.lineno,
            indent: line.indent,
            payload: parts.join(" "),
        });
    }
    out
}

/// Outcome of scanning an element header's attribute region.
enum AttrScan {
    /// Attribute list (if any) closed within the payload.
    Balanced,
    /// Brackets (or a string) still open at end of payload.
    Open,
}

/// Scans an element header for an attribute list left open at end of line.
///
/// Mirrors the classification used at parse time: attributes are only
/// considered when `{`, `(`, `.` or `#` directly follows the tag name.
fn attr_scan(payload: &str) -> AttrScan {
    let bytes = payload.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'%') {
        i += 1;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
    }
    match bytes.get(i) {
        Some(b'.') | Some(b'#') | Some(b'{') | Some(b'(') => {}
        _ => return AttrScan::Balanced,
    }

    let mut depth = 0usize;
    let mut string_type = 0u8;
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
                b' ' if depth == 0 => return AttrScan::Balanced,
                _ => {}
            }
        }
        i += 1;
    }
    if depth > 0 || string_type != 0 {
        AttrScan::Open
    } else {
        AttrScan::Balanced
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn merge_attribute_continuations(raw: Vec<RawLine>) -> Result<Vec<RawLine>, SyntaxError> {
    let mut out: Vec<RawLine> = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter();
    while let Some(mut line) = iter.next() {
        if matches!(line.payload.chars().next(), Some('%' | '.' | '#')) {
            while matches!(attr_scan(&line.payload), AttrScan::Open) {
                match iter.next() {
                    Some(next) => {
                        line.payload.push(' ');
                        line.payload.push_str(next.payload.trim_end());
                    }
                    None => {
                        return Err(SyntaxError::new(
                            Pos::new(line.lineno, line.indent.len() + 1),
                            "unterminated attribute list",
                        ));
                    }
                }
            }
        }
        out.push(line);
    }
    Ok(out)
}

fn classify(payload: &str) -> LineKind {
    if payload.is_empty() {
        return LineKind::Blank;
    }
    if payload.starts_with("!!!") {
        return LineKind::Doctype;
    }
    if payload.starts_with("-#") {
        return LineKind::SilentComment;
    }
    if payload.starts_with("&=") || payload.starts_with("!=") {
        return LineKind::Output;
    }
    match payload.as_bytes()[0] {
        b'-' => LineKind::SilentCode,
        b'=' | b'~' => LineKind::Output,
        b'%' | b'.' | b'#' => LineKind::Element,
        b'/' => LineKind::Comment,
        b':' => LineKind::Filter,
        _ => LineKind::Text,
    }
}

fn indent_width(indent: &str, tab_width: usize) -> usize {
    indent
        .chars()
        .map(|c| if c == '\t' { tab_width } else { 1 })
        .sum()
}

fn assign_depths(raw: Vec<RawLine>, tab_width: usize) -> Result<Vec<LogicalLine>, SyntaxError> {
    // The first indented non-blank line establishes the unit: its character
    // (all spaces or all tabs) and its width.
    let mut unit: Option<(char, usize)> = None;
    let mut out = Vec::with_capacity(raw.len());

    for line in raw {
        let kind = classify(&line.payload);
        let width = indent_width(&line.indent, tab_width);
        let pos = Pos::new(line.lineno, line.indent.len() + 1);

        if kind == LineKind::Blank {
            out.push(LogicalLine {
                depth: 0,
                indent_width: width,
                kind,
                payload: String::new(),
                pos,
            });
            continue;
        }

        let depth = if line.indent.is_empty() {
            0
        } else {
            let has_tab = line.indent.contains('\t');
            let has_space = line.indent.contains(' ');
            if has_tab && has_space {
                return Err(SyntaxError::new(
                    pos,
                    "indentation can't use both tabs and spaces",
                ));
            }
            let ch = if has_tab { '\t' } else { ' ' };
            let (unit_ch, unit_len) = *unit.get_or_insert((ch, line.indent.len()));
            if ch != unit_ch {
                return Err(SyntaxError::new(
                    pos,
                    format!(
                        "inconsistent indentation: {} used where {} were established",
                        indent_word(ch),
                        indent_word(unit_ch)
                    ),
                ));
            }
            if line.indent.len() % unit_len != 0 {
                return Err(SyntaxError::new(
                    pos,
                    format!(
                        "indentation of {} is not a multiple of the established unit of {}",
                        line.indent.len(),
                        unit_len
                    ),
                ));
            }
            line.indent.len() / unit_len
        };

        out.push(LogicalLine {
            depth,
            indent_width: width,
            kind,
            payload: line.payload,
            pos,
        });
    }
    Ok(out)
}

fn indent_word(ch: char) -> &'static str {
    if ch == '\t' {
        "tabs"
    } else {
        "spaces"
    }
}
