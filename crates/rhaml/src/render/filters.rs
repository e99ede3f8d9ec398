//! Built-in filter transformations.
//!
//! Filters receive their body after interpolation has already run.
//! Each transformation maps body lines to output lines; the renderer
//! indents those to the filter's nesting level.

use crate::options::Options;
use crate::render::escape::escape;

/// Applies the named filter to its body lines.
///
/// Returns `None` for an unknown filter name; the renderer turns that into
/// a [`RenderError::UnknownFilter`](crate::RenderError::UnknownFilter).
pub fn apply(name: &str, lines: &[String], options: &Options) -> Option<Vec<String>> {
    let out = match name {
        "plain" => lines.to_vec(),
        "escaped" => lines.iter().map(|l| escape(l).into_owned()).collect(),
        "preserve" => vec![lines.join("&#x000A;")],
        "cdata" => wrap(lines, "<![CDATA[", "]]>", 1),
        "css" => {
            let open = if options.format.is_html5() {
                "<style>"
            } else {
                "<style type=\"text/css\">"
            };
            style_block(lines, open, "</style>", "/*<![CDATA[*/", "/*]]>*/", options)
        }
        "javascript" => {
            let open = if options.format.is_html5() {
                "<script>"
            } else {
                "<script type=\"text/javascript\">"
            };
            style_block(lines, open, "</script>", "//<![CDATA[", "//]]>", options)
        }
        _ => return None,
    };
    Some(out)
}

fn wrap(lines: &[String], open: &str, close: &str, indent: usize) -> Vec<String> {
    let pad = "  ".repeat(indent);
    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(open.to_string());
    for line in lines {
        if line.is_empty() {
            out.push(String::new());
        } else {
            out.push(format!("{pad}{line}"));
        }
    }
    out.push(close.to_string());
    out
}

fn style_block(
    lines: &[String],
    open: &str,
    close: &str,
    cdata_open: &str,
    cdata_close: &str,
    options: &Options,
) -> Vec<String> {
    if options.format.is_xhtml() {
        let mut out = Vec::with_capacity(lines.len() + 4);
        out.push(open.to_string());
        out.push(format!("  {cdata_open}"));
        for line in lines {
            if line.is_empty() {
                out.push(String::new());
            } else {
                out.push(format!("    {line}"));
            }
        }
        out.push(format!("  {cdata_close}"));
        out.push(close.to_string());
        out
    } else {
        wrap(lines, open, close, 1)
    }
}
