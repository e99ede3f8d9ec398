//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Output format. Drives doctype lookup, void-tag syntax and boolean
/// attribute rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `<br>`, bare boolean attributes, HTML 5 doctypes.
    #[default]
    Html5,
    /// `<br>`, expanded boolean attributes, HTML 4 doctypes.
    Html4,
    /// `<br />`, expanded boolean attributes, XHTML doctypes and the
    /// optional XML prolog.
    Xhtml,
}

impl Format {
    pub fn is_xhtml(self) -> bool {
        matches!(self, Format::Xhtml)
    }

    pub fn is_html5(self) -> bool {
        matches!(self, Format::Html5)
    }
}

/// Rendering options.
///
/// The defaults match common expectations for HTML 5 output: expression
/// output is escaped, attributes are double-quoted and `pre`, `textarea`
/// and `code` keep their whitespace.
///
/// ```
/// use rhaml::{Format, Options};
///
/// let opts = Options {
///     format: Format::Xhtml,
///     ..Options::default()
/// };
/// assert!(opts.escape_html);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Output format. Defaults to [`Format::Html5`].
    pub format: Format,

    /// Whether `=` output and interpolations are HTML-escaped by default.
    /// `&=` and `!=` override this per line.
    pub escape_html: bool,

    /// Quote character wrapped around attribute values.
    pub attr_wrapper: char,

    /// Tags whose content keeps its internal whitespace verbatim.
    pub preserve_tags: Vec<String>,

    /// Spaces emitted per nesting level, and the column width of a tab when
    /// measuring template indentation.
    pub default_indent_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            format: Format::default(),
            escape_html: true,
            attr_wrapper: '"',
            preserve_tags: vec!["pre".into(), "textarea".into(), "code".into()],
            default_indent_depth: 2,
        }
    }
}

impl Options {
    /// Whether `tag` preserves internal whitespace.
    pub fn preserves(&self, tag: &str) -> bool {
        self.preserve_tags.iter().any(|t| t == tag)
    }
}
