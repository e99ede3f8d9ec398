//! Doctype and XML prolog lookup.

use crate::options::{Format, Options};

const XHTML_TRANSITIONAL: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">";
const XHTML_STRICT: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">";
const XHTML_FRAMESET: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Frameset//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd\">";
const XHTML_1_1: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\" \"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">";
const XHTML_BASIC: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML Basic 1.1//EN\" \"http://www.w3.org/TR/xhtml-basic/xhtml-basic11.dtd\">";
const XHTML_MOBILE: &str = "<!DOCTYPE html PUBLIC \"-//WAPFORUM//DTD XHTML Mobile 1.2//EN\" \"http://www.openmobilealliance.org/tech/DTD/xhtml-mobile12.dtd\">";
const XHTML_RDFA: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML+RDFa 1.0//EN\" \"http://www.w3.org/MarkUp/DTD/xhtml-rdfa-1.dtd\">";
const HTML4_TRANSITIONAL: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\" \"http://www.w3.org/TR/html4/loose.dtd\">";
const HTML4_STRICT: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">";
const HTML4_FRAMESET: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01 Frameset//EN\" \"http://www.w3.org/TR/html4/frameset.dtd\">";
const HTML5: &str = "<!DOCTYPE html>";

/// Resolves a `!!!` variant to its declaration line.
///
/// Returns `None` when the directive emits nothing for the current format,
/// which happens for `!!! XML` outside XHTML. Unknown variants fall back to
/// the format's default doctype.
pub fn doctype(variant: &str, options: &Options) -> Option<String> {
    let variant = variant.trim();
    if let Some(rest) = strip_word(variant, "XML") {
        if !options.format.is_xhtml() {
            return None;
        }
        let encoding = if rest.is_empty() { "utf-8" } else { rest };
        let q = options.attr_wrapper;
        return Some(format!(
            "<?xml version={q}1.0{q} encoding={q}{encoding}{q} ?>"
        ));
    }

    let lower = variant.to_ascii_lowercase();
    let decl = match options.format {
        Format::Html5 => HTML5,
        Format::Html4 => match lower.as_str() {
            "strict" => HTML4_STRICT,
            "frameset" => HTML4_FRAMESET,
            _ => HTML4_TRANSITIONAL,
        },
        Format::Xhtml => match lower.as_str() {
            "strict" => XHTML_STRICT,
            "frameset" => XHTML_FRAMESET,
            "5" => HTML5,
            "1.1" => XHTML_1_1,
            "basic" => XHTML_BASIC,
            "mobile" => XHTML_MOBILE,
            "rdfa" => XHTML_RDFA,
            _ => XHTML_TRANSITIONAL,
        },
    };
    Some(decl.to_string())
}

/// Strips `word` from the front of `s` if followed by a word boundary,
/// returning the trimmed remainder.
fn strip_word<'a>(s: &'a str, word: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(word)?;
    if rest.is_empty() {
        Some(rest)
    } else if rest.starts_with(' ') {
        Some(rest.trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(format: Format) -> Options {
        Options {
            format,
            ..Options::default()
        }
    }

    #[test]
    fn html5_ignores_variants() {
        let o = opts(Format::Html5);
        assert_eq!(doctype("", &o).unwrap(), "<!DOCTYPE html>");
        assert_eq!(doctype("Strict", &o).unwrap(), "<!DOCTYPE html>");
    }

    #[test]
    fn html4_variants() {
        let o = opts(Format::Html4);
        assert!(doctype("", &o).unwrap().contains("Transitional"));
        assert!(doctype("Strict", &o).unwrap().contains("strict.dtd"));
        assert!(doctype("frameset", &o).unwrap().contains("Frameset"));
    }

    #[test]
    fn xhtml_variants() {
        let o = opts(Format::Xhtml);
        assert!(doctype("", &o).unwrap().contains("XHTML 1.0 Transitional"));
        assert!(doctype("1.1", &o).unwrap().contains("XHTML 1.1"));
        assert!(doctype("Mobile", &o).unwrap().contains("Mobile"));
        assert_eq!(doctype("5", &o).unwrap(), "<!DOCTYPE html>");
    }

    #[test]
    fn unknown_variant_falls_back_to_default() {
        let o = opts(Format::Xhtml);
        assert_eq!(doctype("bogus", &o), doctype("", &o));
    }

    #[test]
    fn xml_prolog_only_in_xhtml() {
        let o = opts(Format::Xhtml);
        assert_eq!(
            doctype("XML", &o).unwrap(),
            "<?xml version=\"1.0\" encoding=\"utf-8\" ?>"
        );
        assert!(doctype("XML", &opts(Format::Html5)).is_none());
    }

    #[test]
    fn xml_prolog_custom_encoding() {
        let o = opts(Format::Xhtml);
        assert_eq!(
            doctype("XML iso-8859-1", &o).unwrap(),
            "<?xml version=\"1.0\" encoding=\"iso-8859-1\" ?>"
        );
    }
}
