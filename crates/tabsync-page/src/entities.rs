//! HTML entity handling for the XHTML parser.
//!
//! Page templates routinely use HTML named entities (`&nbsp;`, `&mdash;`)
//! that an XML parser does not know. They are rewritten to Unicode before
//! parsing. The five XML entities and numeric references are left for the
//! parser and decoded by [`decode_reference`]. Comments and CDATA sections
//! are copied through untouched.

use std::sync::LazyLock;

use regex::Regex;

/// Named entities, or a whole comment or CDATA section to skip over.
static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>|&([a-zA-Z][a-zA-Z0-9]*);")
        .expect("invalid entity regex")
});

/// HTML named entities commonly found in documentation templates.
const NAMED: &[(&str, char)] = &[
    ("nbsp", '\u{00a0}'),
    ("ensp", '\u{2002}'),
    ("emsp", '\u{2003}'),
    ("thinsp", '\u{2009}'),
    ("zwj", '\u{200d}'),
    ("zwnj", '\u{200c}'),
    ("mdash", '\u{2014}'),
    ("ndash", '\u{2013}'),
    ("hellip", '\u{2026}'),
    ("middot", '\u{00b7}'),
    ("bull", '\u{2022}'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("ldquo", '\u{201c}'),
    ("rdquo", '\u{201d}'),
    ("laquo", '\u{00ab}'),
    ("raquo", '\u{00bb}'),
    ("larr", '\u{2190}'),
    ("rarr", '\u{2192}'),
    ("uarr", '\u{2191}'),
    ("darr", '\u{2193}'),
    ("times", '\u{00d7}'),
    ("copy", '\u{00a9}'),
    ("reg", '\u{00ae}'),
    ("trade", '\u{2122}'),
    ("para", '\u{00b6}'),
    ("sect", '\u{00a7}'),
    ("deg", '\u{00b0}'),
];

/// Entities the XML parser understands natively.
const XML_BUILTIN: &[(&str, &str)] = &[
    ("lt", "<"),
    ("gt", ">"),
    ("amp", "&"),
    ("apos", "'"),
    ("quot", "\""),
];

/// Replace HTML named entities with their Unicode characters.
///
/// XML built-in entities, unknown names and anything inside comments or
/// CDATA sections are left unchanged.
pub(crate) fn convert_html_entities(html: &str) -> String {
    ENTITY_PATTERN
        .replace_all(html, |caps: &regex::Captures| {
            caps.get(1)
                .and_then(|name| lookup_named(name.as_str()))
                .map_or_else(|| caps[0].to_owned(), String::from)
        })
        .into_owned()
}

/// Decode the body of an entity reference (`lt`, `#169`, `#xA9`).
///
/// Unknown references come back verbatim as `&name;`.
pub(crate) fn decode_reference(name: &str) -> String {
    if let Some((_, text)) = XML_BUILTIN.iter().find(|(n, _)| *n == name) {
        return (*text).to_owned();
    }

    let numeric = name.strip_prefix('#').and_then(|digits| {
        match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => digits.parse().ok(),
        }
    });

    numeric
        .and_then(char::from_u32)
        .or_else(|| lookup_named(name))
        .map_or_else(|| format!("&{name};"), String::from)
}

fn lookup_named(name: &str) -> Option<char> {
    NAMED.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}
