//! Markup serializer for [`Document`].

use std::fmt::Write;

use crate::document::{Child, Document, NodeId};
use crate::parser::is_void;

/// Serialize every top-level node of the document.
pub(crate) fn serialize(doc: &Document) -> String {
    let mut out = String::with_capacity(4096);
    serialize_children(doc, doc.root(), &mut out);
    out
}

fn serialize_children(doc: &Document, node: NodeId, out: &mut String) {
    for child in &doc.element(node).children {
        match child {
            Child::Element(id) => serialize_element(doc, *id, out),
            Child::Text(text) => out.push_str(&escape_text(text)),
            Child::Raw(markup) => out.push_str(markup),
        }
    }
}

fn serialize_element(doc: &Document, node: NodeId, out: &mut String) {
    let element = doc.element(node);

    out.push('<');
    out.push_str(&element.tag);
    for (key, value) in &element.attrs {
        write!(out, r#" {}="{}""#, key, escape_attr(value)).unwrap();
    }

    // Only void elements self-close; `<div />` is not an empty div in HTML.
    if element.children.is_empty() && is_void(&element.tag) {
        out.push_str(" />");
        return;
    }

    out.push('>');
    serialize_children(doc, node, out);
    write!(out, "</{}>", element.tag).unwrap();
}

/// Escape text for element content.
fn escape_text(text: &str) -> String {
    escape_xml(text, false)
}

/// Escape text for attribute values.
fn escape_attr(text: &str) -> String {
    escape_xml(text, true)
}

fn escape_xml(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn round_trip(html: &str) -> String {
        Document::parse(html).unwrap().to_html()
    }

    #[test]
    fn test_empty_element_keeps_closing_tag() {
        assert_eq!(
            round_trip(r#"<ul class="nav-tabs"/>"#),
            r#"<ul class="nav-tabs"></ul>"#
        );
    }

    #[test]
    fn test_void_element_self_closes() {
        assert_eq!(round_trip("<p>a<br>b</p>"), "<p>a<br />b</p>");
    }

    #[test]
    fn test_comments_and_doctype_survive() {
        assert_eq!(
            round_trip("<!DOCTYPE html><!-- keep --><p>x</p>"),
            "<!DOCTYPE html><!-- keep --><p>x</p>"
        );
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        assert_eq!(
            round_trip(r#"<a title="say &quot;hi&quot;">a &lt; b &amp; c</a>"#),
            r#"<a title="say &quot;hi&quot;">a &lt; b &amp; c</a>"#
        );
    }

    #[test]
    fn test_whitespace_preserved() {
        let html = "<div>\n  <p>x</p>\n</div>\n";
        assert_eq!(round_trip(html), html);
    }

    #[test]
    fn test_named_entities_become_characters() {
        assert_eq!(round_trip("<p>a&nbsp;b</p>"), "<p>a\u{00a0}b</p>");
    }
}
