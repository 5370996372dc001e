//! XHTML parser building a [`Document`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::document::{Document, NodeId};
use crate::entities::{convert_html_entities, decode_reference};
use crate::error::PageError;

/// HTML elements that never have content and may appear unclosed.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// Parse markup into a new document.
///
/// Unbalanced end tags are tolerated: an end tag closes the nearest open
/// element with the same name, and an end tag with no open match is dropped.
/// Elements still open at the end of input are closed implicitly.
pub(crate) fn parse(html: &str) -> Result<Document, PageError> {
    let html = convert_html_entities(html);

    let mut reader = Reader::from_str(&html);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut doc = Document::new();
    let mut open: Vec<(NodeId, String)> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let parent = open.last().map_or_else(|| doc.root(), |(id, _)| *id);
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let (tag, attrs) = decode_start(&reader, &e)?;
                let void = is_void(&tag);
                let id = doc.push_element(parent, tag.clone(), attrs);
                if !void {
                    open.push((id, tag));
                }
            }
            Event::Empty(e) => {
                let (tag, attrs) = decode_start(&reader, &e)?;
                doc.push_element(parent, tag, attrs);
            }
            Event::End(e) => {
                let tag = reader.decoder().decode(e.name().as_ref())?.into_owned();
                if let Some(pos) = open.iter().rposition(|(_, name)| *name == tag) {
                    open.truncate(pos);
                } else {
                    tracing::debug!("dropping unmatched end tag </{tag}>");
                }
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                doc.push_text(parent, &text);
            }
            Event::GeneralRef(e) => {
                let name = reader.decoder().decode(&e)?;
                doc.push_text(parent, &decode_reference(&name));
            }
            Event::CData(e) => {
                let text = reader.decoder().decode(&e)?;
                doc.push_raw(parent, format!("<![CDATA[{text}]]>"));
            }
            Event::Comment(e) => {
                let text = reader.decoder().decode(&e)?;
                doc.push_raw(parent, format!("<!--{text}-->"));
            }
            Event::DocType(e) => {
                let text = reader.decoder().decode(&e)?;
                doc.push_raw(parent, format!("<!DOCTYPE {}>", text.trim()));
            }
            Event::Decl(e) => {
                let text = reader.decoder().decode(&e)?;
                doc.push_raw(parent, format!("<?{text}?>"));
            }
            Event::PI(e) => {
                let text = reader.decoder().decode(&e)?;
                doc.push_raw(parent, format!("<?{text}?>"));
            }
            Event::Eof => break,
        }
        buf.clear();
    }

    Ok(doc)
}

/// Decode the tag name and attributes of a start or empty tag.
///
/// Attributes use HTML rules, so valueless attributes such as `hidden` are
/// accepted and stored with an empty value.
fn decode_start<R>(
    reader: &Reader<R>,
    e: &BytesStart,
) -> Result<(String, Vec<(String, String)>), PageError> {
    let tag = reader.decoder().decode(e.name().as_ref())?.into_owned();

    let mut attrs = Vec::new();
    for attr in e.html_attributes().flatten() {
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => reader.decoder().decode(&attr.value)?.into_owned(),
        };
        attrs.push((key, value));
    }

    Ok((tag, attrs))
}
