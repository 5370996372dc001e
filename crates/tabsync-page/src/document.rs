//! Arena-backed in-memory element tree.

use crate::error::PageError;
use crate::host::TabHost;
use crate::{parser, serializer};

/// Handle to an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Content of an element, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Child {
    /// Nested element.
    Element(NodeId),
    /// Decoded character data.
    Text(String),
    /// Markup re-emitted verbatim (comments, doctype, processing instructions).
    Raw(String),
}

#[derive(Debug)]
pub(crate) struct Element {
    pub(crate) tag: String,
    /// Attributes in source order.
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<Child>,
    pub(crate) parent: Option<NodeId>,
}

/// A mutable page held in memory.
///
/// The document owns a synthetic root element whose children are the parsed
/// top-level nodes. The root never appears in serialized output and is never
/// returned from queries.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Element>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Element {
                tag: String::new(),
                attrs: Vec::new(),
                children: Vec::new(),
                parent: None,
            }],
        }
    }

    /// Parse an XHTML page or fragment.
    ///
    /// HTML void elements (`<br>`, `<img>`, ...) may be left unclosed and
    /// HTML named entities are accepted. Everything else must be well-formed.
    pub fn parse(html: &str) -> Result<Self, PageError> {
        parser::parse(html)
    }

    /// Serialize the document back to markup.
    #[must_use]
    pub fn to_html(&self) -> String {
        serializer::serialize(self)
    }

    /// The synthetic root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Tag name of an element.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    /// Child elements, skipping text.
    pub fn child_elements(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[node.0].children.iter().filter_map(|c| match c {
            Child::Element(id) => Some(*id),
            Child::Text(_) | Child::Raw(_) => None,
        })
    }

    /// Concatenated text of an element and all its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// Element whose `id` attribute equals `id`.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&node| self.attr(node, "id") == Some(id))
    }

    /// Class list of an element.
    pub fn classes(&self, node: NodeId) -> impl Iterator<Item = &str> + '_ {
        self.attr(node, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub(crate) fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    /// Append a new element under `parent` and return its handle.
    pub(crate) fn push_element(
        &mut self,
        parent: NodeId,
        tag: String,
        attrs: Vec<(String, String)>,
    ) -> NodeId {
        let id = self.alloc(tag, attrs);
        self.attach(parent, id);
        id
    }

    /// Append character data under `parent`, merging with a preceding text run.
    pub(crate) fn push_text(&mut self, parent: NodeId, text: &str) {
        let children = &mut self.nodes[parent.0].children;
        if let Some(Child::Text(last)) = children.last_mut() {
            last.push_str(text);
        } else {
            children.push(Child::Text(text.to_owned()));
        }
    }

    pub(crate) fn push_raw(&mut self, parent: NodeId, markup: String) {
        self.nodes[parent.0].children.push(Child::Raw(markup));
    }

    fn alloc(&mut self, tag: String, attrs: Vec<(String, String)>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            tag,
            attrs,
            children: Vec::new(),
            parent: None,
        });
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(Child::Element(child));
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0]
                .children
                .retain(|c| *c != Child::Element(child));
        }
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0]
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        for child in &self.nodes[node.0].children {
            match child {
                Child::Element(id) => self.collect_text(*id, out),
                Child::Text(text) => out.push_str(text),
                Child::Raw(_) => {}
            }
        }
    }

    /// Strict descendants of `scope` in document order (pre-order).
    fn descendants(&self, scope: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = self.child_elements(scope).collect();
        stack.reverse();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            let start = stack.len();
            stack.extend(self.child_elements(node));
            stack[start..].reverse();
            Some(node)
        })
    }
}

impl TabHost for Document {
    type Node = NodeId;

    fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&node| self.has_class(&node, class))
            .collect()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0]
            .parent
            .filter(|&parent| parent != self.root())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.classes(*node).any(|c| c == class)
    }

    fn find_descendant(&self, scope: &NodeId, class: &str) -> Option<NodeId> {
        self.descendants(*scope)
            .find(|node| self.has_class(node, class))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attr(*node, name).map(str::to_owned)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let attrs = &mut self.nodes[node.0].attrs;
        if let Some((_, existing)) = attrs.iter_mut().find(|(key, _)| key == name) {
            value.clone_into(existing);
        } else {
            attrs.push((name.to_owned(), value.to_owned()));
        }
    }

    fn set_class(&mut self, node: &NodeId, class: &str, enabled: bool) {
        let mut classes: Vec<&str> = self.classes(*node).collect();
        let present = classes.contains(&class);
        if present == enabled {
            return;
        }

        if enabled {
            classes.push(class);
        } else {
            classes.retain(|c| *c != class);
        }
        let value = classes.join(" ");
        self.set_attribute(node, "class", &value);
    }

    fn create_element(&mut self, tag: &str) -> Option<NodeId> {
        Some(self.alloc(tag.to_owned(), Vec::new()))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.attach(*parent, *child);
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        let removed = std::mem::take(&mut self.nodes[node.0].children);
        for child in removed {
            if let Child::Element(id) = child {
                self.nodes[id.0].parent = None;
            }
        }
        self.nodes[node.0].children.push(Child::Text(text.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(html: &str) -> Document {
        Document::parse(html).unwrap()
    }

    #[test]
    fn test_elements_with_class_in_document_order() {
        let doc = parse(
            r#"<div class="a" id="1"><p class="a" id="2"></p></div><span class="a" id="3"></span>"#,
        );
        let ids: Vec<_> = doc
            .elements_with_class("a")
            .iter()
            .map(|n| doc.attribute(n, "id").unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_class_matching_is_whole_word() {
        let doc = parse(r#"<div class="tab-pane-wrapper"></div><div class=" x tab-pane "></div>"#);
        assert_eq!(doc.elements_with_class("tab-pane").len(), 1);
    }

    #[test]
    fn test_parent_stops_below_root() {
        let doc = parse(r#"<div id="outer"><p id="inner"></p></div>"#);
        let inner = doc.element_by_id("inner").unwrap();
        let outer = doc.element_by_id("outer").unwrap();
        assert_eq!(doc.parent(&inner), Some(outer));
        assert_eq!(doc.parent(&outer), None);
    }

    #[test]
    fn test_closest_includes_self() {
        let doc = parse(r#"<div class="code-tabs" id="g"><p class="code-tabs" id="p"></p></div>"#);
        let p = doc.element_by_id("p").unwrap();
        assert_eq!(doc.closest(&p, "code-tabs"), Some(p));
    }

    #[test]
    fn test_closest_walks_ancestors() {
        let doc = parse(r#"<div class="code-tabs" id="g"><section><p id="p"></p></section></div>"#);
        let p = doc.element_by_id("p").unwrap();
        let g = doc.element_by_id("g").unwrap();
        assert_eq!(doc.closest(&p, "code-tabs"), Some(g));
        assert_eq!(doc.closest(&p, "missing"), None);
    }

    #[test]
    fn test_find_descendant_excludes_scope() {
        let doc = parse(r#"<ul class="nav-tabs" id="a"><li class="nav-tabs" id="b"></li></ul>"#);
        let a = doc.element_by_id("a").unwrap();
        let b = doc.element_by_id("b").unwrap();
        assert_eq!(doc.find_descendant(&a, "nav-tabs"), Some(b));
        assert_eq!(doc.find_descendant(&b, "nav-tabs"), None);
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut doc = parse(r##"<a id="x" aria-selected="false" href="#t">t</a>"##);
        let a = doc.element_by_id("x").unwrap();
        doc.set_attribute(&a, "aria-selected", "true");
        doc.set_attribute(&a, "role", "tab");
        assert_eq!(
            doc.to_html(),
            r##"<a id="x" aria-selected="true" href="#t" role="tab">t</a>"##
        );
    }

    #[test]
    fn test_set_class_toggles() {
        let mut doc = parse(r#"<div id="x" class="tab-pane"></div>"#);
        let x = doc.element_by_id("x").unwrap();

        doc.set_class(&x, "active", true);
        doc.set_class(&x, "active", true);
        assert_eq!(doc.attribute(&x, "class").as_deref(), Some("tab-pane active"));

        doc.set_class(&x, "active", false);
        assert_eq!(doc.attribute(&x, "class").as_deref(), Some("tab-pane"));
    }

    #[test]
    fn test_set_class_on_element_without_class() {
        let mut doc = parse(r#"<div id="x"></div>"#);
        let x = doc.element_by_id("x").unwrap();

        doc.set_class(&x, "active", false);
        assert_eq!(doc.attribute(&x, "class"), None);

        doc.set_class(&x, "active", true);
        assert_eq!(doc.attribute(&x, "class").as_deref(), Some("active"));
    }

    #[test]
    fn test_create_and_append() {
        let mut doc = parse(r#"<ul id="nav"></ul>"#);
        let nav = doc.element_by_id("nav").unwrap();

        let li = doc.create_element("li").unwrap();
        let a = doc.create_element("a").unwrap();
        doc.set_text(&a, "C# & .NET");
        doc.append_child(&li, &a);
        doc.append_child(&nav, &li);

        assert_eq!(doc.to_html(), r#"<ul id="nav"><li><a>C# &amp; .NET</a></li></ul>"#);
        assert_eq!(doc.parent(&a), Some(li));
    }

    #[test]
    fn test_detached_element_is_not_queried() {
        let mut doc = parse(r#"<div></div>"#);
        let orphan = doc.create_element("p").unwrap();
        doc.set_class(&orphan, "tab-pane", true);
        assert!(doc.elements_with_class("tab-pane").is_empty());
    }

    #[test]
    fn test_text_content() {
        let doc = parse(r#"<a id="x">C<b>#</b> <!-- note -->code</a>"#);
        let x = doc.element_by_id("x").unwrap();
        assert_eq!(doc.text_content(x), "C# code");
    }
}
