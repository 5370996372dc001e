//! [`TabHost`] over the live browser DOM.

use tabsync_page::TabHost;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlCollection};

/// The current document as seen by the tab synchronizer.
pub struct WebPage {
    document: Document,
}

impl WebPage {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The window's document, if there is one.
    pub fn current() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn collect(collection: &HtmlCollection) -> Vec<Element> {
    (0..collection.length())
        .filter_map(|idx| collection.item(idx))
        .collect()
}

fn log_failure(action: &str, result: Result<impl Sized, JsValue>) {
    if let Err(err) = result {
        tracing::warn!(action, error = ?err, "DOM update failed");
    }
}

impl TabHost for WebPage {
    type Node = Element;

    fn elements_with_class(&self, class: &str) -> Vec<Element> {
        // Live collection: snapshot it before any mutation.
        collect(&self.document.get_elements_by_class_name(class))
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn find_descendant(&self, scope: &Element, class: &str) -> Option<Element> {
        scope.get_elements_by_class_name(class).item(0)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        log_failure("set_attribute", node.set_attribute(name, value));
    }

    fn set_class(&mut self, node: &Element, class: &str, enabled: bool) {
        log_failure(
            "toggle_class",
            node.class_list().toggle_with_force(class, enabled),
        );
    }

    fn create_element(&mut self, tag: &str) -> Option<Element> {
        match self.document.create_element(tag) {
            Ok(element) => Some(element),
            Err(err) => {
                tracing::warn!(tag, error = ?err, "cannot create element");
                None
            }
        }
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        log_failure("append_child", parent.append_child(child));
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }
}
