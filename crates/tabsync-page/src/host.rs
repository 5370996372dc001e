//! The page surface the tab synchronizer operates on.

/// Element queries and mutations needed to build and update tab controls.
///
/// Node handles are cheap to clone, compare equal when they refer to the same
/// element, and stay valid for the lifetime of the page. Mutations are
/// infallible from the caller's point of view: a host that hits an error (for
/// example a JS exception in the browser) logs it and leaves the element
/// unchanged.
///
/// Queries return elements in document order.
pub trait TabHost {
    /// Handle to one element.
    type Node: Clone + PartialEq;

    /// All elements carrying `class`, in document order.
    fn elements_with_class(&self, class: &str) -> Vec<Self::Node>;

    /// Parent element, or `None` at the top of the page.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether `node` carries `class`.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// First descendant of `scope` carrying `class`, in document order.
    fn find_descendant(&self, scope: &Self::Node, class: &str) -> Option<Self::Node>;

    /// Attribute value, or `None` if the attribute is absent.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Set an attribute, replacing any existing value.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Add `class` when `enabled`, remove it otherwise.
    fn set_class(&mut self, node: &Self::Node, class: &str, enabled: bool);

    /// Create a detached element, or `None` if the host cannot.
    fn create_element(&mut self, tag: &str) -> Option<Self::Node>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Replace the content of `node` with a single text node.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Nearest element carrying `class`, starting at `node` itself and walking
    /// up through its ancestors.
    fn closest(&self, node: &Self::Node, class: &str) -> Option<Self::Node> {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if self.has_class(&candidate, class) {
                return Some(candidate);
            }
            current = self.parent(&candidate);
        }
        None
    }
}
