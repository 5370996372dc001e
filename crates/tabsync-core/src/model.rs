//! Tab groups and panes discovered on a page.

/// Identifies one navigation entry (and its pane) by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    /// Index of the group in scan order.
    pub group: usize,
    /// Index of the pane within its group.
    pub pane: usize,
}

/// One `code-tabs` container and the panes found inside it.
#[derive(Debug)]
pub struct TabGroup<N> {
    pub(crate) container: N,
    pub(crate) panes: Vec<TabPane<N>>,
}

impl<N> TabGroup<N> {
    /// The group's container element.
    pub fn container(&self) -> &N {
        &self.container
    }

    /// Panes in document order.
    pub fn panes(&self) -> &[TabPane<N>] {
        &self.panes
    }

    /// Labels of all panes in document order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.panes.iter().map(TabPane::label)
    }

    /// Index of the pane that becomes active for `label`.
    ///
    /// When several panes share the label, the first one wins.
    pub(crate) fn winner(&self, label: &str) -> Option<usize> {
        self.panes.iter().position(|pane| pane.label == label)
    }
}

/// One content panel plus the navigation link created for it.
#[derive(Debug)]
pub struct TabPane<N> {
    pub(crate) node: N,
    pub(crate) id: String,
    pub(crate) label: String,
    pub(crate) link: Option<N>,
}

impl<N> TabPane<N> {
    /// The pane element.
    pub fn node(&self) -> &N {
        &self.node
    }

    /// Generated element id (`tab<N>`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Label taken from the pane's `title` attribute.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The navigation link, absent when the group has no `nav-tabs` list.
    pub fn link(&self) -> Option<&N> {
        self.link.as_ref()
    }
}
