//! The tab synchronizer state machine.

use tabsync_page::TabHost;
use tabsync_store::{PreferenceStore, PreferenceStoreExt};

use crate::model::{EntryId, TabGroup, TabPane};

/// Label selected when no preference has been stored yet.
pub const DEFAULT_LABEL: &str = "C#";

/// Store key holding the selected label.
pub const DEFAULT_STORAGE_KEY: &str = "tab";

const GROUP_CLASS: &str = "code-tabs";
const NAV_CLASS: &str = "nav-tabs";
const CONTENT_CLASS: &str = "tab-content";
const PANE_CLASS: &str = "tab-pane";
const ACTIVE_CLASS: &str = "active";
const LABEL_ATTR: &str = "title";
const ID_PREFIX: &str = "tab";

/// Tunable values for a [`Synchronizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Key under which the selected label is persisted.
    pub storage_key: String,
    /// Label used when nothing (or an empty string) is persisted.
    pub default_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            default_label: DEFAULT_LABEL.to_owned(),
        }
    }
}

/// Lifecycle of a [`Synchronizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed, page not scanned yet.
    Uninitialized,
    /// Page scanned and initial selection applied.
    Ready,
}

/// Keeps every tab group on a page showing the same label.
///
/// The synchronizer owns the page host and the preference store. Selection
/// changes go through [`select_label`](Self::select_label), which writes
/// each group's state directly; no click is ever re-dispatched, so there is
/// nothing to guard against re-entry.
pub struct Synchronizer<H: TabHost, S: PreferenceStore> {
    host: H,
    store: S,
    settings: Settings,
    state: State,
    next_id: usize,
    selected: Option<String>,
    groups: Vec<TabGroup<H::Node>>,
}

impl<H: TabHost, S: PreferenceStore> Synchronizer<H, S> {
    /// Create an uninitialized synchronizer with default settings.
    pub fn new(host: H, store: S) -> Self {
        Self {
            host,
            store,
            settings: Settings::default(),
            state: State::Uninitialized,
            next_id: 0,
            selected: None,
            groups: Vec::new(),
        }
    }

    /// Replace the settings. Only meaningful before [`initialize`](Self::initialize).
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Scan the page, build navigation entries and apply the stored selection.
    ///
    /// Every `.tab-pane` inside a `.tab-content` gets an id `tab<N>` in
    /// document order. Panes inside a `.code-tabs` container join that
    /// group and get a link appended to the group's `.nav-tabs` list.
    ///
    /// Runs once; later calls are ignored.
    pub fn initialize(&mut self) {
        if self.state == State::Ready {
            tracing::warn!("tab synchronizer already initialized, ignoring");
            return;
        }

        for pane in self.host.elements_with_class(PANE_CLASS) {
            let in_content = self
                .host
                .parent(&pane)
                .and_then(|parent| self.host.closest(&parent, CONTENT_CLASS))
                .is_some();
            if in_content {
                self.register_pane(pane);
            }
        }
        self.state = State::Ready;

        let label = self
            .store
            .get_or(&self.settings.storage_key, &self.settings.default_label);
        tracing::debug!(
            groups = self.groups.len(),
            panes = self.next_id,
            %label,
            "tab synchronizer ready"
        );
        self.select_label(&label);
    }

    /// Make `label` the selection on every group and persist it.
    ///
    /// In each group the first pane titled `label` becomes active together
    /// with its link; every other pane and link is deactivated. Groups with
    /// no such pane end up with nothing active. Calling this again with the
    /// same label changes nothing.
    pub fn select_label(&mut self, label: &str) {
        self.store.set(&self.settings.storage_key, label);
        self.selected = Some(label.to_owned());

        let mut matched = 0;
        for group in &self.groups {
            let winner = group.winner(label);
            if winner.is_some() {
                matched += 1;
            }
            for (idx, pane) in group.panes.iter().enumerate() {
                let active = winner == Some(idx);
                self.host.set_class(&pane.node, ACTIVE_CLASS, active);
                if let Some(link) = &pane.link {
                    self.host.set_class(link, ACTIVE_CLASS, active);
                    self.host
                        .set_attribute(link, "aria-selected", if active { "true" } else { "false" });
                }
            }
        }

        tracing::debug!(%label, matched, groups = self.groups.len(), "selected tab label");
    }

    /// Handle a click on a navigation entry.
    ///
    /// Returns `false` if `entry` does not name a known pane.
    pub fn click(&mut self, entry: EntryId) -> bool {
        let Some(label) = self.pane(entry).map(|pane| pane.label.clone()) else {
            tracing::warn!(?entry, "click on unknown tab entry");
            return false;
        };
        self.select_label(&label);
        true
    }

    /// Every navigation link together with the entry it selects.
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &H::Node)> {
        self.groups.iter().enumerate().flat_map(|(group, g)| {
            g.panes.iter().enumerate().filter_map(move |(pane, p)| {
                p.link.as_ref().map(|link| (EntryId { group, pane }, link))
            })
        })
    }

    /// Look up a pane by entry.
    pub fn pane(&self, entry: EntryId) -> Option<&TabPane<H::Node>> {
        self.groups.get(entry.group)?.panes.get(entry.pane)
    }

    /// The current selection, `None` until the first selection.
    pub fn selected_label(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Groups found during initialization, in order of their first pane.
    pub fn groups(&self) -> &[TabGroup<H::Node>] {
        &self.groups
    }

    /// Settings in use.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The page host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The preference store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the host and store.
    pub fn into_parts(self) -> (H, S) {
        (self.host, self.store)
    }

    /// Assign an id to `pane` and attach it to its group.
    fn register_pane(&mut self, pane: H::Node) {
        let id = format!("{ID_PREFIX}{}", self.next_id);
        self.next_id += 1;
        self.host.set_attribute(&pane, "id", &id);

        let Some(container) = self.host.closest(&pane, GROUP_CLASS) else {
            tracing::debug!(%id, "tab pane outside any code-tabs container");
            return;
        };

        let label = self.host.attribute(&pane, LABEL_ATTR).unwrap_or_default();
        let group_idx = match self.groups.iter().position(|g| g.container == container) {
            Some(idx) => idx,
            None => {
                self.groups.push(TabGroup {
                    container: container.clone(),
                    panes: Vec::new(),
                });
                self.groups.len() - 1
            }
        };

        let link = self
            .host
            .find_descendant(&container, NAV_CLASS)
            .and_then(|nav| self.append_nav_entry(&nav, &id, &label));

        self.groups[group_idx].panes.push(TabPane {
            node: pane,
            id,
            label,
            link,
        });
    }

    /// Append `<li class="nav-item"><a ...>label</a></li>` to `nav`.
    fn append_nav_entry(&mut self, nav: &H::Node, id: &str, label: &str) -> Option<H::Node> {
        let item = self.host.create_element("li")?;
        self.host.set_attribute(&item, "class", "nav-item");

        let link = self.host.create_element("a")?;
        let href = format!("#{id}");
        for (name, value) in [
            ("class", "nav-link"),
            ("data-toggle", "tab"),
            ("role", "tab"),
            ("aria-selected", "false"),
            ("href", href.as_str()),
            ("aria-controls", id),
        ] {
            self.host.set_attribute(&link, name, value);
        }
        self.host.set_text(&link, label);

        self.host.append_child(&item, &link);
        self.host.append_child(nav, &item);
        Some(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabsync_page::{Document, NodeId};
    use tabsync_store::{MemoryStore, NullStore};

    /// Markup for one group with the given pane labels.
    fn group(labels: &[&str]) -> String {
        let panes: String = labels
            .iter()
            .map(|l| format!(r#"<div class="tab-pane" title="{l}"><pre>{l} code</pre></div>"#))
            .collect();
        format!(
            r#"<div class="code-tabs"><ul class="nav nav-tabs"></ul><div class="tab-content">{panes}</div></div>"#
        )
    }

    fn page(groups: &[&[&str]]) -> Document {
        let html: String = groups.iter().map(|g| group(g)).collect();
        Document::parse(&html).unwrap()
    }

    fn ready<S: PreferenceStore>(doc: Document, store: S) -> Synchronizer<Document, S> {
        let mut sync = Synchronizer::new(doc, store);
        sync.initialize();
        sync
    }

    /// Labels of the active pane in each group (`None` when nothing is active).
    fn active_labels<S: PreferenceStore>(sync: &Synchronizer<Document, S>) -> Vec<Option<String>> {
        let doc = sync.host();
        sync.groups()
            .iter()
            .map(|g| {
                let active: Vec<_> = g
                    .panes()
                    .iter()
                    .filter(|p| doc.has_class(p.node(), "active"))
                    .map(|p| p.label().to_owned())
                    .collect();
                assert!(active.len() <= 1, "more than one active pane: {active:?}");
                active.into_iter().next()
            })
            .collect()
    }

    fn link_state(doc: &Document, link: &NodeId) -> (bool, String) {
        (
            doc.has_class(link, "active"),
            doc.attribute(link, "aria-selected").unwrap(),
        )
    }

    #[test]
    fn test_initialize_builds_nav_entries() {
        let sync = ready(page(&[&["C#", "Go"]]), NullStore);

        let html = sync.host().to_html();
        assert!(html.contains(
            r##"<ul class="nav nav-tabs"><li class="nav-item"><a class="nav-link active" data-toggle="tab" role="tab" aria-selected="true" href="#tab0" aria-controls="tab0">C#</a></li><li class="nav-item"><a class="nav-link" data-toggle="tab" role="tab" aria-selected="false" href="#tab1" aria-controls="tab1">Go</a></li></ul>"##
        ));
        assert!(html.contains(r#"<div class="tab-pane active" title="C#" id="tab0">"#));
        assert!(html.contains(r#"<div class="tab-pane" title="Go" id="tab1">"#));
        assert_eq!(sync.state(), State::Ready);
    }

    #[test]
    fn test_ids_are_sequential_across_groups() {
        let sync = ready(page(&[&["C#", "Go"], &["C#", "Rust", "Go"]]), NullStore);

        let ids: Vec<_> = sync
            .groups()
            .iter()
            .flat_map(|g| g.panes().iter().map(|p| p.id().to_owned()))
            .collect();
        assert_eq!(ids, vec!["tab0", "tab1", "tab2", "tab3", "tab4"]);
    }

    #[test]
    fn test_select_label_idempotent() {
        let mut sync = ready(page(&[&["C#", "Go"], &["Go", "Rust"]]), MemoryStore::new());

        sync.select_label("Go");
        let once = sync.host().to_html();
        sync.select_label("Go");
        assert_eq!(sync.host().to_html(), once);
    }

    #[test]
    fn test_select_label_converges_on_every_group() {
        let mut sync = ready(
            page(&[&["C#", "Go", "Rust"], &["Rust", "C#"], &["Go"]]),
            NullStore,
        );

        for label in ["Rust", "Go", "C#", "Rust"] {
            sync.select_label(label);
            for group in sync.groups() {
                for pane in group.panes() {
                    let expected = pane.label() == label;
                    assert_eq!(sync.host().has_class(pane.node(), "active"), expected);
                    let (active, aria) = link_state(sync.host(), pane.link().unwrap());
                    assert_eq!(active, expected);
                    assert_eq!(aria, expected.to_string());
                }
            }
        }
    }

    #[test]
    fn test_click_synchronizes_groups() {
        let mut sync = ready(page(&[&["C#", "Go"], &["C#", "Go"]]), MemoryStore::new());
        assert_eq!(
            active_labels(&sync),
            vec![Some("C#".to_owned()), Some("C#".to_owned())]
        );

        // "Go" in the first group
        assert!(sync.click(EntryId { group: 0, pane: 1 }));

        assert_eq!(
            active_labels(&sync),
            vec![Some("Go".to_owned()), Some("Go".to_owned())]
        );
        for group in sync.groups() {
            let go = &group.panes()[1];
            assert_eq!(
                link_state(sync.host(), go.link().unwrap()),
                (true, "true".to_owned())
            );
            let cs = &group.panes()[0];
            assert_eq!(
                link_state(sync.host(), cs.link().unwrap()),
                (false, "false".to_owned())
            );
        }
    }

    #[test]
    fn test_click_unknown_entry() {
        let mut sync = ready(page(&[&["C#"]]), MemoryStore::new());
        assert!(!sync.click(EntryId { group: 3, pane: 0 }));
        assert!(!sync.click(EntryId { group: 0, pane: 7 }));
        assert_eq!(sync.selected_label(), Some("C#"));
    }

    #[test]
    fn test_selection_persists_across_reload() {
        let store = MemoryStore::new();

        let mut first = ready(page(&[&["C#", "Rust"]]), &store);
        first.select_label("Rust");
        assert_eq!(store.get("tab").as_deref(), Some("Rust"));

        // Fresh page, same store
        let second = ready(page(&[&["C#", "Rust"], &["Rust"]]), &store);
        assert_eq!(second.selected_label(), Some("Rust"));
        assert_eq!(
            active_labels(&second),
            vec![Some("Rust".to_owned()), Some("Rust".to_owned())]
        );
    }

    #[test]
    fn test_default_label_without_preference() {
        let store = MemoryStore::new();
        let sync = ready(page(&[&["Go", "C#"]]), &store);

        assert_eq!(sync.selected_label(), Some("C#"));
        assert_eq!(active_labels(&sync), vec![Some("C#".to_owned())]);
        assert_eq!(store.get("tab").as_deref(), Some("C#"));
    }

    #[test]
    fn test_empty_preference_falls_back_to_default() {
        let sync = ready(
            page(&[&["Go", "C#"]]),
            MemoryStore::new().with_value("tab", ""),
        );
        assert_eq!(sync.selected_label(), Some("C#"));
    }

    #[test]
    fn test_unmatched_label_deactivates_everything() {
        let store = MemoryStore::new();
        let mut sync = ready(page(&[&["C#", "Go"], &["Rust"]]), &store);

        sync.select_label("Haskell");

        assert_eq!(store.get("tab").as_deref(), Some("Haskell"));
        assert_eq!(active_labels(&sync), vec![None, None]);
        for (_, link) in sync.entries() {
            assert_eq!(link_state(sync.host(), link), (false, "false".to_owned()));
        }
    }

    #[test]
    fn test_group_without_match_is_cleared() {
        let mut sync = ready(page(&[&["C#", "Go"], &["Rust", "Python"]]), NullStore);

        sync.select_label("Python");
        assert_eq!(active_labels(&sync), vec![None, Some("Python".to_owned())]);

        sync.select_label("Go");
        assert_eq!(active_labels(&sync), vec![Some("Go".to_owned()), None]);
    }

    #[test]
    fn test_duplicate_labels_first_match_wins() {
        let mut sync = ready(page(&[&["Go", "C#", "Go"]]), NullStore);

        sync.select_label("Go");

        let group = &sync.groups()[0];
        let doc = sync.host();
        assert!(doc.has_class(group.panes()[0].node(), "active"));
        assert!(!doc.has_class(group.panes()[2].node(), "active"));
        assert_eq!(
            link_state(doc, group.panes()[2].link().unwrap()),
            (false, "false".to_owned())
        );
    }

    #[test]
    fn test_null_store_still_synchronizes() {
        let mut sync = ready(page(&[&["C#", "Go"], &["Go", "C#"]]), NullStore);
        assert_eq!(sync.selected_label(), Some("C#"));

        sync.select_label("Go");
        assert_eq!(
            active_labels(&sync),
            vec![Some("Go".to_owned()), Some("Go".to_owned())]
        );
    }

    #[test]
    fn test_initialize_twice_is_ignored() {
        let mut sync = ready(page(&[&["C#", "Go"]]), NullStore);
        let before = sync.host().to_html();

        sync.initialize();

        assert_eq!(sync.host().to_html(), before);
        assert_eq!(sync.groups()[0].panes().len(), 2);
        assert_eq!(sync.entries().count(), 2);
    }

    #[test]
    fn test_missing_title_is_empty_label() {
        let doc = Document::parse(
            r#"<div class="code-tabs"><ul class="nav-tabs"></ul><div class="tab-content"><div class="tab-pane"></div><div class="tab-pane" title="Go"></div></div></div>"#,
        )
        .unwrap();
        let mut sync = ready(doc, NullStore);

        assert_eq!(sync.groups()[0].panes()[0].label(), "");
        sync.select_label("");
        assert_eq!(active_labels(&sync), vec![Some(String::new())]);
    }

    #[test]
    fn test_pane_outside_group_consumes_id() {
        let doc = Document::parse(
            r#"<div class="tab-content"><div class="tab-pane" title="C#" id="old"></div></div><div class="code-tabs"><ul class="nav-tabs"></ul><div class="tab-content"><div class="tab-pane" title="C#"></div></div></div>"#,
        )
        .unwrap();
        let sync = ready(doc, NullStore);

        let doc = sync.host();
        assert!(doc.element_by_id("tab0").is_some());
        assert!(doc.element_by_id("old").is_none());
        assert_eq!(sync.groups().len(), 1);
        assert_eq!(sync.groups()[0].panes()[0].id(), "tab1");
        // The orphan pane is never toggled
        let orphan = doc.element_by_id("tab0").unwrap();
        assert!(!doc.has_class(&orphan, "active"));
    }

    #[test]
    fn test_pane_outside_tab_content_is_ignored() {
        let doc = Document::parse(
            r#"<div class="code-tabs"><ul class="nav-tabs"></ul><div class="tab-pane" title="C#"></div><div class="tab-content"><div class="tab-pane" title="C#"></div></div></div>"#,
        )
        .unwrap();
        let sync = ready(doc, NullStore);

        assert_eq!(sync.groups()[0].panes().len(), 1);
        assert_eq!(sync.entries().count(), 1);
    }

    #[test]
    fn test_group_without_nav_list_still_syncs() {
        let doc = Document::parse(
            r#"<div class="code-tabs"><div class="tab-content"><div class="tab-pane" title="C#"></div><div class="tab-pane" title="Go"></div></div></div>"#,
        )
        .unwrap();
        let mut sync = ready(doc, NullStore);

        assert_eq!(sync.entries().count(), 0);
        sync.select_label("Go");
        assert_eq!(active_labels(&sync), vec![Some("Go".to_owned())]);
    }

    #[test]
    fn test_custom_settings() {
        let store = MemoryStore::new().with_value("lang", "Go");
        let mut sync = Synchronizer::new(page(&[&["Rust", "Go"]]), &store).with_settings(Settings {
            storage_key: "lang".to_owned(),
            default_label: "Rust".to_owned(),
        });
        sync.initialize();
        assert_eq!(sync.selected_label(), Some("Go"));

        sync.select_label("Rust");
        assert_eq!(store.get("lang").as_deref(), Some("Rust"));
        assert_eq!(store.get("tab"), None);
    }

    #[test]
    fn test_select_before_initialize_only_persists() {
        let store = MemoryStore::new();
        let mut sync = Synchronizer::new(page(&[&["C#", "Go"]]), &store);

        sync.select_label("Go");
        assert_eq!(sync.state(), State::Uninitialized);
        assert_eq!(store.get("tab").as_deref(), Some("Go"));
        assert!(!sync.host().to_html().contains("nav-item"));

        // The pending choice is picked up on initialization
        sync.initialize();
        assert_eq!(active_labels(&sync), vec![Some("Go".to_owned())]);
    }

    #[test]
    fn test_links_inside_panes_untouched() {
        let doc = Document::parse(
            r#"<div class="code-tabs"><ul class="nav-tabs"></ul><div class="tab-content"><div class="tab-pane" title="C#"><a id="doc-link">C#</a></div></div></div>"#,
        )
        .unwrap();
        let sync = ready(doc, NullStore);

        let doc = sync.host();
        let link = doc.element_by_id("doc-link").unwrap();
        assert_eq!(doc.attribute(&link, "class"), None);
        assert_eq!(doc.attribute(&link, "aria-selected"), None);
    }
}
