//! Cross-group tab selection for documentation pages.
//!
//! A documentation page often shows the same example in several languages,
//! one `code-tabs` block per example. Picking "Rust" in one block should
//! switch every block on the page to Rust and remember the choice for the
//! next page load. [`Synchronizer`] implements exactly that:
//!
//! - [`Synchronizer::initialize`] scans a [`TabHost`] for tab panes, numbers
//!   them `tab0`, `tab1`, ..., and adds one navigation link per pane
//! - [`Synchronizer::select_label`] applies a label to every group and
//!   persists it to a [`PreferenceStore`]
//! - [`Synchronizer::click`] is what a navigation link does when clicked
//!
//! # Page structure
//!
//! ```html
//! <div class="code-tabs">
//!   <ul class="nav nav-tabs"></ul>
//!   <div class="tab-content">
//!     <div class="tab-pane" title="C#">...</div>
//!     <div class="tab-pane" title="Rust">...</div>
//!   </div>
//! </div>
//! ```
//!
//! # Example
//!
//! ```
//! use tabsync_core::Synchronizer;
//! use tabsync_page::Document;
//! use tabsync_store::{MemoryStore, PreferenceStore};
//!
//! let group = r#"<div class="code-tabs"><ul class="nav-tabs"></ul><div class="tab-content"><div class="tab-pane" title="C#"></div><div class="tab-pane" title="Rust"></div></div></div>"#;
//! let page = Document::parse(&group.repeat(2)).unwrap();
//! let store = MemoryStore::new();
//!
//! let mut sync = Synchronizer::new(page, &store);
//! sync.initialize();
//! assert_eq!(sync.selected_label(), Some("C#"));
//!
//! sync.select_label("Rust");
//! assert_eq!(store.get("tab").as_deref(), Some("Rust"));
//! ```

mod model;
mod synchronizer;

pub use model::{EntryId, TabGroup, TabPane};
pub use synchronizer::{DEFAULT_LABEL, DEFAULT_STORAGE_KEY, Settings, State, Synchronizer};
pub use tabsync_page::TabHost;
pub use tabsync_store::PreferenceStore;
