//! Page host abstraction for tabsync.
//!
//! The tab synchronizer never talks to a concrete DOM. It drives a
//! [`TabHost`], a handful of element queries and mutations that any page
//! representation can provide. Two hosts exist:
//!
//! - [`Document`] (this crate): an in-memory element tree parsed from XHTML,
//!   used for static pre-rendering and tests
//! - `WebPage` (`tabsync-web`): the live browser DOM through `web-sys`
//!
//! # Example
//!
//! ```
//! use tabsync_page::{Document, TabHost};
//!
//! let mut doc = Document::parse(r#"<div class="tab-pane" title="Go"></div>"#).unwrap();
//! let panes = doc.elements_with_class("tab-pane");
//! assert_eq!(doc.attribute(&panes[0], "title").as_deref(), Some("Go"));
//!
//! doc.set_class(&panes[0], "active", true);
//! assert_eq!(
//!     doc.to_html(),
//!     r#"<div class="tab-pane active" title="Go"></div>"#
//! );
//! ```

mod document;
mod entities;
mod error;
mod host;
mod parser;
mod serializer;

pub use document::{Document, NodeId};
pub use error::PageError;
pub use host::TabHost;
