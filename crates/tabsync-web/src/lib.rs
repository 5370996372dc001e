//! Browser entry point for synchronized code tabs.
//!
//! Loading the module scans the page once the document is parsed, builds the
//! tab navigation and restores the selection saved in `localStorage`.
//! Clicking any tab switches every group on the page. Scripts can also call
//! the exported `selectTab(label)`.

mod page;
mod storage;

use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use tabsync_core::{EntryId, Synchronizer};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{DocumentReadyState, Element, Event};

pub use page::WebPage;
pub use storage::LocalStore;

type WebSync = Synchronizer<WebPage, LocalStore>;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

thread_local! {
    static SYNC: OnceCell<Rc<RefCell<WebSync>>> = const { OnceCell::new() };
}

#[wasm_bindgen(start)]
pub fn start() {
    _ = console_log::init_with_level(log::Level::Info);
    console_error_panic_hook::set_once();

    let Some(page) = WebPage::current() else {
        tracing::warn!("no document, code tabs disabled");
        return;
    };
    let document = page.document().clone();
    if document.ready_state() != DocumentReadyState::Loading {
        mount(page);
        return;
    }

    let mut pending = Some(page);
    let on_ready = Closure::wrap(Box::new(move |_: Event| {
        if let Some(page) = pending.take() {
            mount(page);
        }
    }) as Box<dyn FnMut(Event)>);
    if let Err(err) = document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
    {
        tracing::warn!(error = ?err, "cannot wait for DOMContentLoaded");
        return;
    }
    on_ready.forget();
}

/// Select `label` on every tab group and remember it.
///
/// Before the page is mounted this does nothing.
#[wasm_bindgen(js_name = selectTab)]
pub fn select_tab(label: &str) {
    SYNC.with(|cell| match cell.get() {
        Some(sync) => sync.borrow_mut().select_label(label),
        None => tracing::debug!(label, "selectTab before mount, ignoring"),
    });
}

fn mount(page: WebPage) {
    SYNC.with(|cell| {
        if cell.get().is_some() {
            return;
        }
        let mut sync = Synchronizer::new(page, LocalStore::current());
        sync.initialize();

        let sync = Rc::new(RefCell::new(sync));
        bind_clicks(&sync);
        _ = cell.set(sync);
    });
}

/// One click listener per navigation link.
fn bind_clicks(sync: &Rc<RefCell<WebSync>>) {
    let entries: Vec<(EntryId, Element)> = sync
        .borrow()
        .entries()
        .map(|(entry, link)| (entry, link.clone()))
        .collect();

    for (entry, link) in entries {
        let sync = Rc::clone(sync);
        let on_click = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            sync.borrow_mut().click(entry);
        }) as Box<dyn FnMut(Event)>);

        if let Err(err) =
            link.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        {
            tracing::warn!(?entry, error = ?err, "cannot bind tab link");
            continue;
        }
        // Listeners live as long as the page.
        on_click.forget();
    }
}
