//! [`PreferenceStore`] over `window.localStorage`.

use tabsync_store::PreferenceStore;
use web_sys::Storage;

/// Origin-scoped browser storage.
///
/// Storage can be missing (sandboxed iframes, some private browsing modes)
/// or refuse writes (quota). Both degrade to "nothing stored".
#[derive(Default)]
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    /// The window's local storage, or an empty store if it is unavailable.
    pub fn current() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::info!("localStorage unavailable, tab selection will not persist");
        }
        Self { storage }
    }
}

impl PreferenceStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(err) = storage.set_item(key, value) {
            tracing::warn!(key, error = ?err, "cannot write to localStorage");
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn test_local_storage_round_trip() {
        let store = LocalStore::current();
        store.set("tabsync-test", "Go");
        assert_eq!(store.get("tabsync-test").as_deref(), Some("Go"));
    }
}
