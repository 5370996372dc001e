//! Preference persistence layer for tabsync.
//!
//! The selected tab label survives page loads by being written to a small
//! key-value store scoped to one origin. This crate defines that contract and
//! its implementations:
//!
//! - [`PreferenceStore`]: best-effort `get` / `set` of string values
//! - [`PreferenceStoreExt`]: fallback-aware convenience reads
//!
//! # Implementations
//!
//! - [`NullStore`]: persistence disabled (always absent, writes dropped)
//! - [`MemoryStore`]: in-process map, for tests and embedding
//! - [`FileStore`]: one JSON file per origin on disk
//!
//! # Example
//!
//! ```
//! use tabsync_store::{MemoryStore, PreferenceStore, PreferenceStoreExt};
//!
//! let store = MemoryStore::new();
//! assert_eq!(store.get_or("tab", "C#"), "C#");
//!
//! store.set("tab", "Rust");
//! assert_eq!(store.get("tab").as_deref(), Some("Rust"));
//! ```

mod ext;
mod file;
mod memory;

pub use ext::PreferenceStoreExt;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Key-value persistence for user preferences.
///
/// Both operations are best effort: a store that cannot read reports the key
/// as absent, and a store that cannot write drops the value. Callers never
/// see an error, because a lost preference only costs the user one click on
/// the next page load.
pub trait PreferenceStore {
    /// Read the value stored under `key`, or `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }
}

/// No-op [`PreferenceStore`] used when persistence is disabled.
///
/// Every `get` returns `None`; every `set` is silently discarded.
pub struct NullStore;

impl PreferenceStore for NullStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}
}
