//! Extension trait for [`PreferenceStore`] with fallback-aware reads.

use crate::PreferenceStore;

/// Convenience reads for [`PreferenceStore`].
///
/// Implemented for every store through a blanket impl, so implementors only
/// provide raw `get` / `set`.
pub trait PreferenceStoreExt: PreferenceStore {
    /// Read a value, treating an empty string the same as an absent key.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Read a value, falling back to `fallback` when absent or empty.
    fn get_or(&self, key: &str, fallback: &str) -> String {
        self.get_non_empty(key).unwrap_or_else(|| fallback.to_owned())
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStoreExt for S {}
