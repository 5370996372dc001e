//! File-based preference store.
//!
//! [`FileStore`] keeps one JSON object per origin inside a root directory:
//!
//! ```text
//! {root}/
//! +-- https%3A%2F%2Fdocs.example.com.json    # {"tab": "Rust"}
//! +-- localhost%3A8080.json
//! ```
//!
//! The origin is percent-encoded into the filename, keeping only ASCII
//! letters, digits, `.` and `-`, so distinct origins never share a file. A
//! missing, unreadable or corrupt file reads as
//! an empty store. Write failures are logged and otherwise ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::PreferenceStore;

/// Characters escaped in origin filenames. `_` is escaped too, which keeps
/// [`EMPTY_ORIGIN_STEM`] out of the encoded range.
const ORIGIN_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'-');

/// Filename stem for the empty origin.
const EMPTY_ORIGIN_STEM: &str = "_default";

/// [`PreferenceStore`] persisted as a JSON file scoped to one origin.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store for `origin` under `root`.
    ///
    /// Nothing touches the filesystem until the first `set`.
    #[must_use]
    pub fn new(root: &Path, origin: &str) -> Self {
        Self {
            path: root.join(format!("{}.json", origin_file_stem(origin))),
        }
    }

    /// Path of the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole map, treating every failure as empty.
    fn load(&self) -> BTreeMap<String, String> {
        let Ok(content) = fs::read(&self.path) else {
            return BTreeMap::new();
        };
        match serde_json::from_slice(&content) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(
                    "ignoring corrupt preference file {}: {e}",
                    self.path.display()
                );
                BTreeMap::new()
            }
        }
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.load();
        values.insert(key.to_owned(), value.to_owned());

        let Some(parent) = self.path.parent() else {
            return;
        };
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::warn!("failed to create preference directory: {e}");
            return;
        }

        let Ok(bytes) = serde_json::to_vec_pretty(&values) else {
            return;
        };
        if let Err(e) = fs::write(&self.path, bytes) {
            tracing::warn!(
                "failed to write preference file {}: {e}",
                self.path.display()
            );
        }
    }
}

/// Map an origin such as `https://docs.example.com` to a filename stem.
///
/// The mapping is injective: two origins never share a stem.
fn origin_file_stem(origin: &str) -> String {
    if origin.is_empty() {
        return EMPTY_ORIGIN_STEM.to_owned();
    }
    utf8_percent_encode(origin, ORIGIN_ENCODE_SET).to_string()
}
