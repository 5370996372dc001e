//! CLI command implementations.

pub(crate) mod labels;
pub(crate) mod pref;
pub(crate) mod render;

use std::path::{Path, PathBuf};

use clap::Args;
use tabsync_config::{CliSettings, Config};
use tabsync_core::Settings;
use tabsync_page::Document;
use tabsync_store::{FileStore, NullStore, PreferenceStore};

use crate::error::CliError;

pub(crate) use labels::LabelsArgs;
pub(crate) use pref::PrefCommand;
pub(crate) use render::RenderArgs;

/// Options shared by every command that touches stored preferences.
#[derive(Args, Default)]
pub(crate) struct StoreArgs {
    /// Origin that scopes stored preferences (overrides config).
    #[arg(long, env = "TABSYNC_ORIGIN")]
    origin: Option<String>,

    /// Directory holding stored preferences (overrides config).
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover tabsync.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl StoreArgs {
    /// Load configuration with these overrides on top.
    pub(crate) fn load_config(
        &self,
        mut cli_settings: CliSettings,
    ) -> Result<Config, CliError> {
        cli_settings.origin.clone_from(&self.origin);
        cli_settings.store_dir.clone_from(&self.store_dir);
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Open the preference store described by `config`.
pub(crate) fn open_store(config: &Config) -> Box<dyn PreferenceStore> {
    let store = &config.store_resolved;
    if store.enabled {
        tracing::info!(
            dir = %store.dir.display(),
            origin = %store.origin,
            "using file preference store"
        );
        Box::new(FileStore::new(&store.dir, &store.origin))
    } else {
        tracing::info!("preference store disabled");
        Box::new(NullStore)
    }
}

/// Synchronizer settings from configuration.
pub(crate) fn sync_settings(config: &Config) -> Settings {
    Settings {
        storage_key: config.tabs.storage_key.clone(),
        default_label: config.tabs.default_label.clone(),
    }
}

/// Read and parse a page from disk.
pub(crate) fn read_page(path: &Path) -> Result<Document, CliError> {
    let html = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Document::parse(&html).map_err(|source| CliError::Page {
        path: path.to_path_buf(),
        source,
    })
}
