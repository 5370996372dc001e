//! `tabsync pref` command implementations.

use std::io::Write;

use clap::{Args, Subcommand};
use tabsync_config::{CliSettings, Config};
use tabsync_store::{FileStore, PreferenceStore};

use super::StoreArgs;
use crate::error::CliError;
use crate::output::Output;

/// Stored selection subcommands.
#[derive(Subcommand)]
pub(crate) enum PrefCommand {
    /// Print the stored label.
    Get(GetArgs),
    /// Store a label, as if it had been clicked.
    Set(SetArgs),
}

impl PrefCommand {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Get(args) => args.execute(),
            Self::Set(args) => args.execute(),
        }
    }
}

/// Arguments for `pref get`.
#[derive(Args)]
pub(crate) struct GetArgs {
    #[command(flatten)]
    store: StoreArgs,
}

impl GetArgs {
    fn execute(self) -> Result<(), CliError> {
        let config = self.store.load_config(CliSettings::default())?;
        let store = file_store(&config)?;

        match store.get(&config.tabs.storage_key) {
            Some(label) => writeln!(std::io::stdout().lock(), "{label}")?,
            None => Output::new().info(&format!(
                "No stored label for {}, pages will show \"{}\"",
                config.store_resolved.origin, config.tabs.default_label
            )),
        }
        Ok(())
    }
}

/// Arguments for `pref set`.
#[derive(Args)]
pub(crate) struct SetArgs {
    /// Label to store.
    label: String,

    #[command(flatten)]
    store: StoreArgs,
}

impl SetArgs {
    fn execute(self) -> Result<(), CliError> {
        let config = self.store.load_config(CliSettings::default())?;
        let store = file_store(&config)?;

        store.set(&config.tabs.storage_key, &self.label);
        if store.get(&config.tabs.storage_key).as_deref() != Some(self.label.as_str()) {
            return Err(CliError::Validation(format!(
                "could not write {}",
                store.path().display()
            )));
        }

        Output::new().success(&format!(
            "Stored \"{}\" for {}",
            self.label, config.store_resolved.origin
        ));
        Ok(())
    }
}

/// The file store for `config`, refusing when persistence is disabled.
fn file_store(config: &Config) -> Result<FileStore, CliError> {
    let store = &config.store_resolved;
    if !store.enabled {
        return Err(CliError::Validation(
            "preference store is disabled in configuration".to_owned(),
        ));
    }
    Ok(FileStore::new(&store.dir, &store.origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, toml: &str) -> Config {
        let path = dir.path().join("tabsync.toml");
        std::fs::write(&path, toml).unwrap();
        Config::load(Some(&path), None).unwrap()
    }

    #[test]
    fn test_file_store_scoped_by_origin() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "[store]\ndir = \"prefs\"\norigin = \"docs.example.com\"\n");

        let store = file_store(&config).unwrap();
        assert_eq!(store.path(), dir.path().join("prefs/docs.example.com.json"));
    }

    #[test]
    fn test_file_store_refused_when_disabled() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "[store]\nenabled = false\n");

        let err = file_store(&config).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn test_set_then_get_through_file_store() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "");

        file_store(&config).unwrap().set("tab", "Rust");
        let reopened = file_store(&config).unwrap();
        assert_eq!(reopened.get("tab").as_deref(), Some("Rust"));
    }
}
