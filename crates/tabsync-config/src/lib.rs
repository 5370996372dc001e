//! Configuration management for tabsync.
//!
//! Parses `tabsync.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [tabs]
//! default_label = "C#"
//! storage_key = "tab"
//!
//! [store]
//! enabled = true
//! dir = "${XDG_STATE_HOME:-~/.local/state}/tabsync"
//! origin = "https://docs.example.com"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `store.dir` supports `${VAR}`, `${VAR:-default}` and a leading `~`.
//! A relative `store.dir` is resolved against the directory holding the
//! config file.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the default label.
    pub default_label: Option<String>,
    /// Override the store enabled flag.
    pub store_enabled: Option<bool>,
    /// Override the preference directory.
    pub store_dir: Option<PathBuf>,
    /// Override the origin that scopes stored preferences.
    pub origin: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tabsync.toml";

/// Default preference directory, relative to the config directory.
const DEFAULT_STORE_DIR: &str = ".tabsync/prefs";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tab selection configuration.
    pub tabs: TabsConfig,
    /// Preference store configuration (paths are relative strings from TOML).
    store: StoreConfigRaw,

    /// Resolved store configuration (set after loading).
    #[serde(skip)]
    pub store_resolved: StoreConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Tab selection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Label selected when no preference is stored.
    pub default_label: String,
    /// Key under which the selected label is stored.
    pub storage_key: String,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            default_label: "C#".to_owned(),
            storage_key: "tab".to_owned(),
        }
    }
}

/// Raw store configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoreConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
    origin: Option<String>,
}

/// Resolved preference store configuration with absolute paths.
#[derive(Debug, Default)]
pub struct StoreConfig {
    /// Whether preferences are persisted at all.
    pub enabled: bool,
    /// Directory holding one preference file per origin.
    pub dir: PathBuf,
    /// Origin that scopes stored preferences.
    pub origin: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`store.dir`").
        field: String,
        /// Error message (e.g., "${`PREFS_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `tabsync.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(label) = &settings.default_label {
            self.tabs.default_label.clone_from(label);
        }
        if let Some(enabled) = settings.store_enabled {
            self.store_resolved.enabled = enabled;
        }
        if let Some(dir) = &settings.store_dir {
            self.store_resolved.dir.clone_from(dir);
        }
        if let Some(origin) = &settings.origin {
            self.store_resolved.origin.clone_from(origin);
        }
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.tabs.storage_key, "tabs.storage_key")?;
        if self.store_resolved.enabled {
            require_non_empty(&self.store_resolved.origin, "store.origin")?;
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.exists())
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            tabs: TabsConfig::default(),
            store: StoreConfigRaw::default(),
            store_resolved: StoreConfig {
                enabled: true,
                dir: base.join(DEFAULT_STORE_DIR),
                origin: "localhost".to_owned(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.store.dir {
            self.store.dir = Some(expand::expand_env(dir, "store.dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.store_resolved = StoreConfig {
            enabled: self.store.enabled.unwrap_or(true),
            dir: config_dir.join(self.store.dir.as_deref().unwrap_or(DEFAULT_STORE_DIR)),
            origin: self
                .store
                .origin
                .clone()
                .unwrap_or_else(|| "localhost".to_owned()),
        };
    }
}
