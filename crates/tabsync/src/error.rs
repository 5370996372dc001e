//! CLI error types.

use std::path::PathBuf;

use tabsync_config::ConfigError;
use tabsync_page::PageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Page { path: PathBuf, source: PageError },

    #[error("{0}")]
    Validation(String),
}
