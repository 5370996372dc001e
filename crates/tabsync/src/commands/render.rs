//! `tabsync render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tabsync_config::CliSettings;
use tabsync_core::{PreferenceStore, Settings, Synchronizer};
use tabsync_page::Document;

use super::{StoreArgs, open_store, read_page, sync_settings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// XHTML page to render.
    input: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Select this label after loading, as a click on its tab would.
    #[arg(long)]
    select: Option<String>,

    /// Label used when nothing is stored (overrides config).
    #[arg(long)]
    default_label: Option<String>,

    /// Neither read nor write stored preferences.
    #[arg(long)]
    no_store: bool,

    #[command(flatten)]
    store: StoreArgs,
}

/// Result of rendering one page.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Rendered {
    /// Page markup with navigation and selection applied.
    pub(crate) html: String,
    /// Label in effect after rendering.
    pub(crate) label: String,
    /// Number of tab groups found.
    pub(crate) groups: usize,
    /// Number of groups showing `label`.
    pub(crate) matched: usize,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            default_label: self.default_label.clone(),
            store_enabled: self.no_store.then_some(false),
            ..CliSettings::default()
        };
        let config = self.store.load_config(cli_settings)?;

        let page = read_page(&self.input)?;
        let rendered = render(
            page,
            open_store(&config),
            sync_settings(&config),
            self.select.as_deref(),
        );

        match &self.output {
            Some(path) => std::fs::write(path, &rendered.html)?,
            None => std::io::stdout().lock().write_all(rendered.html.as_bytes())?,
        }

        if rendered.matched < rendered.groups {
            output.warning(&format!(
                "{} of {} tab groups have no \"{}\" tab",
                rendered.groups - rendered.matched,
                rendered.groups,
                rendered.label
            ));
        }
        if let Some(path) = &self.output {
            output.success(&format!(
                "Rendered {} tab groups showing \"{}\" to {}",
                rendered.groups,
                rendered.label,
                path.display()
            ));
        }

        Ok(())
    }
}

/// Initialize a synchronizer over `page`, optionally select `select`, and
/// serialize the result.
pub(crate) fn render<S: PreferenceStore>(
    page: Document,
    store: S,
    settings: Settings,
    select: Option<&str>,
) -> Rendered {
    let mut sync = Synchronizer::new(page, store).with_settings(settings);
    sync.initialize();
    if let Some(label) = select {
        sync.select_label(label);
    }

    let label = sync.selected_label().unwrap_or_default().to_owned();
    let matched = sync
        .groups()
        .iter()
        .filter(|group| group.labels().any(|l| l == label))
        .count();

    Rendered {
        html: sync.host().to_html(),
        label,
        groups: sync.groups().len(),
        matched,
    }
}
