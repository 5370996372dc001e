//! `tabsync labels` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tabsync_core::Synchronizer;
use tabsync_page::Document;
use tabsync_store::NullStore;

use super::read_page;
use crate::error::CliError;

/// Arguments for the labels command.
#[derive(Args)]
pub(crate) struct LabelsArgs {
    /// XHTML page to inspect.
    input: PathBuf,
}

impl LabelsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let page = read_page(&self.input)?;

        let mut stdout = std::io::stdout().lock();
        for line in describe(page) {
            writeln!(stdout, "{line}")?;
        }
        Ok(())
    }
}

/// One line per tab group: `tab0..tab1: C#, Go`.
///
/// Scanning never touches stored preferences.
fn describe(page: Document) -> Vec<String> {
    let mut sync = Synchronizer::new(page, NullStore);
    sync.initialize();

    sync.groups()
        .iter()
        .map(|group| {
            let panes = group.panes();
            let first = panes.first().map_or("", |p| p.id());
            let last = panes.last().map_or("", |p| p.id());
            let labels: Vec<_> = group.labels().collect();
            format!("{first}..{last}: {}", labels.join(", "))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe_groups() {
        let html = r#"<div class="code-tabs"><ul class="nav-tabs"></ul><div class="tab-content"><div class="tab-pane" title="C#"></div><div class="tab-pane" title="Go"></div></div></div><p>prose</p><div class="code-tabs"><div class="tab-content"><div class="tab-pane" title="Rust"></div></div></div>"#;
        let lines = describe(Document::parse(html).unwrap());

        assert_eq!(lines, vec!["tab0..tab1: C#, Go", "tab2..tab2: Rust"]);
    }

    #[test]
    fn test_describe_page_without_tabs() {
        let lines = describe(Document::parse("<p>no tabs here</p>").unwrap());
        assert!(lines.is_empty());
    }
}
