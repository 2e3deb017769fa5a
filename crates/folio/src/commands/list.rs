//! `folio list` command implementation.

use clap::Args;
use std::sync::Arc;

use folio_pages::{FlatFiles, Page, SortOrder};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Only list pages under this directory.
    root: Option<String>,

    /// Only pages not marked hidden.
    #[arg(long, conflicts_with = "hidden")]
    visible: bool,

    /// Only pages marked hidden.
    #[arg(long)]
    hidden: bool,

    /// Only pages that name a parent.
    #[arg(long, conflicts_with = "without_parent")]
    with_parent: bool,

    /// Only top-level pages.
    #[arg(long)]
    without_parent: bool,

    /// Order by this field (e.g. `title`, `date`, `weight`).
    #[arg(short, long, value_name = "FIELD")]
    order: Option<String>,

    /// Sort in descending order.
    #[arg(long, requires = "order")]
    desc: bool,

    /// Print pages as a JSON array.
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    /// Execute the list command.
    pub(crate) fn execute(self, repo: &FlatFiles, output: &Output) -> Result<(), CliError> {
        let mut pages = repo.all(self.root.as_deref())?;

        if self.visible {
            pages = pages.visible();
        } else if self.hidden {
            pages = pages.hidden();
        }
        if self.with_parent {
            pages = pages.with_parent();
        } else if self.without_parent {
            pages = pages.without_parent();
        }
        if let Some(field) = &self.order {
            let order = if self.desc {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            pages = pages.order(order, field);
        }

        if self.json {
            let list: Vec<&Page> = pages.iter().map(Arc::as_ref).collect();
            output.data(&serde_json::to_string_pretty(&list)?);
            return Ok(());
        }

        if pages.is_empty() {
            output.warning("No pages found");
        }
        for page in &pages {
            output.row(page.slug(), page.title());
        }
        Ok(())
    }
}
