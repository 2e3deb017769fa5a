//! `folio breadcrumb` command implementation.

use clap::Args;
use folio_pages::{FlatFiles, PageError};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the breadcrumb command.
#[derive(Args)]
pub(crate) struct BreadcrumbArgs {
    /// Page identifier (slug).
    id: String,
}

impl BreadcrumbArgs {
    /// Execute the breadcrumb command.
    pub(crate) fn execute(self, repo: &FlatFiles, output: &Output) -> Result<(), CliError> {
        let page = repo
            .read(&self.id)?
            .ok_or_else(|| PageError::NotFound(self.id.clone()))?;

        for ancestor in page.breadcrumb(repo)? {
            output.row(ancestor.slug(), ancestor.title());
        }
        output.row(page.slug(), page.title());
        Ok(())
    }
}
