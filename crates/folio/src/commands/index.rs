//! `folio index` command implementation.

use clap::Args;
use folio_pages::FlatFiles;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the index command.
#[derive(Args)]
pub(crate) struct IndexArgs {
    /// Only list pages under this directory.
    root: Option<String>,

    /// Include hidden pages (files or directories starting with `_`).
    #[arg(long)]
    hidden: bool,
}

impl IndexArgs {
    /// Execute the index command.
    pub(crate) fn execute(self, repo: &FlatFiles, output: &Output) -> Result<(), CliError> {
        let ids = repo.index(self.hidden, self.root.as_deref())?;
        if ids.is_empty() {
            output.warning("No pages found");
        }
        for id in ids {
            output.data(&id);
        }
        Ok(())
    }
}
