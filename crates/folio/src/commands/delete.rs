//! `folio delete` command implementation.

use clap::Args;
use folio_pages::FlatFiles;

use super::require_found;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the delete command.
#[derive(Args)]
pub(crate) struct DeleteArgs {
    /// Identifier of the page to delete.
    id: String,
}

impl DeleteArgs {
    /// Execute the delete command.
    pub(crate) fn execute(self, repo: &FlatFiles, output: &Output) -> Result<(), CliError> {
        require_found(repo.delete(&self.id)?, &self.id)?;
        output.success(&format!("Deleted {}", self.id));
        Ok(())
    }
}
