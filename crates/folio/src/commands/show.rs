//! `folio show` command implementation.

use clap::Args;
use folio_pages::{FlatFiles, FrontMatterRenderer, PageError, PageRenderer};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Page identifier (slug).
    id: String,

    /// Print the page as JSON instead of its file format.
    #[arg(long)]
    json: bool,
}

impl ShowArgs {
    /// Execute the show command.
    pub(crate) fn execute(self, repo: &FlatFiles, output: &Output) -> Result<(), CliError> {
        let page = repo
            .read(&self.id)?
            .ok_or_else(|| PageError::NotFound(self.id.clone()))?;

        if self.json {
            output.data(&serde_json::to_string_pretty(&*page)?);
        } else {
            let text = FrontMatterRenderer.render(&page).map_err(PageError::from)?;
            output.data(text.trim_end());
        }
        Ok(())
    }
}
