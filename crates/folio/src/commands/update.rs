//! `folio update` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_pages::{FlatFiles, FrontMatterRenderer, Page, PageError, PageRenderer, ParseContext};

use super::require_found;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the update command.
#[derive(Args)]
pub(crate) struct UpdateArgs {
    /// Identifier of the page to replace.
    id: String,

    /// File with the new page, in front matter format.
    #[arg(short, long)]
    from: PathBuf,

    /// New slug, to move the page (default: keep the identifier).
    #[arg(short, long)]
    slug: Option<String>,
}

impl UpdateArgs {
    /// Execute the update command.
    pub(crate) fn execute(self, repo: &FlatFiles, output: &Output) -> Result<(), CliError> {
        let text = std::fs::read_to_string(&self.from)?;
        let slug = self.slug.as_deref().unwrap_or(&self.id);

        let context = ParseContext { slug, eval: false };
        let fields = FrontMatterRenderer
            .parse(&text, &context)
            .map_err(PageError::from)?;
        let page = Page::from_fields(fields)?;
        let new_slug = page.slug().to_owned();

        require_found(repo.update(&self.id, page)?, &self.id)?;
        output.success(&format!("Updated {new_slug}"));
        Ok(())
    }
}
