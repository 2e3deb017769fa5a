//! `folio create` command implementation.

use clap::Args;
use folio_pages::{Fields, FlatFiles, Page, Value};

use super::parse_assignment;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the create command.
#[derive(Args)]
pub(crate) struct CreateArgs {
    /// Slug of the new page.
    slug: String,

    /// Page title.
    #[arg(short, long)]
    title: String,

    /// Page body.
    #[arg(long, default_value = "")]
    content: String,

    /// Slug of the parent page.
    #[arg(short, long)]
    parent: Option<String>,

    /// Extra metadata field, repeatable (e.g. `--set weight=3`).
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    fields: Vec<(String, Value)>,
}

impl CreateArgs {
    /// Execute the create command.
    pub(crate) fn execute(self, repo: &FlatFiles, output: &Output) -> Result<(), CliError> {
        let mut meta: Fields = self.fields.into_iter().collect();
        meta.insert("slug".to_owned(), Value::from(self.slug));
        meta.insert("title".to_owned(), Value::from(self.title));
        if let Some(parent) = self.parent {
            meta.insert("parent".to_owned(), Value::from(parent));
        }

        let page = repo.create(Page::new(meta, self.content, Vec::new())?)?;
        output.success(&format!("Created {}", page.slug()));
        Ok(())
    }
}
