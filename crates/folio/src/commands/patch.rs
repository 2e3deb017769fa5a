//! `folio patch` command implementation.

use clap::Args;
use folio_pages::{FlatFiles, Patch, Value};

use super::{parse_assignment, require_found};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the patch command.
#[derive(Args)]
pub(crate) struct PatchArgs {
    /// Identifier of the page to change.
    id: String,

    /// Set a field, repeatable. An empty value leaves the field unchanged.
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    fields: Vec<(String, Value)>,

    /// Remove a field, repeatable.
    #[arg(short, long, value_name = "KEY")]
    unset: Vec<String>,
}

impl PatchArgs {
    /// Execute the patch command.
    pub(crate) fn execute(self, repo: &FlatFiles, output: &Output) -> Result<(), CliError> {
        let patch: Patch = self
            .fields
            .into_iter()
            .map(|(key, value)| (key, Some(value)))
            .chain(self.unset.into_iter().map(|key| (key, None)))
            .collect();
        if patch.is_empty() {
            return Err(CliError::Validation(
                "nothing to change, pass --set or --unset".to_owned(),
            ));
        }

        require_found(repo.patch(&self.id, &patch)?, &self.id)?;
        output.success(&format!("Patched {}", self.id));
        Ok(())
    }
}
