//! CLI command implementations.

mod breadcrumb;
mod create;
mod delete;
mod index;
mod list;
mod patch;
mod show;
mod update;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_pages::{FlatFiles, FrontMatterRenderer, PageError, Value};
use folio_storage_fs::FsStorage;

pub(crate) use breadcrumb::BreadcrumbArgs;
pub(crate) use create::CreateArgs;
pub(crate) use delete::DeleteArgs;
pub(crate) use index::IndexArgs;
pub(crate) use list::ListArgs;
pub(crate) use patch::PatchArgs;
pub(crate) use show::ShowArgs;
pub(crate) use update::UpdateArgs;

use crate::error::CliError;

/// Options locating the page repository, shared by every command.
#[derive(Args)]
pub(crate) struct RepositoryArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pages directory (overrides config).
    #[arg(short = 'd', long, global = true, env = "FOLIO_PAGES_DIR")]
    pages_dir: Option<PathBuf>,

    /// Page file extension (overrides config).
    #[arg(short, long, global = true)]
    extension: Option<String>,
}

impl RepositoryArgs {
    /// Load configuration and open the repository it points at.
    pub(crate) fn open(self) -> Result<FlatFiles, CliError> {
        let cli_settings = CliSettings {
            pages_dir: self.pages_dir,
            extension: self.extension,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let pages = config.pages_resolved;

        tracing::info!(
            dir = %pages.dir.display(),
            extension = %pages.extension,
            config = ?config.config_path,
            "Opening page repository"
        );

        Ok(FlatFiles::new(
            Arc::new(FsStorage::new(pages.dir)),
            Arc::new(FrontMatterRenderer),
            &pages.extension,
        ))
    }
}

/// Parse a `key=value` argument. The value is read as a YAML scalar, so
/// `weight=3` is a number and `hidden=true` a boolean.
pub(crate) fn parse_assignment(arg: &str) -> Result<(String, Value), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{arg}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in `{arg}`"));
    }
    Ok((key.to_owned(), Value::parse_literal(value)))
}

/// Turn a `false` result from a write operation into a not-found error.
fn require_found(found: bool, id: &str) -> Result<(), CliError> {
    if found {
        Ok(())
    } else {
        Err(PageError::NotFound(id.to_owned()).into())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_assignment_typed_values() {
        assert_eq!(
            parse_assignment("weight=3").unwrap(),
            ("weight".to_owned(), Value::Integer(3))
        );
        assert_eq!(
            parse_assignment("hidden=true").unwrap(),
            ("hidden".to_owned(), Value::Bool(true))
        );
        assert_eq!(
            parse_assignment("title=Hello world").unwrap(),
            ("title".to_owned(), Value::from("Hello world"))
        );
    }

    #[test]
    fn test_parse_assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("query=a=b").unwrap(),
            ("query".to_owned(), Value::from("a=b"))
        );
    }

    #[test]
    fn test_parse_assignment_empty_value() {
        let (key, value) = parse_assignment("tag=").unwrap();
        assert_eq!(key, "tag");
        assert!(value.is_empty());
    }

    #[test]
    fn test_parse_assignment_rejects_malformed() {
        assert!(parse_assignment("no-equals").is_err());
        assert!(parse_assignment("=value").is_err());
    }

    #[test]
    fn test_require_found() {
        assert!(require_found(true, "a").is_ok());
        assert!(matches!(
            require_found(false, "a"),
            Err(CliError::Page(PageError::NotFound(id))) if id == "a"
        ));
    }
}
