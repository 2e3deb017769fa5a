//! Abstraction over where pages come from.

use std::sync::Arc;

use crate::error::PageError;
use crate::page::Page;
use crate::pages::Pages;

/// Read side of a page repository.
///
/// Lazy relations and attached collections go back to their source to load
/// parents and sub-collections. [`FlatFiles`](crate::FlatFiles) is the
/// production implementation; tests can provide their own.
pub trait PageSource: Send + Sync {
    /// Load a page by slug; `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the page exists but cannot be read or parsed.
    fn read_page(&self, slug: &str) -> Result<Option<Arc<Page>>, PageError>;

    /// Load every page under `root` (or the whole repository).
    ///
    /// # Errors
    ///
    /// Returns an error if listing or reading fails.
    fn all_pages(&self, root: Option<&str>) -> Result<Pages, PageError>;
}
