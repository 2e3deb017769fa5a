//! Flat-file page repository for Folio.
//!
//! This crate provides:
//! - [`Page`]: a slug-identified document with metadata, body, sections and
//!   parent/children relations
//! - [`FlatFiles`]: a repository storing one file per page, with caching and
//!   per-slug locking
//! - [`Pages`]: an immutable, chainable query collection
//! - [`FrontMatterRenderer`]: the YAML front matter file format
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use folio_pages::{FlatFiles, FrontMatterRenderer, Patch, SortOrder};
//! use folio_storage_fs::FsStorage;
//!
//! let repo = FlatFiles::new(
//!     Arc::new(FsStorage::new("content/pages")),
//!     Arc::new(FrontMatterRenderer),
//!     "md",
//! );
//!
//! // List visible blog posts, newest first
//! let posts = repo.all(Some("blog"))?.visible().order(SortOrder::Descending, "date");
//!
//! // Hide a page
//! repo.patch("blog/old-post", &Patch::new().set("hidden", true))?;
//! # Ok(())
//! # }
//! ```

mod error;
mod flat_files;
mod front_matter;
mod locks;
pub(crate) mod page;
pub(crate) mod pages;
mod patch;
mod renderer;
mod section;
mod slug;
mod source;
mod value;

pub use error::{PageError, RenderError};
pub use flat_files::FlatFiles;
pub use front_matter::FrontMatterRenderer;
pub use page::{Page, Relation};
pub use pages::{Pages, SortOrder};
pub use patch::Patch;
pub use renderer::{PageRenderer, ParseContext};
pub use section::Section;
pub use slug::{is_valid_slug, normalize_slug};
pub use source::PageSource;
pub use value::{Fields, Value};
