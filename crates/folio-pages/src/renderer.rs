//! Conversion between pages and file contents.

use crate::error::RenderError;
use crate::page::Page;
use crate::value::Fields;

/// Context handed to [`PageRenderer::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext<'a> {
    /// Normalized slug of the page being parsed, derived from its file path.
    pub slug: &'a str,
    /// Whether the caller asked for dynamic content to be evaluated.
    pub eval: bool,
}

/// Serializes pages to file contents and parses them back.
///
/// `parse` returns a field map suitable for [`Page::from_fields`]; it is
/// expected to fill in `slug` from the context and to put the body and
/// sections under `content` and `sections`.
pub trait PageRenderer: Send + Sync {
    /// Render a page to the text stored in its file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Render`] if the page cannot be serialized.
    fn render(&self, page: &Page) -> Result<String, RenderError>;

    /// Parse file contents into page fields.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Parse`] if the data is malformed.
    fn parse(&self, data: &str, context: &ParseContext<'_>) -> Result<Fields, RenderError>;
}
