//! Queryable page collections.
//!
//! [`Pages`] is an ordered, slug-unique list of pages. Every query returns a
//! new collection and leaves the receiver untouched, so queries chain:
//!
//! ```ignore
//! let recent = repo.all(Some("blog"))?
//!     .visible()
//!     .with_parent()
//!     .order(SortOrder::Descending, "date");
//! ```
//!
//! A collection loaded from a repository stays attached to it, which lets
//! [`Pages::all`] reach back for a fresh sub-collection.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::PageError;
use crate::page::Page;
use crate::slug::normalize_slug;
use crate::source::PageSource;
use crate::value::Value;

/// Direction for [`Pages::order`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = Infallible;

    /// `desc` and `descending` (any case) sort descending; anything else
    /// falls back to ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let order = if s.eq_ignore_ascii_case("desc") || s.eq_ignore_ascii_case("descending") {
            Self::Descending
        } else {
            Self::Ascending
        };
        Ok(order)
    }
}

/// An ordered collection of pages with unique slugs.
#[derive(Clone, Default)]
pub struct Pages {
    pages: Vec<Arc<Page>>,
    source: Option<Arc<dyn PageSource>>,
}

impl Pages {
    /// Detached collection; later pages with an already seen slug are
    /// dropped.
    pub fn new(pages: impl IntoIterator<Item = Arc<Page>>) -> Self {
        let mut seen = HashSet::new();
        let pages = pages
            .into_iter()
            .filter(|page| seen.insert(page.slug().to_owned()))
            .collect();
        Self {
            pages,
            source: None,
        }
    }

    /// Collection attached to the repository it was loaded from.
    pub fn attached(
        pages: impl IntoIterator<Item = Arc<Page>>,
        source: Arc<dyn PageSource>,
    ) -> Self {
        Self {
            source: Some(source),
            ..Self::new(pages)
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.source.is_some()
    }

    /// Append a page unless its slug is already present.
    ///
    /// Returns whether the page was added.
    pub(crate) fn push(&mut self, page: Arc<Page>) -> bool {
        if self.contains(page.slug()) {
            return false;
        }
        self.pages.push(page);
        true
    }

    /// Fresh collection of every page under `sub_path`, loaded from the
    /// repository this collection is attached to.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Detached`] for a collection built without a
    /// repository, and propagates repository errors.
    pub fn all(&self, sub_path: Option<&str>) -> Result<Self, PageError> {
        let source = self.source.as_ref().ok_or(PageError::Detached)?;
        source.all_pages(sub_path)
    }

    /// Sort by a field.
    ///
    /// Pages lacking the field sort as if it held an empty string. Pages
    /// with equal values keep their relative order.
    #[must_use]
    pub fn order(&self, order: SortOrder, field: &str) -> Self {
        let mut keyed: Vec<(Value, Arc<Page>)> = self
            .pages
            .iter()
            .map(|page| {
                let key = page.get(field).unwrap_or_else(|| Value::String(String::new()));
                (key, Arc::clone(page))
            })
            .collect();
        keyed.sort_by(|(a, _), (b, _)| match order {
            SortOrder::Ascending => a.sort_cmp(b),
            SortOrder::Descending => b.sort_cmp(a),
        });
        self.derive(keyed.into_iter().map(|(_, page)| page).collect())
    }

    /// Sort with a caller-supplied comparison.
    #[must_use]
    pub fn sort<F>(&self, mut compare: F) -> Self
    where
        F: FnMut(&Page, &Page) -> Ordering,
    {
        let mut pages = self.pages.clone();
        pages.sort_by(|a, b| compare(a, b));
        self.derive(pages)
    }

    /// Keep the pages for which `predicate` returns `true`.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Page) -> bool,
    {
        let pages = self.pages.iter().filter(|p| predicate(p)).cloned().collect();
        self.derive(pages)
    }

    /// Pages that are not hidden.
    #[must_use]
    pub fn visible(&self) -> Self {
        self.visibility(true)
    }

    /// Pages that are hidden; the exact complement of [`Pages::visible`].
    #[must_use]
    pub fn hidden(&self) -> Self {
        self.visibility(false)
    }

    #[must_use]
    pub fn visibility(&self, visible: bool) -> Self {
        self.filter(|page| page.is_hidden() != visible)
    }

    #[must_use]
    pub fn with_parent(&self) -> Self {
        self.filter(Page::has_parent)
    }

    #[must_use]
    pub fn without_parent(&self) -> Self {
        self.filter(|page| !page.has_parent())
    }

    /// Plain list of the pages, with every child collection materialized.
    ///
    /// Pages with children are copied; the pages held by this collection
    /// (possibly shared with a repository cache) are never modified.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Arc<Page>> {
        self.pages.iter().map(Page::materialized).collect()
    }

    /// The pages in collection order.
    #[must_use]
    pub fn get_pages(&self) -> &[Arc<Page>] {
        &self.pages
    }

    /// Page with the given slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Arc<Page>> {
        let slug = normalize_slug(slug);
        self.pages.iter().find(|page| page.slug() == &*slug)
    }

    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    #[must_use]
    pub fn slugs(&self) -> Vec<&str> {
        self.pages.iter().map(|page| page.slug()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Page>> {
        self.pages.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn derive(&self, pages: Vec<Arc<Page>>) -> Self {
        Self {
            pages,
            source: self.source.clone(),
        }
    }
}

impl fmt::Debug for Pages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pages")
            .field("slugs", &self.slugs())
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl FromIterator<Arc<Page>> for Pages {
    fn from_iter<I: IntoIterator<Item = Arc<Page>>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl FromIterator<Page> for Pages {
    fn from_iter<I: IntoIterator<Item = Page>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Arc::new))
    }
}

impl IntoIterator for Pages {
    type Item = Arc<Page>;
    type IntoIter = std::vec::IntoIter<Arc<Page>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

impl<'a> IntoIterator for &'a Pages {
    type Item = &'a Arc<Page>;
    type IntoIter = std::slice::Iter<'a, Arc<Page>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}
