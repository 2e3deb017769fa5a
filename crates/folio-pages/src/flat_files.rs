//! Flat-file page repository.
//!
//! Each page lives in one file named `<slug><extension>` under the storage
//! root, so `blog/hello` is stored at `blog/hello.md`. The repository reads,
//! writes, renames and deletes those files through a [`Storage`] backend and
//! converts between file contents and [`Page`] values with a
//! [`PageRenderer`].
//!
//! # Caching
//!
//! Loaded pages are kept in an in-memory cache keyed by slug. Create, update
//! and patch refresh the entry; delete and rename evict it. The cache is not
//! invalidated by changes made behind the repository's back; use
//! [`FlatFiles::clear_cache`] after external edits.
//!
//! # Concurrency
//!
//! [`FlatFiles`] is cheap to clone and safe to share between threads. Every
//! operation holds the slugs it touches (both the old and the new one for a
//! rename) for its whole duration, so two writers never interleave on one
//! file and a cache miss loads the file at most once.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use folio_storage::{Storage, StorageExt, normalize_dir};

use crate::error::PageError;
use crate::locks::SlugLocks;
use crate::page::Page;
use crate::pages::Pages;
use crate::patch::Patch;
use crate::renderer::{PageRenderer, ParseContext};
use crate::slug::normalize_slug;
use crate::source::PageSource;

struct Inner {
    storage: Arc<dyn Storage>,
    renderer: Arc<dyn PageRenderer>,
    extension: String,
    cache: RwLock<HashMap<String, Arc<Page>>>,
    locks: SlugLocks,
}

/// Page repository backed by one file per page.
#[derive(Clone)]
pub struct FlatFiles {
    inner: Arc<Inner>,
}

impl FlatFiles {
    /// Create a repository over `storage`.
    ///
    /// `extension` may be given with or without the leading dot.
    pub fn new(
        storage: Arc<dyn Storage>,
        renderer: Arc<dyn PageRenderer>,
        extension: &str,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage,
                renderer,
                extension: format!(".{}", extension.trim_start_matches('.')),
                cache: RwLock::new(HashMap::new()),
                locks: SlugLocks::new(),
            }),
        }
    }

    /// File extension including the leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.inner.extension
    }

    /// Load a page; `Ok(None)` if no file exists for the slug.
    ///
    /// Slashes around `id` are ignored. Repeated reads are served from the
    /// cache.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Io`] if the file cannot be read, or
    /// [`PageError::Render`]/[`PageError::Invalid`] if it does not hold a
    /// valid page.
    pub fn read(&self, id: &str) -> Result<Option<Arc<Page>>, PageError> {
        self.read_eval(id, false)
    }

    /// Like [`FlatFiles::read`], asking the renderer to evaluate dynamic
    /// content when the page is loaded from its file.
    ///
    /// # Errors
    ///
    /// Same as [`FlatFiles::read`].
    pub fn read_eval(&self, id: &str, eval: bool) -> Result<Option<Arc<Page>>, PageError> {
        let id = normalize_slug(id);
        let id: &str = &id;
        if let Some(page) = self.cached(id) {
            return Ok(Some(page));
        }
        let _guard = self.inner.locks.lock(&[id]);
        self.load(id, eval)
    }

    /// Store a new page.
    ///
    /// The returned page is the cached copy: children are dropped and an
    /// attached parent is kept by slug only.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Conflict`] if a file for the slug already
    /// exists, [`PageError::Render`] if the page cannot be rendered, and
    /// [`PageError::ProcessingFailed`] if the file cannot be written.
    pub fn create(&self, page: Page) -> Result<Arc<Page>, PageError> {
        let slug = page.slug().to_owned();
        let _guard = self.inner.locks.lock(&[&slug]);

        let path = self.path_for(&slug);
        if self.inner.storage.exists(&path) {
            return Err(PageError::Conflict(slug));
        }

        let data = self.inner.renderer.render(&page)?;
        self.inner.storage.write(&path, &data).map_err(|e| {
            tracing::error!(slug = %slug, error = %e, "Failed to write new page");
            PageError::ProcessingFailed
        })?;

        let page = Arc::new(page.into_stored());
        self.cache_insert(Arc::clone(&page));
        tracing::info!(slug = %slug, "Created page");
        Ok(page)
    }

    /// Replace the page stored under `id` with `page`.
    ///
    /// When `page` carries a different slug the file is renamed first, then
    /// rewritten; the old slug is evicted from the cache. Children and an
    /// attached parent page are not cached, as in [`FlatFiles::create`].
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] if nothing is stored under `id`,
    /// [`PageError::Conflict`] if the new slug is taken, and
    /// [`PageError::Io`] if a storage operation fails.
    pub fn update(&self, id: &str, page: Page) -> Result<bool, PageError> {
        let id = normalize_slug(id);
        let id: &str = &id;
        let slug = page.slug().to_owned();
        let _guard = self.inner.locks.lock(&[id, &slug]);
        self.update_locked(id, page)
    }

    /// Apply a partial update to the page stored under `id`.
    ///
    /// The stored page is loaded, `patch` is applied to its fields and the
    /// result replaces it as with [`FlatFiles::update`], including a rename
    /// when the patch changes the slug.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] if nothing is stored under `id`,
    /// [`PageError::Invalid`] if the patched fields no longer make a valid
    /// page, plus every error of [`FlatFiles::update`].
    pub fn patch(&self, id: &str, patch: &Patch) -> Result<bool, PageError> {
        let id = normalize_slug(id);
        let id: &str = &id;
        let target = patch.target_slug(id);
        let _guard = self.inner.locks.lock(&[id, &target]);

        let current = self
            .load(id, false)?
            .ok_or_else(|| PageError::NotFound(id.to_owned()))?;
        let mut fields = current.to_fields();
        patch.apply(&mut fields);
        let page = Page::from_fields(fields)?;

        self.update_locked(id, page)
    }

    /// Delete the page stored under `id`.
    ///
    /// Returns whether a file was removed. The cache entry is dropped either
    /// way.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Io`] if the file exists but cannot be removed.
    pub fn delete(&self, id: &str) -> Result<bool, PageError> {
        let id = normalize_slug(id);
        let id: &str = &id;
        let _guard = self.inner.locks.lock(&[id]);

        let removed = self.inner.storage.delete(&self.path_for(id))?;
        self.evict(id);
        if removed {
            tracing::info!(slug = %id, "Deleted page");
        }
        Ok(removed)
    }

    /// Slugs of every page file under `root`, sorted.
    ///
    /// Only files ending in the repository extension count. Unless
    /// `list_hidden` is set, files whose name starts with `_` and files whose
    /// first directory below `root` starts with `_` are left out. Slugs are
    /// always relative to the repository root.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Io`] if the directory walk fails.
    pub fn index(&self, list_hidden: bool, root: Option<&str>) -> Result<Vec<String>, PageError> {
        let root = root.map(normalize_dir).unwrap_or_default();
        let extension = self.inner.extension.as_str();
        let mut ids = Vec::new();

        self.inner.storage.walk(&root, &mut |file, dir| {
            let Some(stem) = file.strip_suffix(extension) else {
                return;
            };
            if stem.is_empty() {
                return;
            }
            if !list_hidden && (file.starts_with('_') || dir.starts_with('_')) {
                return;
            }
            let id = [root.as_str(), dir, stem]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("/");
            ids.push(id);
        })?;

        ids.sort();
        Ok(ids)
    }

    /// Every page under `root`, hidden ones included, as a collection
    /// attached to this repository.
    ///
    /// Files that do not parse into a valid page are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Io`] if listing or reading fails.
    pub fn all(&self, root: Option<&str>) -> Result<Pages, PageError> {
        let ids = self.index(true, root)?;
        let mut pages = Vec::with_capacity(ids.len());

        for id in &ids {
            match self.read(id) {
                Ok(Some(page)) => pages.push(page),
                Ok(None) => tracing::debug!(slug = %id, "Page disappeared while listing"),
                Err(PageError::Io(e)) => return Err(PageError::Io(e)),
                Err(e) => tracing::warn!(slug = %id, error = %e, "Skipping invalid page"),
            }
        }

        Ok(Pages::attached(pages, Arc::new(self.clone())))
    }

    /// Cached page for a slug, without touching storage.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn cached(&self, id: &str) -> Option<Arc<Page>> {
        self.inner
            .cache
            .read()
            .unwrap()
            .get(&*normalize_slug(id))
            .cloned()
    }

    /// Forget every cached page.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn clear_cache(&self) {
        self.inner.cache.write().unwrap().clear();
    }

    /// Load a page from storage unless cached. Caller holds the slug.
    fn load(&self, id: &str, eval: bool) -> Result<Option<Arc<Page>>, PageError> {
        if let Some(page) = self.cached(id) {
            return Ok(Some(page));
        }

        let context = ParseContext { slug: id, eval };
        let page = self
            .inner
            .storage
            .read_optional_with(&self.path_for(id), |data| {
                let fields = self.inner.renderer.parse(&data, &context)?;
                Page::from_fields(fields)
            })?;

        let Some(page) = page else {
            return Ok(None);
        };
        let page = Arc::new(page);
        self.cache_insert(Arc::clone(&page));
        tracing::debug!(slug = %id, eval, "Loaded page");
        Ok(Some(page))
    }

    /// Write `page` over the file stored under `id`. Caller holds both slugs.
    fn update_locked(&self, id: &str, page: Page) -> Result<bool, PageError> {
        let path = self.path_for(id);
        if !self.inner.storage.exists(&path) {
            return Err(PageError::NotFound(id.to_owned()));
        }

        let data = self.inner.renderer.render(&page)?;
        let slug = page.slug().to_owned();
        let target = if slug == id {
            path
        } else {
            let new_path = self.path_for(&slug);
            if self.inner.storage.exists(&new_path) {
                return Err(PageError::Conflict(slug));
            }
            self.inner.storage.rename(&path, &new_path)?;
            self.evict(id);
            tracing::info!(from = %id, to = %slug, "Renamed page");
            new_path
        };

        self.inner.storage.write(&target, &data)?;
        self.cache_insert(Arc::new(page.into_stored()));
        tracing::info!(slug = %slug, "Updated page");
        Ok(true)
    }

    fn path_for(&self, id: &str) -> String {
        format!("{id}{}", self.inner.extension)
    }

    fn cache_insert(&self, page: Arc<Page>) {
        self.inner
            .cache
            .write()
            .unwrap()
            .insert(page.slug().to_owned(), page);
    }

    fn evict(&self, id: &str) {
        self.inner.cache.write().unwrap().remove(id);
    }
}

impl PageSource for FlatFiles {
    fn read_page(&self, slug: &str) -> Result<Option<Arc<Page>>, PageError> {
        self.read(slug)
    }

    fn all_pages(&self, root: Option<&str>) -> Result<Pages, PageError> {
        self.all(root)
    }
}

impl fmt::Debug for FlatFiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self.inner.cache.read().map_or(0, |cache| cache.len());
        f.debug_struct("FlatFiles")
            .field("extension", &self.inner.extension)
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}
