//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::storage::{Storage, StorageError, StorageErrorKind, normalize_dir};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores files in memory keyed by relative path. Use the builder methods
/// to configure the mock with test data and injected failures.
///
/// # Example
///
/// ```ignore
/// use folio_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("index.md", "Home")
///     .with_file("blog/hello.md", "Hello");
///
/// assert!(storage.exists("blog/hello.md"));
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, String>>,
    failing: RwLock<BTreeSet<String>>,
    renames: AtomicUsize,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given relative path and content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Make every write, rename and delete touching `path` fail with
    /// [`StorageErrorKind::PermissionDenied`].
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_path(self, path: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(path.into());
        self
    }

    /// Snapshot of the stored content for a path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn content(&self, path: &str) -> Option<String> {
        self.files.read().unwrap().get(path).cloned()
    }

    /// All stored paths in lexical order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.files.read().unwrap().keys().cloned().collect()
    }

    /// Number of `rename` calls made so far, failed ones included.
    #[must_use]
    pub fn rename_count(&self) -> usize {
        self.renames.load(Ordering::SeqCst)
    }

    fn check(&self, path: &str) -> Result<(), StorageError> {
        if path.contains("..") {
            return Err(StorageError::invalid_path(path).with_backend(BACKEND));
        }
        if self.failing.read().unwrap().contains(path) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }
}

impl Storage for MockStorage {
    fn exists(&self, path: &str) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        if path.contains("..") {
            return Err(StorageError::invalid_path(path).with_backend(BACKEND));
        }
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn write(&self, path: &str, content: &str) -> Result<(), StorageError> {
        self.check(path)?;
        self.files
            .write()
            .unwrap()
            .insert(path.to_owned(), content.to_owned());
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), StorageError> {
        self.renames.fetch_add(1, Ordering::SeqCst);
        self.check(from)?;
        self.check(to)?;
        let mut files = self.files.write().unwrap();
        let content = files
            .remove(from)
            .ok_or_else(|| StorageError::not_found(from).with_backend(BACKEND))?;
        files.insert(to.to_owned(), content);
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<bool, StorageError> {
        self.check(path)?;
        Ok(self.files.write().unwrap().remove(path).is_some())
    }

    fn walk(&self, start: &str, visit: &mut dyn FnMut(&str, &str)) -> Result<(), StorageError> {
        if start.contains("..") {
            return Err(StorageError::invalid_path(start).with_backend(BACKEND));
        }
        let start = normalize_dir(start);
        let prefix = if start.is_empty() {
            String::new()
        } else {
            format!("{start}/")
        };

        // Snapshot so visitors may call back into the storage.
        let paths = self.paths();
        for path in paths {
            let Some(rel) = path.strip_prefix(&prefix) else {
                continue;
            };
            let (dir, name) = rel.rsplit_once('/').unwrap_or(("", rel));
            visit(name, &normalize_dir(dir));
        }
        Ok(())
    }
}
