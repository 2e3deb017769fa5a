//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for file-per-document persistence,
//! along with [`StorageError`] for unified error handling across backends.
//!
//! # Path Convention
//!
//! All path parameters in Storage methods are **relative paths** using
//! forward slashes, including the file extension:
//! - `"index.md"` - file at the storage root
//! - `"blog/hello.md"` - nested file
//! - `"_drafts/wip.md"` - file in a hidden directory
//!
//! Paths containing `..` are rejected with [`StorageErrorKind::InvalidPath`].

use std::path::{Path, PathBuf};

/// What went wrong, independent of the backend.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// File does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// File already exists.
    AlreadyExists,
    /// Path escapes the storage root or is malformed.
    InvalidPath,
    /// Anything else.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    path: Option<PathBuf>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    /// Path context, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Backend identifier (e.g., "Fs", "Mock").
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create an invalid path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::InvalidPath).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => StorageErrorKind::AlreadyExists,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::AlreadyExists => "Already exists",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Normalize a directory path reported by a walk.
///
/// Converts `\` separators to `/` and trims leading and trailing separators,
/// so the walk root is always reported as `""`.
///
/// # Examples
///
/// ```
/// use folio_storage::normalize_dir;
///
/// assert_eq!(normalize_dir("/blog/2024/"), "blog/2024");
/// assert_eq!(normalize_dir("blog\\drafts"), "blog/drafts");
/// assert_eq!(normalize_dir("/"), "");
/// ```
#[must_use]
pub fn normalize_dir(dir: &str) -> String {
    dir.replace('\\', "/").trim_matches('/').to_owned()
}

/// Storage abstraction for file-per-document persistence.
///
/// Provides a unified interface for the file operations a flat-file
/// repository performs, regardless of backend. Implementations are rooted at
/// a folder and interpret every path relative to it.
///
/// The trait is object-safe; typed helpers live on [`StorageExt`](crate::StorageExt).
pub trait Storage: Send + Sync {
    /// Check if a file exists at the given relative path.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;

    /// Read the raw content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with kind [`StorageErrorKind::NotFound`] if the
    /// file doesn't exist, or the mapped kind if it can't be read.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Write content to a file, creating parent directories as needed.
    ///
    /// Overwrites any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] on permission or disk failure.
    fn write(&self, path: &str, content: &str) -> Result<(), StorageError>;

    /// Move a file from `from` to `to`.
    ///
    /// Parent directories of `to` are created as needed. The destination is
    /// **not** checked: callers must verify it doesn't exist beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with kind [`StorageErrorKind::NotFound`] if the
    /// source doesn't exist, or the mapped kind on I/O failure.
    fn rename(&self, from: &str, to: &str) -> Result<(), StorageError>;

    /// Delete a file.
    ///
    /// Returns `true` if a file was removed, `false` if there was nothing to
    /// remove. Non-existence is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but can't be removed.
    fn delete(&self, path: &str) -> Result<bool, StorageError>;

    /// Walk the directory tree below `start` (root if empty).
    ///
    /// Calls `visit(file_name, dir)` once per regular file, where `dir` is the
    /// directory containing the file relative to `start`, using forward
    /// slashes and trimmed of leading/trailing separators (`""` for files
    /// directly in `start`). No ordering is guaranteed. A missing start
    /// directory produces no visits.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if `start` is invalid or a directory can't be
    /// listed.
    fn walk(&self, start: &str, visit: &mut dyn FnMut(&str, &str)) -> Result<(), StorageError>;
}
