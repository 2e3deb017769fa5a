//! Filesystem storage implementation for the Folio page repository.
//!
//! This crate provides [`FsStorage`], a filesystem-based implementation of the
//! [`Storage`](folio_storage::Storage) trait. It handles:
//!
//! - Mapping relative paths onto a root folder
//! - Writes that create parent directories on demand
//! - Renames and deletes with "not found" reported as a kind, not a panic
//! - Recursive directory walking for indexing, skipping dot entries
//!
//! # Example
//!
//! ```ignore
//! use folio_storage::Storage;
//! use folio_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new("content/pages");
//! storage.walk("", &mut |file, dir| println!("{dir}/{file}"))?;
//! ```

mod walker;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use folio_storage::{Storage, StorageError, normalize_dir};
use walker::Walker;

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Every path is interpreted relative to the root folder given at
/// construction. The root does not need to exist until the first write.
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Root directory for page files.
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this storage.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate that a relative path doesn't contain path traversal attempts.
    ///
    /// Rejects paths containing `..` to prevent path traversal attacks.
    fn validate_path(path: &str) -> Result<(), StorageError> {
        if path.contains("..") {
            return Err(StorageError::invalid_path(path).with_backend(BACKEND));
        }
        Ok(())
    }

    /// Resolve a relative path to a full filesystem path.
    fn resolve(&self, path: &str) -> PathBuf {
        let rel = normalize_dir(path);
        if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel)
        }
    }

    fn io_error(e: std::io::Error, path: &str) -> StorageError {
        StorageError::io(e, Some(PathBuf::from(path))).with_backend(BACKEND)
    }

    fn create_parent(&self, full_path: &Path, path: &str) -> Result<(), StorageError> {
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(e, path))?;
        }
        Ok(())
    }
}

impl Storage for FsStorage {
    fn exists(&self, path: &str) -> bool {
        Self::validate_path(path).is_ok() && self.resolve(path).is_file()
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        Self::validate_path(path)?;
        let full_path = self.resolve(path);
        if !full_path.is_file() {
            return Err(StorageError::not_found(path).with_backend(BACKEND));
        }
        fs::read_to_string(&full_path).map_err(|e| Self::io_error(e, path))
    }

    fn write(&self, path: &str, content: &str) -> Result<(), StorageError> {
        Self::validate_path(path)?;
        let full_path = self.resolve(path);
        self.create_parent(&full_path, path)?;
        fs::write(&full_path, content).map_err(|e| Self::io_error(e, path))?;
        tracing::debug!(path = %path, bytes = content.len(), "Wrote file");
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), StorageError> {
        Self::validate_path(from)?;
        Self::validate_path(to)?;
        let from_path = self.resolve(from);
        if !from_path.is_file() {
            return Err(StorageError::not_found(from).with_backend(BACKEND));
        }
        let to_path = self.resolve(to);
        self.create_parent(&to_path, to)?;
        fs::rename(&from_path, &to_path).map_err(|e| Self::io_error(e, from))?;
        tracing::debug!(from = %from, to = %to, "Renamed file");
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<bool, StorageError> {
        Self::validate_path(path)?;
        match fs::remove_file(self.resolve(path)) {
            Ok(()) => {
                tracing::debug!(path = %path, "Deleted file");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::io_error(e, path)),
        }
    }

    /// Files and directories whose name starts with `.` are not visited.
    fn walk(&self, start: &str, visit: &mut dyn FnMut(&str, &str)) -> Result<(), StorageError> {
        Self::validate_path(start)?;
        Walker::new(self.resolve(start))
            .walk(visit)
            .map_err(|e| e.with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use folio_storage::{StorageErrorKind, StorageExt};
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_storage_is_send_sync() {
        assert_send_sync::<FsStorage>();
    }

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_exists() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "Guide").unwrap();
        fs::create_dir(temp_dir.path().join("blog")).unwrap();

        let storage = FsStorage::new(temp_dir.path());

        assert!(storage.exists("guide.md"));
        assert!(!storage.exists("missing.md"));
        // Directories are not files
        assert!(!storage.exists("blog"));
    }

    #[test]
    fn test_read_existing_file() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# Guide\n\nContent.").unwrap();

        let storage = FsStorage::new(temp_dir.path());

        assert_eq!(storage.read("guide.md").unwrap(), "# Guide\n\nContent.");
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = create_test_dir();
        let storage = FsStorage::new(temp_dir.path());

        let err = storage.read("missing.md").unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::NotFound);
        assert_eq!(err.backend(), Some("Fs"));
    }

    #[test]
    fn test_read_with_transform() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("a.md"), "one two three").unwrap();
        let storage = FsStorage::new(temp_dir.path());

        let words = storage
            .read_optional_with("a.md", |s| Ok::<_, StorageError>(s.split(' ').count()))
            .unwrap();

        assert_eq!(words, Some(3));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = create_test_dir();
        let storage = FsStorage::new(temp_dir.path().join("pages"));

        storage.write("blog/2024/hello.md", "Hello").unwrap();

        let written =
            fs::read_to_string(temp_dir.path().join("pages/blog/2024/hello.md")).unwrap();
        assert_eq!(written, "Hello");
    }

    #[test]
    fn test_write_overwrites() {
        let temp_dir = create_test_dir();
        let storage = FsStorage::new(temp_dir.path());

        storage.write("a.md", "old").unwrap();
        storage.write("a.md", "new").unwrap();

        assert_eq!(storage.read("a.md").unwrap(), "new");
    }

    #[test]
    fn test_rename_moves_file() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("old.md"), "Body").unwrap();
        let storage = FsStorage::new(temp_dir.path());

        storage.rename("old.md", "nested/new.md").unwrap();

        assert!(!temp_dir.path().join("old.md").exists());
        assert_eq!(storage.read("nested/new.md").unwrap(), "Body");
    }

    #[test]
    fn test_rename_missing_source() {
        let temp_dir = create_test_dir();
        let storage = FsStorage::new(temp_dir.path());

        let err = storage.rename("old.md", "new.md").unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::NotFound);
        assert!(!storage.exists("new.md"));
    }

    #[test]
    fn test_delete_existing_and_missing() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("a.md"), "A").unwrap();
        let storage = FsStorage::new(temp_dir.path());

        assert!(storage.delete("a.md").unwrap());
        assert!(!storage.delete("a.md").unwrap());
        assert!(!temp_dir.path().join("a.md").exists());
    }

    #[test]
    fn test_walk_from_root_and_subdir() {
        let temp_dir = create_test_dir();
        let storage = FsStorage::new(temp_dir.path());
        storage.write("index.md", "").unwrap();
        storage.write("blog/a.md", "").unwrap();
        storage.write("blog/2024/b.md", "").unwrap();

        let mut from_root = Vec::new();
        storage
            .walk("", &mut |file, dir| from_root.push(format!("{dir}|{file}")))
            .unwrap();
        from_root.sort();
        assert_eq!(from_root, vec!["blog/2024|b.md", "blog|a.md", "|index.md"]);

        let mut from_blog = Vec::new();
        storage
            .walk("/blog/", &mut |file, dir| from_blog.push(format!("{dir}|{file}")))
            .unwrap();
        from_blog.sort();
        assert_eq!(from_blog, vec!["2024|b.md", "|a.md"]);
    }

    #[test]
    fn test_walk_skips_dot_entries() {
        let temp_dir = create_test_dir();
        fs::create_dir_all(temp_dir.path().join(".git/refs")).unwrap();
        fs::write(temp_dir.path().join(".git/refs/head.md"), "").unwrap();
        fs::write(temp_dir.path().join(".draft.md"), "").unwrap();
        fs::write(temp_dir.path().join("page.md"), "").unwrap();
        let storage = FsStorage::new(temp_dir.path());

        let mut seen = Vec::new();
        storage
            .walk("", &mut |file, dir| seen.push(format!("{dir}|{file}")))
            .unwrap();
        assert_eq!(seen, vec!["|page.md"]);
    }

    #[test]
    fn test_walk_missing_root() {
        let storage = FsStorage::new("/nonexistent/folio");
        let mut count = 0;
        storage.walk("", &mut |_, _| count += 1).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_rejects_path_traversal() {
        let temp_dir = create_test_dir();
        let storage = FsStorage::new(temp_dir.path());

        for result in [
            storage.read("../secret.md").map(|_| ()),
            storage.write("a/../../b.md", "x"),
            storage.rename("a.md", "../b.md"),
            storage.delete("../a.md").map(|_| ()),
            storage.walk("..", &mut |_, _| {}),
        ] {
            assert_eq!(result.unwrap_err().kind(), StorageErrorKind::InvalidPath);
        }
        assert!(!storage.exists("../secret.md"));
    }
}
