//! Recursive directory walking.
//!
//! The walker only discovers files; deciding which of them are pages is left
//! to the repository. Directory names are reported relative to the walk root
//! with forward slashes.

use std::fs;
use std::path::{Path, PathBuf};

use folio_storage::StorageError;

/// Walks a directory tree and reports every regular file to a visitor.
///
/// Entries whose name starts with `.` are skipped. Symlinked files are
/// reported; symlinked directories are not followed.
pub(crate) struct Walker {
    start: PathBuf,
}

impl Walker {
    /// Create a new walker rooted at `start`.
    pub fn new(start: PathBuf) -> Self {
        Self { start }
    }

    /// Walk the tree, calling `visit(file_name, dir)` per file.
    ///
    /// A missing start directory produces no visits.
    pub fn walk(&self, visit: &mut dyn FnMut(&str, &str)) -> Result<(), StorageError> {
        if !self.start.is_dir() {
            return Ok(());
        }
        Self::walk_dir(&self.start, "", visit)
    }

    fn walk_dir(
        dir_path: &Path,
        rel_dir: &str,
        visit: &mut dyn FnMut(&str, &str),
    ) -> Result<(), StorageError> {
        let entries =
            fs::read_dir(dir_path).map_err(|e| StorageError::io(e, Some(dir_path.into())))?;

        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(e, Some(dir_path.into())))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir {
                let child_dir = if rel_dir.is_empty() {
                    name
                } else {
                    format!("{rel_dir}/{name}")
                };
                Self::walk_dir(&entry.path(), &child_dir, visit)?;
            } else if entry.path().is_file() {
                visit(&name, rel_dir);
            }
        }

        Ok(())
    }
}
