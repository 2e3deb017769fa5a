//! Extension trait for [`Storage`] with typed convenience methods.

use crate::{Storage, StorageError, StorageErrorKind};

/// Typed convenience methods for [`Storage`].
///
/// Implemented as default methods on an extension trait so that:
///
/// - [`Storage`] stays object-safe
/// - Implementors only need to handle raw strings
/// - Callers get typed access via a blanket impl, including on `dyn Storage`
pub trait StorageExt: Storage {
    /// Read a file, returning `None` when it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] for every failure other than "not found".
    fn read_optional(&self, path: &str) -> Result<Option<String>, StorageError> {
        match self.read(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == StorageErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Read a file and pass its content through `transform`.
    ///
    /// The raw content never reaches the caller, only the transformed value
    /// (typically a parsed page). A missing file yields `Ok(None)` without
    /// calling `transform`.
    ///
    /// # Errors
    ///
    /// Returns the storage error (converted into `E`) if the read fails, or
    /// whatever `transform` returns.
    fn read_optional_with<T, E, F>(&self, path: &str, transform: F) -> Result<Option<T>, E>
    where
        E: From<StorageError>,
        F: FnOnce(String) -> Result<T, E>,
    {
        self.read_optional(path)?.map(transform).transpose()
    }
}

impl<S: Storage + ?Sized> StorageExt for S {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Storage holding a single file.
    struct OneFile;

    impl Storage for OneFile {
        fn exists(&self, path: &str) -> bool {
            path == "a.md"
        }

        fn read(&self, path: &str) -> Result<String, StorageError> {
            match path {
                "a.md" => Ok("hello".to_owned()),
                "locked.md" => Err(StorageError::new(StorageErrorKind::PermissionDenied)),
                _ => Err(StorageError::not_found(path)),
            }
        }

        fn write(&self, _path: &str, _content: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn rename(&self, _from: &str, _to: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn delete(&self, _path: &str) -> Result<bool, StorageError> {
            Ok(false)
        }

        fn walk(
            &self,
            _start: &str,
            visit: &mut dyn FnMut(&str, &str),
        ) -> Result<(), StorageError> {
            visit("a.md", "");
            Ok(())
        }
    }

    #[test]
    fn test_read_optional_with_applies_transform() {
        let len = OneFile
            .read_optional_with("a.md", |s| Ok::<_, StorageError>(s.len()))
            .unwrap();
        assert_eq!(len, Some(5));
    }

    #[test]
    fn test_read_optional_with_skips_missing() {
        let called = std::cell::Cell::new(false);
        let result = OneFile
            .read_optional_with("missing.md", |s| {
                called.set(true);
                Ok::<_, StorageError>(s)
            })
            .unwrap();
        assert!(result.is_none());
        assert!(!called.get());
    }

    #[test]
    fn test_read_optional_with_works_on_trait_object() {
        let storage: &dyn Storage = &OneFile;
        let upper = storage
            .read_optional_with("a.md", |s| Ok::<_, StorageError>(s.to_uppercase()))
            .unwrap();
        assert_eq!(upper.as_deref(), Some("HELLO"));
        let err = storage
            .read_optional_with("locked.md", |s| Ok::<_, StorageError>(s))
            .unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::PermissionDenied);
    }

    #[test]
    fn test_read_optional() {
        assert_eq!(OneFile.read_optional("a.md").unwrap().as_deref(), Some("hello"));
        assert!(OneFile.read_optional("missing.md").unwrap().is_none());
        assert_eq!(
            OneFile.read_optional("locked.md").unwrap_err().kind(),
            StorageErrorKind::PermissionDenied
        );
    }
}
