//! Error types for page operations.

use folio_storage::StorageError;

/// Errors from parsing or rendering a page file.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Page file could not be parsed.
    #[error("Cannot parse page `{slug}`: {message}")]
    Parse { slug: String, message: String },
    /// Page could not be serialized.
    #[error("Cannot render page `{slug}`: {message}")]
    Render { slug: String, message: String },
}

/// Errors from page repository and collection operations.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// No page file exists for the slug.
    #[error("Page `{0}` does not exist")]
    NotFound(String),
    /// Page data violates a page invariant.
    #[error("Page not valid: {0}")]
    Invalid(String),
    /// Target slug is already taken by another page file.
    #[error("Page `{0}` already exists")]
    Conflict(String),
    /// Underlying storage failed.
    ///
    /// The message stays generic; the storage error is available as
    /// [`std::error::Error::source`].
    #[error("Storage operation failed")]
    Io(#[source] StorageError),
    /// Writing a new page file failed.
    #[error("Error processing request")]
    ProcessingFailed,
    /// Page file could not be parsed or rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Query needs a repository but the collection has none.
    #[error("Page collection is not attached to a repository")]
    Detached,
}

impl From<StorageError> for PageError {
    fn from(err: StorageError) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use folio_storage::StorageErrorKind;

    use super::*;

    #[test]
    fn test_io_error_hides_path() {
        let storage_err = StorageError::new(StorageErrorKind::PermissionDenied)
            .with_path("/srv/secret/pages/a.md")
            .with_backend("Fs");
        let err = PageError::from(storage_err);

        assert_eq!(err.to_string(), "Storage operation failed");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_render_error_is_transparent() {
        let err = PageError::from(RenderError::Parse {
            slug: "blog/a".to_owned(),
            message: "bad yaml".to_owned(),
        });
        assert_eq!(err.to_string(), "Cannot parse page `blog/a`: bad yaml");
    }
}
