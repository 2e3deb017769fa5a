//! Storage abstraction for the Folio page repository.
//!
//! This crate provides a [`Storage`] trait describing the file operations a
//! flat-file repository needs: existence checks, reads, writes, renames,
//! deletes and a recursive walk with a visitor. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (local filesystem, in-memory, object stores)
//! - **Clean separation** between page semantics and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `exists()`, `read()`, `write()`, `rename()`,
//!   `delete()` and `walk()` methods
//! - [`StorageExt`] with `read_optional()` and a transforming
//!   `read_optional_with()` built on top of `read()`
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! The filesystem backend lives in the `folio-storage-fs` crate.
//!
//! # Example
//!
//! ```ignore
//! use folio_storage::{Storage, StorageExt};
//! use folio_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new("content/pages");
//! storage.write("blog/hello.md", "Hello")?;
//! let len = storage.read_optional_with("blog/hello.md", |s| Ok::<_, StorageError>(s.len()))?;
//! ```

mod ext;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use ext::StorageExt;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind, normalize_dir};
