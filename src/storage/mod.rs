//! Persistence of downloaded files.
//!
//! The pipeline talks to the disk only through [`FileRepository`], so tests
//! can substitute an in-memory implementation. [`FileSystemRepository`] is
//! the real one, built on `tokio::fs`. Failures are logged here and reported
//! as `false`/`0`; a single unwritable file never aborts a batch.

mod error;
mod filesystem;
mod path;

pub use error::StorageError;
pub use filesystem::FileSystemRepository;
pub use path::sanitize_path_component;

use std::path::Path;

use async_trait::async_trait;

/// Storage operations needed by the download pipeline.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Writes `content` to `path`, creating parent directories. Returns
    /// whether the write succeeded.
    async fn save_file(&self, content: &[u8], path: &Path) -> bool;

    /// Whether `path` exists and is a regular file.
    async fn file_exists(&self, path: &Path) -> bool;

    /// Creates `path` and its ancestors; succeeds if it already exists.
    async fn create_directory(&self, path: &Path) -> bool;

    /// Size of the file at `path` in bytes, `0` if absent or unreadable.
    async fn file_size(&self, path: &Path) -> u64;
}
