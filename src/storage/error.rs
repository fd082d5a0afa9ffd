//! Error type for local file-system operations.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while touching the output tree.
///
/// [`FileSystemRepository`](super::FileSystemRepository) logs these and
/// reports `false`/`0` to callers; the typed form is available through its
/// `try_*` methods.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The path the failed operation was acting on.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } => path,
        }
    }
}
