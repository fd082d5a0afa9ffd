//! [`FileRepository`] backed by the local file system.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::FileRepository;
use super::error::StorageError;

/// Reads and writes the real output tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemRepository;

impl FileSystemRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Writes `content` to `path`, creating parent directories first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] naming the directory or file that failed.
    pub async fn try_save_file(&self, content: &[u8], path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|e| StorageError::io(path, e))?;
        debug!(path = %path.display(), bytes = content.len(), "file saved");
        Ok(())
    }

    /// Creates `path` and its ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when the directory cannot be created
    /// (including when a regular file already occupies `path`).
    pub async fn try_create_directory(&self, path: &Path) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| StorageError::io(path, e))
    }

    /// Size of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when its metadata cannot be read.
    pub async fn try_file_size(&self, path: &Path) -> Result<u64, StorageError> {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.len())
            .map_err(|e| StorageError::io(path, e))
    }
}

#[async_trait]
impl FileRepository for FileSystemRepository {
    async fn save_file(&self, content: &[u8], path: &Path) -> bool {
        match self.try_save_file(content, path).await {
            Ok(()) => true,
            Err(error) => {
                warn!(path = %error.path().display(), error = %error, "Error saving file");
                false
            }
        }
    }

    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .is_ok_and(|meta| meta.is_file())
    }

    async fn create_directory(&self, path: &Path) -> bool {
        match self.try_create_directory(path).await {
            Ok(()) => true,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Error creating directory");
                false
            }
        }
    }

    async fn file_size(&self, path: &Path) -> u64 {
        match self.try_file_size(path).await {
            Ok(size) => size,
            Err(error) => {
                debug!(path = %path.display(), error = %error, "file size unavailable");
                0
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_file_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gameboy").join("zelda").join("overworld.mid");
        let repo = FileSystemRepository::new();

        assert!(repo.save_file(b"MThd", &path).await);
        assert_eq!(std::fs::read(&path).unwrap(), b"MThd");
        assert_eq!(repo.file_size(&path).await, 4);
    }

    #[tokio::test]
    async fn test_save_file_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.mid");
        let repo = FileSystemRepository::new();

        assert!(repo.save_file(b"first version", &path).await);
        assert!(repo.save_file(b"second", &path).await);
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_save_file_into_file_parent_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let repo = FileSystemRepository::new();

        assert!(!repo.save_file(b"MThd", &blocker.join("a.mid")).await);
        let err = repo
            .try_save_file(b"MThd", &blocker.join("a.mid"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[tokio::test]
    async fn test_file_exists_only_for_regular_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.mid");
        std::fs::write(&file, b"x").unwrap();
        let repo = FileSystemRepository::new();

        assert!(repo.file_exists(&file).await);
        assert!(!repo.file_exists(temp.path()).await);
        assert!(!repo.file_exists(&temp.path().join("missing.mid")).await);
    }

    #[tokio::test]
    async fn test_create_directory_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nes").join("metroid");
        let repo = FileSystemRepository::new();

        assert!(repo.create_directory(&dir).await);
        assert!(repo.create_directory(&dir).await);
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_create_directory_over_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("taken");
        std::fs::write(&file, b"x").unwrap();

        assert!(!FileSystemRepository::new().create_directory(&file).await);
    }

    #[tokio::test]
    async fn test_file_size_missing_is_zero() {
        let temp = TempDir::new().unwrap();
        let repo = FileSystemRepository::new();
        assert_eq!(repo.file_size(&temp.path().join("missing.mid")).await, 0);
    }
}
