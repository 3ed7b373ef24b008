//! Blob storage for uploaded file bytes.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
#[error("failed to write {path}: {source}")]
pub struct StorageError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

pub trait BlobStorage: Send + Sync {
    /// Write `bytes` under the sanitized `name`, replacing any previous blob.
    fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError>;
}

/// Stores blobs as plain files in one directory.
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StorageError {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BlobStorage for DiskStorage {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.root.join(name);
        std::fs::write(&path, bytes).map_err(|source| StorageError {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_storage_writes_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path().join("uploads")).unwrap();

        let path = storage.write("part.stl", b"first").unwrap();
        assert_eq!(path, storage.root().join("part.stl"));
        storage.write("part.stl", b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_disk_storage_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path()).unwrap();

        // A directory in the way makes the write fail
        std::fs::create_dir(dir.path().join("taken")).unwrap();
        let err = storage.write("taken", b"x").unwrap_err();
        assert_eq!(err.path, dir.path().join("taken"));
    }
}
