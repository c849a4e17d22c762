//! Local image storage under `UPLOADS_DIR`
//!
//! Files are content-addressed: `<subdir>/<sha256>.<ext>`, so re-uploading the
//! same image is idempotent.

use std::path::PathBuf;

use sha2::{Digest, Sha256};
use shared::error::ErrorCode;

/// Accepted image extensions (lowercase)
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    max_bytes: usize,
}

/// Where a stored file ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Path relative to the storage root, `/` separated
    pub path: String,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check size and extension; returns the lowercase extension
    pub fn validate(&self, filename: &str, data: &[u8]) -> Result<String, ErrorCode> {
        if data.is_empty() {
            return Err(ErrorCode::EmptyFile);
        }
        if data.len() > self.max_bytes {
            return Err(ErrorCode::FileTooLarge);
        }
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
            return Err(ErrorCode::UnsupportedFileFormat);
        }
        Ok(ext)
    }

    /// Write `data` below the sanitised `subdir_hint`
    pub async fn store(
        &self,
        subdir_hint: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<StoredFile, StorageError> {
        let ext = self.validate(filename, data).map_err(StorageError::Rejected)?;

        let hash = hex::encode(Sha256::digest(data));
        let subdir = normalize_subdir(subdir_hint);
        let name = format!("{hash}.{ext}");

        let mut dir = self.root.clone();
        if !subdir.is_empty() {
            dir.push(&subdir);
        }
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&name), data).await?;

        let path = if subdir.is_empty() {
            name
        } else {
            format!("{subdir}/{name}")
        };
        Ok(StoredFile { path })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("upload rejected: {0}")]
    Rejected(ErrorCode),
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
}

/// Keep only `[A-Za-z0-9_-]` in each segment; empty segments vanish
pub fn normalize_subdir(hint: &str) -> String {
    hint.split(['/', '\\'])
        .map(|segment| {
            segment
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .collect::<String>()
        })
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_subdir() {
        assert_eq!(normalize_subdir("restaurant_1/items"), "restaurant_1/items");
        assert_eq!(normalize_subdir("../../etc/passwd"), "etc/passwd");
        assert_eq!(normalize_subdir("/a//b\\c/"), "a/b/c");
        assert_eq!(normalize_subdir("..."), "");
        assert_eq!(normalize_subdir("rest aurant$1"), "restaurant1");
    }

    #[test]
    fn test_validate() {
        let storage = FileStorage::new("/unused", 4);
        assert_eq!(storage.validate("a.PNG", b"1234"), Ok("png".to_string()));
        assert_eq!(storage.validate("a.png", b""), Err(ErrorCode::EmptyFile));
        assert_eq!(storage.validate("a.png", b"12345"), Err(ErrorCode::FileTooLarge));
        assert_eq!(
            storage.validate("a.svg", b"1"),
            Err(ErrorCode::UnsupportedFileFormat)
        );
        assert_eq!(
            storage.validate("noext", b"1"),
            Err(ErrorCode::UnsupportedFileFormat)
        );
    }

    #[tokio::test]
    async fn test_store_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), 1024);

        let first = storage
            .store("restaurant_7/items", "Photo.JPG", b"fake image")
            .await
            .unwrap();
        assert!(first.path.starts_with("restaurant_7/items/"));
        assert!(first.path.ends_with(".jpg"));
        assert_eq!(
            tokio::fs::read(dir.path().join(&first.path)).await.unwrap(),
            b"fake image"
        );

        let again = storage
            .store("restaurant_7/items", "other.jpg", b"fake image")
            .await
            .unwrap();
        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn test_store_stays_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), 1024);
        let stored = storage.store("../../escape", "x.png", b"x").await.unwrap();
        assert!(stored.path.starts_with("escape/"));
        assert!(dir.path().join(&stored.path).exists());
    }

    #[tokio::test]
    async fn test_store_rejects_bad_upload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), 1024);
        let err = storage.store("a", "x.exe", b"x").await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Rejected(ErrorCode::UnsupportedFileFormat)
        ));
    }
}
