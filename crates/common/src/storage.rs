//! Media storage abstraction for uploaded files.
//!
//! Video files, thumbnails and profile images are written through a
//! [`MediaStorage`] backend and served from the URL it reports back.

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// Stored media metadata.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    /// Storage key (path or object key).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MD5 hash of the file.
    pub md5: String,
}

/// Media storage backend trait.
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Upload a file.
    async fn upload(&self, key: &str, data: &[u8]) -> AppResult<StoredMedia>;

    /// Delete a file. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;

    /// Check if a file exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}

/// Local filesystem storage backend.
pub struct LocalMediaStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalMediaStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self { base_path, base_url }
    }
}

#[async_trait::async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn upload(&self, key: &str, data: &[u8]) -> AppResult<StoredMedia> {
        let path = self.base_path.join(key);

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::MediaUpload(format!("Failed to create directory: {e}")))?;
        }

        // Write file
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::MediaUpload(format!("Failed to write file: {e}")))?;

        let md5 = format!("{:x}", md5::compute(data));

        Ok(StoredMedia {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            md5,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.base_path.join(key);
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::MediaUpload(format!("Failed to delete file: {e}")))?;
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.base_path.join(key);
        Ok(path.exists())
    }
}

/// Generate a storage key for a file, preserving the original extension.
#[must_use]
pub fn generate_storage_key(file_id: &str, original_name: &str) -> String {
    original_name.rsplit_once('.').map_or_else(
        || file_id.to_string(),
        |(_, ext)| format!("{file_id}.{ext}"),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key() {
        assert_eq!(generate_storage_key("abc123", "clip.mp4"), "abc123.mp4");
        assert_eq!(generate_storage_key("abc123", "thumb.png"), "abc123.png");
        assert_eq!(generate_storage_key("abc123", "noextension"), "abc123");
    }

    #[tokio::test]
    async fn test_local_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("vidtube-storage-{}", std::process::id()));
        let storage = LocalMediaStorage::new(dir.clone(), "/media".to_string());

        let stored = storage.upload("t1.bin", b"hello").await.unwrap();
        assert_eq!(stored.url, "/media/t1.bin");
        assert_eq!(stored.size, 5);
        assert!(storage.exists("t1.bin").await.unwrap());

        storage.delete("t1.bin").await.unwrap();
        assert!(!storage.exists("t1.bin").await.unwrap());
        // Deleting again is a no-op.
        storage.delete("t1.bin").await.unwrap();

        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
