//! Media service.
//!
//! Thin orchestration over the storage backend: keys are derived from fresh
//! entity references so uploads never collide, and deletes exist so callers
//! can compensate when a database write fails after an upload succeeded.

use std::path::Path;
use std::sync::Arc;

use vidtube_common::{
    AppError, AppResult, IdGenerator, MediaStorage, StoredMedia, generate_storage_key,
};

/// An in-memory file received from a client.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name as sent by the client.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Media service for uploaded assets.
#[derive(Clone)]
pub struct MediaService {
    storage: Arc<dyn MediaStorage>,
    id_gen: IdGenerator,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub fn new(storage: Arc<dyn MediaStorage>) -> Self {
        Self {
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Upload raw bytes under a freshly generated key.
    pub async fn upload(&self, original_name: &str, bytes: &[u8]) -> AppResult<StoredMedia> {
        if bytes.is_empty() {
            return Err(AppError::MediaUpload("Empty file".to_string()));
        }

        let key = generate_storage_key(&self.id_gen.generate(), original_name);
        let stored = self.storage.upload(&key, bytes).await?;

        tracing::debug!(key = %stored.key, size = stored.size, "Uploaded media");
        Ok(stored)
    }

    /// Upload a client-supplied file.
    pub async fn upload_file(&self, file: &UploadFile) -> AppResult<StoredMedia> {
        self.upload(&file.file_name, &file.bytes).await
    }

    /// Upload a file staged on the local filesystem.
    ///
    /// The staged file is removed whether the upload succeeds or fails.
    pub async fn upload_local_file(&self, path: &Path) -> AppResult<StoredMedia> {
        let read = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::MediaUpload(format!("Failed to read staged file: {e}")));

        let result = match read {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default();
                self.upload(name, &bytes).await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove staged file");
        }

        result
    }

    /// Delete an asset by storage key.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        self.storage.delete(key).await
    }

    /// Delete an asset addressed by its public URL.
    ///
    /// Keys are flat, so the key is the last path segment of the URL.
    pub async fn delete_by_url(&self, url: &str) -> AppResult<()> {
        match Self::key_from_url(url) {
            Some(key) => self.storage.delete(key).await,
            None => Ok(()),
        }
    }

    /// Extract the storage key from a public URL.
    #[must_use]
    pub fn key_from_url(url: &str) -> Option<&str> {
        url.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use vidtube_common::LocalMediaStorage;

    fn temp_service(tag: &str) -> (MediaService, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("vidtube-media-{tag}-{}", std::process::id()));
        let storage = LocalMediaStorage::new(dir.clone(), "/media".to_string());
        (MediaService::new(Arc::new(storage)), dir)
    }

    #[test]
    fn test_key_from_url() {
        assert_eq!(
            MediaService::key_from_url("/media/abc123.mp4"),
            Some("abc123.mp4")
        );
        assert_eq!(
            MediaService::key_from_url("https://cdn.example.com/media/a.png"),
            Some("a.png")
        );
        assert_eq!(MediaService::key_from_url("/media/"), None);
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file() {
        let (service, dir) = temp_service("empty");

        let result = service.upload("clip.mp4", b"").await;
        assert!(matches!(result, Err(AppError::MediaUpload(_))));

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_upload_preserves_extension() {
        let (service, dir) = temp_service("ext");

        let stored = service.upload("thumb.png", b"pixels").await.unwrap();
        assert!(stored.key.ends_with(".png"));
        assert!(stored.url.starts_with("/media/"));

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_upload_local_file_removes_staged_file() {
        let (service, dir) = temp_service("staged");

        let staged = std::env::temp_dir().join(format!("vidtube-staged-{}.bin", std::process::id()));
        tokio::fs::write(&staged, b"payload").await.unwrap();

        let stored = service.upload_local_file(&staged).await.unwrap();
        assert_eq!(stored.size, 7);
        assert!(!staged.exists());

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_upload_local_file_missing_path_fails_cleanly() {
        let (service, dir) = temp_service("missing");

        let result = service
            .upload_local_file(Path::new("/nonexistent/vidtube-staged.bin"))
            .await;
        assert!(matches!(result, Err(AppError::MediaUpload(_))));

        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
