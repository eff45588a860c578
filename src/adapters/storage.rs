use crate::core::Storage;
use crate::utils::error::AssetError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full_path = self.base_path.join(path);
        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AssetError::AssetMissing {
                path: path.to_string(),
            }),
            Err(e) => Err(AssetError::Unreadable {
                path: path.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_existing_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("audio.mp3"), b"ID3").unwrap();

        let storage = LocalStorage::new(dir.path());
        assert_eq!(storage.read_file("audio.mp3").await.unwrap(), b"ID3");
    }

    #[tokio::test]
    async fn test_missing_file_is_asset_missing() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let err = storage.read_file("video.mp4").await.unwrap_err();
        assert_eq!(
            err,
            AssetError::AssetMissing {
                path: "video.mp4".to_string()
            }
        );
    }
}
