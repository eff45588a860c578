use crate::core::Storage;
use crate::domain::model::{MediaAsset, MediaKind};
use crate::utils::error::{AssetError, IngestError};
use reqwest::Client;
use std::time::Duration;

pub struct AssetLoader<S: Storage> {
    storage: S,
    client: Client,
}

impl<S: Storage> AssetLoader<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            client: Client::new(),
        }
    }

    pub fn with_client(storage: S, client: Client) -> Self {
        Self { storage, client }
    }

    pub async fn load_local(&self, kind: MediaKind, path: &str) -> Result<MediaAsset, AssetError> {
        let bytes = self.storage.read_file(path).await?;
        tracing::debug!("Loaded {:?} asset {} ({} bytes)", kind, path, bytes.len());

        Ok(MediaAsset {
            kind,
            source: path.to_string(),
            mime_type: MediaAsset::guess_mime_type(path).to_string(),
            bytes,
        })
    }

    /// 遠端圖片沒有本地備援，失敗就回傳錯誤
    pub async fn fetch_remote_image(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<MediaAsset, IngestError> {
        tracing::debug!("Fetching remote image: {}", url);
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::network(
                Some(status.as_u16()),
                format!("{} answered with status {}", url, status),
            ));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .map(str::to_string)
            .unwrap_or_else(|| MediaAsset::guess_mime_type(url).to_string());

        let bytes = response.bytes().await?;
        Ok(MediaAsset {
            kind: MediaKind::Image,
            source: url.to_string(),
            mime_type,
            bytes: bytes.to_vec(),
        })
    }
}
