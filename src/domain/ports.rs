use crate::utils::error::AssetError;
use std::time::Duration;

/// 本地媒體檔的讀取來源
pub trait Storage: Send + Sync {
    fn read_file(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, AssetError>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn image_path(&self) -> Option<&str>;
    fn video_path(&self) -> Option<&str>;
    fn audio_path(&self) -> Option<&str>;
    fn remote_image_url(&self) -> Option<&str>;
    fn default_selection(&self) -> &str;
}
