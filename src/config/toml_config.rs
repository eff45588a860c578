use crate::core::ConfigProvider;
use crate::domain::model::Destination;
use crate::utils::error::{DashError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_REMOTE_IMAGE: &str = "https://cdn.sulselsatu.com/imageresize/assets/media/upload/2025/04/WhatsApp-Image-2025-04-27-at-16.25.16.jpeg&width=200&height=112";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub assets: AssetsConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_API_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub base_path: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub audio: Option<String>,
    pub remote_image: Option<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_path: ".".to_string(),
            image: Some("flask-horizontal.webp".to_string()),
            video: Some("video.mp4".to_string()),
            audio: Some("audio.mp3".to_string()),
            remote_image: Some(DEFAULT_REMOTE_IMAGE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub default: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            default: Destination::Home.label().to_string(),
        }
    }
}

impl DashboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_HOST})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }
}

impl ConfigProvider for DashboardConfig {
    fn api_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn request_timeout(&self) -> Duration {
        self.timeout()
    }

    fn image_path(&self) -> Option<&str> {
        self.assets.image.as_deref()
    }

    fn video_path(&self) -> Option<&str> {
        self.assets.video.as_deref()
    }

    fn audio_path(&self) -> Option<&str> {
        self.assets.audio.as_deref()
    }

    fn remote_image_url(&self) -> Option<&str> {
        self.assets.remote_image.as_deref()
    }

    fn default_selection(&self) -> &str {
        &self.navigation.default
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.endpoint", &self.source.endpoint)?;
        validation::validate_range("source.timeout_seconds", self.source.timeout_seconds, 1, 300)?;
        validation::validate_path("assets.base_path", &self.assets.base_path)?;

        for (field, value) in [
            ("assets.image", &self.assets.image),
            ("assets.video", &self.assets.video),
            ("assets.audio", &self.assets.audio),
        ] {
            if let Some(path) = value {
                validation::validate_path(field, path)?;
            }
        }

        if let Some(url) = &self.assets.remote_image {
            validation::validate_url("assets.remote_image", url)?;
        }

        validation::validate_one_of(
            "navigation.default",
            &self.navigation.default,
            &Destination::labels(),
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_cover_bundled_assets() {
        let config = DashboardConfig::from_toml_str("").unwrap();

        assert_eq!(config.api_endpoint(), DEFAULT_API_ENDPOINT);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.image_path(), Some("flask-horizontal.webp"));
        assert_eq!(config.video_path(), Some("video.mp4"));
        assert_eq!(config.audio_path(), Some("audio.mp3"));
        assert_eq!(config.remote_image_url(), Some(DEFAULT_REMOTE_IMAGE));
        assert_eq!(config.default_selection(), "Home");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[source]
endpoint = "https://api.example.com/users"
timeout_seconds = 3

[assets]
base_path = "./media"
image = "logo.png"
remote_image = "https://cdn.example.com/banner.jpeg"

[navigation]
default = "About"
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_endpoint(), "https://api.example.com/users");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.assets.base_path, "./media");
        assert_eq!(config.image_path(), Some("logo.png"));
        // 未指定的欄位沿用預設
        assert_eq!(config.video_path(), Some("video.mp4"));
        assert_eq!(config.default_selection(), "About");
        assert_eq!(config.remote_image_url(), Some("https://cdn.example.com/banner.jpeg"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SMALL_DASH_TEST_HOST", "https://test.api.com");

        let toml_content = r#"
[source]
endpoint = "${SMALL_DASH_TEST_HOST}/users"
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.endpoint, "https://test.api.com/users");

        std::env::remove_var("SMALL_DASH_TEST_HOST");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = DashboardConfig::from_toml_str("[source]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_timeout = DashboardConfig::from_toml_str("[source]\ntimeout_seconds = 0\n").unwrap();
        assert!(bad_timeout.validate().is_err());

        let bad_page = DashboardConfig::from_toml_str("[navigation]\ndefault = \"Blog\"\n").unwrap();
        assert!(bad_page.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = DashboardConfig::from_toml_str("[source\nendpoint = 1").unwrap_err();
        assert!(matches!(err, DashError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\nendpoint = \"https://file.example.com/users\"\n")
            .unwrap();

        let config = DashboardConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api_endpoint(), "https://file.example.com/users");
    }
}
