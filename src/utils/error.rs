use thiserror::Error;

/// 表格來源 (literal / remote / upload) 的錯誤
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    #[error("Network error: {message}")]
    NetworkError {
        status: Option<u16>,
        message: String,
    },

    #[error("Parse error: {message}")]
    ParseError { message: String },
}

impl IngestError {
    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        IngestError::NetworkError {
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        IngestError::ParseError {
            message: message.into(),
        }
    }

    /// HTTP 狀態碼 (僅限非 2xx 回應)
    pub fn status(&self) -> Option<u16> {
        match self {
            IngestError::NetworkError { status, .. } => *status,
            IngestError::ParseError { .. } => None,
        }
    }
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else {
            err.to_string()
        };
        IngestError::NetworkError { status, message }
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::ParseError {
            message: err.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Text extraction failed on page {page}: {message}")]
    PageExtraction { page: u32, message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    #[error("Asset missing: {path}")]
    AssetMissing { path: String },

    #[error("Asset unreadable: {path} ({message})")]
    Unreadable { path: String, message: String },
}

#[derive(Error, Debug)]
pub enum DashError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Document,
    Asset,
    System,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashError::Ingest(IngestError::NetworkError { .. }) => ErrorCategory::Network,
            DashError::Ingest(IngestError::ParseError { .. }) => ErrorCategory::Data,
            DashError::SerializationError(_) => ErrorCategory::Data,
            DashError::Document(_) => ErrorCategory::Document,
            DashError::Asset(_) => ErrorCategory::Asset,
            DashError::IoError(_) => ErrorCategory::System,
            DashError::ConfigValidationError { .. }
            | DashError::InvalidConfigValueError { .. }
            | DashError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 頁面其他區塊仍可顯示
            ErrorCategory::Asset => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Document => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashError::Ingest(IngestError::NetworkError { status: Some(code), .. }) => {
                format!("The data endpoint answered with HTTP {}", code)
            }
            DashError::Ingest(IngestError::NetworkError { .. }) => {
                "The data endpoint could not be reached".to_string()
            }
            DashError::Ingest(IngestError::ParseError { message }) => {
                format!("The table could not be read: {}", message)
            }
            DashError::Document(e) => format!("The document could not be read: {}", e),
            DashError::Asset(AssetError::AssetMissing { path }) => {
                format!("Media file not found: {}", path)
            }
            DashError::Asset(e) => e.to_string(),
            DashError::IoError(e) => format!("File system error: {}", e),
            DashError::SerializationError(e) => format!("Invalid JSON data: {}", e),
            DashError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            DashError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            DashError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the endpoint URL and network, then refresh the API data",
            ErrorCategory::Data => "Make sure the upload is rectangular delimited text with a header row",
            ErrorCategory::Document => "Re-upload a valid PDF document",
            ErrorCategory::Asset => "Place the media file next to the configured asset base path",
            ErrorCategory::System => "Check file permissions and available disk space",
            ErrorCategory::Configuration => "Fix the configuration file and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_status() {
        assert_eq!(IngestError::network(Some(500), "boom").status(), Some(500));
        assert_eq!(IngestError::parse("ragged").status(), None);
    }

    #[test]
    fn test_severity_by_category() {
        let missing = DashError::from(AssetError::AssetMissing {
            path: "video.mp4".to_string(),
        });
        assert_eq!(missing.category(), ErrorCategory::Asset);
        assert_eq!(missing.severity(), ErrorSeverity::Low);

        let network = DashError::from(IngestError::network(Some(503), "unavailable"));
        assert_eq!(network.severity(), ErrorSeverity::Medium);
        assert!(network.user_friendly_message().contains("503"));

        let config = DashError::MissingConfigError {
            field: "source.endpoint".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::Critical);
    }
}
