pub mod toml_config;

pub use toml_config::DashboardConfig;

#[cfg(feature = "cli")]
use clap::Parser;

/// 命令列參數；優先於設定檔
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "small-dash")]
#[command(about = "Render the demo dashboard pipeline as plain text")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the remote data endpoint
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Delimited text file to upload
    #[arg(long)]
    pub csv: Option<String>,

    /// Field delimiter for the uploaded file (defaults from the file extension)
    #[arg(long)]
    pub delimiter: Option<String>,

    /// PDF document to upload
    #[arg(long)]
    pub pdf: Option<String>,

    /// Page to show in the navigation section (unknown names show Contact)
    #[arg(long)]
    pub page: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔 (或預設值) 並套用命令列覆蓋
    pub fn resolve(&self) -> crate::Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::default(),
        };

        if let Some(endpoint) = &self.api_endpoint {
            config.source.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.source.timeout_seconds = timeout;
        }
        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = CliConfig::parse_from([
            "small-dash",
            "--api-endpoint",
            "https://api.example.com/people",
            "--timeout",
            "4",
            "--page",
            "Blog",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.source.endpoint, "https://api.example.com/people");
        assert_eq!(config.source.timeout_seconds, 4);
        assert_eq!(config.navigation.default, "Home");
        assert_eq!(cli.page.as_deref(), Some("Blog"));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = CliConfig::parse_from(["small-dash"]);
        assert!(!cli.json_logs);
        assert!(cli.csv.is_none());

        let config = cli.resolve().unwrap();
        assert_eq!(config.source.endpoint, toml_config::DEFAULT_API_ENDPOINT);
    }
}
