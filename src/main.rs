use clap::Parser;
use small_dash::core::dashboard::{RenderedPage, Trigger};
use small_dash::utils::error::{DashError, ErrorSeverity};
use small_dash::utils::{logger, validation::Validate};
use small_dash::{CliConfig, Dashboard, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting small-dash");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let page = match run(&cli).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(
                "❌ Dashboard failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    };

    print!("{}", page);
    Ok(())
}

async fn run(cli: &CliConfig) -> Result<RenderedPage, DashError> {
    let config = cli.resolve()?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    let storage = LocalStorage::new(config.assets.base_path.clone());
    let mut dashboard = Dashboard::new(storage, config);

    if let Some(path) = &cli.csv {
        let trigger = Trigger::upload_table_from_path(path, cli.delimiter.as_deref()).await;
        dashboard.apply(trigger);
    }

    if let Some(path) = &cli.pdf {
        dashboard.apply(Trigger::upload_document_from_path(path).await);
    }

    if let Some(page) = &cli.page {
        dashboard.apply(Trigger::Navigate(page.clone()));
    }

    Ok(dashboard.render().await)
}
