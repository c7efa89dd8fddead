use clap::Parser;
use sales_trend::utils::error::ErrorSeverity;
use sales_trend::utils::{logger, validation::Validate};
use sales_trend::{CliConfig, LocalStorage, ReportEngine, ReportError, SalesPipeline};

fn exit_code(e: &ReportError) -> i32 {
    match e.severity() {
        ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    }
}

fn report_failure(stage: &str, e: &ReportError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting sales-trend");
    tracing::debug!("CLI config: {:?}", cli);

    // 合併並驗證配置
    let settings = match cli.resolve().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => report_failure("Configuration", &e),
    };

    if settings.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".".to_string());
    let monitor = settings.monitor;
    let pipeline = SalesPipeline::new(storage, settings);
    let engine = ReportEngine::new_with_monitoring(pipeline, monitor);

    match engine.run().await {
        Ok(rendered) => {
            print!("{}", rendered);
            tracing::info!("✅ Report completed");
            Ok(())
        }
        Err(e) => report_failure("Report", &e),
    }
}
