use clap::Parser;
use exam_gen::config::LogFormat;
use exam_gen::core::ConfigProvider;
use exam_gen::utils::{logger, validation::Validate};
use exam_gen::{router, CliConfig, CorsPolicy, ExamError, ExamService, GeminiClient, TomlConfig};
use tokio::net::TcpListener;

fn exit_with(e: &ExamError) -> ! {
    tracing::error!("❌ Startup failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(1);
}

async fn run<C: ConfigProvider>(config: &C) -> exam_gen::Result<()> {
    let gemini = GeminiClient::new(config.gemini_settings())?;
    tracing::info!("Using model {}", gemini.model());

    let app = router(
        ExamService::new(gemini),
        CorsPolicy::new(config.cors_origins()),
    );

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("🚀 Backend running on {}", listener.local_addr()?);
    tracing::info!("Allowed origins: {}", config.cors_origins().join(", "));

    exam_gen::adapters::http::serve(listener, app).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 載入 .env（不存在時略過）
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let cli = CliConfig::parse().normalized();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    if dotenv_loaded {
        tracing::debug!("Loaded environment from .env");
    }

    let outcome = match cli.config.as_ref() {
        Some(path) => {
            tracing::info!("Reading configuration from {}", path.display());
            let file_config = TomlConfig::from_file(path).unwrap_or_else(|e| exit_with(&e));
            if let Err(e) = file_config.validate() {
                exit_with(&e);
            }
            run(&file_config).await
        }
        None => {
            if let Err(e) = cli.validate() {
                exit_with(&e);
            }
            run(&cli).await
        }
    };

    if let Err(e) = outcome {
        tracing::error!("❌ Server stopped with error: {}", e);
        return Err(e.into());
    }

    tracing::info!("Server stopped");
    Ok(())
}
