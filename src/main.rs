use anyhow::Context;
use clap::Parser;
use multisite::adapters::http;
use multisite::utils::{logger, validation::Validate};
use multisite::{CliConfig, SiteConfig, SiteState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting multisite");
    tracing::info!("📁 Loading configuration from: {}", cli.config);

    let mut config = match SiteConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 命令列覆蓋設定
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
        tracing::info!("🔧 Bind address overridden to: {}", bind);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    if cli.verbose {
        tracing::debug!("Site config: {:?}", config);
    }

    let addr = config.bind_addr()?;
    let state = Arc::new(SiteState::from_config(&config));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        tracing::info!("🛑 Shutting down");
    };

    if let Err(e) = http::serve(listener, state, shutdown).await {
        tracing::error!("❌ Server stopped: {} (Category: {:?})", e, e.category());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}
