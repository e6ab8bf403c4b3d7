use clap::Parser;
use ocr_extract_server::{config, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = config::Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!(
        "Starting ocr-extract-server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Binding to {}:{}", config.host, config.port);

    if config.ocr_api_key.is_none() {
        tracing::warn!("OCR provider key not set; extraction requests will fail");
    }
    if config.workflow_api_key.is_none() {
        tracing::warn!("Workflow provider key not set; extraction requests will fail");
    }

    server::run(config).await
}
