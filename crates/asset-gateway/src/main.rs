//! Asset gateway - multipart upload ingestion into object storage

use asset_gateway::{run_server, GatewayConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "asset-gateway")]
#[command(about = "HTTP gateway streaming multipart uploads into object storage")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "ASSET_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "ASSET_PORT")]
    port: u16,

    /// Directory for the filesystem store (omit to keep assets in
    /// memory; data will not persist)
    #[arg(long, env = "ASSET_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Container uploads are stored in
    #[arg(long, default_value = "digitalAssets", env = "ASSET_CONTAINER")]
    container: String,

    /// Enable debug logging
    #[arg(short, long, env = "ASSET_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("asset_gateway={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting asset gateway on {}:{}", args.host, args.port);
    tracing::info!("Upload container: {}", args.container);

    if args.data_dir.is_none() {
        tracing::warn!("No data directory configured - assets will NOT persist!");
    }

    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        data_dir: args.data_dir,
        container: args.container,
        ..Default::default()
    };

    run_server(config).await
}
