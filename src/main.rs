//! Entry point. Wires config -> HTTP server -> converter.

use dotenvy::dotenv;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use tlg_converter::{config::AppConfig, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    // Load config (defaults when the file is absent)
    let cfg_path = std::env::var("TLG_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let mut cfg = AppConfig::load_or_default(&cfg_path)?;
    cfg.apply_env();

    info!(
        "tlg-converter starting. Bind={}, Upload={} -> {}, MaxUpload={}B, Origins={:?}",
        cfg.server.bind,
        cfg.convert.input_extension,
        cfg.convert.output_extension,
        cfg.server.max_upload_bytes,
        cfg.cors.allowed_origins
    );

    server::serve(cfg).await
}
