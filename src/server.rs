//! HTTP surface: `POST /api/convert` and `GET /api/health`.

use std::io::{BufReader, Write};
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::AppConfig;
use crate::convert::{convert_to_string, output_filename};
use crate::error::{ApiError, ConvertError};
use crate::types::ConversionSummary;

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub data: String,
    pub filename: String,
}

pub fn router(cfg: AppConfig) -> anyhow::Result<Router> {
    let cors = cors_layer(&cfg.cors.allowed_origins)?;
    let body_limit = cfg.server.max_upload_bytes;

    Ok(Router::new()
        .route("/api/convert", post(convert_upload))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(cfg)))
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {o:?}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    // Wildcards are not allowed together with credentials, so mirror instead.
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Bind and serve until Ctrl-C.
pub async fn serve(cfg: AppConfig) -> anyhow::Result<()> {
    let bind = cfg.server.bind.clone();
    let app = router(cfg)?;
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn convert_upload(
    State(cfg): State<Arc<AppConfig>>,
    mut multipart: Multipart,
) -> Result<Json<ConvertResponse>, ApiError> {
    let in_ext = &cfg.convert.input_extension;

    while let Some(mut field) = multipart.next_field().await? {
        // Plain form fields carry no filename; the upload is the first part that does.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if !filename.ends_with(in_ext.as_str()) {
            return Err(ApiError::InvalidFileType(in_ext.clone()));
        }

        // Removed on drop, whichever way this handler exits.
        let mut tmp = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(in_ext.as_str())
            .tempfile()?;
        while let Some(chunk) = field.chunk().await? {
            tmp.write_all(&chunk)?;
        }
        tmp.flush()?;

        let (csv, summary) = tokio::task::spawn_blocking(move || convert_upload_file(tmp))
            .await
            .map_err(|e| ApiError::Internal(format!("conversion task failed: {e}")))??;

        info!(
            "Converted upload {}: {} trades, {} lines skipped",
            filename, summary.records_written, summary.lines_skipped
        );
        return Ok(Json(ConvertResponse {
            success: true,
            data: csv,
            filename: output_filename(&filename, in_ext, &cfg.convert.output_extension),
        }));
    }

    Err(ApiError::NoFile)
}

fn convert_upload_file(tmp: NamedTempFile) -> Result<(String, ConversionSummary), ConvertError> {
    let reader = BufReader::new(tmp.reopen()?);
    convert_to_string(reader)
}
