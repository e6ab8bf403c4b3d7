use crate::config::Config;
use crate::error::ExtractError;
use crate::image_prep::{self, EmbeddableImage};
use crate::orchestrator::Orchestrator;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub config: Arc<Config>,
}

/// Extraction request body for the JSON route
#[derive(Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Extraction response
#[derive(Serialize)]
pub struct ExtractResponse {
    pub ok: bool,
    pub answer: String,
    pub processing_time_ms: u64,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub max_file_size_bytes: usize,
    pub ocr_configured: bool,
    pub workflow_configured: bool,
    pub workflow_base_url: String,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let max_file_size = state.config.max_file_size;

    Router::new()
        .route("/extract", post(handle_extract))
        .route("/extract/file", post(handle_extract_file))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState {
        orchestrator: Arc::new(Orchestrator::new(&config)),
        config: Arc::new(config),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Handle JSON extraction requests (image already prepared by the client)
async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ExtractError> {
    let start = Instant::now();

    let data_url = request
        .image
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ExtractError::MissingImage)?;

    let image = EmbeddableImage::parse(data_url)?;
    if !image.mime_type.starts_with("image/") {
        return Err(ExtractError::NotAnImage(image.mime_type.clone()));
    }

    let answer = state
        .orchestrator
        .extract(&image, request.prompt.as_deref())
        .await?;

    respond(answer, start)
}

/// Handle multipart uploads: prepare the raw image server-side, then extract
async fn handle_extract_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, ExtractError> {
    let start = Instant::now();

    let mut file_data: Option<Bytes> = None;
    let mut content_type: Option<String> = None;
    let mut prompt: Option<String> = None;

    // Parse multipart form
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ExtractError::InvalidRequest(format!("Failed to parse multipart: {}", e))
    })? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                content_type = field.content_type().map(|s| s.to_string());
                file_data = Some(field.bytes().await.map_err(|e| {
                    ExtractError::InvalidRequest(format!("Failed to read file data: {}", e))
                })?);
            }
            "prompt" => {
                prompt = Some(field.text().await.map_err(|e| {
                    ExtractError::InvalidRequest(format!("Invalid prompt: {}", e))
                })?);
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let data = file_data.ok_or(ExtractError::MissingImage)?;
    let mime = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    let image = image_prep::prepare(&data, &mime)?;

    let answer = state
        .orchestrator
        .extract(&image, prompt.as_deref())
        .await?;

    respond(answer, start)
}

fn respond(answer: String, start: Instant) -> Result<Json<ExtractResponse>, ExtractError> {
    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "Extraction completed in {}ms, answer length: {}",
        processing_time_ms,
        answer.len()
    );

    Ok(Json(ExtractResponse {
        ok: true,
        answer,
        processing_time_ms,
    }))
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        max_file_size_bytes: state.config.max_file_size,
        ocr_configured: state.orchestrator.ocr_configured(),
        workflow_configured: state.orchestrator.workflow_configured(),
        workflow_base_url: state.orchestrator.workflow_base_url().to_string(),
    })
}
