use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use mediadrop_types::{
    Capabilities, CapabilityLimits, UploadLimits, UploadResult, Usage, ValidationError, MB,
    SUPPORTED_TYPES,
};
use rand::Rng;
use std::time::Duration;

use crate::{
    config::Config,
    error::{AppError, Result},
    storage::preview_data_url,
    AppState,
};

const FILE_FIELD: &str = "file";

/// A file part pulled out of the multipart body.
#[derive(Debug)]
pub struct IncomingFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mediadrop-backend",
        "timestamp": chrono::Utc::now()
    }))
}

// Capability descriptor for the upload endpoint
pub async fn describe_upload(State(state): State<AppState>) -> Json<Capabilities> {
    Json(capabilities(&state.config))
}

pub fn capabilities(config: &Config) -> Capabilities {
    let limits = &config.limits;

    Capabilities {
        message: "Media Upload API (Preview Mode)".to_string(),
        endpoint: "/api/upload".to_string(),
        method: "POST".to_string(),
        content_type: "multipart/form-data".to_string(),
        supported_formats: SUPPORTED_TYPES.iter().map(|t| t.to_string()).collect(),
        max_file_size: format!("{}MB", limits.max_file_size / MB),
        max_video_size: format!("{}MB", limits.max_video_size / MB),
        preview_threshold: format!("{}MB", limits.preview_threshold / MB),
        limits: CapabilityLimits {
            max_file_size: limits.max_file_size,
            max_video_size: limits.max_video_size,
            preview_threshold: limits.preview_threshold,
        },
        note: "This is a preview version. Files are validated but not persisted; \
               returned URLs are placeholders."
            .to_string(),
        usage: Usage {
            description: "Upload one media file per request using multipart/form-data \
                          with the file in the `file` field"
                .to_string(),
            example: format!(
                "curl -F \"file=@photo.png;type=image/png\" {}/api/upload",
                config.public_base_url
            ),
        },
    }
}

// Mock upload endpoint - validates the file and fabricates a storage location
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResult>> {
    let mut multipart = multipart.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(rejection.body_text()),
        _ => AppError::BadRequest(rejection.body_text()),
    })?;

    let file = read_file_field(&mut multipart)
        .await?
        .ok_or(ValidationError::MissingFile)?;

    let result = process_upload(&state, file).await?;
    Ok(Json(result))
}

/// Pull the first `file` part that carries a filename; other parts are drained and ignored.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<IncomingFile>> {
    let mut incoming: Option<IncomingFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        if name == FILE_FIELD && incoming.is_none() {
            if let Some(filename) = field.file_name().map(str::to_string) {
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(multipart_error)?;

                incoming = Some(IncomingFile {
                    filename,
                    content_type,
                    data,
                });
                continue;
            }
        }

        // Skip unknown fields
        field.bytes().await.map_err(multipart_error)?;
    }

    Ok(incoming)
}

fn multipart_error(e: MultipartError) -> AppError {
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(e.body_text()),
        _ => AppError::BadRequest(e.body_text()),
    }
}

pub async fn process_upload(state: &AppState, file: IncomingFile) -> Result<UploadResult> {
    let limits: &UploadLimits = &state.config.limits;
    let size = file.data.len() as u64;

    let kind = limits.validate(&file.content_type, size)?;

    let preview_url = if limits.wants_preview(size) {
        let content_type = file.content_type.clone();
        let data = file.data.clone();
        let encoded = tokio::task::spawn_blocking(move || preview_data_url(&content_type, &data))
            .await
            .map_err(|e| AppError::UploadFailed(format!("Failed to encode preview: {}", e)))?;
        Some(encoded)
    } else {
        None
    };

    simulate_latency(state.config.upload_delay_ms).await;

    let stored = state.storage.store(&file.filename, &file.content_type, size);

    tracing::info!(
        "📁 Accepted {} upload: {} ({} bytes) -> {}",
        kind,
        file.filename,
        size,
        stored.server_filename
    );

    Ok(UploadResult {
        success: true,
        filename: file.filename,
        server_filename: stored.server_filename,
        url: stored.url,
        preview_url,
        pathname: stored.pathname,
        size,
        content_type: file.content_type,
        file_type: kind,
        uploaded_at: chrono::Utc::now(),
        message: "File uploaded successfully to server".to_string(),
    })
}

async fn simulate_latency(max_delay_ms: u64) {
    if max_delay_ms == 0 {
        return;
    }
    let delay = rand::thread_rng().gen_range(0..=max_delay_ms);
    tokio::time::sleep(Duration::from_millis(delay)).await;
}
