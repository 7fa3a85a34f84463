pub mod batch;
pub mod media;

pub use batch::{decode_upload_response, upload_all, UploadFailure, UploadOutcome};
pub use media::{
    essence, filter_supported, is_supported, MediaKind, UploadLimits, ValidationError, MB,
    SUPPORTED_TYPES,
};

use serde::{Deserialize, Serialize};

// Response types
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub success: bool,
    pub filename: String,
    pub server_filename: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub pathname: String,
    pub size: u64,
    pub content_type: String,
    pub file_type: MediaKind,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub message: String,
    pub endpoint: String,
    pub method: String,
    pub content_type: String,
    pub supported_formats: Vec<String>,
    pub max_file_size: String,
    pub max_video_size: String,
    pub preview_threshold: String,
    pub limits: CapabilityLimits,
    pub note: String,
    pub usage: Usage,
}

/// Byte-exact counterparts of the human-readable limits in [`Capabilities`].
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityLimits {
    pub max_file_size: u64,
    pub max_video_size: u64,
    pub preview_threshold: u64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Usage {
    pub description: String,
    pub example: String,
}
