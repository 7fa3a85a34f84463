use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MB: u64 = 1024 * 1024;

/// MIME types accepted by both the upload endpoint and the clients.
pub const SUPPORTED_TYPES: &[&str] = &[
    // Images
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "image/bmp",
    "image/tiff",
    // Videos
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "video/x-msvideo",
    // Audio
    "audio/mp3",
    "audio/mpeg",
    "audio/wav",
    "audio/ogg",
];

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Classify a MIME type by its top-level type. Does not consult the allow-list.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = essence(mime);
        let (top, _) = essence.split_once('/')?;
        match top {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            "audio" => Some(MediaKind::Audio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bare `type/subtype` of a MIME value: `"Image/PNG; charset=binary"` -> `"image/png"`.
pub fn essence(mime: &str) -> String {
    mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

pub fn is_supported(mime: &str) -> bool {
    let essence = essence(mime);
    SUPPORTED_TYPES.iter().any(|t| *t == essence)
}

/// Keep only items whose MIME type is allow-listed, preserving selection order.
pub fn filter_supported<T, F>(items: Vec<T>, mime_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    items
        .into_iter()
        .filter(|item| is_supported(mime_of(item)))
        .collect()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No file provided")]
    MissingFile,

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File size must be less than {limit_mb}MB")]
    TooLarge { kind: MediaKind, limit_mb: u64 },
}

/// Per-kind size ceilings and the inline preview cut-off, all in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_file_size: u64,
    pub max_video_size: u64,
    pub preview_threshold: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: 10 * MB,
            max_video_size: 50 * MB,
            preview_threshold: 5 * MB,
        }
    }
}

impl UploadLimits {
    pub fn max_size_for(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Video => self.max_video_size,
            MediaKind::Image | MediaKind::Audio => self.max_file_size,
        }
    }

    /// Largest ceiling over all kinds; used to size the transport body limit.
    pub fn largest(&self) -> u64 {
        self.max_file_size.max(self.max_video_size)
    }

    /// Check a declared MIME type and byte length against the allow-list and ceilings.
    pub fn validate(&self, mime: &str, size: u64) -> Result<MediaKind, ValidationError> {
        if !is_supported(mime) {
            return Err(ValidationError::UnsupportedType(mime.to_string()));
        }

        let kind = MediaKind::from_mime(mime)
            .ok_or_else(|| ValidationError::UnsupportedType(mime.to_string()))?;

        let limit = self.max_size_for(kind);
        if size > limit {
            return Err(ValidationError::TooLarge {
                kind,
                limit_mb: limit / MB,
            });
        }

        Ok(kind)
    }

    pub fn wants_preview(&self, size: u64) -> bool {
        size < self.preview_threshold
    }
}
