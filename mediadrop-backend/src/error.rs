use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mediadrop_types::{ErrorResponse, ValidationError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid multipart data: {0}")]
    BadRequest(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::IoError(_)
            | AppError::ConfigError(_)
            | AppError::ServerError(_)
            | AppError::UploadFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            AppError::Validation(reason) => ErrorResponse {
                error: reason.to_string(),
                details: None,
            },
            AppError::BadRequest(details) => ErrorResponse {
                error: "Invalid multipart data".to_string(),
                details: Some(details.clone()),
            },
            AppError::PayloadTooLarge(details) => ErrorResponse {
                error: "Request body too large".to_string(),
                details: Some(details.clone()),
            },
            AppError::IoError(e) => ErrorResponse {
                error: "Upload failed".to_string(),
                details: Some(e.to_string()),
            },
            AppError::UploadFailed(details) => ErrorResponse {
                error: "Upload failed".to_string(),
                details: Some(details.clone()),
            },
            AppError::ConfigError(_) => ErrorResponse {
                error: "Configuration error".to_string(),
                details: Some(self.to_string()),
            },
            AppError::ServerError(_) => ErrorResponse {
                error: "Server error".to_string(),
                details: Some(self.to_string()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Upload error: {}", self);
        } else {
            tracing::warn!("Rejected upload: {}", self);
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediadrop_types::MediaKind;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let err = AppError::from(ValidationError::TooLarge {
            kind: MediaKind::Audio,
            limit_mb: 10,
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.body(),
            ErrorResponse {
                error: "File size must be less than 10MB".to_string(),
                details: None,
            }
        );
    }

    #[test]
    fn test_unexpected_faults_surface_details() {
        let err = AppError::UploadFailed("encoder exploded".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = err.body();
        assert_eq!(body.error, "Upload failed");
        assert_eq!(body.details.as_deref(), Some("encoder exploded"));
    }

    #[test]
    fn test_oversized_body_maps_to_413() {
        let err = AppError::PayloadTooLarge("length limit exceeded".to_string());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
