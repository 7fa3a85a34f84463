use gloo::net::http::Request;
use web_sys::FormData;

// Re-export shared types
pub use mediadrop_types::*;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },
}

/// A browser file that passed the allow-list, with its metadata read up front.
#[derive(Clone, PartialEq)]
pub struct SelectedFile {
    pub file: web_sys::File,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl From<web_sys::File> for SelectedFile {
    fn from(file: web_sys::File) -> Self {
        Self {
            name: file.name(),
            mime_type: file.type_(),
            size: file.size() as u64,
            file,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    pub base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        // Same origin unless built against a separate backend
        let base_url = option_env!("MEDIADROP_API_URL").unwrap_or("").to_string();

        Self { base_url }
    }

    pub async fn fetch_capabilities(&self) -> Result<Capabilities, ApiError> {
        let url = format!("{}/api/upload", self.base_url);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Request failed: {:?}", e)))?;

        if !response.ok() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Server { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("Failed to parse response: {:?}", e)))
    }

    pub async fn upload_file(&self, selected: &SelectedFile) -> Result<UploadResult, UploadFailure> {
        let form_data = FormData::new()
            .map_err(|e| UploadFailure::Network(format!("Failed to create form data: {:?}", e)))?;

        form_data
            .append_with_blob_and_filename("file", &selected.file, &selected.name)
            .map_err(|e| UploadFailure::Network(format!("Failed to append file: {:?}", e)))?;

        let url = format!("{}/api/upload", self.base_url);

        let response = Request::post(&url)
            .body(form_data)
            .map_err(|e| UploadFailure::Network(format!("Failed to create request: {:?}", e)))?
            .send()
            .await
            .map_err(|e| UploadFailure::Network(format!("Request failed: {:?}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadFailure::InvalidResponse(format!("{:?}", e)))?;

        decode_upload_response(status, &body)
    }
}
