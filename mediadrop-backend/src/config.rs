use crate::error::{AppError, Result};
use mediadrop_types::{UploadLimits, MB};
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: String,
    pub public_base_url: String,
    pub static_dir: String,
    pub limits: UploadLimits,
    pub upload_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_address: "127.0.0.1:3000".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            static_dir: "static".to_string(),
            limits: UploadLimits::default(),
            upload_delay_ms: 0,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            server_address: env::var("SERVER_ADDRESS").unwrap_or(defaults.server_address),

            public_base_url: env::var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_base_url),

            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.static_dir),

            limits: UploadLimits {
                max_file_size: megabytes_from_env("MAX_FILE_SIZE_MB", 10)?,
                max_video_size: megabytes_from_env("MAX_VIDEO_SIZE_MB", 50)?,
                preview_threshold: megabytes_from_env("PREVIEW_THRESHOLD_MB", 5)?,
            },

            upload_delay_ms: env::var("UPLOAD_DELAY_MS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .map_err(|_| AppError::ConfigError("Invalid UPLOAD_DELAY_MS".to_string()))?,
        })
    }
}

fn megabytes_from_env(key: &str, default_mb: u64) -> Result<u64> {
    let mb = match env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|_| AppError::ConfigError(format!("Invalid {}", key)))?,
        Err(_) => default_mb,
    };
    mb.checked_mul(MB)
        .ok_or_else(|| AppError::ConfigError(format!("{} is too large: {}MB", key, mb)))
}
