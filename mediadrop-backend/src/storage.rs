use base64::{engine::general_purpose::STANDARD, Engine as _};
use mediadrop_types::essence;
use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 13;
const FALLBACK_EXTENSION: &str = "bin";

/// Stand-in for object storage: names files and hands out URLs without writing anything.
#[derive(Clone, Debug)]
pub struct MockStorage {
    public_base_url: String,
}

/// Location fabricated for an accepted upload.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredFile {
    pub server_filename: String,
    pub pathname: String,
    pub url: String,
}

impl MockStorage {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Generate a server-side filename: `<unix-millis>_<random base36>.<ext>`
    pub fn generate_server_filename(&self, filename: &str, content_type: &str) -> String {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();

        format!(
            "{}_{}.{}",
            timestamp,
            suffix,
            file_extension(filename, content_type)
        )
    }

    /// "Store" an upload. Nothing is persisted; only the location is fabricated.
    pub fn store(&self, filename: &str, content_type: &str, size: u64) -> StoredFile {
        let server_filename = self.generate_server_filename(filename, content_type);
        let pathname = format!("/uploads/{}", server_filename);
        let url = format!("{}{}", self.public_base_url, pathname);

        tracing::debug!("💾 Mock-stored {} ({} bytes) -> {}", filename, size, pathname);

        StoredFile {
            server_filename,
            pathname,
            url,
        }
    }
}

/// Extension from the declared filename, else one registered for the MIME type.
fn file_extension(filename: &str, content_type: &str) -> String {
    if let Some((stem, ext)) = filename.rsplit_once('.') {
        let ext = ext.trim();
        if !stem.is_empty()
            && !ext.is_empty()
            && ext.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return ext.to_ascii_lowercase();
        }
    }

    let mime = essence(content_type);
    if let Some(ext) = common_extension(&mime) {
        return ext.to_string();
    }

    // mime_guess lists extensions alphabetically, so this is only a last resort
    mime_guess::get_mime_extensions_str(&mime)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

fn common_extension(mime: &str) -> Option<&'static str> {
    let ext = match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "video/mp4" => "mp4",
        "video/mpeg" => "mpeg",
        "video/quicktime" => "mov",
        "video/x-msvideo" => "avi",
        "audio/mp3" | "audio/mpeg" => "mp3",
        "audio/wav" => "wav",
        "audio/ogg" => "ogg",
        _ => return None,
    };
    Some(ext)
}

/// Inline `data:` URL for immediate client-side preview. MIME parameters are dropped.
pub fn preview_data_url(content_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", essence(content_type), STANDARD.encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_server_filename_shape() {
        let storage = MockStorage::new("http://localhost:3000/");
        let name = storage.generate_server_filename("holiday.JPG", "image/jpeg");

        let (timestamp, rest) = name.split_once('_').unwrap();
        assert!(timestamp.parse::<i64>().is_ok());

        let (suffix, ext) = rest.split_once('.').unwrap();
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
        assert_eq!(ext, "jpg");
    }

    #[test]
    fn test_server_filenames_are_unique_within_a_burst() {
        let storage = MockStorage::new("http://localhost:3000");
        let names: HashSet<String> = (0..10_000)
            .map(|_| storage.generate_server_filename("a.png", "image/png"))
            .collect();
        assert_eq!(names.len(), 10_000);
    }

    #[test]
    fn test_extension_fallbacks() {
        assert_eq!(file_extension("track.mp3", "audio/mpeg"), "mp3");
        assert_eq!(file_extension("archive.tar.gz", "image/png"), "gz");
        assert_eq!(file_extension("noext", "image/png"), "png");
        assert_eq!(file_extension(".hidden", "image/png"), "png");
        assert_eq!(file_extension("weird.", "image/gif"), "gif");
        assert_eq!(file_extension("blob", "application/x-unknown-thing"), "bin");
    }

    #[test]
    fn test_extension_fallback_prefers_common_names() {
        assert_eq!(file_extension("photo", "image/jpeg"), "jpg");
        assert_eq!(file_extension("photo", "Image/JPEG; charset=binary"), "jpg");
        assert_eq!(file_extension("song", "audio/mpeg"), "mp3");
        assert_eq!(file_extension("clip", "video/quicktime"), "mov");
        assert_eq!(file_extension("scan", "image/tiff"), "tiff");
    }

    #[test]
    fn test_store_builds_url_from_base() {
        let storage = MockStorage::new("https://media.example.com/");
        let stored = storage.store("cat.gif", "image/gif", 42);

        assert!(stored.pathname.starts_with("/uploads/"));
        assert!(stored.pathname.ends_with(".gif"));
        assert_eq!(
            stored.url,
            format!("https://media.example.com{}", stored.pathname)
        );
        assert_eq!(
            stored.pathname,
            format!("/uploads/{}", stored.server_filename)
        );
    }

    #[test]
    fn test_preview_data_url_round_trips_length() {
        let data = vec![7u8; 1000];
        let url = preview_data_url("image/png", &data);

        let encoded = url.strip_prefix("data:image/png;base64,").unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap().len(), data.len());
    }

    #[test]
    fn test_preview_data_url_strips_mime_parameters() {
        let url = preview_data_url("image/png; q=1", &[1, 2, 3]);
        assert_eq!(url, "data:image/png;base64,AQID");
    }
}
