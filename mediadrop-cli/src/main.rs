use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use reqwest::multipart;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs as async_fs;

// Import shared types
use mediadrop_types::*;

#[derive(Parser)]
#[command(name = "mediadrop")]
#[command(about = "Upload images, videos and audio to a Mediadrop server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend server URL
    #[arg(long, default_value = "http://localhost:3000")]
    server: String,

    /// Timeout for requests in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more media files concurrently
    Upload {
        /// Files to upload; unsupported types are skipped
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        output: OutputFormat,
    },
    /// Show the server's supported formats and size limits
    Capabilities,
}

#[derive(Clone, Debug, PartialEq)]
enum OutputFormat {
    Json,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

/// A local file that passed the allow-list.
#[derive(Clone, Debug, PartialEq)]
struct SelectedFile {
    path: PathBuf,
    filename: String,
    mime_type: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .build()
        .context("Failed to create HTTP client")?;

    match cli.command {
        Commands::Upload { files, output } => {
            upload_files(&client, &cli.server, &files, output).await?;
        }
        Commands::Capabilities => {
            show_capabilities(&client, &cli.server).await?;
        }
    }

    Ok(())
}

/// Guess each path's MIME type from its extension and keep the allow-listed ones.
fn select_files(paths: &[PathBuf]) -> Vec<SelectedFile> {
    let candidates: Vec<SelectedFile> = paths
        .iter()
        .map(|path| SelectedFile {
            path: path.clone(),
            filename: path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string()),
            mime_type: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        })
        .collect();

    filter_supported(candidates, |file| file.mime_type.as_str())
}

async fn upload_files(
    client: &reqwest::Client,
    server: &str,
    paths: &[PathBuf],
    output_format: OutputFormat,
) -> Result<()> {
    let selected = select_files(paths);
    if selected.is_empty() {
        anyhow::bail!("No supported media files selected");
    }

    let pb = ProgressBar::new(selected.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} files {msg}")
            .context("Failed to set progress bar template")?
            .progress_chars("#>-"),
    );
    if output_format == OutputFormat::Json {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }
    pb.set_message("Uploading...");

    let items: Vec<(String, SelectedFile)> = selected
        .into_iter()
        .map(|file| (file.filename.clone(), file))
        .collect();

    let outcomes = upload_all(
        items,
        |file| upload_one(client, server, file),
        |outcome| {
            pb.inc(1);
            pb.set_message(outcome.filename.clone());
        },
    )
    .await;

    pb.finish_and_clear();

    print_outcomes(&outcomes, &output_format)?;

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} uploads failed", failed, outcomes.len());
    }
    Ok(())
}

async fn upload_one(
    client: &reqwest::Client,
    server: &str,
    file: SelectedFile,
) -> std::result::Result<UploadResult, UploadFailure> {
    let data = async_fs::read(&file.path)
        .await
        .map_err(|e| UploadFailure::Read(format!("{}: {}", file.path.display(), e)))?;

    let part = multipart::Part::bytes(data)
        .file_name(file.filename.clone())
        .mime_str(&file.mime_type)
        .map_err(|e| UploadFailure::Network(e.to_string()))?;
    let form = multipart::Form::new().part("file", part);

    let response = client
        .post(format!("{}/api/upload", server.trim_end_matches('/')))
        .multipart(form)
        .send()
        .await
        .map_err(|e| UploadFailure::Network(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| UploadFailure::Network(e.to_string()))?;

    decode_upload_response(status, &body)
}

async fn show_capabilities(client: &reqwest::Client, server: &str) -> Result<()> {
    let response = client
        .get(format!("{}/api/upload", server.trim_end_matches('/')))
        .send()
        .await
        .context("Failed to query upload capabilities")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(anyhow::anyhow!(
            "Capability query failed with status {}: {}",
            status,
            error_text
        ));
    }

    let capabilities: Capabilities = response
        .json()
        .await
        .context("Failed to parse capability document")?;

    println!("{}", serde_json::to_string_pretty(&capabilities)?);
    Ok(())
}

fn print_outcomes(outcomes: &[UploadOutcome], output_format: &OutputFormat) -> Result<()> {
    match output_format {
        OutputFormat::Json => {
            let json_output: Vec<serde_json::Value> = outcomes.iter().map(outcome_json).collect();
            println!("{}", serde_json::to_string_pretty(&json_output)?);
        }
        OutputFormat::Text => {
            for outcome in outcomes {
                println!("{}", describe_outcome(outcome));
            }
        }
    }
    Ok(())
}

fn outcome_json(outcome: &UploadOutcome) -> serde_json::Value {
    match &outcome.result {
        Ok(result) => serde_json::json!({
            "index": outcome.index,
            "file": outcome.filename,
            "success": true,
            "data": result,
        }),
        Err(failure) => serde_json::json!({
            "index": outcome.index,
            "file": outcome.filename,
            "success": false,
            "error": failure.to_string(),
        }),
    }
}

fn describe_outcome(outcome: &UploadOutcome) -> String {
    match &outcome.result {
        Ok(result) => {
            let mut lines = vec![
                format!(
                    "✅ {} ({}, {})",
                    outcome.filename,
                    result.file_type,
                    HumanBytes(result.size)
                ),
                format!("   📎 URL: {}", result.url),
                format!("   🏷️  Server filename: {}", result.server_filename),
            ];
            if result.preview_url.is_some() {
                lines.push("   🖼️  Inline preview included".to_string());
            }
            lines.join("\n")
        }
        Err(failure) => format!("❌ {}: {}", outcome.filename, failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_fixture(dir: &Path, name: &str, len: usize) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, vec![0u8; len]).unwrap();
        path
    }

    fn success(filename: &str, preview: bool) -> UploadOutcome {
        UploadOutcome {
            index: 0,
            filename: filename.to_string(),
            result: Ok(UploadResult {
                success: true,
                filename: filename.to_string(),
                server_filename: "1700000000000_k3j2h1g0f9e8d.mp4".to_string(),
                url: "http://localhost:3000/uploads/1700000000000_k3j2h1g0f9e8d.mp4"
                    .to_string(),
                preview_url: preview.then(|| "data:video/mp4;base64,AAAA".to_string()),
                pathname: "/uploads/1700000000000_k3j2h1g0f9e8d.mp4".to_string(),
                size: 2048,
                content_type: "video/mp4".to_string(),
                file_type: MediaKind::Video,
                uploaded_at: chrono::Utc::now(),
                message: "File uploaded successfully to server".to_string(),
            }),
        }
    }

    #[test]
    fn test_select_files_filters_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_fixture(dir.path(), "b.png", 4),
            write_fixture(dir.path(), "readme.txt", 4),
            write_fixture(dir.path(), "a.mp4", 4),
            write_fixture(dir.path(), "song.mp3", 4),
            write_fixture(dir.path(), "archive.zip", 4),
        ];

        let selected = select_files(&paths);
        let names: Vec<&str> = selected.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["b.png", "a.mp4", "song.mp3"]);
        assert_eq!(selected[0].mime_type, "image/png");
        assert_eq!(selected[1].mime_type, "video/mp4");
        assert_eq!(selected[1].path, paths[2]);
    }

    #[test]
    fn test_select_files_without_extension_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![write_fixture(dir.path(), "mystery", 4)];
        assert!(select_files(&paths).is_empty());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_describe_success_and_failure() {
        let ok = describe_outcome(&success("clip.mp4", true));
        assert!(ok.starts_with("✅ clip.mp4 (video, 2.00 KiB)"));
        assert!(ok.contains("/uploads/1700000000000_k3j2h1g0f9e8d.mp4"));
        assert!(ok.contains("Inline preview included"));

        let no_preview = describe_outcome(&success("clip.mp4", false));
        assert!(!no_preview.contains("Inline preview"));

        let failed = UploadOutcome {
            index: 1,
            filename: "huge.png".to_string(),
            result: Err(UploadFailure::rejected(
                400,
                r#"{"error":"File size must be less than 10MB"}"#,
            )),
        };
        assert_eq!(
            describe_outcome(&failed),
            "❌ huge.png: Upload rejected with status 400: File size must be less than 10MB"
        );
    }

    #[test]
    fn test_outcome_json_shape() {
        let value = outcome_json(&success("clip.mp4", false));
        assert_eq!(value["success"], true);
        assert_eq!(value["file"], "clip.mp4");
        assert_eq!(value["data"]["fileType"], "video");

        let failed = UploadOutcome {
            index: 3,
            filename: "gone.wav".to_string(),
            result: Err(UploadFailure::Read("gone.wav: not found".to_string())),
        };
        let value = outcome_json(&failed);
        assert_eq!(value["index"], 3);
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Failed to read file: gone.wav: not found");
    }

    #[tokio::test]
    async fn test_unreadable_file_fails_without_network() {
        let client = reqwest::Client::new();
        let file = SelectedFile {
            path: PathBuf::from("/definitely/not/here.png"),
            filename: "here.png".to_string(),
            mime_type: "image/png".to_string(),
        };

        let err = upload_one(&client, "http://127.0.0.1:9", file)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadFailure::Read(_)));
    }
}
