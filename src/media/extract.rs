//! Audio stream extraction via yt-dlp.
//!
//! Resolves a video id to a direct URL of its best audio-only format. The
//! URL is short-lived and handed straight to ffmpeg.

use std::time::Duration;

use super::domain::{TranscodeError, watch_url};
use super::tool::{Tool, ToolError};

/// Resolves stream identifiers to direct audio URLs.
#[derive(Debug, Clone)]
pub struct StreamExtractor {
    tool: Tool,
    timeout: Duration,
}

impl StreamExtractor {
    pub fn new(ytdlp: impl Into<std::path::PathBuf>, timeout: Duration) -> Self {
        Self {
            tool: Tool::new("yt-dlp", ytdlp),
            timeout,
        }
    }

    /// The underlying executable (for diagnostics).
    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Resolve `stream_id` to the URL of its highest quality audio-only format.
    pub async fn resolve_audio_url(&self, stream_id: &str) -> Result<String, TranscodeError> {
        let url = watch_url(stream_id);
        let args = extraction_args(&url);

        let stdout = self
            .tool
            .run(&args, self.timeout)
            .await
            .map_err(|e| match e {
                ToolError::Missing(message) => TranscodeError::ToolMissing {
                    tool: self.tool.name.to_string(),
                    message,
                },
                ToolError::TimedOut(after) => TranscodeError::Timeout {
                    stage: "Stream extraction".to_string(),
                    after,
                },
                failed => TranscodeError::Extraction(failed.to_string()),
            })?;

        let audio_url = first_url(&stdout).ok_or_else(|| {
            TranscodeError::Extraction(format!("no audio-only stream found for {}", url))
        })?;

        tracing::debug!(stream_id, "Resolved audio stream");
        Ok(audio_url)
    }
}

/// yt-dlp arguments printing the direct URL of the best audio-only format.
fn extraction_args(watch_url: &str) -> Vec<String> {
    [
        "--format",
        "bestaudio",
        "--no-playlist",
        "--no-warnings",
        "--quiet",
        "--get-url",
        watch_url,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// First line of tool output that looks like a URL.
fn first_url(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("http://") || line.starts_with("https://"))
        .map(str::to_string)
}
