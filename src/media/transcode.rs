//! Stream-to-file transcoding with ffmpeg.
//!
//! One ffmpeg run per track: the resolved audio stream is encoded at a fixed
//! bitrate, tagged from the playlist record, and (when a cover is available)
//! muxed with the cover as an attached picture. The result is read back with
//! lofty before the track counts as done.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::domain::TranscodeError;
use super::extract::StreamExtractor;
use super::tool::{Tool, ToolError};
use crate::metadata;
use crate::playlist::TrackRecord;

pub const DEFAULT_BITRATE_KBPS: u32 = 256;
pub const DEFAULT_CODEC: &str = "libmp3lame";
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub bitrate_kbps: u32,
    /// ffmpeg audio encoder name
    pub codec: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
            codec: DEFAULT_CODEC.to_string(),
        }
    }
}

/// Tag key/value pairs written for a record, in write order.
///
/// Every key is always present; absent fields become empty values.
pub fn metadata_tags(record: &TrackRecord) -> Vec<(&'static str, String)> {
    let explicit = record.is_explicit();
    vec![
        ("title", record.title().to_string()),
        ("artist", record.artist().to_string()),
        ("album", record.album().to_string()),
        (
            "date",
            record
                .release_year()
                .map(|year| year.to_string())
                .unwrap_or_default(),
        ),
        ("track", record.track_number().to_string()),
        ("disc", record.disc_number().to_string()),
        ("ISRC", record.isrc().to_string()),
        ("explicit", if explicit { "1" } else { "0" }.to_string()),
        (
            "Parental Advisory",
            if explicit { "Yes" } else { "No" }.to_string(),
        ),
    ]
}

/// Assemble the ffmpeg command line.
///
/// Exactly one audio stream is mapped; with a cover the image is copied as
/// an attached picture.
pub fn ffmpeg_args(
    source: &str,
    cover: Option<&Path>,
    tags: &[(&'static str, String)],
    options: &EncodeOptions,
    output: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]
        .iter()
        .map(OsString::from)
        .collect();

    args.push("-i".into());
    args.push(source.into());

    if let Some(cover) = cover {
        args.push("-i".into());
        args.push(cover.as_os_str().to_owned());
    }

    args.push("-map".into());
    args.push("0:a:0".into());

    if cover.is_some() {
        for arg in ["-map", "1:v:0", "-c:v", "copy", "-disposition:v:0", "attached_pic"] {
            args.push(arg.into());
        }
    }

    args.push("-c:a".into());
    args.push(options.codec.as_str().into());
    args.push("-b:a".into());
    args.push(format!("{}k", options.bitrate_kbps).into());

    for (key, value) in tags {
        args.push("-metadata".into());
        args.push(format!("{}={}", key, value).into());
    }

    args.push(output.as_os_str().to_owned());
    args
}

/// Extracts a stream with yt-dlp and writes a tagged file with ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    extractor: StreamExtractor,
    ffmpeg: Tool,
    options: EncodeOptions,
    timeout: Duration,
}

impl FfmpegTranscoder {
    pub fn new(
        extractor: StreamExtractor,
        ffmpeg: impl Into<PathBuf>,
        options: EncodeOptions,
        timeout: Duration,
    ) -> Self {
        Self {
            extractor,
            ffmpeg: Tool::new("ffmpeg", ffmpeg),
            options,
            timeout,
        }
    }

    pub fn extractor(&self) -> &StreamExtractor {
        &self.extractor
    }

    pub fn ffmpeg(&self) -> &Tool {
        &self.ffmpeg
    }

    /// Produce a tagged audio file at `output` from `stream_id`.
    ///
    /// `cover` is attached only if it exists on disk. On failure a partial
    /// file may remain at `output`.
    pub async fn transcode(
        &self,
        stream_id: &str,
        record: &TrackRecord,
        output: &Path,
        cover: Option<&Path>,
    ) -> Result<(), TranscodeError> {
        let source = self.extractor.resolve_audio_url(stream_id).await?;

        let cover = cover.filter(|path| path.is_file());
        let tags = metadata_tags(record);
        let args = ffmpeg_args(&source, cover, &tags, &self.options, output);

        tracing::debug!(
            output = ?output,
            with_cover = cover.is_some(),
            bitrate_kbps = self.options.bitrate_kbps,
            "Encoding"
        );

        self.ffmpeg
            .run(&args, self.timeout)
            .await
            .map_err(|e| match e {
                ToolError::Missing(message) => TranscodeError::ToolMissing {
                    tool: self.ffmpeg.name.to_string(),
                    message,
                },
                ToolError::TimedOut(after) => TranscodeError::Timeout {
                    stage: "Encoding".to_string(),
                    after,
                },
                failed => TranscodeError::Encoding(failed.to_string()),
            })?;

        verify_output(output).await
    }
}

/// Check that ffmpeg produced a readable audio file.
///
/// Reading tags with lofty is blocking file I/O and runs on the blocking pool.
async fn verify_output(output: &Path) -> Result<(), TranscodeError> {
    let path = output.to_path_buf();
    let summary = tokio::task::spawn_blocking(move || metadata::read(&path))
        .await
        .map_err(|e| TranscodeError::Verification(format!("read task failed: {}", e)))?
        .map_err(|e| TranscodeError::Verification(format!("{:#}", e)))?;
    if summary.duration.is_zero() {
        return Err(TranscodeError::Verification(format!(
            "{} has no audio",
            output.display()
        )));
    }
    tracing::debug!(
        output = ?output,
        duration_secs = summary.duration.as_secs(),
        has_cover = summary.has_cover,
        "Verified output"
    );
    Ok(())
}
