//! Audio file metadata reading.
//!
//! Uses the lofty crate for format-independent metadata access. Tags are
//! written by ffmpeg during transcoding; this module reads them back to
//! verify the produced file and to show what a file carries.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;

/// What a produced audio file contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSummary {
    pub file_type: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<u32>,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
    /// Whether any embedded picture is present
    pub has_cover: bool,
    pub duration: Duration,
    /// Audio bitrate in kbps, when the format reports one
    pub audio_bitrate: Option<u32>,
}

/// Open a file and summarize its audio properties and primary tag.
pub fn read(path: &Path) -> Result<AudioSummary> {
    // Detect the format and read tags
    let tagged_file = Probe::open(path)
        .context("Failed to open audio file")?
        .read()
        .context("Failed to read file metadata")?;

    // Get the primary tag, or fall back to the first available tag
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    let properties = tagged_file.properties();

    Ok(AudioSummary {
        file_type: format!("{:?}", tagged_file.file_type()),
        title: tag.and_then(|t| t.title().map(|s| s.to_string())),
        artist: tag.and_then(|t| t.artist().map(|s| s.to_string())),
        album: tag.and_then(|t| t.album().map(|s| s.to_string())),
        year: tag.and_then(|t| t.year()),
        track_number: tag.and_then(|t| t.track()),
        disc_number: tag.and_then(|t| t.disk()),
        has_cover: tag.is_some_and(|t| !t.pictures().is_empty()),
        duration: properties.duration(),
        audio_bitrate: properties.audio_bitrate(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_non_audio_file_returns_error() {
        // Create a temporary text file
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").expect("Failed to write to temp file");

        // Should fail because it's not a valid audio file
        assert!(read(file.path()).is_err());
    }

    #[test]
    fn test_read_empty_file_returns_error() {
        let file = NamedTempFile::new().expect("Failed to create temp file");
        assert!(read(file.path()).is_err());
    }

    #[test]
    fn test_read_non_existent_file_returns_error() {
        let path = Path::new("non_existent_file.mp3");
        assert!(read(path).is_err());
    }
}
