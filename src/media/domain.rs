//! Internal domain models for media lookup, cover art and transcoding.
//!
//! These types are OUR types - they don't change when the search service or
//! the external tools change. Service responses get converted into these
//! types via adapters.

use std::time::Duration;

/// A ranked match returned by the media search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    /// Display title as reported by the service
    pub title: String,
    /// Opaque stream identifier (a YouTube video id)
    pub stream_id: String,
    /// Artist names as reported by the service
    pub artists: Vec<String>,
    /// Album name, when the service lists one
    pub album: Option<String>,
    /// Duration, when the service lists one
    pub duration: Option<Duration>,
}

impl SearchCandidate {
    /// Create a candidate with only the fields the pipeline needs.
    pub fn new(title: impl Into<String>, stream_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            stream_id: stream_id.into(),
            artists: Vec::new(),
            album: None,
            duration: None,
        }
    }

    /// Watch URL the extraction tool resolves.
    pub fn watch_url(&self) -> String {
        watch_url(&self.stream_id)
    }
}

/// Build the watch URL for a stream identifier.
pub fn watch_url(stream_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", stream_id)
}

/// Errors from the media search service. Fatal to the record.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Search service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse search response: {0}")]
    Parse(String),

    #[error("Search timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors while downloading cover art. Recoverable: the record continues
/// without artwork.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Failed to write image to disk: {0}")]
    Write(String),

    #[error("Image download timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors while extracting, encoding, muxing or verifying audio.
/// Fatal to the record.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TranscodeError {
    #[error("{tool} not found: {message}")]
    ToolMissing { tool: String, message: String },

    #[error("Stream extraction failed: {0}")]
    Extraction(String),

    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("Output verification failed: {0}")]
    Verification(String),

    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: String, after: Duration },
}
