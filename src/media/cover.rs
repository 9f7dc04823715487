//! Album artwork download.
//!
//! Streams an image straight to a local file so that large covers never sit
//! in memory. A failed download may leave a partial file behind; callers
//! decide whether the file is usable.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::media::domain::FetchError;

/// User agent string
const USER_AGENT: &str = concat!("PlaylistRipper/", env!("CARGO_PKG_VERSION"));

/// Downloads cover images over HTTP(S).
pub struct CoverArtFetcher {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl CoverArtFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            timeout,
        })
    }

    /// Download `url` into `dest`, replacing any existing file.
    ///
    /// Succeeds only once the whole body is written and flushed.
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let parsed = reqwest::Url::parse(url.trim())
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        let response = self
            .http_client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| FetchError::Write(format!("{}: {}", dest.display(), e)))?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.transport_error(e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::Write(format!("{}: {}", dest.display(), e)))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| FetchError::Write(format!("{}: {}", dest.display(), e)))?;

        tracing::debug!(url, path = ?dest, bytes = written, "Downloaded cover art");
        Ok(())
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
