//! Trait definitions for the pipeline's external collaborators.
//!
//! The orchestrator only talks to these traits. Production code passes the
//! real clients; tests substitute the mocks below.

use std::path::Path;

use async_trait::async_trait;

use super::cover::CoverArtFetcher;
use super::domain::{FetchError, SearchCandidate, SearchError, TranscodeError};
use super::search::YouTubeMusicClient;
use super::transcode::FfmpegTranscoder;
use crate::playlist::TrackRecord;

/// Song search by free-text query.
#[async_trait]
pub trait MediaSearch: Send + Sync {
    /// Ranked candidates, best first. An empty list means no match.
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError>;
}

/// Image download to a local file.
#[async_trait]
pub trait ImageFetch: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// Stream-to-file transcoding with tagging.
#[async_trait]
pub trait Transcode: Send + Sync {
    async fn transcode(
        &self,
        stream_id: &str,
        record: &TrackRecord,
        output: &Path,
        cover: Option<&Path>,
    ) -> Result<(), TranscodeError>;
}

// Implement traits for real clients

#[async_trait]
impl MediaSearch for YouTubeMusicClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError> {
        self.search(query).await
    }
}

#[async_trait]
impl ImageFetch for CoverArtFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        self.fetch(url, dest).await
    }
}

#[async_trait]
impl Transcode for FfmpegTranscoder {
    async fn transcode(
        &self,
        stream_id: &str,
        record: &TrackRecord,
        output: &Path,
        cover: Option<&Path>,
    ) -> Result<(), TranscodeError> {
        self.transcode(stream_id, record, output, cover).await
    }
}

/// Mock collaborators for testing.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock search service that returns predefined results.
    pub struct MockSearch {
        /// Results to return for every query
        pub results: Vec<SearchCandidate>,
        /// Queries that return no match regardless of `results`
        pub no_match: HashSet<String>,
        /// Error to return (takes precedence over results)
        pub error: Option<SearchError>,
        /// Queries received, in order
        pub queries: Mutex<Vec<String>>,
    }

    impl MockSearch {
        /// Every query matches one candidate.
        pub fn single_match(title: &str, stream_id: &str) -> Self {
            Self::with_results(vec![SearchCandidate::new(title, stream_id)])
        }

        pub fn with_results(results: Vec<SearchCandidate>) -> Self {
            Self {
                results,
                no_match: HashSet::new(),
                error: None,
                queries: Mutex::new(Vec::new()),
            }
        }

        /// Every query comes back empty.
        pub fn no_matches() -> Self {
            Self::with_results(vec![])
        }

        pub fn with_error(error: SearchError) -> Self {
            Self {
                error: Some(error),
                ..Self::no_matches()
            }
        }

        /// Make `query` return no match.
        pub fn without_match_for(mut self, query: &str) -> Self {
            self.no_match.insert(query.to_string());
            self
        }

        pub fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaSearch for MockSearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            if self.no_match.contains(query) {
                return Ok(vec![]);
            }
            Ok(self.results.clone())
        }
    }

    /// Mock image fetcher that writes fixed bytes or fails.
    pub struct MockFetch {
        /// Bytes written to the destination on success
        pub bytes: Vec<u8>,
        /// Error to return (takes precedence over bytes)
        pub error: Option<FetchError>,
        /// Number of fetch calls
        pub calls: AtomicUsize,
    }

    impl MockFetch {
        pub fn with_bytes(bytes: &[u8]) -> Self {
            Self {
                bytes: bytes.to_vec(),
                error: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_error(error: FetchError) -> Self {
            Self {
                bytes: vec![],
                error: Some(error),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageFetch for MockFetch {
        async fn fetch(&self, _url: &str, dest: &Path) -> Result<(), FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            std::fs::write(dest, &self.bytes).map_err(|e| FetchError::Write(e.to_string()))
        }
    }

    /// A transcode call as the mock saw it.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TranscodeCall {
        pub stream_id: String,
        pub title: String,
        pub output: PathBuf,
        /// Cover path passed in, if it existed at call time
        pub cover: Option<PathBuf>,
    }

    /// Mock transcoder that writes a placeholder output file.
    pub struct MockTranscoder {
        /// Stream ids that fail with an encoding error
        pub failing: HashSet<String>,
        /// Whether a failing call leaves a partial output file
        pub leave_partial: bool,
        /// Calls received, in order
        pub calls: Mutex<Vec<TranscodeCall>>,
    }

    impl MockTranscoder {
        pub fn succeeding() -> Self {
            Self {
                failing: HashSet::new(),
                leave_partial: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Fail for `stream_id`, writing a partial file first.
        pub fn failing_for(mut self, stream_id: &str) -> Self {
            self.failing.insert(stream_id.to_string());
            self.leave_partial = true;
            self
        }

        pub fn calls(&self) -> Vec<TranscodeCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transcode for MockTranscoder {
        async fn transcode(
            &self,
            stream_id: &str,
            record: &TrackRecord,
            output: &Path,
            cover: Option<&Path>,
        ) -> Result<(), TranscodeError> {
            self.calls.lock().unwrap().push(TranscodeCall {
                stream_id: stream_id.to_string(),
                title: record.title().to_string(),
                output: output.to_path_buf(),
                cover: cover.filter(|p| p.is_file()).map(Path::to_path_buf),
            });

            if self.failing.contains(stream_id) {
                if self.leave_partial {
                    let _ = std::fs::write(output, b"partial");
                }
                return Err(TranscodeError::Encoding("mock encoder failure".to_string()));
            }

            std::fs::write(output, b"ID3 mock audio")
                .map_err(|e| TranscodeError::Encoding(e.to_string()))
        }
    }
}
