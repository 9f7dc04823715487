//! Per-record processing: search, cover art, transcode.
//!
//! Every record ends in exactly one [`ProcessingOutcome`]. Errors from the
//! collaborators are converted here and never reach the batch loop.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio_util::sync::CancellationToken;

use super::report::Reporter;
use crate::media::traits::{ImageFetch, MediaSearch, Transcode};
use crate::media::transcode::DEFAULT_EXTENSION;
use crate::organizer::{self, CollisionPolicy};
use crate::playlist::PlaylistRow;

/// Where and how output files are written.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    /// Output file extension, without the dot
    pub extension: String,
    pub on_collision: CollisionPolicy,
    /// Directory for per-record cover files; the system temp dir when unset
    pub temp_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            extension: DEFAULT_EXTENSION.to_string(),
            on_collision: CollisionPolicy::default(),
            temp_dir: None,
        }
    }
}

/// How a single record ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// A tagged file was written
    Succeeded { path: PathBuf },
    /// The search returned no candidates
    SkippedNoMatch,
    /// Search or transcode failed
    Failed(String),
    /// The run was cancelled while this record was in flight
    Cancelled,
}

impl ProcessingOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ProcessingOutcome::Failed(_))
    }
}

/// Drives records through the external collaborators one at a time.
pub struct Pipeline<S, F, T> {
    search: S,
    fetcher: F,
    transcoder: T,
    config: PipelineConfig,
    reporter: Reporter,
    /// Output paths written so far in this run
    produced: HashSet<PathBuf>,
}

impl<S, F, T> Pipeline<S, F, T>
where
    S: MediaSearch,
    F: ImageFetch,
    T: Transcode,
{
    pub fn new(search: S, fetcher: F, transcoder: T, config: PipelineConfig) -> Self {
        Self {
            search,
            fetcher,
            transcoder,
            config,
            reporter: Reporter::console(),
            produced: HashSet::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Process one record. `position` is 1-based.
    pub async fn process_record(
        &mut self,
        row: &PlaylistRow,
        position: usize,
        total: usize,
        cancel: &CancellationToken,
    ) -> ProcessingOutcome {
        let track = &row.track;
        let name = track.display_name();
        self.reporter.progress(position, total);

        // Search
        if cancel.is_cancelled() {
            return ProcessingOutcome::Cancelled;
        }
        let query = track.search_query();
        self.reporter.searching(&query);
        let searched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return ProcessingOutcome::Cancelled,
            result = self.search.search(&query) => result,
        };
        let candidate = match searched {
            Ok(candidates) => match candidates.into_iter().next() {
                Some(candidate) => candidate,
                None => {
                    self.reporter.no_match(&query);
                    return ProcessingOutcome::SkippedNoMatch;
                }
            },
            Err(e) => return self.fail(&name, e.to_string()),
        };
        tracing::debug!(
            query,
            stream_id = candidate.stream_id,
            title = candidate.title,
            "Selected first candidate"
        );

        // Cover art; the temp file is removed when `cover` drops
        let cover = match track.image_url() {
            Some(url) => {
                if cancel.is_cancelled() {
                    return ProcessingOutcome::Cancelled;
                }
                match temp_cover_path(self.config.temp_dir.as_deref()) {
                    Ok(temp) => {
                        self.reporter.cover_downloading(url);
                        let fetched = tokio::select! {
                            biased;
                            _ = cancel.cancelled() => return ProcessingOutcome::Cancelled,
                            result = self.fetcher.fetch(url, &temp) => result,
                        };
                        match fetched {
                            Ok(()) => {
                                self.reporter.cover_downloaded();
                                Some(temp)
                            }
                            Err(e) => {
                                self.reporter.cover_failed(&e);
                                None
                            }
                        }
                    }
                    Err(e) => {
                        self.reporter
                            .cover_failed(&format!("could not create temporary file: {}", e));
                        None
                    }
                }
            }
            None => {
                self.reporter.no_cover(&name);
                None
            }
        };

        // Transcode
        if cancel.is_cancelled() {
            return ProcessingOutcome::Cancelled;
        }
        let output = organizer::output_path(
            &self.config.output_dir,
            track.title(),
            &self.config.extension,
            self.config.on_collision,
            &self.produced,
        );
        let existed = output.exists();
        self.reporter.extracting(&candidate.watch_url());

        let cover_path: Option<&Path> = cover.as_deref();
        let transcoded = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.transcoder.transcode(&candidate.stream_id, track, &output, cover_path) => Some(result),
        };

        match transcoded {
            Some(Ok(())) => {
                self.reporter.succeeded(&name, &output);
                self.produced.insert(output.clone());
                ProcessingOutcome::Succeeded { path: output }
            }
            Some(Err(e)) => {
                if !existed {
                    remove_partial(&output).await;
                }
                self.fail(&name, e.to_string())
            }
            None => {
                if !existed {
                    remove_partial(&output).await;
                }
                ProcessingOutcome::Cancelled
            }
        }
    }

    fn fail(&self, name: &str, reason: String) -> ProcessingOutcome {
        self.reporter.failed(name, &reason);
        ProcessingOutcome::Failed(reason)
    }
}

/// A fresh, uniquely named path for this record's cover image.
fn temp_cover_path(dir: Option<&Path>) -> std::io::Result<TempPath> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("playlist-ripper-cover-").suffix(".jpg");
    let file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    Ok(file.into_temp_path())
}

async fn remove_partial(output: &Path) {
    match tokio::fs::remove_file(output).await {
        Ok(()) => tracing::debug!(path = ?output, "Removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = ?output, error = %e, "Failed to remove partial output"),
    }
}
