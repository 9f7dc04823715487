//! Whole-playlist runs.
//!
//! Reads the export, feeds every row through the [`Pipeline`] in input
//! order, collects the rows that failed and writes them to the failure
//! table at the end.

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use super::orchestrator::{Pipeline, ProcessingOutcome};
use crate::error::{Result, ResultExt};
use crate::media::traits::{ImageFetch, MediaSearch, Transcode};
use crate::playlist::{self, PlaylistRow};

/// Counts and artifacts of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Whether the run stopped early on cancellation
    pub cancelled: bool,
    /// Set when at least one row failed
    pub failure_table: Option<PathBuf>,
}

impl RunSummary {
    /// Records that reached an outcome.
    pub fn processed(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

/// Process every row of `input`, writing failed rows to `failure_table`.
///
/// Only table and output-directory errors abort the run; per-record
/// problems end up in the summary.
pub async fn run_batch<S, F, T>(
    pipeline: &mut Pipeline<S, F, T>,
    input: &Path,
    failure_table: &Path,
    cancel: &CancellationToken,
) -> Result<RunSummary>
where
    S: MediaSearch,
    F: ImageFetch,
    T: Transcode,
{
    let playlist = playlist::read_playlist(input)?;

    let output_dir = pipeline.config().output_dir.clone();
    std::fs::create_dir_all(&output_dir)
        .with_context(format!("Failed to create {}", output_dir.display()))?;

    let total = playlist.len();
    tracing::info!(input = ?input, tracks = total, output = ?output_dir, "Starting run");

    let mut summary = RunSummary {
        total,
        ..Default::default()
    };
    let mut failures: Vec<&PlaylistRow> = Vec::new();

    for row in &playlist.rows {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }

        match pipeline
            .process_record(row, row.index + 1, total, cancel)
            .await
        {
            ProcessingOutcome::Succeeded { .. } => summary.succeeded += 1,
            ProcessingOutcome::SkippedNoMatch => summary.skipped += 1,
            ProcessingOutcome::Failed(_) => {
                summary.failed += 1;
                failures.push(row);
            }
            ProcessingOutcome::Cancelled => {
                summary.cancelled = true;
                break;
            }
        }
    }

    let reporter = pipeline.reporter();
    if summary.cancelled {
        reporter.cancelled();
    }

    if failures.is_empty() {
        if !summary.cancelled {
            reporter.all_succeeded();
        }
    } else {
        playlist::write_failures(failure_table, &playlist.headers, failures)?;
        reporter.failures_written(summary.failed, failure_table);
        summary.failure_table = Some(failure_table.to_path_buf());
    }

    tracing::info!(
        succeeded = summary.succeeded,
        skipped = summary.skipped,
        failed = summary.failed,
        cancelled = summary.cancelled,
        "Run complete"
    );
    Ok(summary)
}
