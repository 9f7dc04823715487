//! Playlist-to-files pipeline.
//!
//! [`run_batch`] walks the playlist and hands each row to a [`Pipeline`],
//! which searches for a stream, fetches cover art and transcodes. Rows are
//! processed one at a time, in input order.

mod batch;
mod orchestrator;
mod report;

pub use batch::{RunSummary, run_batch};
pub use orchestrator::{Pipeline, PipelineConfig, ProcessingOutcome};
pub use report::Reporter;
