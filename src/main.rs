//! Playlist Ripper - turn a playlist export into tagged audio files.
//!
//! Each row of the exported CSV is searched on YouTube Music, its best
//! audio stream is transcoded with ffmpeg, and the result is tagged from the
//! row and given the album cover. Rows that fail are written to a separate
//! CSV so the run can be repeated for just those tracks.

pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod metadata;
pub mod organizer;
pub mod pipeline;
pub mod playlist;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; stdout is reserved for progress lines
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("playlist_ripper=info".parse()?))
        .init();

    cli::run_command(&args)
}
