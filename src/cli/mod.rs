//! Command-line interface for playlist-ripper.
//!
//! This module provides CLI commands for downloading a playlist export,
//! querying the search service and checking the external tools.

mod commands;

pub use commands::{Cli, Commands, DownloadArgs, run_command};
