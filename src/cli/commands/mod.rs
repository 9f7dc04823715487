//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `download`: run a whole playlist through the pipeline
//! - `search`: query the search service directly
//! - `tools`: external tool checks and output inspection
//! - `settings`: show or initialize the configuration file

mod download;
mod search;
mod settings;
mod tools;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::organizer::CollisionPolicy;

pub use download::cmd_download;
pub use search::cmd_search;
pub use settings::cmd_config;
pub use tools::{cmd_check_tools, cmd_inspect};

/// Playlist Ripper CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read settings from this file instead of the default location
    #[arg(long, global = true, env = "PLAYLIST_RIPPER_CONFIG")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Download every track of a playlist export as tagged audio files
    Download(DownloadArgs),
    /// Search for songs and print the candidates
    Search {
        /// Free-text query, e.g. "Queen - Bohemian Rhapsody"
        query: String,
        /// Maximum number of candidates to print
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
    /// Check if yt-dlp and ffmpeg are installed
    CheckTools,
    /// Show the tags and audio properties of a produced file
    Inspect {
        /// Path to the audio file
        path: PathBuf,
    },
    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

/// Overrides for the `[paths]` and `[transcode]` settings
#[derive(Args, Debug, Default, Clone)]
pub struct DownloadArgs {
    /// Playlist export (CSV) to read
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Directory for the audio files
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Where to write rows that failed
    #[arg(short, long)]
    pub failed: Option<PathBuf>,
    /// Audio bitrate in kbps
    #[arg(short, long)]
    pub bitrate: Option<u32>,
    /// What to do when two tracks share a title
    #[arg(long, value_enum)]
    pub on_collision: Option<CollisionPolicy>,
}

impl DownloadArgs {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.paths.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.paths.output_dir = output.clone();
        }
        if let Some(failed) = &self.failed {
            config.paths.failed_table = failed.clone();
        }
        if let Some(bitrate) = self.bitrate {
            config.transcode.bitrate_kbps = bitrate;
        }
        if let Some(policy) = self.on_collision {
            config.transcode.on_collision = policy;
        }
    }
}

/// Load the configuration the command should run with.
fn load_config(cli: &Cli) -> Config {
    match &cli.config_file {
        Some(path) => config::load_from(path),
        None => config::load(),
    }
}

/// Run the selected command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let mut config = load_config(cli);

    match &cli.command {
        Commands::Download(args) => {
            args.apply(&mut config);
            cmd_download(&rt, &config)
        }
        Commands::Search { query, limit } => cmd_search(&rt, &config, query, *limit),
        Commands::CheckTools => cmd_check_tools(&rt, &config),
        Commands::Inspect { path } => cmd_inspect(path),
        Commands::Config { init } => cmd_config(&config, cli.config_file.as_deref(), *init),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_defaults_leave_config_untouched() {
        let cli = Cli::try_parse_from(["playlist-ripper", "download"]).unwrap();
        let Commands::Download(args) = cli.command else {
            panic!("expected download");
        };

        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_download_flags_override_config() {
        let cli = Cli::try_parse_from([
            "playlist-ripper",
            "download",
            "--input",
            "mine.csv",
            "--output",
            "music",
            "--failed",
            "retry.csv",
            "--bitrate",
            "320",
            "--on-collision",
            "suffix",
        ])
        .unwrap();
        let Commands::Download(args) = cli.command else {
            panic!("expected download");
        };

        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.paths.input, PathBuf::from("mine.csv"));
        assert_eq!(config.paths.output_dir, PathBuf::from("music"));
        assert_eq!(config.paths.failed_table, PathBuf::from("retry.csv"));
        assert_eq!(config.transcode.bitrate_kbps, 320);
        assert_eq!(config.transcode.on_collision, CollisionPolicy::Suffix);
    }

    #[test]
    fn test_unknown_collision_policy_is_rejected() {
        let result =
            Cli::try_parse_from(["playlist-ripper", "download", "--on-collision", "rename"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_limit_default() {
        let cli = Cli::try_parse_from(["playlist-ripper", "search", "Queen - Bohemian Rhapsody"])
            .unwrap();
        match cli.command {
            Commands::Search { query, limit } => {
                assert_eq!(query, "Queen - Bohemian Rhapsody");
                assert_eq!(limit, 5);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_config_file_is_global() {
        let cli = Cli::try_parse_from([
            "playlist-ripper",
            "check-tools",
            "--config-file",
            "/tmp/ripper.toml",
        ])
        .unwrap();
        assert_eq!(cli.config_file, Some(PathBuf::from("/tmp/ripper.toml")));
    }
}
