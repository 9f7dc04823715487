//! External tool checks and output inspection.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::media::Tool;
use crate::metadata;

pub(crate) const YTDLP_VERSION_FLAG: &str = "--version";
pub(crate) const FFMPEG_VERSION_FLAG: &str = "-version";

/// Print installation instructions for the external tools
pub(crate) fn print_install_instructions() {
    eprintln!("Install the external tools:");
    eprintln!("  yt-dlp:  pip install yt-dlp  |  brew install yt-dlp  |  winget install yt-dlp");
    eprintln!("  ffmpeg:  apt install ffmpeg  |  brew install ffmpeg  |  winget install ffmpeg");
    eprintln!("Or point [tools] in the config file at their location.");
}

/// Check if yt-dlp and ffmpeg are installed
pub fn cmd_check_tools(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    println!("Checking external tools...\n");

    let ytdlp = Tool::new("yt-dlp", config.tools.ytdlp.clone());
    let ffmpeg = Tool::new("ffmpeg", config.tools.ffmpeg.clone());

    let (ytdlp_version, ffmpeg_version) = rt.block_on(async {
        tokio::join!(
            ytdlp.version(YTDLP_VERSION_FLAG),
            ffmpeg.version(FFMPEG_VERSION_FLAG)
        )
    });

    let mut missing = false;
    for (tool, version) in [(&ytdlp, ytdlp_version), (&ffmpeg, ffmpeg_version)] {
        match version {
            Some(version) => println!("✓ {}: {}", tool.name, version),
            None => {
                println!("✗ {}: NOT FOUND ({})", tool.name, tool.program.display());
                missing = true;
            }
        }
    }

    if missing {
        println!();
        print_install_instructions();
    }

    Ok(())
}

/// Show what a produced audio file carries
pub fn cmd_inspect(path: &Path) -> anyhow::Result<()> {
    let summary = metadata::read(path)?;

    println!("File:     {}", path.display());
    println!("Format:   {}", summary.file_type);
    println!("Duration: {}s", summary.duration.as_secs());
    if let Some(bitrate) = summary.audio_bitrate {
        println!("Bitrate:  {} kbps", bitrate);
    }
    println!();
    println!("  Title:  {}", summary.title.as_deref().unwrap_or("(none)"));
    println!("  Artist: {}", summary.artist.as_deref().unwrap_or("(none)"));
    println!("  Album:  {}", summary.album.as_deref().unwrap_or("(none)"));
    if let Some(year) = summary.year {
        println!("  Year:   {}", year);
    }
    if let Some(track) = summary.track_number {
        println!("  Track:  {}", track);
    }
    if let Some(disc) = summary.disc_number {
        println!("  Disc:   {}", disc);
    }
    println!(
        "  Cover:  {}",
        if summary.has_cover { "embedded" } else { "none" }
    );

    Ok(())
}
