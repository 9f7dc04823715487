//! Playlist download command.

use anyhow::bail;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::media::{
    CoverArtFetcher, EncodeOptions, FfmpegTranscoder, StreamExtractor, YouTubeMusicClient,
};
use crate::pipeline::{self, Pipeline, PipelineConfig};

use super::tools::{FFMPEG_VERSION_FLAG, YTDLP_VERSION_FLAG, print_install_instructions};

/// Download every row of the configured playlist
pub fn cmd_download(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    let search = YouTubeMusicClient::new(
        config.search.base_url.clone(),
        config.search.client_version.clone(),
        config.network.search_timeout(),
    )?;
    let fetcher = CoverArtFetcher::new(config.network.cover_timeout())?;
    let extractor = StreamExtractor::new(
        config.tools.ytdlp.clone(),
        config.network.extract_timeout(),
    );
    let transcoder = FfmpegTranscoder::new(
        extractor,
        config.tools.ffmpeg.clone(),
        EncodeOptions {
            bitrate_kbps: config.transcode.bitrate_kbps,
            codec: config.transcode.codec.clone(),
        },
        config.transcode.timeout(),
    );

    // Without the tools every row would fail, so stop before starting
    let (ytdlp_ok, ffmpeg_ok) = rt.block_on(async {
        tokio::join!(
            transcoder.extractor().tool().is_available(YTDLP_VERSION_FLAG),
            transcoder.ffmpeg().is_available(FFMPEG_VERSION_FLAG),
        )
    });
    if !ytdlp_ok || !ffmpeg_ok {
        print_install_instructions();
        bail!("Required tools are missing; run `check-tools` for details");
    }

    let mut pipeline = Pipeline::new(
        search,
        fetcher,
        transcoder,
        PipelineConfig {
            output_dir: config.paths.output_dir.clone(),
            extension: config.transcode.extension.clone(),
            on_collision: config.transcode.on_collision,
            temp_dir: None,
        },
    );

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    rt.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling");
            signal_token.cancel();
        }
    });

    let summary = rt.block_on(pipeline::run_batch(
        &mut pipeline,
        &config.paths.input,
        &config.paths.failed_table,
        &cancel,
    ))?;

    println!();
    println!(
        "{} of {} tracks downloaded, {} without a match, {} failed",
        summary.succeeded, summary.total, summary.skipped, summary.failed
    );
    if summary.cancelled {
        println!(
            "Stopped early; {} tracks were not processed",
            summary.total - summary.processed()
        );
    }

    Ok(())
}
