//! External media collaborators.
//!
//! The pipeline needs three things from the outside world:
//!
//! 1. **Search**: resolve `"<artist> - <title>"` to a playable stream id
//!    (YouTube Music).
//! 2. **Cover art**: download the album image named in the playlist row.
//! 3. **Transcode**: pull the best audio stream with yt-dlp and encode a
//!    tagged file with ffmpeg.
//!
//! Each is reached through a trait in [`traits`] so the orchestrator can be
//! tested without network access or installed tools.

pub mod cover;
pub mod domain;
pub mod extract;
pub mod search;
pub mod tool;
pub mod traits;
pub mod transcode;

pub use cover::CoverArtFetcher;
pub use domain::{FetchError, SearchCandidate, SearchError, TranscodeError};
pub use extract::StreamExtractor;
pub use search::YouTubeMusicClient;
pub use tool::Tool;
pub use traits::{ImageFetch, MediaSearch, Transcode};
pub use transcode::{EncodeOptions, FfmpegTranscoder};
