//! YouTube Music search integration
//!
//! Resolves a free-text `"<artist> - <title>"` query to ranked song
//! candidates, each carrying the video id used for stream extraction.

pub mod dto;
mod adapter;
mod client;

pub use adapter::to_candidates;
pub use client::{DEFAULT_BASE_URL, DEFAULT_CLIENT_VERSION, YouTubeMusicClient};
