//! Test utilities and fixtures for playlist-ripper tests.
//!
//! This module provides common test helpers and canned service responses
//! to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use playlist_ripper::test_utils::{mock_playlist_row, write_playlist};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let input = write_playlist(dir.path(), &[("Queen", "Bohemian Rhapsody")]);
//!     // ... test logic
//! }
//! ```

use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::playlist::{PlaylistRow, TrackRecord};

/// Header row of a typical playlist export, including columns the pipeline
/// does not use.
pub const PLAYLIST_HEADERS: &[&str] = &[
    "Track URI",
    "Track Name",
    "Artist Name(s)",
    "Album Name",
    "Album Release Date",
    "Album Image URL",
    "Disc Number",
    "Track Number",
    "ISRC",
    "Explicit",
    "Popularity",
];

/// Creates a mock TrackRecord with every column filled in.
///
/// Customize using struct update syntax:
///
/// ```ignore
/// let record = TrackRecord {
///     album: None,
///     ..mock_track_record()
/// };
/// ```
pub fn mock_track_record() -> TrackRecord {
    TrackRecord {
        artist: Some("Queen".to_string()),
        title: Some("Bohemian Rhapsody".to_string()),
        album: Some("A Night at the Opera".to_string()),
        release_date: Some("1975-11-21".to_string()),
        track_number: Some("11".to_string()),
        disc_number: Some("1".to_string()),
        isrc: Some("GBUM71029604".to_string()),
        explicit: Some("FALSE".to_string()),
        image_url: Some("https://i.scdn.co/image/ab67616d0000b273".to_string()),
    }
}

/// Raw export fields for one row, in [`PLAYLIST_HEADERS`] order.
pub fn export_fields(index: usize, artist: &str, title: &str) -> Vec<String> {
    vec![
        format!("spotify:track:{}", index),
        title.to_string(),
        artist.to_string(),
        "Some Album".to_string(),
        "2020-03-20".to_string(),
        format!("https://i.scdn.co/image/{}", index),
        "1".to_string(),
        (index + 1).to_string(),
        format!("USXX{:08}", index),
        "FALSE".to_string(),
        "50".to_string(),
    ]
}

/// Creates a PlaylistRow whose raw fields and typed record agree.
pub fn mock_playlist_row(index: usize, artist: &str, title: &str) -> PlaylistRow {
    let headers = StringRecord::from(PLAYLIST_HEADERS.to_vec());
    let raw = StringRecord::from(export_fields(index, artist, title));
    let track: TrackRecord = raw
        .deserialize(Some(&headers))
        .expect("fixture row deserializes");
    PlaylistRow { index, raw, track }
}

/// Writes a playlist export with one row per `(artist, title)` pair.
///
/// Returns the path of the written `in.csv`.
pub fn write_playlist(dir: &Path, tracks: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("in.csv");
    let mut writer = csv::Writer::from_path(&path).expect("Failed to create playlist");
    writer
        .write_record(PLAYLIST_HEADERS)
        .expect("Failed to write headers");
    for (index, (artist, title)) in tracks.iter().enumerate() {
        writer
            .write_record(export_fields(index, artist, title))
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush playlist");
    path
}

/// Trimmed-down copy of a real songs-filtered search response.
pub const SEARCH_RESPONSE_SAMPLE: &str = r#"{
      "contents": {"tabbedSearchResultsRenderer": {"tabs": [{"tabRenderer": {"content": {
        "sectionListRenderer": {"contents": [
          {"musicShelfRenderer": {"contents": [
            {"musicResponsiveListItemRenderer": {
              "flexColumns": [
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [
                  {"text": "Bohemian Rhapsody", "navigationEndpoint": {"watchEndpoint": {"videoId": "fJ9rUzIMcZQ"}}}
                ]}}},
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [
                  {"text": "Queen", "navigationEndpoint": {"browseEndpoint": {"browseId": "UCiMhD4jzUqG-IgPzUmmytRQ",
                    "browseEndpointContextSupportedConfigs": {"browseEndpointContextMusicConfig": {"pageType": "MUSIC_PAGE_TYPE_ARTIST"}}}}},
                  {"text": " • "},
                  {"text": "A Night At The Opera", "navigationEndpoint": {"browseEndpoint": {"browseId": "MPREb_1",
                    "browseEndpointContextSupportedConfigs": {"browseEndpointContextMusicConfig": {"pageType": "MUSIC_PAGE_TYPE_ALBUM"}}}}},
                  {"text": " • "},
                  {"text": "5:55"}
                ]}}}
              ],
              "playlistItemData": {"videoId": "fJ9rUzIMcZQ"}
            }},
            {"musicResponsiveListItemRenderer": {
              "flexColumns": [
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [
                  {"text": "Bohemian Rhapsody (Live)", "navigationEndpoint": {"watchEndpoint": {"videoId": "live123"}}}
                ]}}},
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [
                  {"text": "Queen"}, {"text": " • "}, {"text": "1:02:03"}
                ]}}}
              ]
            }},
            {"musicResponsiveListItemRenderer": {
              "flexColumns": [
                {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [{"text": "Queen"}]}}}
              ]
            }}
          ]}}
        ]}
      }}}]}}
    }"#;
