//! Adapter layer: Convert YouTube Music DTOs to domain models
//!
//! This is the ONLY place where search DTO types are converted to domain
//! types. If the response layout changes, only this file and dto.rs need to
//! change.

use std::time::Duration;

use super::dto;
use crate::media::domain::SearchCandidate;

const PAGE_TYPE_ARTIST: &str = "MUSIC_PAGE_TYPE_ARTIST";
const PAGE_TYPE_ALBUM: &str = "MUSIC_PAGE_TYPE_ALBUM";

/// Separator runs between the parts of the subtitle column.
const SEPARATORS: &[&str] = &[" • ", " & ", ", "];

/// Convert a search response to ranked candidates, in page order.
///
/// Rows without a playable video id (artists, albums, playlists that slip
/// through the filter) are dropped.
pub fn to_candidates(response: &dto::SearchResponse) -> Vec<SearchCandidate> {
    response.items().filter_map(convert_item).collect()
}

fn convert_item(item: &dto::ListItem) -> Option<SearchCandidate> {
    let title_runs = item.column_runs(0);
    let title: String = title_runs.iter().map(|r| r.text.as_str()).collect();

    let stream_id = item
        .playlist_item_data
        .as_ref()
        .and_then(|d| d.video_id.as_deref())
        .or_else(|| title_runs.iter().find_map(dto::Run::video_id))
        .filter(|id| !id.is_empty())?;

    let mut candidate = SearchCandidate::new(title.trim(), stream_id);
    let subtitle = item.column_runs(1);

    candidate.artists = subtitle
        .iter()
        .filter(|r| r.page_type() == Some(PAGE_TYPE_ARTIST))
        .map(|r| r.text.clone())
        .collect();
    if candidate.artists.is_empty() {
        // Unlinked artists: the first non-separator run
        candidate.artists = subtitle
            .iter()
            .map(|r| r.text.as_str())
            .find(|t| !is_separator(t))
            .map(|t| vec![t.to_string()])
            .unwrap_or_default();
    }

    candidate.album = subtitle
        .iter()
        .find(|r| r.page_type() == Some(PAGE_TYPE_ALBUM))
        .map(|r| r.text.clone());

    candidate.duration = subtitle.iter().rev().find_map(|r| parse_duration(&r.text));

    Some(candidate)
}

fn is_separator(text: &str) -> bool {
    SEPARATORS.contains(&text) || text.trim().is_empty()
}

/// Parse `m:ss` or `h:mm:ss`.
fn parse_duration(text: &str) -> Option<Duration> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }
    let mut secs: u64 = 0;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let value: u64 = part.parse().ok()?;
        if i > 0 && value >= 60 {
            return None;
        }
        secs = secs * 60 + value;
    }
    Some(Duration::from_secs(secs))
}
