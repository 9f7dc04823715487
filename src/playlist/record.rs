//! Typed view of one playlist export row.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::Deserialize;

/// Column names of the playlist export. Case- and space-sensitive.
pub mod columns {
    pub const ARTIST: &str = "Artist Name(s)";
    pub const TRACK: &str = "Track Name";
    pub const ALBUM: &str = "Album Name";
    pub const RELEASE_DATE: &str = "Album Release Date";
    pub const TRACK_NUMBER: &str = "Track Number";
    pub const DISC_NUMBER: &str = "Disc Number";
    pub const ISRC: &str = "ISRC";
    pub const EXPLICIT: &str = "Explicit";
    pub const IMAGE_URL: &str = "Album Image URL";

    /// Columns that must be present in the header row.
    pub const REQUIRED: &[&str] = &[ARTIST, TRACK];
}

/// One track of the playlist export.
///
/// Fields keep the raw text of the export. Empty cells and missing optional
/// columns are `None`; they become empty tag values downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrackRecord {
    #[serde(rename = "Artist Name(s)", default)]
    pub artist: Option<String>,
    #[serde(rename = "Track Name", default)]
    pub title: Option<String>,
    #[serde(rename = "Album Name", default)]
    pub album: Option<String>,
    #[serde(rename = "Album Release Date", default)]
    pub release_date: Option<String>,
    #[serde(rename = "Track Number", default)]
    pub track_number: Option<String>,
    #[serde(rename = "Disc Number", default)]
    pub disc_number: Option<String>,
    #[serde(rename = "ISRC", default)]
    pub isrc: Option<String>,
    #[serde(rename = "Explicit", default)]
    pub explicit: Option<String>,
    #[serde(rename = "Album Image URL", default)]
    pub image_url: Option<String>,
}

impl TrackRecord {
    pub fn artist(&self) -> &str {
        self.artist.as_deref().unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn album(&self) -> &str {
        self.album.as_deref().unwrap_or_default()
    }

    pub fn track_number(&self) -> &str {
        self.track_number.as_deref().unwrap_or_default()
    }

    pub fn disc_number(&self) -> &str {
        self.disc_number.as_deref().unwrap_or_default()
    }

    pub fn isrc(&self) -> &str {
        self.isrc.as_deref().unwrap_or_default()
    }

    /// Only the literal `TRUE` marks a track explicit.
    pub fn is_explicit(&self) -> bool {
        self.explicit.as_deref() == Some("TRUE")
    }

    /// Album image URL, if the cell is non-blank.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Release year parsed from the release date, if any.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(parse_release_year)
    }

    /// Free-text query for the media search: `<artist> - <title>`.
    pub fn search_query(&self) -> String {
        format!("{} - {}", self.artist(), self.title())
    }

    /// Short label used in console lines and log fields.
    pub fn display_name(&self) -> String {
        self.search_query()
    }
}

/// Extract the year from a release date.
///
/// Exports carry `YYYY-MM-DD`, `YYYY-MM` or a bare `YYYY` depending on the
/// precision the catalog knows; full RFC 3339 timestamps are accepted too.
pub fn parse_release_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.year());
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
        return Some(date.year());
    }
    if raw.len() == 4
        && let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01-01", raw), "%Y-%m-%d")
    {
        return Some(date.year());
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_year_precisions() {
        assert_eq!(parse_release_year("2020-03-20"), Some(2020));
        assert_eq!(parse_release_year("1999-07"), Some(1999));
        assert_eq!(parse_release_year("1975"), Some(1975));
        assert_eq!(parse_release_year("2004-05-11T00:00:00Z"), Some(2004));
    }

    #[test]
    fn test_parse_release_year_rejects_garbage() {
        assert_eq!(parse_release_year(""), None);
        assert_eq!(parse_release_year("   "), None);
        assert_eq!(parse_release_year("garbage"), None);
        assert_eq!(parse_release_year("0000-13-45"), None);
        assert_eq!(parse_release_year("19"), None);
    }

    #[test]
    fn test_explicit_is_literal_true() {
        let mut record = TrackRecord {
            explicit: Some("TRUE".to_string()),
            ..Default::default()
        };
        assert!(record.is_explicit());

        record.explicit = Some("true".to_string());
        assert!(!record.is_explicit());

        record.explicit = None;
        assert!(!record.is_explicit());
    }

    #[test]
    fn test_absent_fields_are_empty() {
        let record = TrackRecord::default();
        assert_eq!(record.album(), "");
        assert_eq!(record.isrc(), "");
        assert_eq!(record.release_year(), None);
        assert_eq!(record.image_url(), None);
    }

    #[test]
    fn test_search_query() {
        let record = TrackRecord {
            artist: Some("Queen".to_string()),
            title: Some("Bohemian Rhapsody".to_string()),
            ..Default::default()
        };
        assert_eq!(record.search_query(), "Queen - Bohemian Rhapsody");
    }

    #[test]
    fn test_blank_image_url_is_none() {
        let record = TrackRecord {
            image_url: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(record.image_url(), None);
    }
}
