//! Direct search command, useful for checking why a track was skipped.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::media::{SearchCandidate, YouTubeMusicClient};

/// Search for songs and print up to `limit` candidates
pub fn cmd_search(rt: &Runtime, config: &Config, query: &str, limit: usize) -> anyhow::Result<()> {
    let client = YouTubeMusicClient::new(
        config.search.base_url.clone(),
        config.search.client_version.clone(),
        config.network.search_timeout(),
    )?;

    println!("Searching: {}\n", query);
    let candidates = rt.block_on(client.search(query))?;

    if candidates.is_empty() {
        println!("✗ No matches found.");
        return Ok(());
    }

    for (i, candidate) in candidates.iter().take(limit).enumerate() {
        println!("{}. {}", i + 1, describe(candidate));
        println!("   {}", candidate.watch_url());
    }
    if candidates.len() > limit {
        println!("\n({} more not shown)", candidates.len() - limit);
    }

    Ok(())
}

/// One-line description: title, artists, album and duration when known.
fn describe(candidate: &SearchCandidate) -> String {
    let mut line = candidate.title.clone();
    if !candidate.artists.is_empty() {
        line.push_str(" - ");
        line.push_str(&candidate.artists.join(", "));
    }
    if let Some(album) = &candidate.album {
        line.push_str(&format!(" [{}]", album));
    }
    if let Some(duration) = candidate.duration {
        let secs = duration.as_secs();
        line.push_str(&format!(" ({}:{:02})", secs / 60, secs % 60));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_describe_full_candidate() {
        let candidate = SearchCandidate {
            artists: vec!["Queen".to_string()],
            album: Some("A Night At The Opera".to_string()),
            duration: Some(Duration::from_secs(355)),
            ..SearchCandidate::new("Bohemian Rhapsody", "fJ9rUzIMcZQ")
        };
        assert_eq!(
            describe(&candidate),
            "Bohemian Rhapsody - Queen [A Night At The Opera] (5:55)"
        );
    }

    #[test]
    fn test_describe_bare_candidate() {
        assert_eq!(describe(&SearchCandidate::new("Song", "id")), "Song");
    }
}
