//! YouTube Music search HTTP client
//!
//! Talks to the same JSON endpoint the music.youtube.com web client uses.
//! No API key is required; the request carries a web client context and a
//! filter that restricts results to songs.

use std::time::Duration;

use super::{adapter, dto};
use crate::media::domain::{SearchCandidate, SearchError};

/// Encoded filter: songs only.
const SONGS_FILTER: &str = "EgWKAQIIAWoMEA4QChADEAQQCRAF";

/// Web client identity the endpoint expects.
const CLIENT_NAME: &str = "WEB_REMIX";

pub const DEFAULT_BASE_URL: &str = "https://music.youtube.com";
pub const DEFAULT_CLIENT_VERSION: &str = "1.20240918.01.00";

/// User agent string
const USER_AGENT: &str = concat!("PlaylistRipper/", env!("CARGO_PKG_VERSION"));

/// YouTube Music search client
pub struct YouTubeMusicClient {
    http_client: reqwest::Client,
    base_url: String,
    client_version: String,
    timeout: Duration,
}

impl YouTubeMusicClient {
    /// Create a new client with a per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        client_version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_version: client_version.into(),
            timeout,
        })
    }

    /// Search for songs matching a free-text query, best match first.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError> {
        let response = self.send_search_request(query).await?;
        let candidates = adapter::to_candidates(&response);
        tracing::debug!(query, results = candidates.len(), "Search complete");
        Ok(candidates)
    }

    /// Send the HTTP request and parse the response
    async fn send_search_request(&self, query: &str) -> Result<dto::SearchResponse, SearchError> {
        let url = format!("{}/youtubei/v1/search?prettyPrint=false", self.base_url);

        let body = dto::SearchRequest {
            context: dto::RequestContext {
                client: dto::ClientInfo {
                    client_name: CLIENT_NAME.to_string(),
                    client_version: self.client_version.clone(),
                    hl: "en".to_string(),
                    gl: "US".to_string(),
                },
            },
            query: query.to_string(),
            params: Some(SONGS_FILTER.to_string()),
        };

        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::ORIGIN, self.base_url.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();

        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response.json::<dto::SearchResponse>().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout(self.timeout)
            } else {
                SearchError::Parse(e.to_string())
            }
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::Timeout(self.timeout)
        } else {
            SearchError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SEARCH_RESPONSE_SAMPLE;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> YouTubeMusicClient {
        YouTubeMusicClient::new(server.url(), "1.0", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            YouTubeMusicClient::new("http://localhost:8080/", "1.0", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("PlaylistRipper/"));
    }

    #[tokio::test]
    async fn test_search_parses_candidates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Regex(r"^/youtubei/v1/search".to_string()))
            .match_body(Matcher::PartialJsonString(
                r#"{"query": "Queen - Bohemian Rhapsody", "params": "EgWKAQIIAWoMEA4QChADEAQQCRAF"}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SEARCH_RESPONSE_SAMPLE)
            .create_async()
            .await;

        let candidates = client_for(&server)
            .search("Queen - Bohemian Rhapsody")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].stream_id, "fJ9rUzIMcZQ");
    }

    #[tokio::test]
    async fn test_search_empty_page_is_no_candidates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Regex(r"^/youtubei/v1/search".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let candidates = client_for(&server).search("nothing here").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_search_server_error_is_search_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Regex(r"^/youtubei/v1/search".to_string()))
            .with_status(500)
            .create_async()
            .await;

        let result = client_for(&server).search("Queen - Innuendo").await;
        assert!(matches!(result, Err(SearchError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_search_garbage_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Regex(r"^/youtubei/v1/search".to_string()))
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let result = client_for(&server).search("Queen - Innuendo").await;
        assert!(matches!(result, Err(SearchError::Parse(_))));
    }
}
