//! YouTube Music search API data transfer objects.
//!
//! These types mirror the exact JSON shape of the `youtubei/v1/search`
//! response. The response is deeply nested renderer objects; only the
//! fields needed to build search candidates are modelled, everything is
//! defaulted so that layout changes degrade to "no results" instead of a
//! parse failure.
//!
//! DO NOT use these types outside the search module - convert to domain
//! types via the adapter.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request
// ============================================================================

/// Request body for a search call.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub context: RequestContext,
    pub query: String,
    /// Encoded filter selecting the result category (songs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub client: ClientInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub client_name: String,
    pub client_version: String,
    pub hl: String,
    pub gl: String,
}

// ============================================================================
// Response
// ============================================================================

/// Top-level search response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    pub contents: Option<ResponseContents>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseContents {
    pub tabbed_search_results_renderer: Option<TabbedResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TabbedResults {
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tab {
    pub tab_renderer: Option<TabRenderer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TabRenderer {
    pub content: Option<TabContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabContent {
    pub section_list_renderer: Option<SectionList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SectionList {
    pub contents: Vec<Section>,
}

/// A section of the result page. Only music shelves carry results;
/// "did you mean" and other item sections are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    pub music_shelf_renderer: Option<MusicShelf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MusicShelf {
    pub contents: Vec<ShelfItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShelfItem {
    pub music_responsive_list_item_renderer: Option<ListItem>,
}

/// One result row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListItem {
    /// Column 0: title, column 1: artists • album • duration
    pub flex_columns: Vec<FlexColumn>,
    pub playlist_item_data: Option<PlaylistItemData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaylistItemData {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlexColumn {
    pub music_responsive_list_item_flex_column_renderer: Option<FlexColumnRenderer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlexColumnRenderer {
    pub text: Option<Text>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Text {
    pub runs: Vec<Run>,
}

/// A text fragment, optionally linking somewhere.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Run {
    pub text: String,
    pub navigation_endpoint: Option<NavigationEndpoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationEndpoint {
    pub watch_endpoint: Option<WatchEndpoint>,
    pub browse_endpoint: Option<BrowseEndpoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatchEndpoint {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowseEndpoint {
    pub browse_id: Option<String>,
    pub browse_endpoint_context_supported_configs: Option<BrowseConfigs>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowseConfigs {
    pub browse_endpoint_context_music_config: Option<MusicConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MusicConfig {
    /// e.g. `MUSIC_PAGE_TYPE_ARTIST`, `MUSIC_PAGE_TYPE_ALBUM`
    pub page_type: Option<String>,
}

impl Run {
    /// Page type of the linked browse page, if any.
    pub fn page_type(&self) -> Option<&str> {
        self.navigation_endpoint
            .as_ref()?
            .browse_endpoint
            .as_ref()?
            .browse_endpoint_context_supported_configs
            .as_ref()?
            .browse_endpoint_context_music_config
            .as_ref()?
            .page_type
            .as_deref()
    }

    /// Video id of the linked watch page, if any.
    pub fn video_id(&self) -> Option<&str> {
        self.navigation_endpoint
            .as_ref()?
            .watch_endpoint
            .as_ref()?
            .video_id
            .as_deref()
    }
}

impl SearchResponse {
    /// All result rows across all shelves, in page order.
    pub fn items(&self) -> impl Iterator<Item = &ListItem> {
        self.contents
            .iter()
            .filter_map(|c| c.tabbed_search_results_renderer.as_ref())
            .flat_map(|t| t.tabs.iter())
            .filter_map(|tab| tab.tab_renderer.as_ref())
            .filter_map(|tab| tab.content.as_ref())
            .filter_map(|content| content.section_list_renderer.as_ref())
            .flat_map(|list| list.contents.iter())
            .filter_map(|section| section.music_shelf_renderer.as_ref())
            .flat_map(|shelf| shelf.contents.iter())
            .filter_map(|item| item.music_responsive_list_item_renderer.as_ref())
    }
}

impl ListItem {
    /// Text runs of a flex column.
    pub fn column_runs(&self, index: usize) -> &[Run] {
        self.flex_columns
            .get(index)
            .and_then(|c| c.music_responsive_list_item_flex_column_renderer.as_ref())
            .and_then(|r| r.text.as_ref())
            .map(|t| t.runs.as_slice())
            .unwrap_or_default()
    }
}
