//! Video feed loading with two interchangeable sources.
//!
//! Fetches a channel's videos through the YouTube Data API when a key is
//! configured and through an RSS/Atom feed proxy otherwise. Only the API
//! source paginates; the feed source is a single capped document.

use crate::config::Config;
use crate::error::FeedError;
use crate::feed::models::{FeedPage, SearchResponse, VideoSummary};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const API_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// Loads the channel's video feed.
///
/// Holds the HTTP client and the per-channel settings. Cheap to clone so
/// fetches can run on spawned tasks.
#[derive(Debug, Clone)]
pub struct FeedLoader {
    /// HTTP client for both sources
    client: Client,
    /// Channel whose uploads are fetched
    channel_id: String,
    /// Data API key; empty selects feed mode
    api_key: String,
    /// Feed proxy endpoint
    rss_proxy: String,
    /// Origin forwarded to the proxy for server-side validation
    site_origin: String,
    /// Page size (API) / overall cap (feed)
    max_videos: u32,
}

impl FeedLoader {
    /// Create a new feed loader from configuration.
    ///
    /// # Details
    /// Fails fast on unusable configuration: the channel id is always
    /// required, and without an API key the proxy URL is required too.
    pub fn new(config: &Config) -> Result<Self, FeedError> {
        if config.channel_id.trim().is_empty() {
            return Err(FeedError::Config(
                "channel_id is not configured".to_string(),
            ));
        }
        if config.api_key.trim().is_empty() && config.rss_proxy.trim().is_empty() {
            return Err(FeedError::Config(
                "either api_key or rss_proxy must be configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FeedError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            channel_id: config.channel_id.trim().to_string(),
            api_key: config.api_key.trim().to_string(),
            rss_proxy: config.rss_proxy.trim().to_string(),
            site_origin: config.site_origin.trim().to_string(),
            max_videos: config.max_videos.max(1),
        })
    }

    /// Whether the Data API is the active source.
    pub fn api_mode(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Load the first page of videos, optionally narrowed by a search term.
    ///
    /// # Details
    /// A fresh load never sends a page token, so a new search implicitly
    /// restarts pagination from the first page.
    pub async fn load(&self, term: &str) -> Result<FeedPage, FeedError> {
        let term = term.trim();
        if self.api_mode() {
            self.fetch_from_api(term, None).await
        } else {
            self.fetch_from_feed(term).await
        }
    }

    /// Load the next page using a previously stored token (API mode only).
    pub async fn load_more(&self, token: &str) -> Result<FeedPage, FeedError> {
        self.fetch_from_api("", Some(token)).await
    }

    /// Fetch one page of channel videos from the Data API.
    ///
    /// # Details
    /// search.list against the channel, ordered by date, capped at the
    /// configured page size. A page token is only honored when no search
    /// term is active (search results are not paginated).
    async fn fetch_from_api(
        &self,
        term: &str,
        page_token: Option<&str>,
    ) -> Result<FeedPage, FeedError> {
        let max_results = self.max_videos.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("key", self.api_key.as_str()),
            ("channelId", self.channel_id.as_str()),
            ("part", "snippet,id"),
            ("order", "date"),
            ("maxResults", max_results.as_str()),
        ];
        if !term.is_empty() {
            params.push(("q", term));
        }
        if let Some(token) = page_token
            && term.is_empty()
        {
            params.push(("pageToken", token));
        }

        let response = self.client.get(API_SEARCH_URL).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| FeedError::Parse(format!("search response: {e}")))?;

        Ok(FeedPage::from_search(body))
    }

    /// Fetch the channel feed through the proxy.
    ///
    /// # Details
    /// The proxy relays the channel's Atom/RSS feed server-side so the
    /// document stays reachable without cross-origin headaches. It reports
    /// its own failures as a JSON envelope, sometimes with a 200 status.
    async fn fetch_from_feed(&self, term: &str) -> Result<FeedPage, FeedError> {
        let response = self
            .client
            .get(&self.rss_proxy)
            .query(&[
                ("channel", self.channel_id.as_str()),
                ("origin", self.site_origin.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // The proxy may explain itself in a JSON body.
            if let Some(message) = proxy_error_message(&body) {
                return Err(FeedError::Proxy(message));
            }
            return Err(FeedError::Status(status.as_u16()));
        }

        let mut videos = parse_feed_document(&body, self.max_videos as usize)?;

        // Feed mode has no server-side search; filter locally.
        if !term.is_empty() {
            let needle = term.to_lowercase();
            videos.retain(|video| matches_search(video, &needle));
        }

        Ok(FeedPage {
            videos,
            next_page_token: None,
        })
    }
}

/// JSON error envelope returned by the feed proxy.
#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    message: Option<String>,
}

/// Extract the proxy's error message from a JSON-shaped body, if any.
fn proxy_error_message(body: &str) -> Option<String> {
    if !body.trim_start().starts_with('{') {
        return None;
    }
    let message = serde_json::from_str::<ProxyEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| "unexpected proxy response".to_string());
    Some(message)
}

/// Parse a proxied feed document into video summaries.
///
/// # Arguments
/// * `body` - Response body, expected to be Atom or RSS XML
/// * `max` - Maximum number of entries to keep
///
/// # Details
/// A JSON-shaped body is an error envelope even under HTTP success and maps
/// to [`FeedError::Proxy`]. Entry ids arrive in several encodings and are
/// normalized before deriving the thumbnail URL. The channel title falls
/// back to the feed title when an entry names no author.
pub fn parse_feed_document(body: &str, max: usize) -> Result<Vec<VideoSummary>, FeedError> {
    if let Some(message) = proxy_error_message(body) {
        return Err(FeedError::Proxy(message));
    }

    let feed = feed_rs::parser::parse(body.as_bytes())
        .map_err(|e| FeedError::Parse(format!("feed document: {e}")))?;

    let feed_title = feed.title.map(|t| t.content).unwrap_or_default();

    let mut videos: Vec<VideoSummary> = feed
        .entries
        .into_iter()
        .map(|entry| {
            let id = normalize_video_id(&entry.id);

            let title = entry.title.map(|t| t.content).unwrap_or_default();

            // Prefer media:description (YouTube Atom), fall back to the
            // plain item description.
            let description = entry
                .media
                .iter()
                .find_map(|media| media.description.as_ref().map(|d| d.content.clone()))
                .or_else(|| entry.summary.map(|t| t.content))
                .unwrap_or_default();

            let channel_title = entry
                .authors
                .first()
                .map(|author| author.name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| feed_title.clone());

            let thumbnail_url = if id.is_empty() {
                String::new()
            } else {
                format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", id)
            };

            VideoSummary::new(
                id,
                title,
                description,
                thumbnail_url,
                entry.published,
                channel_title,
            )
        })
        .collect();

    videos.truncate(max);
    Ok(videos)
}

/// Normalize a feed entry id to a bare video id.
///
/// # Details
/// Three encodings occur in the wild: the raw id, a watch URL carrying a
/// `v` query parameter, and a namespaced urn such as `yt:video:VIDEOID`.
pub fn normalize_video_id(raw: &str) -> String {
    let raw = raw.trim();

    if raw.contains("youtube.com") || raw.contains("youtu.be") {
        if let Ok(parsed) = Url::parse(raw) {
            if let Some((_, value)) = parsed.query_pairs().find(|(key, _)| key == "v") {
                return value.into_owned();
            }
            if let Some(segment) = parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            {
                return segment.to_string();
            }
        }
        return raw.to_string();
    }

    if let Some((_, tail)) = raw.rsplit_once(':') {
        return tail.to_string();
    }

    raw.to_string()
}

/// Case-insensitive substring match against title or description.
///
/// `needle` must already be lowercased.
fn matches_search(video: &VideoSummary, needle: &str) -> bool {
    video.title.to_lowercase().contains(needle)
        || video.description.to_lowercase().contains(needle)
}

/// Caller-owned pagination and search state for one browsing session.
///
/// Replaces hidden module-global state: the application owns exactly one
/// session, each new load bumps the generation, and a resolved load whose
/// generation no longer matches is stale and must be dropped.
#[derive(Debug, Default)]
pub struct FeedSession {
    /// Token for the next API page, None when exhausted or in feed mode
    pub next_page_token: Option<String>,
    /// Search term of the most recent load
    pub search_term: String,
    /// Monotonic load counter used to discard superseded responses
    pub generation: u64,
}

impl FeedSession {
    /// Begin a new load, superseding any in-flight one.
    ///
    /// # Returns
    /// * `u64` - Generation tag the caller attaches to the spawned fetch
    pub fn begin(&mut self, term: &str) -> u64 {
        self.generation += 1;
        self.search_term = term.trim().to_string();
        self.next_page_token = None;
        self.generation
    }

    /// Whether a "load more" is currently possible.
    ///
    /// # Details
    /// Requires API mode, no active search term, and a stored token; search
    /// results and feed mode are never paginated.
    pub fn can_load_more(&self, api_mode: bool) -> bool {
        api_mode && self.search_term.is_empty() && self.next_page_token.is_some()
    }
}
