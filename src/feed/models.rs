//! Video summary model and YouTube Data API response structures.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A single video as shown in the grid.
///
/// Produced fresh per fetch and immutable once constructed. Ordering follows
/// the source: the Data API returns date-descending, the feed keeps document
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSummary {
    /// YouTube video id
    pub id: String,
    /// Video title
    pub title: String,
    /// Video description
    pub description: String,
    /// Thumbnail URL (may be empty when the id could not be determined)
    pub thumbnail_url: String,
    /// Publish timestamp, absent when the source omitted or mangled it
    pub published_at: Option<DateTime<Utc>>,
    /// Channel / author display name
    pub channel_title: String,
    /// Watch URL, derived from the video id
    pub url: String,
}

impl VideoSummary {
    /// Create a new video summary.
    ///
    /// # Details
    /// Automatically derives the watch URL from the video id.
    pub fn new(
        id: String,
        title: String,
        description: String,
        thumbnail_url: String,
        published_at: Option<DateTime<Utc>>,
        channel_title: String,
    ) -> Self {
        let url = format!("https://www.youtube.com/watch?v={}", id);
        Self {
            id,
            title,
            description,
            thumbnail_url,
            published_at,
            channel_title,
            url,
        }
    }

    /// Format the publish date as human text.
    ///
    /// # Returns
    /// * `String` - "Yesterday", "N days ago", "N weeks ago" or a calendar
    ///   date; empty when no timestamp is known.
    pub fn format_published(&self) -> String {
        match self.published_at {
            Some(published) => format_published_at(published, Utc::now()),
            None => String::new(),
        }
    }
}

/// Format a publish date relative to `now`.
///
/// # Details
/// The day count is the ceiling of the elapsed time in days: a video
/// published exactly 24 hours ago is one day old ("Yesterday"). Under a
/// week the day count is shown, under a month a ceiling week count, and
/// anything older gets a calendar date.
pub fn format_published_at(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - published).num_seconds().abs();
    let days = (seconds + 86_399) / 86_400;

    if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        format!("{} days ago", days)
    } else if days < 30 {
        // Ceiling weeks; days is at least 7 here.
        format!("{} weeks ago", (days + 6) / 7)
    } else {
        published.format("%b %-d, %Y").to_string()
    }
}

/// One page of results together with the pagination cursor.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    /// Videos in source order
    pub videos: Vec<VideoSummary>,
    /// Opaque token for the next page, None when the source is exhausted
    /// (feed mode never paginates)
    pub next_page_token: Option<String>,
}

/// Data API search.list response wrapper.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Response items
    #[serde(default)]
    pub items: Vec<SearchItem>,
    /// Next page token for pagination
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// Single search.list result item.
#[derive(Debug, Deserialize)]
pub struct SearchItem {
    /// Result id (carries the kind discriminator)
    pub id: Option<SearchItemId>,
    /// Snippet containing the displayable fields
    pub snippet: Option<SearchSnippet>,
}

/// Id object of a search result; kind distinguishes videos from channels
/// and playlists, which search.list also returns.
#[derive(Debug, Deserialize)]
pub struct SearchItemId {
    /// Result kind, "youtube#video" for actual videos
    #[serde(default)]
    pub kind: String,
    /// Video id when the result is a video
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

/// Search result snippet.
#[derive(Debug, Deserialize)]
pub struct SearchSnippet {
    /// Video title
    #[serde(default)]
    pub title: String,
    /// Video description
    #[serde(default)]
    pub description: String,
    /// Channel title
    #[serde(rename = "channelTitle", default)]
    pub channel_title: String,
    /// Published date (RFC 3339)
    #[serde(rename = "publishedAt", default)]
    pub published_at: String,
    /// Thumbnails
    pub thumbnails: Option<SearchThumbnails>,
}

/// Thumbnail variants offered by the API.
#[derive(Debug, Deserialize)]
pub struct SearchThumbnails {
    /// Default thumbnail
    #[serde(default)]
    pub default: Option<SearchThumbnail>,
    /// Medium thumbnail
    #[serde(default)]
    pub medium: Option<SearchThumbnail>,
    /// High thumbnail
    #[serde(default)]
    pub high: Option<SearchThumbnail>,
}

/// Single thumbnail.
#[derive(Debug, Deserialize)]
pub struct SearchThumbnail {
    /// Thumbnail URL
    pub url: String,
}

impl FeedPage {
    /// Build a page from a search.list response.
    ///
    /// # Details
    /// Keeps only items whose kind marks them as an actual video; channels
    /// and playlists returned by search.list are dropped. An unparseable
    /// publish date becomes None rather than failing the whole page.
    pub fn from_search(response: SearchResponse) -> Self {
        let videos = response
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.id?;
                if id.kind != "youtube#video" {
                    return None;
                }
                let video_id = id.video_id?;
                let snippet = item.snippet.unwrap_or_else(|| SearchSnippet {
                    title: String::new(),
                    description: String::new(),
                    channel_title: String::new(),
                    published_at: String::new(),
                    thumbnails: None,
                });

                let published_at = DateTime::parse_from_rfc3339(&snippet.published_at)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc));

                let thumbnail_url = snippet
                    .thumbnails
                    .and_then(|t| t.medium.or(t.high).or(t.default))
                    .map(|t| t.url)
                    .unwrap_or_default();

                Some(VideoSummary::new(
                    video_id,
                    snippet.title,
                    snippet.description,
                    thumbnail_url,
                    published_at,
                    snippet.channel_title,
                ))
            })
            .collect();

        Self {
            videos,
            next_page_token: response.next_page_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_video_summary_derives_watch_url() {
        let video = VideoSummary::new(
            "abc123".to_string(),
            "Trip to Kyoto".to_string(),
            String::new(),
            String::new(),
            None,
            "Channel".to_string(),
        );
        assert_eq!(video.url, "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn test_format_published_yesterday() {
        let now = sample_now();
        let published = now - Duration::hours(24);
        assert_eq!(format_published_at(published, now), "Yesterday");
    }

    #[test]
    fn test_format_published_days() {
        let now = sample_now();
        let published = now - Duration::days(5);
        assert_eq!(format_published_at(published, now), "5 days ago");
    }

    #[test]
    fn test_format_published_weeks() {
        let now = sample_now();
        // Ten days rounds up to two weeks.
        let published = now - Duration::days(10);
        assert_eq!(format_published_at(published, now), "2 weeks ago");
    }

    #[test]
    fn test_format_published_calendar_date() {
        let now = sample_now();
        let published = now - Duration::days(40);
        assert_eq!(format_published_at(published, now), "May 6, 2024");
    }

    #[test]
    fn test_format_published_empty_without_timestamp() {
        let video = VideoSummary::new(
            "abc123".to_string(),
            String::new(),
            String::new(),
            String::new(),
            None,
            String::new(),
        );
        assert_eq!(video.format_published(), "");
    }

    #[test]
    fn test_from_search_filters_non_videos() {
        let json = r#"{
            "nextPageToken": "CAwQAA",
            "items": [
                {
                    "id": {"kind": "youtube#video", "videoId": "vid1"},
                    "snippet": {
                        "title": "First",
                        "description": "desc",
                        "channelTitle": "Chan",
                        "publishedAt": "2024-06-01T10:00:00Z",
                        "thumbnails": {"medium": {"url": "https://i.ytimg.com/vi/vid1/mqdefault.jpg"}}
                    }
                },
                {
                    "id": {"kind": "youtube#channel", "channelId": "UC1"},
                    "snippet": {"title": "A channel"}
                },
                {
                    "id": {"kind": "youtube#playlist", "playlistId": "PL1"},
                    "snippet": {"title": "A playlist"}
                }
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let page = FeedPage::from_search(response);

        assert_eq!(page.videos.len(), 1);
        assert_eq!(page.videos[0].id, "vid1");
        assert_eq!(page.videos[0].channel_title, "Chan");
        assert_eq!(
            page.videos[0].thumbnail_url,
            "https://i.ytimg.com/vi/vid1/mqdefault.jpg"
        );
        assert!(page.videos[0].published_at.is_some());
        assert_eq!(page.next_page_token.as_deref(), Some("CAwQAA"));
    }

    #[test]
    fn test_from_search_empty_response() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        let page = FeedPage::from_search(response);
        assert!(page.videos.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_from_search_bad_date_becomes_none() {
        let json = r#"{
            "items": [{
                "id": {"kind": "youtube#video", "videoId": "vid1"},
                "snippet": {"title": "t", "publishedAt": "not-a-date"}
            }]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let page = FeedPage::from_search(response);
        assert_eq!(page.videos.len(), 1);
        assert!(page.videos[0].published_at.is_none());
    }
}
