//! HTML card rendering for the exported video grid.
//!
//! Pure string templating over [`VideoSummary`]: no I/O except the final
//! [`write_grid`], no mutable state, safe to call repeatedly with the same
//! input. Every text field is HTML-escaped before interpolation so feed
//! content can never inject markup.

use crate::feed::VideoSummary;
use anyhow::{Context, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fs;
use std::path::Path;

/// Render one video as an HTML card fragment.
///
/// # Details
/// Thumbnail, linked title, description, publish date and a watch link,
/// mirroring the card markup of the site the grid is embedded in.
pub fn video_card(video: &VideoSummary) -> String {
    let title = encode_text(&video.title);
    let title_attr = encode_double_quoted_attribute(&video.title);
    let description = encode_text(&video.description);
    let thumbnail = encode_double_quoted_attribute(&video.thumbnail_url);
    let watch_url = encode_double_quoted_attribute(&video.url);
    let published = encode_text(&video.format_published()).into_owned();
    let channel = encode_text(&video.channel_title);

    format!(
        r#"<div class="video-card">
  <a href="{watch_url}" target="_blank" rel="noopener noreferrer">
    <img src="{thumbnail}" alt="{title_attr}" class="video-thumbnail" loading="lazy">
  </a>
  <div class="video-card-body">
    <h3 class="video-title" title="{title_attr}">{title}</h3>
    <p class="video-description">{description}</p>
    <div class="video-meta">
      <span class="video-channel">{channel}</span>
      <span class="video-date">{published}</span>
      <a href="{watch_url}" target="_blank" rel="noopener noreferrer" class="video-watch">Watch</a>
    </div>
  </div>
</div>
"#
    )
}

/// Render the full grid fragment, or an empty-state message.
///
/// # Arguments
/// * `videos` - Videos in display order
/// * `search_term` - Term the result set was narrowed by, for empty-state copy
pub fn render_grid(videos: &[VideoSummary], search_term: &str) -> String {
    if videos.is_empty() {
        let hint = if search_term.trim().is_empty() {
            "Check back later for new content"
        } else {
            "Try a different search term"
        };
        return format!(
            r#"<div class="video-grid-empty">
  <h3>No videos found</h3>
  <p>{}</p>
</div>
"#,
            encode_text(hint)
        );
    }

    let mut grid = String::from("<div class=\"video-grid\">\n");
    for video in videos {
        grid.push_str(&video_card(video));
    }
    grid.push_str("</div>\n");
    grid
}

/// Write the grid to disk as a minimal standalone page.
///
/// # Arguments
/// * `path` - Output file path
/// * `videos` - Videos in display order
/// * `search_term` - Term the result set was narrowed by
pub fn write_grid(path: &Path, videos: &[VideoSummary], search_term: &str) -> Result<()> {
    let page = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Videos</title>
</head>
<body>
{}</body>
</html>
"#,
        render_grid(videos, search_term)
    );

    fs::write(path, page)
        .with_context(|| format!("Failed to write video grid: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn sample_video() -> VideoSummary {
        VideoSummary::new(
            "abc123".to_string(),
            "Hiking the Dolomites".to_string(),
            "Three days across Alta Via 1.".to_string(),
            "https://i.ytimg.com/vi/abc123/mqdefault.jpg".to_string(),
            Some(Utc::now() - Duration::hours(24)),
            "Wander Diary".to_string(),
        )
    }

    #[test]
    fn test_card_contains_fields() {
        let card = video_card(&sample_video());
        assert!(card.contains("Hiking the Dolomites"));
        assert!(card.contains("Three days across Alta Via 1."));
        assert!(card.contains("https://www.youtube.com/watch?v=abc123"));
        assert!(card.contains("https://i.ytimg.com/vi/abc123/mqdefault.jpg"));
        assert!(card.contains("Yesterday"));
    }

    #[test]
    fn test_card_escapes_markup() {
        let mut video = sample_video();
        video.title = "<script>alert('x')</script>".to_string();
        video.description = "a & b <i>c</i>".to_string();

        let card = video_card(&video);
        assert!(!card.contains("<script>"));
        assert!(card.contains("&lt;script&gt;"));
        assert!(card.contains("a &amp; b &lt;i&gt;c&lt;/i&gt;"));
    }

    #[test]
    fn test_card_is_idempotent() {
        let video = sample_video();
        assert_eq!(video_card(&video), video_card(&video));
    }

    #[test]
    fn test_grid_empty_state() {
        let fragment = render_grid(&[], "");
        assert!(fragment.contains("No videos found"));
        assert!(fragment.contains("Check back later"));

        let fragment = render_grid(&[], "kyoto");
        assert!(fragment.contains("Try a different search term"));
    }

    #[test]
    fn test_grid_renders_all_cards() {
        let videos = vec![sample_video(), sample_video()];
        let fragment = render_grid(&videos, "");
        assert_eq!(fragment.matches(r#"class="video-card">"#).count(), 2);
    }

    #[test]
    fn test_write_grid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("videos.html");

        write_grid(&path, &[sample_video()], "").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("Hiking the Dolomites"));
    }
}
