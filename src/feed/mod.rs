//! Channel video feed integration.
//!
//! Provides the two-source loader (Data API / feed proxy) and the video
//! summary model shared by the UI and the HTML exporter.

pub mod loader;
pub mod models;

pub use loader::{FeedLoader, FeedSession};
pub use models::{FeedPage, VideoSummary};
