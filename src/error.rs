//! Error taxonomy for the video feed pipeline.
//!
//! Every failure surfaced by the loader falls into one of these classes so
//! the UI can decide between the persistent error panel (initial loads) and
//! a transient status message (load more).

use thiserror::Error;

/// Errors produced while loading the video feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Missing or unusable configuration, raised before any network call.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request itself failed (DNS, timeout, connection reset, ...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The feed proxy returned a JSON error envelope despite HTTP success.
    #[error("feed proxy error: {0}")]
    Proxy(String),

    /// The response body could not be parsed as JSON or as a feed document.
    #[error("could not parse response: {0}")]
    Parse(String),
}
