//! Configuration management for the vlogfeed application.
//!
//! Handles loading and saving configuration from JSONC files.
//! Manages the channel id, API credentials, and feed proxy settings.

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration structure.
///
/// Contains the channel to browse and the credentials/endpoints used to
/// fetch its videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// YouTube channel id whose uploads are browsed (required)
    pub channel_id: String,
    /// YouTube Data API v3 key; when non-empty the Data API is used
    pub api_key: String,
    /// Feed proxy endpoint used when no API key is configured
    pub rss_proxy: String,
    /// Site origin forwarded to the proxy for server-side validation
    pub site_origin: String,
    /// Maximum number of videos per page (API) or overall (feed)
    pub max_videos: u32,
    /// Output path for the exported HTML video grid
    pub export_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_id: String::new(),
            api_key: String::new(),
            rss_proxy: String::new(),
            site_origin: String::new(),
            max_videos: 12,
            export_path: "videos.html".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    ///
    /// # Details
    /// Searches for config file in:
    /// 1. Provided path (if given)
    /// 2. `$XDG_CONFIG_HOME/vlogfeed/config.jsonc`
    /// 3. `~/.config/vlogfeed/config.jsonc`
    ///
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let json_content = strip_jsonc_comments(&content);

        let config: Config =
            serde_json::from_str(&json_content).with_context(|| "Failed to deserialize config")?;

        Ok(config)
    }

    /// Save configuration to file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    ///
    /// # Details
    /// Creates config directory if it doesn't exist.
    #[allow(dead_code)] // Useful for writing a starter config from within the app
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, json)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Get default configuration file path.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path to config file or error
    ///
    /// # Details
    /// Returns `$XDG_CONFIG_HOME/vlogfeed/config.jsonc` or
    /// `~/.config/vlogfeed/config.jsonc`.
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir =
            config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
        Ok(config_dir.join("vlogfeed").join("config.jsonc"))
    }
}

/// Strip `//` comments from JSONC content.
///
/// # Arguments
/// * `content` - Raw JSONC text
///
/// # Returns
/// * `String` - Plain JSON text
///
/// # Details
/// A `//` inside a string literal is preserved. Quote counting is simplified
/// and does not handle escaped quotes.
fn strip_jsonc_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            if let Some(comment_pos) = line.find("//") {
                let before_comment = &line[..comment_pos];
                let quote_count = before_comment.matches('"').count();
                if quote_count % 2 == 0 {
                    line[..comment_pos].trim_end()
                } else {
                    line
                }
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
