//! Site configuration (config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,
    /// Route prefix for post pages (posts live under /<blog_dir>/<slug>/)
    pub blog_dir: String,
    /// Output path of the RSS feed, relative to the site root
    pub feed_path: String,
    /// Social preview image used when a post declares none
    pub default_image: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    // Writing
    pub new_post_extension: String,

    // Date format for rendered pages (Moment.js style)
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            description: "A personal portfolio and blog".to_string(),
            author: "Jane Doe".to_string(),
            language: "en".to_string(),

            url: "https://example.com".to_string(),
            root: "/".to_string(),
            blog_dir: "blog".to_string(),
            feed_path: "rss.xml".to_string(),
            default_image: "/og.png".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            new_post_extension: "mdx".to_string(),

            date_format: "MMMM D, YYYY".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.blog_dir, "blog");
        assert_eq!(config.feed_path, "rss.xml");
        assert_eq!(config.default_image, "/og.png");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Portfolio
author: Test User
url: https://me.github.io
default_image: /cover.png
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Portfolio");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.base_url(), "https://me.github.io");
        assert_eq!(config.default_image, "/cover.png");
        assert_eq!(config.content_dir, "content");
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let config = SiteConfig {
            url: "https://example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://example.com");
    }
}
