//! folio: a static site generator for personal portfolio and blog sites
//!
//! Content is markdown/MDX with YAML front-matter, validated against a
//! declared post schema; the generator renders a home-page listing, one
//! detail page per post, standalone pages, and an RSS feed into a static
//! output directory.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main application: site configuration plus resolved directories
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory of the site
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Create an instance from a site directory, reading config.yml when
    /// present and falling back to defaults otherwise.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }

    /// Directory holding all content documents
    pub fn content_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.content_dir)
    }

    /// Directory holding post documents
    pub fn posts_dir(&self) -> PathBuf {
        self.content_dir().join("posts")
    }

    /// Directory of static assets copied verbatim into the output
    pub fn static_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.static_dir)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
