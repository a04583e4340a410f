//! Post and Page models

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// A validated blog post.
///
/// Records are built once per generation pass and never mutated afterwards;
/// derived fields (slug, structured data) are computed at construction.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication timestamp (UTC)
    pub published_at: DateTime<Utc>,

    /// Short description used for meta text and the feed
    pub summary: Option<String>,

    /// Social preview image path, relative to the site root
    pub image: Option<String>,

    /// Unique identifier derived from the source path; routes to /blog/<slug>/
    pub slug: String,

    /// schema.org BlogPosting object embedded in the detail page
    pub structured_data: serde_json::Value,

    /// Raw markdown body
    pub raw: String,

    /// Rendered HTML body
    pub content: String,

    /// Source file path relative to the content directory
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without the site origin)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,
}

/// A standalone page (about, home intro, ...)
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Page title
    pub title: String,

    /// Unique identifier derived from the source path
    pub slug: String,

    /// Raw markdown body
    pub raw: String,

    /// Rendered HTML body
    pub content: String,

    /// Source file path relative to the content directory
    pub source: String,

    /// URL path (without the site origin)
    pub path: String,
}

/// Detail lookup: find one post by its slug.
///
/// Absence is a normal outcome (the caller turns it into a not-found
/// response or a refusal), never a panic.
pub fn find_by_slug<'a>(posts: &'a [Post], slug: &str) -> Option<&'a Post> {
    posts.iter().find(|p| p.slug == slug)
}
