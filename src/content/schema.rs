//! Post document schema: field validation and derived-field computation

use chrono::{DateTime, Utc};
use serde_json::json;
use std::path::Path;
use thiserror::Error;

use super::frontmatter::{parse_date_string, FrontMatter};
use crate::config::SiteConfig;

/// Build-time content errors. Every variant names the offending file so the
/// failure is actionable without re-running anything.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("{file}: missing required field `{field}`")]
    MissingField { file: String, field: &'static str },

    #[error("{file}: invalid value for `{field}`: {reason}")]
    InvalidField {
        file: String,
        field: &'static str,
        reason: String,
    },

    #[error("{file}: path is not valid UTF-8")]
    NonUtf8Path { file: String },

    #[error("duplicate slug `{slug}`: {file} collides with {other}")]
    DuplicateSlug {
        slug: String,
        file: String,
        other: String,
    },
}

/// The required/optional fields of a post after validation
#[derive(Debug, Clone)]
pub struct PostFields {
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub summary: Option<String>,
    pub image: Option<String>,
}

/// The Post document schema.
///
/// Holds the site constants that feed into derived fields and exposes the
/// pure functions computing them. Same document in, same slug and
/// structured-data object out.
#[derive(Debug, Clone)]
pub struct PostSchema {
    base_url: String,
    author: String,
    default_image: String,
    blog_dir: String,
}

impl PostSchema {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            author: config.author.clone(),
            default_image: config.default_image.clone(),
            blog_dir: config.blog_dir.clone(),
        }
    }

    /// Derive the slug from a document's path: the path relative to the
    /// content root, extension stripped, normalized to forward slashes.
    pub fn derive_slug(content_root: &Path, file: &Path) -> Result<String, SchemaError> {
        let rel = file.strip_prefix(content_root).unwrap_or(file);
        let stem = rel.with_extension("");
        let slug = stem
            .to_str()
            .ok_or_else(|| SchemaError::NonUtf8Path {
                file: file.display().to_string(),
            })?
            .replace('\\', "/");
        Ok(slug)
    }

    /// Check required fields and parse the publish date.
    pub fn validate(&self, file: &Path, fm: &FrontMatter) -> Result<PostFields, SchemaError> {
        let file_name = || file.display().to_string();

        let title = match fm.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => {
                return Err(SchemaError::MissingField {
                    file: file_name(),
                    field: "title",
                })
            }
        };

        let raw = fm
            .published_at
            .as_deref()
            .ok_or_else(|| SchemaError::MissingField {
                file: file_name(),
                field: "publishedAt",
            })?;
        let published_at =
            parse_date_string(raw).ok_or_else(|| SchemaError::InvalidField {
                file: file_name(),
                field: "publishedAt",
                reason: format!("unrecognized date `{}`", raw),
            })?;

        Ok(PostFields {
            title,
            published_at,
            summary: fm.summary.clone(),
            image: fm.image.clone(),
        })
    }

    /// Build the schema.org BlogPosting object for a post.
    ///
    /// The image falls back to the site default when the post declares none;
    /// both forms are absolute URLs rooted at the configured base URL.
    pub fn structured_data(&self, fields: &PostFields, slug: &str) -> serde_json::Value {
        let image = match fields.image.as_deref() {
            Some(image) => format!("{}{}", self.base_url, image),
            None => format!("{}{}", self.base_url, self.default_image),
        };
        let published = fields.published_at.to_rfc3339();

        json!({
            "@context": "https://schema.org",
            "@type": "BlogPosting",
            "headline": fields.title,
            "datePublished": published,
            "dateModified": published,
            "description": fields.summary,
            "image": image,
            "url": format!("{}/{}/{}", self.base_url, self.blog_dir, slug),
            "author": {
                "@type": "Person",
                "name": self.author,
            },
        })
    }
}
