//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded directly in the binary; a site needs no theme
//! directory on disk.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::format_date_str;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping would also mangle URLs and the pre-rendered HTML
        // bodies; text fields are escaped where the context data is built.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
            ("page.html", include_str!("site/page.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("site/partials/head.html"),
            ),
            ("partials/nav.html", include_str!("site/partials/nav.html")),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: format an ISO date (`YYYY-MM-DD`) with a Moment.js-style
/// format string. Unparseable input passes through unchanged.
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "MMMM D, YYYY".to_string(),
    };

    match format_date_str(&s, &format) {
        Some(formatted) => Ok(tera::Value::String(formatted)),
        None => Ok(tera::Value::String(s)),
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    /// All posts, publish date descending
    pub posts: Vec<PostData>,
    /// Standalone pages (including the home intro)
    pub pages: Vec<PageData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    /// ISO publish date, formatted by the `date_format` filter at render time
    pub date: String,
    pub path: String,
    pub permalink: String,
    pub summary: Option<String>,
    pub content: String,
    /// Serialized schema.org BlogPosting JSON
    pub structured_data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    pub slug: String,
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub root: String,
    pub language: String,
    pub feed_path: String,
    pub date_format: String,
}

/// Per-page head metadata (title, description, social-preview tags)
#[derive(Debug, Clone, Serialize)]
pub struct MetaData {
    pub page_title: String,
    pub description: String,
    pub canonical: String,
    /// "website" for the listing and pages, "article" for posts
    pub og_type: String,
    pub og_image: String,
    /// RFC 3339, article pages only
    pub published_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: "Folio".to_string(),
                description: "A portfolio".to_string(),
                author: "Jane".to_string(),
                url: "https://example.com".to_string(),
                root: "/".to_string(),
                language: "en".to_string(),
                feed_path: "rss.xml".to_string(),
                date_format: "MMMM D, YYYY".to_string(),
            },
        );
        context.insert(
            "site",
            &SiteData {
                posts: vec![PostData {
                    title: "Hello".to_string(),
                    date: "2023-05-01".to_string(),
                    path: "/blog/hello/".to_string(),
                    permalink: "https://example.com/blog/hello/".to_string(),
                    summary: Some("Hi.".to_string()),
                    content: "<p>Hi.</p>".to_string(),
                    structured_data: "{}".to_string(),
                }],
                pages: vec![],
            },
        );
        context.insert(
            "meta",
            &MetaData {
                page_title: "Folio".to_string(),
                description: "A portfolio".to_string(),
                canonical: "https://example.com/".to_string(),
                og_type: "website".to_string(),
                og_image: "https://example.com/og.png".to_string(),
                published_time: None,
            },
        );
        context.insert("current_year", "2023");
        context.insert("intro", &Option::<PageData>::None);
        context
    }

    #[test]
    fn test_render_index() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render("index.html", &base_context()).unwrap();
        assert!(html.contains(r#"href="/blog/hello/""#));
        assert!(html.contains("May 1, 2023"));
        assert!(html.contains(r#"<meta property="og:type" content="website">"#));
    }

    #[test]
    fn test_render_post_embeds_structured_data() {
        let mut context = base_context();
        let post = PostData {
            title: "Hello".to_string(),
            date: "2023-05-01".to_string(),
            path: "/blog/hello/".to_string(),
            permalink: "https://example.com/blog/hello/".to_string(),
            summary: None,
            content: "<p>Body</p>".to_string(),
            structured_data: r#"{"@type":"BlogPosting"}"#.to_string(),
        };
        context.insert("post", &post);

        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains(r#"<script type="application/ld+json">{"@type":"BlogPosting"}</script>"#));
        assert!(html.contains("<p>Body</p>"));
    }

    #[test]
    fn test_date_format_filter_passthrough() {
        let value = tera::Value::String("not-a-date".to_string());
        let out = date_format_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("not-a-date".to_string()));
    }
}
