//! Generator module - renders the site into the public directory

pub mod feed;

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{Page, Post};
use crate::helpers::{escape_html, full_url_for, strip_html, truncate_chars};
use crate::templates::{ConfigData, MetaData, PageData, PostData, SiteData, TemplateRenderer};
use crate::Folio;

/// Meta descriptions fall back to this many characters of body text
const DESCRIPTION_LENGTH: usize = 160;

/// Static site generator: one pass over the pre-built content collection
pub struct Generator {
    folio: Folio,
    renderer: TemplateRenderer,
}

impl Generator {
    pub fn new(folio: &Folio) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        Ok(Self {
            folio: folio.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &[Post], pages: &[Page]) -> Result<()> {
        fs::create_dir_all(&self.folio.public_dir)?;

        self.copy_static_assets()?;
        self.copy_content_assets()?;

        let sorted = sort_by_published_desc(posts);

        let site_data = self.build_site_data(&sorted, pages)?;
        let config_data = self.build_config_data();

        self.generate_index(pages, &site_data, &config_data)?;
        self.generate_post_pages(&sorted, &site_data, &config_data)?;
        self.generate_pages(pages, &site_data, &config_data)?;
        self.generate_not_found(&site_data, &config_data)?;
        self.generate_feed(&sorted)?;

        Ok(())
    }

    fn build_site_data(&self, posts: &[Post], pages: &[Page]) -> Result<SiteData> {
        let posts = posts
            .iter()
            .map(|p| {
                Ok(PostData {
                    title: escape_html(&p.title),
                    date: p.published_at.format("%Y-%m-%d").to_string(),
                    path: p.path.clone(),
                    permalink: p.permalink.clone(),
                    summary: p.summary.clone(),
                    content: p.content.clone(),
                    structured_data: serde_json::to_string(&p.structured_data)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let pages = pages
            .iter()
            .map(|p| PageData {
                title: escape_html(&p.title),
                slug: p.slug.clone(),
                path: p.path.clone(),
                content: p.content.clone(),
            })
            .collect();

        Ok(SiteData { posts, pages })
    }

    fn build_config_data(&self) -> ConfigData {
        let config = &self.folio.config;
        ConfigData {
            title: escape_html(&config.title),
            description: escape_html(&config.description),
            author: escape_html(&config.author),
            url: config.base_url().to_string(),
            root: config.root.clone(),
            language: config.language.clone(),
            feed_path: config.feed_path.clone(),
            date_format: config.date_format.clone(),
        }
    }

    fn create_base_context(
        &self,
        site_data: &SiteData,
        config_data: &ConfigData,
        meta: &MetaData,
    ) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("config", config_data);
        context.insert("meta", meta);
        context.insert(
            "current_year",
            &chrono::Utc::now().format("%Y").to_string(),
        );
        context
    }

    /// Absolute URL of a post's social image, falling back to the site default
    fn social_image(&self, image: Option<&str>) -> String {
        let config = &self.folio.config;
        format!(
            "{}{}",
            config.base_url(),
            image.unwrap_or(&config.default_image)
        )
    }

    /// Generate the home page: intro (when `index.md` exists) plus the
    /// listing of all posts, newest first.
    fn generate_index(
        &self,
        pages: &[Page],
        site_data: &SiteData,
        config_data: &ConfigData,
    ) -> Result<()> {
        let config = &self.folio.config;
        let meta = MetaData {
            page_title: escape_html(&config.title),
            description: escape_html(&config.description),
            canonical: full_url_for(config, ""),
            og_type: "website".to_string(),
            og_image: self.social_image(None),
            published_time: None,
        };

        let intro = pages.iter().find(|p| p.slug == "index").map(|p| PageData {
            title: escape_html(&p.title),
            slug: p.slug.clone(),
            path: p.path.clone(),
            content: p.content.clone(),
        });

        let mut context = self.create_base_context(site_data, config_data, &meta);
        context.insert("intro", &intro);

        let html = self.renderer.render("index.html", &context)?;
        self.write_output(Path::new("index.html"), &html)?;
        tracing::debug!("Generated index page");

        Ok(())
    }

    /// Generate one detail page per post
    fn generate_post_pages(
        &self,
        posts: &[Post],
        site_data: &SiteData,
        config_data: &ConfigData,
    ) -> Result<()> {
        let config = &self.folio.config;

        for post in posts {
            let description = post.summary.clone().unwrap_or_else(|| {
                truncate_chars(strip_html(&post.content).trim(), DESCRIPTION_LENGTH)
            });

            let meta = MetaData {
                page_title: escape_html(&format!("{} | {}", post.title, config.title)),
                description: escape_html(&description),
                canonical: post.permalink.clone(),
                og_type: "article".to_string(),
                og_image: self.social_image(post.image.as_deref()),
                published_time: Some(post.published_at.to_rfc3339()),
            };

            let mut context = self.create_base_context(site_data, config_data, &meta);
            context.insert(
                "post",
                &PostData {
                    title: escape_html(&post.title),
                    date: post.published_at.format("%Y-%m-%d").to_string(),
                    path: post.path.clone(),
                    permalink: post.permalink.clone(),
                    summary: post.summary.clone(),
                    content: post.content.clone(),
                    structured_data: serde_json::to_string(&post.structured_data)?,
                },
            );

            let html = self.renderer.render("post.html", &context)?;
            let out = Path::new(&config.blog_dir)
                .join(&post.slug)
                .join("index.html");
            self.write_output(&out, &html)?;
            tracing::debug!("Generated post: {}", post.slug);
        }

        Ok(())
    }

    /// Generate standalone pages (everything but the home intro)
    fn generate_pages(
        &self,
        pages: &[Page],
        site_data: &SiteData,
        config_data: &ConfigData,
    ) -> Result<()> {
        let config = &self.folio.config;

        for page in pages.iter().filter(|p| p.slug != "index") {
            let meta = MetaData {
                page_title: escape_html(&format!("{} | {}", page.title, config.title)),
                description: escape_html(&config.description),
                canonical: full_url_for(config, &format!("{}/", page.slug)),
                og_type: "website".to_string(),
                og_image: self.social_image(None),
                published_time: None,
            };

            let mut context = self.create_base_context(site_data, config_data, &meta);
            context.insert(
                "page",
                &PageData {
                    title: escape_html(&page.title),
                    slug: page.slug.clone(),
                    path: page.path.clone(),
                    content: page.content.clone(),
                },
            );

            let html = self.renderer.render("page.html", &context)?;
            let out = Path::new(&page.slug).join("index.html");
            self.write_output(&out, &html)?;
            tracing::debug!("Generated page: {}", page.slug);
        }

        Ok(())
    }

    /// Generate the not-found page served for unknown routes
    fn generate_not_found(&self, site_data: &SiteData, config_data: &ConfigData) -> Result<()> {
        let config = &self.folio.config;
        let meta = MetaData {
            page_title: escape_html(&format!("Not Found | {}", config.title)),
            description: escape_html(&config.description),
            canonical: full_url_for(config, "404.html"),
            og_type: "website".to_string(),
            og_image: self.social_image(None),
            published_time: None,
        };

        let context = self.create_base_context(site_data, config_data, &meta);
        let html = self.renderer.render("not_found.html", &context)?;
        self.write_output(Path::new("404.html"), &html)
    }

    /// Generate the RSS feed as a static artifact
    fn generate_feed(&self, posts: &[Post]) -> Result<()> {
        let xml = feed::render(&self.folio.config, posts);
        self.write_output(Path::new(&self.folio.config.feed_path), &xml)?;
        tracing::info!("Generated {}", self.folio.config.feed_path);
        Ok(())
    }

    fn write_output(&self, relative: &Path, contents: &str) -> Result<()> {
        let out = self.folio.public_dir.join(relative);
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&out, contents).with_context(|| format!("failed to write {}", out.display()))
    }

    /// Copy the static directory verbatim into the output root
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = self.folio.static_dir();
        if !static_dir.exists() {
            return Ok(());
        }
        copy_tree(&static_dir, &self.folio.public_dir, |_| true)
    }

    /// Copy non-content files (images and the like) living next to content
    fn copy_content_assets(&self) -> Result<()> {
        let content_dir = self.folio.content_dir();
        if !content_dir.exists() {
            return Ok(());
        }
        copy_tree(&content_dir, &self.folio.public_dir, |path| {
            !matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("md") | Some("mdx") | Some("markdown")
            )
        })
    }
}

/// Sort posts by publish date descending. The sort is stable, so posts with
/// equal dates keep their discovery order.
pub fn sort_by_published_desc(posts: &[Post]) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    sorted
}

fn copy_tree(from: &Path, to: &Path, keep: impl Fn(&Path) -> bool) -> Result<()> {
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !keep(path) {
            continue;
        }

        let relative = path.strip_prefix(from)?;
        let dest = to.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)
            .with_context(|| format!("failed to copy {}", path.display()))?;
    }
    Ok(())
}
