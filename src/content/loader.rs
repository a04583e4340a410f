//! Content store - builds the post collection from the content directory

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Page, Post, PostSchema, SchemaError};
use crate::helpers::{full_url_for, url_for};
use crate::Folio;

/// Loads and validates content from the content directory.
///
/// The load is all-or-nothing: the first document that fails to parse or
/// validate aborts the whole build with the offending file in the error.
/// Content errors are developer-facing and fatal by design; there is no
/// partial collection and no retry.
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    schema: PostSchema,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    pub fn new(folio: &'a Folio) -> Self {
        let schema = PostSchema::new(&folio.config);
        Self {
            folio,
            schema,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load all posts from content/posts.
    ///
    /// The returned order is discovery order (deterministic: walkdir sorted
    /// by file name), not publish order; renderers sort for display.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.folio.posts_dir();
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        let mut seen: HashMap<String, String> = HashMap::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !is_content_file(path) {
                continue;
            }

            let post = self
                .load_post(path, &posts_dir)
                .with_context(|| format!("failed to load post {}", path.display()))?;

            if let Some(other) = seen.insert(post.slug.clone(), post.source.clone()) {
                return Err(SchemaError::DuplicateSlug {
                    slug: post.slug,
                    file: post.source,
                    other,
                }
                .into());
            }
            posts.push(post);
        }

        Ok(posts)
    }

    fn load_post(&self, path: &Path, posts_dir: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;

        let (fm, body) = FrontMatter::extract(&content).map_err(|reason| SchemaError::Parse {
            file: path.display().to_string(),
            reason,
        })?;
        let fm = fm.unwrap_or_default();

        let fields = self.schema.validate(path, &fm)?;
        let slug = PostSchema::derive_slug(posts_dir, path)?;
        let structured_data = self.schema.structured_data(&fields, &slug);

        let content_html = self.renderer.render(body)?;

        let source = path
            .strip_prefix(self.folio.content_dir())
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let route = format!("{}/{}/", self.folio.config.blog_dir, slug);
        let route = url_for(&self.folio.config, &route);
        let permalink = full_url_for(&self.folio.config, &route);

        Ok(Post {
            title: fields.title,
            published_at: fields.published_at,
            summary: fields.summary,
            image: fields.image,
            slug,
            structured_data,
            raw: body.to_string(),
            content: content_html,
            source,
            full_source: path.to_path_buf(),
            path: route,
            permalink,
        })
    }

    /// Load standalone pages: content files directly under the content root
    /// (everything outside content/posts). `index` becomes the home intro.
    ///
    /// Pages are lenient where posts are strict: no date is required and the
    /// title falls back to the file stem. A malformed front-matter block is
    /// still fatal.
    pub fn load_pages(&self) -> Result<Vec<Page>> {
        let content_dir = self.folio.content_dir();
        if !content_dir.exists() {
            return Ok(Vec::new());
        }

        let posts_dir = self.folio.posts_dir();
        let mut pages = Vec::new();

        for entry in WalkDir::new(&content_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !is_content_file(path) || path.starts_with(&posts_dir) {
                continue;
            }

            let page = self
                .load_page(path, &content_dir)
                .with_context(|| format!("failed to load page {}", path.display()))?;
            pages.push(page);
        }

        Ok(pages)
    }

    fn load_page(&self, path: &Path, content_dir: &Path) -> Result<Page> {
        let content = fs::read_to_string(path)?;

        let (fm, body) = FrontMatter::extract(&content).map_err(|reason| SchemaError::Parse {
            file: path.display().to_string(),
            reason,
        })?;
        let fm = fm.unwrap_or_default();

        let slug = PostSchema::derive_slug(content_dir, path)?;
        let title = fm.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let route = if slug == "index" {
            url_for(&self.folio.config, "")
        } else {
            url_for(&self.folio.config, &format!("{}/", slug))
        };

        let content_html = self.renderer.render(body)?;

        let source = path
            .strip_prefix(content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        Ok(Page {
            title,
            slug,
            raw: body.to_string(),
            content: content_html,
            source,
            path: route,
        })
    }
}

/// Content files are markdown or MDX
fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "mdx" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site_with(posts: &[(&str, &str)]) -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("content/posts");
        fs::create_dir_all(&posts_dir).unwrap();
        for (name, content) in posts {
            let path = posts_dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        let folio = Folio::new(dir.path()).unwrap();
        (dir, folio)
    }

    fn post_file(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\npublishedAt: {}\n---\n\nBody of {}.\n", title, date, title)
    }

    #[test]
    fn test_load_posts_in_discovery_order() {
        let (_dir, folio) = site_with(&[
            ("b.mdx", &post_file("B", "2023-06-01")),
            ("a.md", &post_file("A", "2023-05-01")),
        ]);
        let posts = ContentLoader::new(&folio).load_posts().unwrap();

        // Discovery order is file-name order, not date order
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug, "a");
        assert_eq!(posts[1].slug, "b");
        assert_eq!(posts[0].path, "/blog/a/");
        assert!(posts[0].content.contains("Body of A."));
    }

    #[test]
    fn test_nested_post_slug() {
        let (_dir, folio) = site_with(&[("2024/deep.md", &post_file("Deep", "2024-01-01"))]);
        let posts = ContentLoader::new(&folio).load_posts().unwrap();
        assert_eq!(posts[0].slug, "2024/deep");
        assert_eq!(posts[0].path, "/blog/2024/deep/");
    }

    #[test]
    fn test_duplicate_slug_aborts() {
        let (_dir, folio) = site_with(&[
            ("a.md", &post_file("One", "2023-05-01")),
            ("a.mdx", &post_file("Two", "2023-06-01")),
        ]);
        let err = ContentLoader::new(&folio).load_posts().unwrap_err();
        assert!(err.to_string().contains("duplicate slug"));
    }

    #[test]
    fn test_invalid_post_aborts_whole_load() {
        let (_dir, folio) = site_with(&[
            ("good.md", &post_file("Good", "2023-05-01")),
            ("bad.md", "---\ntitle: No Date\n---\n\nBody.\n"),
        ]);
        let err = ContentLoader::new(&folio).load_posts().unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("bad.md"));
        assert!(msg.contains("publishedAt"));
    }

    #[test]
    fn test_non_content_files_are_skipped() {
        let (dir, folio) = site_with(&[("a.md", &post_file("A", "2023-05-01"))]);
        fs::write(dir.path().join("content/posts/photo.png"), b"\x89PNG").unwrap();
        let posts = ContentLoader::new(&folio).load_posts().unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_load_pages_and_home_intro() {
        let (dir, folio) = site_with(&[("a.md", &post_file("A", "2023-05-01"))]);
        fs::write(
            dir.path().join("content/index.md"),
            "Hi, I build things.\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("content/about.md"),
            "---\ntitle: About\n---\n\nAbout me.\n",
        )
        .unwrap();

        let pages = ContentLoader::new(&folio).load_pages().unwrap();
        assert_eq!(pages.len(), 2);

        let intro = pages.iter().find(|p| p.slug == "index").unwrap();
        assert_eq!(intro.path, "/");
        assert!(intro.content.contains("I build things"));

        let about = pages.iter().find(|p| p.slug == "about").unwrap();
        assert_eq!(about.title, "About");
        assert_eq!(about.path, "/about/");
    }

    #[test]
    fn test_missing_posts_dir_is_empty_collection() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert!(ContentLoader::new(&folio).load_posts().unwrap().is_empty());
    }
}
