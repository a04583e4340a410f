//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn run(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("static/css"))?;

    write_if_absent(&target_dir.join("config.yml"), DEFAULT_CONFIG)?;
    write_if_absent(&target_dir.join("content/index.md"), DEFAULT_INTRO)?;
    write_if_absent(
        &target_dir.join("content/posts/hello-world.mdx"),
        DEFAULT_POST,
    )?;
    write_if_absent(&target_dir.join("static/css/main.css"), DEFAULT_CSS)?;

    Ok(())
}

fn write_if_absent(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("Skipping existing file: {:?}", path);
        return Ok(());
    }
    fs::write(path, contents)?;
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Site
title: Folio
description: A personal portfolio and blog
author: Jane Doe
language: en

# URL
url: https://example.com
root: /
blog_dir: blog
feed_path: rss.xml
default_image: /og.png

# Directory
content_dir: content
public_dir: public
static_dir: static

# Writing
new_post_extension: mdx
date_format: MMMM D, YYYY
"#;

const DEFAULT_INTRO: &str = r#"I'm a software engineer. This site is where I share what I'm
working on and what I'm learning along the way.
"#;

const DEFAULT_POST: &str = r#"---
title: Hello, World
publishedAt: 2024-01-01
summary: The first post on this site.
---

Welcome! Posts live under `content/posts`; each one needs a `title` and a
`publishedAt` date in its front-matter.

```rust
fn main() {
    println!("hello, world");
}
```
"#;

const DEFAULT_CSS: &str = r#"body {
  max-width: 42rem;
  margin: 2rem auto;
  padding: 0 1rem;
  font-family: system-ui, sans-serif;
  line-height: 1.6;
}

nav a {
  margin-right: 0.75rem;
}

.post-list .post-link {
  display: block;
  margin-bottom: 1rem;
  text-decoration: none;
}

.post-date {
  color: #666;
  font-size: 0.875rem;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Folio;
    use tempfile::TempDir;

    #[test]
    fn test_init_scaffolds_a_buildable_site() {
        let dir = TempDir::new().unwrap();
        run(dir.path()).unwrap();

        assert!(dir.path().join("config.yml").exists());
        assert!(dir.path().join("content/posts/hello-world.mdx").exists());

        // The scaffold must build cleanly
        let folio = Folio::new(dir.path()).unwrap();
        folio.generate().unwrap();
        assert!(folio.public_dir.join("blog/hello-world/index.html").exists());
        assert!(folio.public_dir.join("rss.xml").exists());
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join("config.yml"), "title: Mine\n").unwrap();

        run(dir.path()).unwrap();

        let config = fs::read_to_string(dir.path().join("config.yml")).unwrap();
        assert_eq!(config, "title: Mine\n");
    }
}
