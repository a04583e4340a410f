//! Create a new post

use anyhow::Result;
use std::fs;

use crate::content::{find_by_slug, loader::ContentLoader};
use crate::Folio;

/// Create a new post file with pre-filled front-matter.
///
/// The slug is derived from the title; a title whose slug collides with an
/// existing post is refused so the collection's slug-uniqueness invariant
/// holds at authoring time already.
pub fn run(folio: &Folio, title: &str) -> Result<()> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("title {:?} does not produce a usable slug", title);
    }

    let posts = ContentLoader::new(folio).load_posts()?;
    if let Some(existing) = find_by_slug(&posts, &slug) {
        anyhow::bail!(
            "a post with slug `{}` already exists: {}",
            slug,
            existing.source
        );
    }

    let posts_dir = folio.posts_dir();
    fs::create_dir_all(&posts_dir)?;

    let file_path = posts_dir.join(format!("{}.{}", slug, folio.config.new_post_extension));
    if file_path.exists() {
        anyhow::bail!("file already exists: {:?}", file_path);
    }

    let now = chrono::Utc::now();
    let content = format!(
        "---\ntitle: {}\npublishedAt: {}\nsummary:\n---\n\n",
        title,
        now.format("%Y-%m-%d")
    );
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);
    Ok(())
}
