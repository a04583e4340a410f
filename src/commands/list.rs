//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::generator::sort_by_published_desc;
use crate::helpers::format_date;
use crate::Folio;

/// Print the post collection, newest first
pub fn run(folio: &Folio) -> Result<()> {
    let loader = ContentLoader::new(folio);
    let posts = sort_by_published_desc(&loader.load_posts()?);
    let pages = loader.load_pages()?;

    println!("Posts ({}):", posts.len());
    for post in &posts {
        println!(
            "  {} - {} [{}]",
            format_date(&post.published_at, "YYYY-MM-DD"),
            post.title,
            post.source
        );
    }

    if !pages.is_empty() {
        println!("Pages ({}):", pages.len());
        for page in &pages {
            println!("  {} [{}]", page.title, page.source);
        }
    }

    Ok(())
}
