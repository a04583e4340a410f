//! RSS 2.0 feed serialization

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{escape_xml, strip_invalid_xml_chars};

/// Render the RSS document for an already-sorted post collection.
///
/// One `<item>` per post, in the order given; `<description>` is the
/// summary or an empty string, `<pubDate>` is RFC 2822.
pub fn render(config: &SiteConfig, posts: &[Post]) -> String {
    let base = config.base_url();

    let mut feed = String::new();
    feed.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    feed.push_str("<rss version=\"2.0\">\n");
    feed.push_str("  <channel>\n");
    feed.push_str(&format!(
        "    <title>{}</title>\n",
        escape_xml(&config.title)
    ));
    feed.push_str(&format!("    <link>{}</link>\n", base));
    feed.push_str(&format!(
        "    <description>{}</description>\n",
        escape_xml(&config.description)
    ));
    feed.push_str(&format!(
        "    <language>{}</language>\n",
        escape_xml(&config.language)
    ));

    for post in posts {
        let description = post.summary.as_deref().unwrap_or("");
        let description = strip_invalid_xml_chars(description);

        feed.push_str("    <item>\n");
        feed.push_str(&format!(
            "      <title>{}</title>\n",
            escape_xml(&strip_invalid_xml_chars(&post.title))
        ));
        feed.push_str(&format!(
            "      <link>{}/{}/{}</link>\n",
            base, config.blog_dir, post.slug
        ));
        feed.push_str(&format!(
            "      <description>{}</description>\n",
            escape_xml(&description)
        ));
        feed.push_str(&format!(
            "      <pubDate>{}</pubDate>\n",
            post.published_at.to_rfc2822()
        ));
        feed.push_str("    </item>\n");
    }

    feed.push_str("  </channel>\n");
    feed.push_str("</rss>\n");
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn post(slug: &str, title: &str, date: (i32, u32, u32), summary: Option<&str>) -> Post {
        Post {
            title: title.to_string(),
            published_at: Utc
                .with_ymd_and_hms(date.0, date.1, date.2, 0, 0, 0)
                .unwrap(),
            summary: summary.map(str::to_string),
            image: None,
            slug: slug.to_string(),
            structured_data: serde_json::json!({}),
            raw: String::new(),
            content: String::new(),
            source: format!("posts/{}.md", slug),
            full_source: PathBuf::from(format!("posts/{}.md", slug)),
            path: format!("/blog/{}/", slug),
            permalink: format!("https://example.com/blog/{}/", slug),
        }
    }

    fn config() -> SiteConfig {
        SiteConfig {
            title: "My Site".to_string(),
            url: "https://example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_one_item_per_post_in_given_order() {
        let posts = vec![
            post("b", "B", (2023, 6, 1), Some("Newer.")),
            post("a", "A", (2023, 5, 1), None),
        ];
        let xml = render(&config(), &posts);

        assert_eq!(xml.matches("<item>").count(), 2);
        let b_pos = xml.find("https://example.com/blog/b").unwrap();
        let a_pos = xml.find("https://example.com/blog/a").unwrap();
        assert!(b_pos < a_pos);
    }

    #[test]
    fn test_pubdate_is_rfc2822() {
        let posts = vec![post("a", "A", (2023, 5, 1), None)];
        let xml = render(&config(), &posts);
        assert!(xml.contains("<pubDate>Mon, 1 May 2023 00:00:00 +0000</pubDate>"));
    }

    #[test]
    fn test_missing_summary_is_empty_description() {
        let posts = vec![post("a", "A", (2023, 5, 1), None)];
        let xml = render(&config(), &posts);
        assert!(xml.contains("<description></description>"));
    }

    #[test]
    fn test_xml_escaping() {
        let posts = vec![post("a", "Tips & <Tricks>", (2023, 5, 1), Some("1 < 2"))];
        let xml = render(&config(), &posts);
        assert!(xml.contains("<title>Tips &amp; &lt;Tricks&gt;</title>"));
        assert!(xml.contains("<description>1 &lt; 2</description>"));
        assert!(!xml.contains("<Tricks>"));
    }

    #[test]
    fn test_envelope() {
        let xml = render(&config(), &[]);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<rss version=\"2.0\">"));
        assert!(xml.contains("<title>My Site</title>"));
        assert!(xml.trim_end().ends_with("</rss>"));
    }
}
