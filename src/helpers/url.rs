//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters that must be escaped inside a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}');

/// Generate a URL path under the configured root
///
/// # Examples
/// ```ignore
/// url_for(&config, "blog/a-post/") // -> "/blog/a-post/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, encode_path(path))
    }
}

/// Generate a full URL including the site origin
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!("{}{}", config.base_url(), url_for(config, path))
}

/// Percent-encode a path, leaving the segment separators alone
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "blog/a/"), "/blog/a/");
        assert_eq!(url_for(&config, "/about/"), "/about/");
        assert_eq!(url_for(&config, ""), "/");
    }

    #[test]
    fn test_url_for_with_subpath_root() {
        let config = SiteConfig {
            root: "/folio/".to_string(),
            ..test_config()
        };
        assert_eq!(url_for(&config, "blog/a/"), "/folio/blog/a/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/blog/a/"),
            "https://example.com/blog/a/"
        );
    }

    #[test]
    fn test_encode_path_keeps_separators() {
        assert_eq!(encode_path("blog/my post/"), "blog/my%20post/");
        assert_eq!(encode_path("plain/path"), "plain/path");
    }
}
