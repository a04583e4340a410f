//! Front-matter extraction

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Front-matter fields of a content document.
///
/// Every field is optional at this layer; required-field enforcement happens
/// in the schema so the error can name the offending file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    #[serde(rename = "publishedAt", alias = "published_at")]
    pub published_at: Option<String>,
    pub summary: Option<String>,
    pub image: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split a document into its front-matter block and body.
    ///
    /// Returns `(None, content)` when the document carries no `---` block at
    /// all. A block that is present but malformed (unterminated, invalid
    /// YAML, wrong type for a known field) is an error: content problems are
    /// fatal at build time rather than silently skipped.
    pub fn extract(content: &str) -> Result<(Option<Self>, &str), String> {
        let trimmed = content.trim_start_matches(['\n', '\r', ' ']);
        if !trimmed.starts_with("---") {
            return Ok((None, content));
        }

        let rest = trimmed[3..].trim_start_matches(['\n', '\r']);
        let end = rest
            .find("\n---")
            .ok_or_else(|| "unterminated front-matter block".to_string())?;

        let yaml = &rest[..end];
        let body = rest[end + 4..].trim_start_matches(['\n', '\r']);

        if yaml.trim().is_empty() {
            return Ok((Some(FrontMatter::default()), body));
        }

        let fm: FrontMatter =
            serde_yaml::from_str(yaml).map_err(|e| format!("invalid front-matter: {}", e))?;
        Ok((Some(fm), body))
    }

    /// Parse the `publishedAt` string into a UTC timestamp
    pub fn parse_published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_deref().and_then(parse_date_string)
    }
}

/// Parse a date string in the formats post authors actually write
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d"];
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_frontmatter() {
        let content = r#"---
title: Hello World
publishedAt: 2024-01-15
summary: A first post.
---

This is the content.
"#;

        let (fm, body) = FrontMatter::extract(content).unwrap();
        let fm = fm.unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.published_at, Some("2024-01-15".to_string()));
        assert_eq!(fm.summary, Some("A first post.".to_string()));
        assert_eq!(fm.image, None);
        assert!(body.starts_with("This is the content."));
    }

    #[test]
    fn test_no_frontmatter_block() {
        let content = "Just some markdown.\n";
        let (fm, body) = FrontMatter::extract(content).unwrap();
        assert!(fm.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unterminated_block_is_fatal() {
        let content = "---\ntitle: Oops\n\nNo closing delimiter.";
        let err = FrontMatter::extract(content).unwrap_err();
        assert!(err.contains("unterminated"));
    }

    #[test]
    fn test_invalid_yaml_is_fatal() {
        let content = "---\ntitle: [unclosed\n---\nBody.";
        assert!(FrontMatter::extract(content).is_err());
    }

    #[test]
    fn test_wrong_field_type_is_fatal() {
        let content = "---\ntitle:\n  nested: map\npublishedAt: 2024-01-01\n---\nBody.";
        assert!(FrontMatter::extract(content).is_err());
    }

    #[test]
    fn test_extra_fields_are_kept() {
        let content = "---\ntitle: T\npublishedAt: 2024-01-01\ndraft: true\n---\nBody.";
        let (fm, _) = FrontMatter::extract(content).unwrap();
        assert!(fm.unwrap().extra.contains_key("draft"));
    }

    #[test]
    fn test_parse_date_only() {
        let fm = FrontMatter {
            published_at: Some("2023-05-01".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_published_at().unwrap();
        assert_eq!(dt.to_rfc3339(), "2023-05-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_datetime_and_rfc3339() {
        assert!(parse_date_string("2023-05-01 10:30:00").is_some());
        assert!(parse_date_string("2023/05/01").is_some());
        assert!(parse_date_string("2023-05-01T10:30:00+02:00").is_some());
        assert!(parse_date_string("next tuesday").is_none());
    }
}
