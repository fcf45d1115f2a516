//! Field extraction from a fetched video page.
//!
//! The page embeds the channel title in a `<link itemprop="name">` tag and the
//! channel path in a `"canonicalBaseUrl"` JSON fragment. A missing match is
//! not an error: the field is left empty.

use std::sync::LazyLock;

use regex::bytes::Regex;
use tracing::trace;

/// Base for channel addresses built from `canonicalBaseUrl`.
pub const CHANNEL_BASE_URL: &str = "https://www.youtube.com/";

/// Channel title tag.
#[allow(clippy::expect_used)]
static CHANNEL_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link itemprop="name" content="([^"]+)">"#).expect("title regex is valid") // Static pattern, safe to panic
});

/// Channel path, either `/channel/<id>` or `/@<handle>`.
#[allow(clippy::expect_used)]
static CHANNEL_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""canonicalBaseUrl":"/(channel/|@)([a-zA-Z0-9_-]+)""#)
        .expect("channel regex is valid") // Static pattern, safe to panic
});

/// Fields pulled from one page; empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Channel display name.
    pub title: String,
    /// Absolute channel address.
    pub channel_url: String,
}

/// Extracts the channel title and address from a page body.
///
/// Only the first match of each pattern is used. Invalid UTF-8 in the title
/// is replaced rather than rejected.
///
/// # Example
///
/// ```
/// use channel_puller::extract::extract;
///
/// let page = br#"<link itemprop="name" content="Example">"canonicalBaseUrl":"/@example""#;
/// let fields = extract(page);
/// assert_eq!(fields.title, "Example");
/// assert_eq!(fields.channel_url, "https://www.youtube.com/@example");
/// ```
#[must_use]
pub fn extract(body: &[u8]) -> Extracted {
    let title = CHANNEL_TITLE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .unwrap_or_default();

    let channel_url = CHANNEL_PATH
        .captures(body)
        .and_then(|caps| Some((caps.get(1)?, caps.get(2)?)))
        .map(|(kind, id)| {
            format!(
                "{CHANNEL_BASE_URL}{}{}",
                String::from_utf8_lossy(kind.as_bytes()),
                String::from_utf8_lossy(id.as_bytes())
            )
        })
        .unwrap_or_default();

    trace!(
        title_found = !title.is_empty(),
        channel_found = !channel_url.is_empty(),
        "extracted page fields"
    );
    Extracted { title, channel_url }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title_from_link_tag() {
        let page = r#"<link itemprop="url" href="http://www.youtube.com/@kikuchan813"><link itemprop="name" content="アイドル鳥越"></span><script type="application/ld+json" nonce="OomvDtAGKIp-PW5XIn21rA">"#;
        let fields = extract(page.as_bytes());
        assert_eq!(fields.title, "アイドル鳥越");
    }

    #[test]
    fn test_extract_channel_id_path() {
        let page = r#","browseEndpoint":{"browseId":"UCp0iCvHGMwyfPHpYq7n2sPw","canonicalBaseUrl":"/channel/UCp0iCvHGMwyfPHpYq7n2sPw"}}}]},"lengthText":{"accessibility":{"accessibilityData""#;
        let fields = extract(page.as_bytes());
        assert_eq!(
            fields.channel_url,
            "https://www.youtube.com/channel/UCp0iCvHGMwyfPHpYq7n2sPw"
        );
    }

    #[test]
    fn test_extract_channel_handle_path() {
        let page = r#"Endpoint":{"browseId":"UCPJCP_fon2mOMfibbBPUOYw","canonicalBaseUrl":"/@SAWAYANGAMES"}}}]},"publishedTimeText":{"simpleText":"1 年前"}"#;
        let fields = extract(page.as_bytes());
        assert_eq!(fields.channel_url, "https://www.youtube.com/@SAWAYANGAMES");
    }

    #[test]
    fn test_extract_uses_first_match() {
        let page = r#""canonicalBaseUrl":"/@first" "canonicalBaseUrl":"/@second""#;
        assert_eq!(
            extract(page.as_bytes()).channel_url,
            "https://www.youtube.com/@first"
        );
    }

    #[test]
    fn test_extract_missing_fields_are_empty() {
        let fields = extract(b"<html><body>nothing here</body></html>");
        assert_eq!(fields, Extracted::default());
    }

    #[test]
    fn test_extract_ignores_unsupported_path_kind() {
        let fields = extract(br#""canonicalBaseUrl":"/user/legacy""#);
        assert!(fields.channel_url.is_empty());
    }

    #[test]
    fn test_extract_does_not_escape_title() {
        // Formula escaping belongs to the CSV writer.
        let fields = extract(br#"<link itemprop="name" content="=SUM(A1)">"#);
        assert_eq!(fields.title, "=SUM(A1)");
    }
}
