// ABOUTME: URL validation applied before fetching or extracting an article.
// ABOUTME: Rejects empty, malformed, and feed (RSS) URLs with per-URL errors.

use url::Url;

use crate::error::ExtractError;

/// Fixed message for rejected feed URLs.
pub const RSS_REJECTED: &str = "RSS URLs are not supported";

/// Returns true if the host or path mentions `rss` (case-insensitive).
///
/// Unparseable input is checked as a whole string.
pub fn is_feed_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("").to_ascii_lowercase();
            let path = parsed.path().to_ascii_lowercase();
            host.contains("rss") || path.contains("rss")
        }
        Err(_) => url.to_ascii_lowercase().contains("rss"),
    }
}

/// Validate a URL for article extraction, returning it parsed.
pub fn check_article_url(url: &str, op: &str) -> Result<Url, ExtractError> {
    if url.trim().is_empty() {
        return Err(ExtractError::invalid_url(
            url,
            op,
            Some(anyhow::anyhow!("empty URL")),
        ));
    }

    if is_feed_url(url) {
        return Err(ExtractError::unsupported_url(
            url,
            op,
            Some(anyhow::anyhow!(RSS_REJECTED)),
        ));
    }

    let parsed = Url::parse(url).map_err(|e| {
        ExtractError::invalid_url(url, op, Some(anyhow::anyhow!("malformed URL: {}", e)))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(ExtractError::invalid_url(
            url,
            op,
            Some(anyhow::anyhow!("scheme must be http or https")),
        )),
    }
}
