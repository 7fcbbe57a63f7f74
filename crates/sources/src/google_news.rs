// ABOUTME: Google News RSS lookup by topic, location, or search keywords.
// ABOUTME: Builds feed URLs and maps feed-rs entries to plain-text NewsItem records.

use std::time::Duration;

use feed_rs::model::Entry;
use tracing::debug;
use url::Url;

use crate::error::SourceError;
use crate::html_utils::strip_html;
use crate::models::NewsItem;

pub const GOOGLE_NEWS_BASE: &str = "https://news.google.com";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; newsdesk-googlenews/1.0)";

/// A Google News lookup. At least one of `topic`, `location` or `query` must be set;
/// when several are, topic wins over location, which wins over query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleNewsQuery {
    pub query: Option<String>,
    /// Section name such as `BUSINESS` or `TECHNOLOGY`.
    pub topic: Option<String>,
    pub location: Option<String>,
    /// Interface language, e.g. `en-US`.
    pub hl: String,
    /// Country, e.g. `US`.
    pub gl: String,
    /// Country:language edition; derived from `gl` and `hl` when unset.
    pub ceid: Option<String>,
    pub max_results: usize,
}

impl Default for GoogleNewsQuery {
    fn default() -> Self {
        Self {
            query: None,
            topic: None,
            location: None,
            hl: "en-US".to_string(),
            gl: "US".to_string(),
            ceid: None,
            max_results: 5,
        }
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl GoogleNewsQuery {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn topic(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            ..Self::default()
        }
    }

    pub fn location(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }

    /// `ceid` as sent: the explicit value, else `GL:lang` with lang taken from `hl`.
    pub fn edition(&self) -> String {
        match non_blank(&self.ceid) {
            Some(ceid) => ceid.to_string(),
            None => {
                let lang = self.hl.split('-').next().unwrap_or("");
                format!("{}:{}", self.gl, lang)
            }
        }
    }

    /// The feed URL for this lookup under `base`.
    pub fn rss_url(&self, base: &Url) -> Result<Url, SourceError> {
        let mut url = base.clone();
        let mut search: Option<&str> = None;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SourceError::invalid(format!("unusable base URL: {}", base)))?;
            segments.clear();
            if let Some(topic) = non_blank(&self.topic) {
                segments.extend(["rss", "headlines", "section", "topic"]);
                segments.push(&topic.to_uppercase());
            } else if let Some(location) = non_blank(&self.location) {
                segments.extend(["rss", "headlines", "section", "geo", location]);
            } else if let Some(query) = non_blank(&self.query) {
                segments.extend(["rss", "search"]);
                search = Some(query);
            } else {
                return Err(SourceError::invalid(
                    "one of query, topic or location is required",
                ));
            }
        }

        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            if let Some(q) = search {
                pairs.append_pair("q", q);
            }
            pairs
                .append_pair("hl", &self.hl)
                .append_pair("gl", &self.gl)
                .append_pair("ceid", &self.edition());
        }
        Ok(url)
    }
}

fn map_entry(entry: &Entry) -> Option<NewsItem> {
    let title = entry
        .title
        .as_ref()
        .map(|t| strip_html(&t.content))
        .unwrap_or_default();
    if title.is_empty() {
        return None;
    }
    Some(NewsItem {
        title,
        link: entry
            .links
            .first()
            .map(|l| l.href.trim().to_string())
            .unwrap_or_default(),
        published: entry.published.or(entry.updated),
        summary: entry
            .summary
            .as_ref()
            .map(|s| strip_html(&s.content))
            .unwrap_or_default(),
    })
}

/// Parse feed bytes into at most `max_results` items, skipping untitled entries.
pub fn parse_items(data: &[u8], max_results: usize) -> Result<Vec<NewsItem>, SourceError> {
    let feed = feed_rs::parser::parse(data).map_err(SourceError::parse)?;
    Ok(feed
        .entries
        .iter()
        .filter_map(map_entry)
        .take(max_results)
        .collect())
}

fn parse_base(base: &str) -> Result<Url, SourceError> {
    Url::parse(base).map_err(|e| SourceError::invalid(format!("bad base URL {}: {}", base, e)))
}

/// Google News RSS client.
#[derive(Debug, Clone)]
pub struct GoogleNewsClient {
    http: reqwest::Client,
    base: Url,
}

impl GoogleNewsClient {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .gzip(true)
            .build()?;
        let base = parse_base(GOOGLE_NEWS_BASE)?;
        Ok(Self { http, base })
    }

    /// Point the client at another host serving the same paths.
    pub fn base_url(mut self, base: &str) -> Result<Self, SourceError> {
        self.base = parse_base(base)?;
        Ok(self)
    }

    pub async fn search(&self, query: &GoogleNewsQuery) -> Result<Vec<NewsItem>, SourceError> {
        let url = query.rss_url(&self.base)?;
        debug!(url = %url, "google news lookup");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::status(status.as_u16(), &body));
        }
        let bytes = resp.bytes().await?;
        parse_items(&bytes, query.max_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse(GOOGLE_NEWS_BASE).unwrap()
    }

    #[test]
    fn search_url_encodes_query() {
        let url = GoogleNewsQuery::search("NVIDIA earnings & guidance")
            .rss_url(&base())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://news.google.com/rss/search?q=NVIDIA+earnings+%26+guidance&hl=en-US&gl=US&ceid=US%3Aen"
        );
    }

    #[test]
    fn topic_wins_and_is_uppercased() {
        let q = GoogleNewsQuery {
            query: Some("ignored".to_string()),
            location: Some("Seoul".to_string()),
            ..GoogleNewsQuery::topic("business")
        };
        let url = q.rss_url(&base()).unwrap();
        assert_eq!(url.path(), "/rss/headlines/section/topic/BUSINESS");
        assert_eq!(url.query(), Some("hl=en-US&gl=US&ceid=US%3Aen"));
    }

    #[test]
    fn location_beats_query() {
        let q = GoogleNewsQuery {
            query: Some("ignored".to_string()),
            ..GoogleNewsQuery::location("New York")
        };
        let url = q.rss_url(&base()).unwrap();
        assert_eq!(url.path(), "/rss/headlines/section/geo/New%20York");
    }

    #[test]
    fn edition_defaults_from_gl_and_hl() {
        let q = GoogleNewsQuery {
            hl: "ko-KR".to_string(),
            gl: "KR".to_string(),
            ..GoogleNewsQuery::search("x")
        };
        assert_eq!(q.edition(), "KR:ko");

        let explicit = GoogleNewsQuery {
            ceid: Some("GB:en".to_string()),
            ..GoogleNewsQuery::search("x")
        };
        assert_eq!(explicit.edition(), "GB:en");
    }

    #[test]
    fn nothing_to_look_up_is_invalid() {
        let q = GoogleNewsQuery {
            query: Some("  ".to_string()),
            ..GoogleNewsQuery::default()
        };
        assert!(matches!(q.rss_url(&base()), Err(SourceError::Invalid(_))));
    }

    #[test]
    fn parse_skips_untitled_and_caps_results() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Top stories</title><link>https://news.google.com</link>
<item><title>First &amp; foremost</title><link>https://a.example/1</link>
  <description>&lt;a href="https://a.example/1"&gt;First&lt;/a&gt;&amp;nbsp;&lt;font&gt;Wire&lt;/font&gt;</description>
  <pubDate>Thu, 23 May 2024 14:15:00 GMT</pubDate></item>
<item><title></title><link>https://a.example/untitled</link></item>
<item><title>Second</title><link>https://a.example/2</link></item>
<item><title>Third</title><link>https://a.example/3</link></item>
</channel></rss>"#;
        let items = parse_items(rss.as_bytes(), 2).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "First & foremost");
        assert_eq!(items[0].link, "https://a.example/1");
        assert_eq!(items[0].summary, "First Wire");
        assert!(items[0].published.is_some());
        assert_eq!(items[1].title, "Second");
    }

    #[test]
    fn garbage_is_parse_error() {
        assert!(matches!(
            parse_items(b"not a feed", 5),
            Err(SourceError::Parse(_))
        ));
    }
}
