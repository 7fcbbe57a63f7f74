// ABOUTME: Data models returned by the news sources.
// ABOUTME: GdeltArticle, TimelinePoint, GdeltResults, and NewsItem for Google News.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One article from a GDELT `ArtList` search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GdeltArticle {
    pub title: Option<String>,
    pub url: Option<String>,
    /// GDELT timestamp, e.g. `20240523T141500Z`.
    pub seendate: Option<String>,
    pub domain: Option<String>,
    pub language: Option<String>,
    pub sourcecountry: Option<String>,
    /// Raw tone as sent; may be a number or a numeric string.
    pub tone: Option<Value>,
}

impl GdeltArticle {
    /// Tone as a number. Missing or unparseable tone counts as 0.
    pub fn tone_score(&self) -> f64 {
        match &self.tone {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

/// One data point of a GDELT timeline series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub series: String,
    pub date: Option<String>,
    pub value: Option<Value>,
    /// Any other fields the point carried (e.g. `norm`, `toparts`).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Normalized result of a GDELT search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GdeltResults {
    Articles(Vec<GdeltArticle>),
    Timeline(Vec<TimelinePoint>),
}

impl GdeltResults {
    pub fn len(&self) -> usize {
        match self {
            GdeltResults::Articles(a) => a.len(),
            GdeltResults::Timeline(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Article URLs, in order. Empty for timeline results.
    pub fn article_urls(&self) -> Vec<String> {
        match self {
            GdeltResults::Articles(a) => a.iter().filter_map(|x| x.url.clone()).collect(),
            GdeltResults::Timeline(_) => Vec::new(),
        }
    }
}

/// One headline from a Google News RSS feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    pub summary: String,
}
