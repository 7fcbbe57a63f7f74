// ABOUTME: Client for the GDELT DOC 2.0 news search API.
// ABOUTME: Builds filtered queries, retries transient failures, and normalizes article and timeline payloads.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::models::{GdeltArticle, GdeltResults, TimelinePoint};

pub const GDELT_ENDPOINT: &str = "https://api.gdeltproject.org/api/v2/doc/doc";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; newsdesk-gdelt/1.0)";

/// Preset of financial news domains used by `financial_media_only`.
pub const FINANCIAL_DOMAINS: &[&str] = &[
    "reuters.com",
    "bloomberg.com",
    "ft.com",
    "wsj.com",
    "cnbc.com",
    "marketwatch.com",
    "barrons.com",
    "seekingalpha.com",
    "investopedia.com",
    "fool.com",
];

pub const MAX_RECORDS_LIMIT: u32 = 250;

/// GDELT search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    ArtList,
    TimelineVol,
    TimelineVolRaw,
    TimelineTone,
    TimelineLang,
    TimelineSourceCountry,
}

impl Mode {
    /// Value of the `mode` query parameter.
    pub fn api_name(self) -> &'static str {
        match self {
            Mode::ArtList => "ArtList",
            Mode::TimelineVol => "timelinevol",
            Mode::TimelineVolRaw => "timelinevolraw",
            Mode::TimelineTone => "timelinetone",
            Mode::TimelineLang => "timelinelang",
            Mode::TimelineSourceCountry => "timelinesourcecountry",
        }
    }

    pub fn is_timeline(self) -> bool {
        !matches!(self, Mode::ArtList)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for Mode {
    type Err = String;

    /// Accepts the API names (any case) and short aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "artlist" | "articles" => Ok(Mode::ArtList),
            "timelinevol" | "volume" => Ok(Mode::TimelineVol),
            "timelinevolraw" | "volume-raw" => Ok(Mode::TimelineVolRaw),
            "timelinetone" | "tone" | "sentiment" => Ok(Mode::TimelineTone),
            "timelinelang" | "language" => Ok(Mode::TimelineLang),
            "timelinesourcecountry" | "country" => Ok(Mode::TimelineSourceCountry),
            other => Err(format!("unknown GDELT mode: {}", other)),
        }
    }
}

/// Sentiment filter applied to `ArtList` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneFilter {
    #[default]
    All,
    /// Tone above 5.
    Positive,
    /// Tone below -5.
    Negative,
    /// Tone within [-5, 5].
    Neutral,
}

impl ToneFilter {
    pub fn accepts(self, tone: f64) -> bool {
        match self {
            ToneFilter::All => true,
            ToneFilter::Positive => tone > 5.0,
            ToneFilter::Negative => tone < -5.0,
            ToneFilter::Neutral => (-5.0..=5.0).contains(&tone),
        }
    }
}

impl FromStr for ToneFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ToneFilter::All),
            "positive" => Ok(ToneFilter::Positive),
            "negative" => Ok(ToneFilter::Negative),
            "neutral" => Ok(ToneFilter::Neutral),
            other => Err(format!("unknown tone filter: {}", other)),
        }
    }
}

/// A GDELT search.
#[derive(Debug, Clone, PartialEq)]
pub struct GdeltQuery {
    pub query: String,
    pub mode: Mode,
    /// Clamped to 1..=250 when sent.
    pub max_records: u32,
    pub domains: Vec<String>,
    /// ISO 639-3 codes, e.g. `eng`.
    pub languages: Vec<String>,
    /// FIPS country codes, e.g. `US`.
    pub countries: Vec<String>,
    pub financial_media_only: bool,
    pub tone_filter: ToneFilter,
    pub sort: String,
    /// `YYYYMMDDHHMMSS`; used only together with `end_datetime`.
    pub start_datetime: Option<String>,
    pub end_datetime: Option<String>,
    pub timespan: String,
    pub timeline_smooth: u32,
}

impl Default for GdeltQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            mode: Mode::ArtList,
            max_records: 5,
            domains: Vec::new(),
            languages: Vec::new(),
            countries: Vec::new(),
            financial_media_only: false,
            tone_filter: ToneFilter::All,
            sort: "DateDesc".to_string(),
            start_datetime: None,
            end_datetime: None,
            timespan: "7days".to_string(),
            timeline_smooth: 0,
        }
    }
}

impl GdeltQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn max_records_clamped(&self) -> u32 {
        self.max_records.clamp(1, MAX_RECORDS_LIMIT)
    }

    /// Domain filter values, with the financial preset merged in when requested.
    pub fn effective_domains(&self) -> Vec<String> {
        let preset: &[&str] = if self.financial_media_only {
            FINANCIAL_DOMAINS
        } else {
            &[]
        };
        let mut domains: Vec<String> = Vec::new();
        for d in self
            .domains
            .iter()
            .map(|d| d.trim())
            .chain(preset.iter().copied())
        {
            if !d.is_empty() && !domains.iter().any(|x| x == d) {
                domains.push(d.to_string());
            }
        }
        domains
    }

    /// The full `query` parameter: base text plus domain, language and country filters.
    pub fn build_query(&self) -> String {
        let parts = [
            self.query.trim().to_string(),
            or_join("domain:", &self.effective_domains()),
            or_join("sourcelang:", &self.languages),
            or_join("sourcecountry:", &self.countries),
        ];
        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Query-string parameters in send order. Empty values are dropped.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("mode", self.mode.api_name().to_string()),
            ("format", "json".to_string()),
            ("query", self.build_query()),
        ];

        if self.mode.is_timeline() {
            if self.timeline_smooth > 0 {
                params.push(("timelinesmooth", self.timeline_smooth.to_string()));
            }
        } else {
            params.push(("maxrecords", self.max_records_clamped().to_string()));
            params.push(("sort", self.sort.trim().to_string()));
        }

        let start = self.start_datetime.as_deref().map(str::trim).unwrap_or("");
        let end = self.end_datetime.as_deref().map(str::trim).unwrap_or("");
        if !start.is_empty() && !end.is_empty() {
            params.push(("STARTDATETIME", start.to_string()));
            params.push(("ENDDATETIME", end.to_string()));
        } else {
            params.push(("TIMESPAN", self.timespan.trim().to_string()));
        }

        params.retain(|(_, v)| !v.is_empty());
        params
    }
}

/// Join filter values with OR.
///
/// One value gives `prefix:value`; several give `(prefix:a OR prefix:b)`.
/// Blank values are ignored.
pub fn or_join(prefix: &str, values: &[String]) -> String {
    let parts: Vec<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| format!("{}{}", prefix, v))
        .collect();
    match parts.len() {
        0 => String::new(),
        1 => parts.into_iter().collect(),
        _ => format!("({})", parts.join(" OR ")),
    }
}

fn str_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Articles from an `ArtList` payload. Non-object entries are skipped.
pub fn normalize_articles(payload: &Value) -> Vec<GdeltArticle> {
    let Some(items) = payload.get("articles").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|a| GdeltArticle {
            title: str_field(a, "title"),
            url: str_field(a, "url"),
            seendate: str_field(a, "seendate"),
            domain: str_field(a, "domain"),
            language: str_field(a, "language").or_else(|| str_field(a, "sourcelang")),
            sourcecountry: str_field(a, "sourcecountry"),
            tone: a.get("tone").filter(|t| !t.is_null()).cloned(),
        })
        .collect()
}

const VALUE_KEYS: &[&str] = &["value", "volume", "count", "v"];
const BREAKDOWN_KEYS: &[&str] = &[
    "language",
    "languages",
    "lang",
    "country",
    "countries",
    "sourcecountry",
    "counts",
];

/// Points from a timeline payload, flattened across series.
///
/// Series normally carry a `data` array of points. A series without one is
/// treated as a single point, taking its value from the first of
/// `value`/`volume`/`count`/`v` and spreading any per-language or
/// per-country object into extra fields.
pub fn normalize_timeline(payload: &Value) -> Vec<TimelinePoint> {
    let Some(series_list) = payload.get("timeline").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut points = Vec::new();
    for series in series_list.iter().filter_map(Value::as_object) {
        let name = series
            .get("series")
            .and_then(Value::as_str)
            .unwrap_or("series")
            .to_string();

        match series.get("data").and_then(Value::as_array) {
            Some(data) => {
                for dp in data.iter().filter_map(Value::as_object) {
                    let extra = dp
                        .iter()
                        .filter(|(k, _)| k.as_str() != "date" && k.as_str() != "value")
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect();
                    points.push(TimelinePoint {
                        series: name.clone(),
                        date: str_field(dp, "date"),
                        value: dp.get("value").cloned(),
                        extra,
                    });
                }
            }
            None => {
                let value = VALUE_KEYS.iter().find_map(|k| series.get(*k).cloned());
                let extra = BREAKDOWN_KEYS
                    .iter()
                    .filter_map(|k| series.get(*k).and_then(Value::as_object))
                    .flat_map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())))
                    .collect();
                points.push(TimelinePoint {
                    series: name,
                    date: str_field(series, "date"),
                    value,
                    extra,
                });
            }
        }
    }
    points
}

/// Keep articles whose tone passes the filter, in order.
pub fn filter_by_tone(articles: Vec<GdeltArticle>, filter: ToneFilter) -> Vec<GdeltArticle> {
    if filter == ToneFilter::All {
        return articles;
    }
    articles
        .into_iter()
        .filter(|a| filter.accepts(a.tone_score()))
        .collect()
}

/// GDELT DOC API client.
#[derive(Debug, Clone)]
pub struct GdeltClient {
    http: reqwest::Client,
    endpoint: String,
    retries: u32,
    backoff: Duration,
}

impl GdeltClient {
    /// Client with a per-request timeout, three retries and a 1.2s backoff base.
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .gzip(true)
            .build()?;
        Ok(Self::with_http_client(http))
    }

    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: GDELT_ENDPOINT.to_string(),
            retries: 3,
            backoff: Duration::from_millis(1200),
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Retry policy for 429/5xx responses and transport errors. Attempt `n`
    /// (from 0) waits `backoff * 2^n` before retrying.
    pub fn retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.retries = retries;
        self.backoff = backoff;
        self
    }

    /// Run a search and normalize the payload for the query's mode.
    pub async fn search(&self, query: &GdeltQuery) -> Result<GdeltResults, SourceError> {
        let params = query.params();
        debug!(mode = %query.mode, query = %query.build_query(), "gdelt search");
        let payload = self.get_json(&params).await?;

        if query.mode.is_timeline() {
            return Ok(GdeltResults::Timeline(normalize_timeline(&payload)));
        }

        let mut articles = filter_by_tone(normalize_articles(&payload), query.tone_filter);
        articles.truncate(query.max_records_clamped() as usize);
        Ok(GdeltResults::Articles(articles))
    }

    async fn get_json(&self, params: &[(&'static str, String)]) -> Result<Value, SourceError> {
        let mut attempt = 0;
        loop {
            match self.get_json_once(params).await {
                Ok(v) => return Ok(v),
                Err(err) if attempt < self.retries && is_transient(&err) => {
                    let wait = self.backoff * 2u32.saturating_pow(attempt);
                    warn!(attempt = attempt + 1, error = %err, "gdelt request failed, retrying");
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_json_once(&self, params: &[(&'static str, String)]) -> Result<Value, SourceError> {
        let resp = self.http.get(&self.endpoint).query(params).send().await?;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(SourceError::status(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| {
            SourceError::parse(format!("non-JSON response (Content-Type: {}): {}", content_type, e))
        })
    }
}

fn is_transient(err: &SourceError) -> bool {
    match err {
        SourceError::Http(e) => e.is_timeout() || e.is_connect(),
        other => other.is_retryable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn or_join_single_and_many() {
        assert_eq!(or_join("sourcelang:", &strings(&["kor"])), "sourcelang:kor");
        assert_eq!(
            or_join("sourcelang:", &strings(&["eng", " kor "])),
            "(sourcelang:eng OR sourcelang:kor)"
        );
        assert_eq!(or_join("domain:", &strings(&["", "  "])), "");
        assert_eq!(or_join("domain:", &[]), "");
    }

    #[test]
    fn build_query_appends_filters() {
        let q = GdeltQuery {
            languages: strings(&["kor"]),
            countries: strings(&["KS", "US"]),
            ..GdeltQuery::new(" Samsung ")
        };
        assert_eq!(
            q.build_query(),
            "Samsung sourcelang:kor (sourcecountry:KS OR sourcecountry:US)"
        );
    }

    #[test]
    fn financial_preset_merges_without_duplicates() {
        let q = GdeltQuery {
            domains: strings(&["nikkei.com", "reuters.com"]),
            financial_media_only: true,
            ..GdeltQuery::new("NVIDIA")
        };
        let domains = q.effective_domains();
        assert_eq!(domains.len(), 11);
        assert_eq!(domains[0], "nikkei.com");
        assert_eq!(domains[1], "reuters.com");
        assert_eq!(domains.iter().filter(|d| *d == "reuters.com").count(), 1);
        assert!(q.build_query().starts_with("NVIDIA (domain:nikkei.com OR domain:reuters.com OR domain:bloomberg.com"));
    }

    #[test]
    fn artlist_params() {
        let q = GdeltQuery {
            max_records: 900,
            ..GdeltQuery::new("fed")
        };
        assert_eq!(
            q.params(),
            vec![
                ("mode", "ArtList".to_string()),
                ("format", "json".to_string()),
                ("query", "fed".to_string()),
                ("maxrecords", "250".to_string()),
                ("sort", "DateDesc".to_string()),
                ("TIMESPAN", "7days".to_string()),
            ]
        );
    }

    #[test]
    fn max_records_floor_is_one() {
        let q = GdeltQuery {
            max_records: 0,
            ..GdeltQuery::new("fed")
        };
        assert_eq!(q.max_records_clamped(), 1);
    }

    #[test]
    fn timeline_params_and_absolute_range() {
        let q = GdeltQuery {
            mode: Mode::TimelineTone,
            timeline_smooth: 3,
            start_datetime: Some("20240101000000".to_string()),
            end_datetime: Some(" 20240201000000 ".to_string()),
            ..GdeltQuery::new("oil")
        };
        let params = q.params();
        assert_eq!(params[0], ("mode", "timelinetone".to_string()));
        assert!(params.contains(&("timelinesmooth", "3".to_string())));
        assert!(params.contains(&("STARTDATETIME", "20240101000000".to_string())));
        assert!(params.contains(&("ENDDATETIME", "20240201000000".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "TIMESPAN" || *k == "maxrecords"));
    }

    #[test]
    fn half_range_falls_back_to_timespan_and_empty_values_drop() {
        let q = GdeltQuery {
            mode: Mode::TimelineVol,
            start_datetime: Some("20240101000000".to_string()),
            timespan: String::new(),
            ..GdeltQuery::new("")
        };
        let keys: Vec<&str> = q.params().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["mode", "format"]);
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("artlist".parse::<Mode>().unwrap(), Mode::ArtList);
        assert_eq!("TimelineSourceCountry".parse::<Mode>().unwrap(), Mode::TimelineSourceCountry);
        assert_eq!("volume-raw".parse::<Mode>().unwrap(), Mode::TimelineVolRaw);
        assert!("bogus".parse::<Mode>().is_err());
    }

    #[test]
    fn tone_bounds() {
        assert!(ToneFilter::Positive.accepts(5.01));
        assert!(!ToneFilter::Positive.accepts(5.0));
        assert!(ToneFilter::Negative.accepts(-5.5));
        assert!(ToneFilter::Neutral.accepts(-5.0));
        assert!(ToneFilter::Neutral.accepts(5.0));
        assert!(!ToneFilter::Neutral.accepts(5.1));
    }

    #[test]
    fn normalize_articles_uses_sourcelang_fallback() {
        let payload = json!({
            "articles": [
                {"title": "A", "url": "https://a.example/1", "seendate": "20240523T141500Z",
                 "domain": "a.example", "sourcelang": "English", "sourcecountry": "United States", "tone": "-6.1"},
                "junk",
                {"title": "B", "url": "https://b.example/2", "language": "Korean"}
            ]
        });
        let arts = normalize_articles(&payload);
        assert_eq!(arts.len(), 2);
        assert_eq!(arts[0].language.as_deref(), Some("English"));
        assert_eq!(arts[1].language.as_deref(), Some("Korean"));
        assert_eq!(arts[0].tone_score(), -6.1);
        assert_eq!(normalize_articles(&json!({})), Vec::new());
    }

    #[test]
    fn tone_filter_keeps_order_and_zero_for_missing() {
        let payload = json!({"articles": [
            {"url": "1", "tone": 7.2},
            {"url": "2", "tone": "oops"},
            {"url": "3", "tone": -8},
            {"url": "4"}
        ]});
        let neutral = filter_by_tone(normalize_articles(&payload), ToneFilter::Neutral);
        let urls: Vec<_> = neutral.iter().map(|a| a.url.clone().unwrap()).collect();
        assert_eq!(urls, vec!["2", "4"]);
    }

    #[test]
    fn normalize_timeline_data_points() {
        let payload = json!({"timeline": [
            {"series": "Volume Intensity", "data": [
                {"date": "20240501T000000Z", "value": 0.5, "norm": 1000},
                {"date": "20240502T000000Z", "value": 0.7}
            ]},
            {"series": "English", "date": "20240501T000000Z", "count": 12,
             "languages": {"English": 10, "French": 2}}
        ]});
        let points = normalize_timeline(&payload);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].series, "Volume Intensity");
        assert_eq!(points[0].extra.get("norm"), Some(&json!(1000)));
        assert_eq!(points[2].value, Some(json!(12)));
        assert_eq!(points[2].extra.get("French"), Some(&json!(2)));
    }
}
