// ABOUTME: Configuration for extraction and fetching: ExtractOptions, Options, and ClientBuilder.
// ABOUTME: ClientBuilder provides a fluent API for constructing batch Client instances.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::BuildError;
use crate::rules::{Boilerplate, RuleSet};

/// Browser-like User-Agent sent with article fetches.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; NewsContentExtractor/1.0)";

/// Per-request extraction settings.
///
/// `max_content_length`, `include_metadata` and `remove_short_paragraphs` are the
/// caller-facing knobs; the remaining thresholds are tuning defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Maximum content length in characters.
    pub max_content_length: usize,
    pub include_metadata: bool,
    pub remove_short_paragraphs: bool,
    /// Blocks shorter than this many characters are dropped when
    /// `remove_short_paragraphs` is set.
    pub min_paragraph_chars: usize,
    /// How far back from the limit truncation looks for a whitespace boundary.
    pub truncation_lookback: usize,
    /// A region candidate must have more trimmed text characters than this.
    pub min_region_text: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_content_length: 5000,
            include_metadata: true,
            remove_short_paragraphs: true,
            min_paragraph_chars: 50,
            truncation_lookback: 50,
            min_region_text: 0,
        }
    }
}

/// Configuration options for the batch client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub allow_private_networks: bool,
    pub max_parallelism: usize,
    pub http_client: Option<reqwest::Client>,
    pub headers: HashMap<String, String>,
    pub extract: ExtractOptions,
    pub rules: RuleSet,
    pub boilerplate: Boilerplate,
}

impl Default for Options {
    fn default() -> Self {
        let mut headers = HashMap::new();
        headers.insert(
            "Accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        );
        headers.insert("Accept-Language".to_string(), "en-US,en;q=0.5".to_string());

        Self {
            timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_private_networks: false,
            max_parallelism: 4,
            http_client: None,
            headers,
            extract: ExtractOptions::default(),
            rules: RuleSet::default(),
            boilerplate: Boilerplate::default(),
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the per-request fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Set how many fetches a batch runs at once. Zero is treated as one.
    pub fn max_parallelism(mut self, n: usize) -> Self {
        self.opts.max_parallelism = n.max(1);
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Add or replace a header sent with every request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Replace the extraction settings.
    pub fn extract_options(mut self, extract: ExtractOptions) -> Self {
        self.opts.extract = extract;
        self
    }

    /// Set the maximum content length in characters.
    pub fn max_content_length(mut self, max: usize) -> Self {
        self.opts.extract.max_content_length = max;
        self
    }

    /// Enable or disable title/description extraction.
    pub fn include_metadata(mut self, include: bool) -> Self {
        self.opts.extract.include_metadata = include;
        self
    }

    /// Enable or disable short-paragraph filtering.
    pub fn remove_short_paragraphs(mut self, remove: bool) -> Self {
        self.opts.extract.remove_short_paragraphs = remove;
        self
    }

    /// Use alternate selector tables.
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.opts.rules = rules;
        self
    }

    /// Use alternate boilerplate denylists.
    pub fn boilerplate(mut self, boilerplate: Boilerplate) -> Self {
        self.opts.boilerplate = boilerplate;
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Result<Client, BuildError> {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
