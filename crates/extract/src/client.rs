// ABOUTME: The batch Client that fetches article pages and runs the extractor over them.
// ABOUTME: Provides extract_url, extract_html, and order-preserving bounded-concurrency extract_batch.

use std::net::IpAddr;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::error::{BuildError, ExtractError};
use crate::extractor::{ExtractionRequest, Extractor};
use crate::options::{ClientBuilder, Options};
use crate::resource::{fetch, is_private_ip, FetchOptions};
use crate::result::{count_successful, ExtractionResult};
use crate::urls::check_article_url;

/// Fetches and extracts news articles.
#[derive(Debug, Clone)]
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
    extractor: Extractor,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Result<Self, BuildError> {
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => {
                let allow_private = opts.allow_private_networks;
                let policy = reqwest::redirect::Policy::custom(move |attempt| {
                    if attempt.previous().len() >= 10 {
                        return attempt.error("too many redirects");
                    }
                    let literal_private = attempt
                        .url()
                        .host_str()
                        .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
                        .and_then(|h| h.parse::<IpAddr>().ok())
                        .is_some_and(|ip| is_private_ip(&ip));
                    if !allow_private && literal_private {
                        return attempt.error("redirect to private IP blocked");
                    }
                    attempt.follow()
                });

                reqwest::Client::builder()
                    .redirect(policy)
                    .user_agent(&opts.user_agent)
                    .timeout(opts.timeout)
                    .cookie_store(true)
                    .gzip(true)
                    .brotli(true)
                    .deflate(true)
                    .build()?
            }
        };

        let extractor = Extractor::new(opts.rules, opts.boilerplate)?;

        Ok(Self {
            opts,
            http_client,
            extractor,
        })
    }

    /// Fetch a page and return its decoded HTML.
    ///
    /// Feed URLs are rejected before any request is made.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ExtractError> {
        check_article_url(url, "Fetch")?;
        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            allow_private_networks: self.opts.allow_private_networks,
        };
        let page = fetch(&self.http_client, url, &fetch_opts).await?;
        Ok(page.text())
    }

    /// Extract an article from already-fetched HTML.
    pub fn extract_html(&self, url: &str, html: &str) -> ExtractionResult {
        let req = ExtractionRequest::new(url, html, self.opts.extract.clone());
        self.extractor.run(&req)
    }

    /// Fetch and extract one URL. Never fails; failures become error rows.
    pub async fn extract_url(&self, url: &str) -> ExtractionResult {
        let outcome = match self.fetch_html(url).await {
            Ok(html) => {
                let req = ExtractionRequest::new(url, html, self.opts.extract.clone());
                self.extractor.extract(&req)
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok(row) => row,
            Err(err) => {
                if err.is_extract() {
                    info!(url, reason = %err.code, "no article text");
                } else {
                    warn!(url, error = %err, "extraction failed");
                }
                ExtractionResult::failure(url, &err)
            }
        }
    }

    /// Fetch and extract many URLs.
    ///
    /// At most `max_parallelism` fetches run at once. The output has one row
    /// per input, in input order, and a failing URL never affects the others.
    pub async fn extract_batch<S>(&self, urls: &[S]) -> Vec<ExtractionResult>
    where
        S: AsRef<str>,
    {
        let results: Vec<ExtractionResult> = stream::iter(urls)
            .map(|url| self.extract_url(url.as_ref()))
            .buffered(self.opts.max_parallelism.max(1))
            .collect()
            .await;

        info!(
            processed = results.len(),
            successful = count_successful(&results),
            "batch complete"
        );
        results
    }
}
