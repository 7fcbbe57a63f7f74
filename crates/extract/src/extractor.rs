// ABOUTME: The pure extraction pipeline turning (url, html, options) into an ExtractionResult.
// ABOUTME: Runs metadata, noise removal, region detection, normalization, and truncation in order.

use aho_corasick::AhoCorasick;
use scraper::Html;
use tracing::debug;

use crate::dom::blocks::collect_blocks;
use crate::dom::noise::remove_noise;
use crate::dom::region::find_content_region;
use crate::error::{BuildError, ExtractError};
use crate::metadata::Metadata;
use crate::options::ExtractOptions;
use crate::result::ExtractionResult;
use crate::rules::{Boilerplate, RuleSet};
use crate::text::{truncate_at_boundary, TextNormalizer};
use crate::urls::check_article_url;

/// One document to extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub url: String,
    pub html: String,
    pub options: ExtractOptions,
}

impl ExtractionRequest {
    pub fn new(url: impl Into<String>, html: impl Into<String>, options: ExtractOptions) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            options,
        }
    }
}

/// Article content extractor.
///
/// Holds the selector tables and the compiled boilerplate matcher; carries no
/// per-document state, so the same request always yields the same result.
#[derive(Debug, Clone)]
pub struct Extractor {
    rules: RuleSet,
    boilerplate: Boilerplate,
    phrases: AhoCorasick,
}

impl Extractor {
    /// Create an extractor over the given tables.
    pub fn new(rules: RuleSet, boilerplate: Boilerplate) -> Result<Self, BuildError> {
        let phrases = boilerplate.phrase_matcher()?;
        Ok(Self {
            rules,
            boilerplate,
            phrases,
        })
    }

    /// Create an extractor with the built-in tables.
    pub fn with_defaults() -> Result<Self, BuildError> {
        Self::new(RuleSet::default(), Boilerplate::default())
    }

    /// Run the pipeline and fold any failure into the result row.
    pub fn run(&self, req: &ExtractionRequest) -> ExtractionResult {
        self.extract(req)
            .unwrap_or_else(|err| ExtractionResult::failure(&req.url, &err))
    }

    /// Run the pipeline.
    pub fn extract(&self, req: &ExtractionRequest) -> Result<ExtractionResult, ExtractError> {
        let url = req.url.as_str();
        let opts = &req.options;
        check_article_url(url, "Extract")?;

        let mut doc = Html::parse_document(&req.html);

        let metadata = if opts.include_metadata {
            Metadata::from_document(&doc)
        } else {
            Metadata::default()
        };

        remove_noise(&mut doc, &self.rules);

        let region = find_content_region(&doc, self.rules.content_region, opts.min_region_text)
            .ok_or_else(|| {
                ExtractError::no_content(
                    url,
                    "Extract",
                    Some(anyhow::anyhow!("no content region or body text")),
                )
            })?;
        debug!(url, source = ?region.source, "content region selected");

        let normalizer = TextNormalizer {
            phrases: &self.phrases,
            boilerplate: &self.boilerplate,
            options: opts,
        };
        let paragraphs = normalizer.normalize(collect_blocks(region.element));
        if paragraphs.is_empty() {
            return Err(ExtractError::empty_after_filtering(
                url,
                "Extract",
                Some(anyhow::anyhow!("every paragraph was filtered out")),
            ));
        }

        let joined = paragraphs.join("\n");
        let content =
            truncate_at_boundary(&joined, opts.max_content_length, opts.truncation_lookback);
        if content.is_empty() {
            return Err(ExtractError::empty_after_filtering(
                url,
                "Extract",
                Some(anyhow::anyhow!("content empty after truncation")),
            ));
        }

        Ok(ExtractionResult::success(
            url,
            metadata.title,
            metadata.description,
            content,
            paragraphs.len(),
        ))
    }
}
