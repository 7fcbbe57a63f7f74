// ABOUTME: Command-line argument definitions for the newsdesk binary.
// ABOUTME: Subcommands extract, gdelt, and google-news with shared extraction and output flags.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use newsdesk_extract::{Client, ExtractOptions};
use newsdesk_sources::{Mode, ToneFilter};

#[derive(Parser, Debug)]
#[command(name = "newsdesk")]
#[command(about = "Find news articles and extract their readable text", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract article text from URLs, or from a saved HTML file
    Extract(ExtractCmd),
    /// Search the GDELT DOC 2.0 API
    Gdelt(GdeltCmd),
    /// Read headlines from Google News RSS
    GoogleNews(GoogleNewsCmd),
}

#[derive(Args, Debug)]
pub struct ExtractCmd {
    /// Article URLs to fetch and extract
    pub urls: Vec<String>,

    /// HTML file to extract instead of fetching (requires --url)
    #[arg(long, conflicts_with = "urls", requires = "url")]
    pub html: Option<PathBuf>,

    /// URL the HTML file was saved from
    #[arg(long, requires = "html")]
    pub url: Option<String>,

    #[command(flatten)]
    pub extract: ExtractFlags,

    #[command(flatten)]
    pub output: OutputFlags,
}

/// Flags that configure the extraction client.
#[derive(Args, Debug, Clone)]
pub struct ExtractFlags {
    /// Maximum content length in characters
    #[arg(long)]
    pub max_content_length: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout: u64,

    /// Skip title and description extraction
    #[arg(long)]
    pub no_metadata: bool,

    /// Keep paragraphs shorter than the minimum length
    #[arg(long)]
    pub keep_short_paragraphs: bool,

    /// Maximum concurrent fetches
    #[arg(long, default_value_t = 4)]
    pub parallelism: usize,

    /// Allow fetching from private/local networks
    #[arg(long)]
    pub allow_private_networks: bool,

    /// JSON file with extraction options; explicit flags override it
    #[arg(long)]
    pub options: Option<PathBuf>,
}

impl ExtractFlags {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Options from the `--options` file (or defaults) with flag overrides applied.
    pub fn extract_options(&self) -> Result<ExtractOptions> {
        let mut opts = match &self.options {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading options file {}", path.display()))?;
                serde_json::from_str::<ExtractOptions>(&raw)
                    .with_context(|| format!("parsing options file {}", path.display()))?
            }
            None => ExtractOptions::default(),
        };
        if let Some(max) = self.max_content_length {
            opts.max_content_length = max;
        }
        if self.no_metadata {
            opts.include_metadata = false;
        }
        if self.keep_short_paragraphs {
            opts.remove_short_paragraphs = false;
        }
        Ok(opts)
    }

    pub fn build_client(&self) -> Result<Client> {
        let client = Client::builder()
            .timeout(self.timeout())
            .max_parallelism(self.parallelism)
            .allow_private_networks(self.allow_private_networks)
            .extract_options(self.extract_options()?)
            .build()
            .context("building HTTP client")?;
        Ok(client)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Tsv,
}

/// Flags that control how extraction rows are written.
#[derive(Args, Debug, Clone)]
pub struct OutputFlags {
    /// Output format for extraction rows
    #[arg(short = 'f', long, value_enum, default_value = "json")]
    pub format: Format,

    /// Output compact JSON instead of pretty
    #[arg(long)]
    pub compact: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GdeltCmd {
    /// Search terms
    pub query: String,

    /// artlist, timelinevol, timelinevolraw, timelinetone, timelinelang, timelinesourcecountry
    #[arg(long, default_value = "artlist")]
    pub mode: Mode,

    /// Maximum articles to return (1-250)
    #[arg(long, default_value_t = 5)]
    pub max_records: u32,

    /// Restrict to a source domain (repeatable)
    #[arg(long = "domain")]
    pub domains: Vec<String>,

    /// Restrict to a source language, ISO 639-3 (repeatable)
    #[arg(long = "language")]
    pub languages: Vec<String>,

    /// Restrict to a source country, FIPS code (repeatable)
    #[arg(long = "country")]
    pub countries: Vec<String>,

    /// Add the financial media domain preset
    #[arg(long)]
    pub financial_media_only: bool,

    /// all, positive, negative, neutral
    #[arg(long, default_value = "all")]
    pub tone: ToneFilter,

    #[arg(long, default_value = "DateDesc")]
    pub sort: String,

    /// Start of an absolute range, YYYYMMDDHHMMSS (requires --end)
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// End of an absolute range, YYYYMMDDHHMMSS (requires --start)
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Relative window used without --start/--end
    #[arg(long, default_value = "7days")]
    pub timespan: String,

    /// Timeline smoothing window
    #[arg(long, default_value_t = 0)]
    pub smooth: u32,

    /// Retries for rate-limited or failing requests
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    #[arg(long, hide = true)]
    pub endpoint: Option<String>,

    /// Extract every returned article instead of printing search results
    #[arg(long)]
    pub extract: bool,

    #[command(flatten)]
    pub extract_flags: ExtractFlags,

    #[command(flatten)]
    pub output: OutputFlags,
}

#[derive(Args, Debug)]
pub struct GoogleNewsCmd {
    /// Search keywords
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Section such as WORLD, BUSINESS, TECHNOLOGY (wins over --location and --query)
    #[arg(long)]
    pub topic: Option<String>,

    /// Place name for local headlines (wins over --query)
    #[arg(long)]
    pub location: Option<String>,

    #[arg(long, default_value = "en-US")]
    pub hl: String,

    #[arg(long, default_value = "US")]
    pub gl: String,

    /// Edition, e.g. US:en (derived from --gl and --hl when unset)
    #[arg(long)]
    pub ceid: Option<String>,

    #[arg(long, default_value_t = 5)]
    pub max_results: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout: u64,

    #[arg(long, hide = true)]
    pub base_url: Option<String>,

    #[command(flatten)]
    pub output: OutputFlags,
}
