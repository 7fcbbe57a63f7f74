// ABOUTME: CLI binary for newsdesk: news discovery plus article text extraction.
// ABOUTME: Prints JSON or TSV rows and exits 1 when any extraction row failed.

mod args;
mod output;

use std::fs;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use newsdesk_extract::{count_successful, ExtractionResult};
use newsdesk_sources::{GdeltClient, GdeltQuery, GoogleNewsClient, GoogleNewsQuery};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Command, ExtractCmd, ExtractFlags, GdeltCmd, GoogleNewsCmd, OutputFlags};
use crate::output::{emit, render_json, render_rows};

const GDELT_BACKOFF: Duration = Duration::from_millis(1200);

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Extract(cmd) => run_extract(cmd).await,
        Command::Gdelt(cmd) => run_gdelt(cmd).await,
        Command::GoogleNews(cmd) => run_google_news(cmd).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

/// Write rows and report whether every one succeeded.
fn finish_rows(rows: &[ExtractionResult], out: &OutputFlags) -> Result<bool> {
    emit(&render_rows(rows, out)?, out)?;
    Ok(count_successful(rows) == rows.len())
}

async fn extract_urls(urls: &[String], flags: &ExtractFlags, out: &OutputFlags) -> Result<bool> {
    let client = flags.build_client()?;
    let rows = client.extract_batch(urls).await;
    finish_rows(&rows, out)
}

async fn run_extract(cmd: ExtractCmd) -> Result<bool> {
    if let Some(path) = &cmd.html {
        let Some(url) = cmd.url.as_deref() else {
            bail!("--url is required when using --html");
        };
        let html = fs::read_to_string(path)
            .with_context(|| format!("reading HTML file {}", path.display()))?;
        let client = cmd.extract.build_client()?;
        let row = client.extract_html(url, &html);
        return finish_rows(&[row], &cmd.output);
    }

    if cmd.urls.is_empty() {
        bail!("at least one URL is required, or use --html with --url");
    }
    extract_urls(&cmd.urls, &cmd.extract, &cmd.output).await
}

async fn run_gdelt(cmd: GdeltCmd) -> Result<bool> {
    let mut client = GdeltClient::new(cmd.extract_flags.timeout())
        .context("building GDELT client")?
        .retries(cmd.retries, GDELT_BACKOFF);
    if let Some(endpoint) = &cmd.endpoint {
        client = client.endpoint(endpoint);
    }

    let query = GdeltQuery {
        query: cmd.query,
        mode: cmd.mode,
        max_records: cmd.max_records,
        domains: cmd.domains,
        languages: cmd.languages,
        countries: cmd.countries,
        financial_media_only: cmd.financial_media_only,
        tone_filter: cmd.tone,
        sort: cmd.sort,
        start_datetime: cmd.start,
        end_datetime: cmd.end,
        timespan: cmd.timespan,
        timeline_smooth: cmd.smooth,
    };
    let results = client.search(&query).await.context("GDELT search failed")?;
    info!(mode = %query.mode, results = results.len(), "gdelt search complete");

    if cmd.extract {
        return extract_urls(&results.article_urls(), &cmd.extract_flags, &cmd.output).await;
    }
    emit(&render_json(&results, cmd.output.compact)?, &cmd.output)?;
    Ok(true)
}

async fn run_google_news(cmd: GoogleNewsCmd) -> Result<bool> {
    let mut client = GoogleNewsClient::new(Duration::from_secs(cmd.timeout))
        .context("building Google News client")?;
    if let Some(base) = &cmd.base_url {
        client = client.base_url(base)?;
    }

    let query = GoogleNewsQuery {
        query: cmd.query,
        topic: cmd.topic,
        location: cmd.location,
        hl: cmd.hl,
        gl: cmd.gl,
        ceid: cmd.ceid,
        max_results: cmd.max_results,
    };
    let items = client
        .search(&query)
        .await
        .context("Google News lookup failed")?;
    info!(items = items.len(), "google news lookup complete");

    emit(&render_json(&items, cmd.output.compact)?, &cmd.output)?;
    Ok(true)
}
