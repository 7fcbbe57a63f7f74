// ABOUTME: Error types for article extraction including ErrorCode enum and ExtractError struct.
// ABOUTME: Every failure is scoped to one URL and ends up in a failed ExtractionResult row.

use std::fmt;

/// Error codes representing the categories of per-URL extraction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    UnsupportedUrl,
    Fetch,
    Timeout,
    Ssrf,
    NoContentFound,
    EmptyAfterFiltering,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::UnsupportedUrl => "unsupported URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Ssrf => "SSRF blocked",
            ErrorCode::NoContentFound => "no content found",
            ErrorCode::EmptyAfterFiltering => "empty after filtering",
        };
        write!(f, "{}", s)
    }
}

/// The error type for fetch and extraction operations.
#[derive(Debug, thiserror::Error)]
pub struct ExtractError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "newsdesk: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ExtractError {
    fn with_code(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create an UnsupportedUrl error (feed URLs and similar non-article pages).
    pub fn unsupported_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::UnsupportedUrl, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Timeout, url, op, source)
    }

    /// Create an SSRF error.
    pub fn ssrf(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Ssrf, url, op, source)
    }

    /// Create a NoContentFound error.
    pub fn no_content(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::NoContentFound, url, op, source)
    }

    /// Create an EmptyAfterFiltering error.
    pub fn empty_after_filtering(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::EmptyAfterFiltering, url, op, source)
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is an SSRF error.
    pub fn is_ssrf(&self) -> bool {
        self.code == ErrorCode::Ssrf
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is an UnsupportedUrl error.
    pub fn is_unsupported_url(&self) -> bool {
        self.code == ErrorCode::UnsupportedUrl
    }

    /// Returns true if extraction itself failed (no region text or nothing left after filtering).
    pub fn is_extract(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::NoContentFound | ErrorCode::EmptyAfterFiltering
        )
    }

    /// Human-readable message stored in a failed result row.
    ///
    /// Drops the `newsdesk: op url:` prefix since the row already carries the URL.
    /// Unsupported URLs carry their fixed rejection message alone.
    pub fn row_message(&self) -> String {
        match (&self.source, self.code) {
            (Some(src), ErrorCode::UnsupportedUrl) => src.to_string(),
            (Some(src), code) => format!("{}: {}", code, src),
            (None, code) => code.to_string(),
        }
    }
}

/// Errors raised while constructing an [`Extractor`](crate::Extractor) or
/// [`Client`](crate::Client).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to build boilerplate matcher: {0}")]
    Matcher(#[from] aho_corasick::BuildError),
}
