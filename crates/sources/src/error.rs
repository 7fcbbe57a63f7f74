// ABOUTME: Error types for news source lookups.
// ABOUTME: Provides SourceError with Http, Status, Parse, and Invalid variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while querying a news source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not in the expected format.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The query itself is unusable.
    #[error("invalid query: {0}")]
    Invalid(String),
}

impl SourceError {
    pub fn parse(err: impl fmt::Display) -> Self {
        SourceError::Parse(err.to_string())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        SourceError::Invalid(msg.into())
    }

    /// Status error keeping at most the first 200 characters of the body.
    pub fn status(status: u16, body: &str) -> Self {
        SourceError::Status {
            status,
            body: body.chars().take(200).collect(),
        }
    }

    /// Returns true for statuses worth retrying (429 and 5xx gateway errors).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SourceError::Status {
                status: 429 | 500 | 502 | 503 | 504,
                ..
            }
        )
    }
}
