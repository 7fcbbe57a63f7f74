// ABOUTME: Library entry point for the newsdesk article content extractor.
// ABOUTME: Re-exports Client, Extractor, ExtractionResult, ExtractError, and the option types.

//! Newsdesk extract - pulls the readable body text out of news article pages.
//!
//! The pure [`Extractor`] turns `(url, html, options)` into one
//! [`ExtractionResult`] row. The async [`Client`] fetches pages and runs the
//! extractor over a batch of URLs with bounded concurrency, keeping one row
//! per input in input order.
//!
//! # Example
//!
//! ```no_run
//! use newsdesk_extract::{BuildError, Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BuildError> {
//!     let client = Client::builder().max_content_length(2000).build()?;
//!     let rows = client
//!         .extract_batch(&["https://example.com/markets/story"])
//!         .await;
//!     for row in rows {
//!         println!("{} {} {}", row.url, row.success, row.content_length);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod metadata;
pub mod options;
pub mod resource;
pub mod result;
pub mod rules;
pub mod text;
pub mod urls;

pub use crate::client::Client;
pub use crate::error::{BuildError, ErrorCode, ExtractError};
pub use crate::extractor::{ExtractionRequest, Extractor};
pub use crate::options::{ClientBuilder, ExtractOptions, Options, DEFAULT_USER_AGENT};
pub use crate::result::{count_successful, tsv_header, ExtractionResult, COLUMNS};
pub use crate::rules::{Boilerplate, RuleSet, SelectorRule};
pub use crate::urls::{is_feed_url, RSS_REJECTED};
