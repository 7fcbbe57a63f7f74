// ABOUTME: News discovery sources feeding article URLs to the extractor.
// ABOUTME: Provides the GDELT DOC 2.0 client and the Google News RSS client.

pub mod error;
pub mod gdelt;
pub mod google_news;
pub mod html_utils;
pub mod models;

pub use error::SourceError;
pub use gdelt::{GdeltClient, GdeltQuery, Mode, ToneFilter, FINANCIAL_DOMAINS};
pub use google_news::{GoogleNewsClient, GoogleNewsQuery};
pub use html_utils::strip_html;
pub use models::{GdeltArticle, GdeltResults, NewsItem, TimelinePoint};
