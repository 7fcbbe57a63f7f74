// ABOUTME: Best-effort title and description extraction from a parsed document.
// ABOUTME: Missing metadata yields None and never fails an extraction.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::text::collapse_whitespace;

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static META_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[name='description']").unwrap());
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[property='og:description']").unwrap());

/// Page-level metadata pulled alongside the article body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Metadata {
    /// Extract title and description.
    ///
    /// Must run before noise removal, since the fallback heading often sits in
    /// a `<header>`.
    pub fn from_document(doc: &Html) -> Self {
        Self {
            title: extract_title(doc),
            description: extract_description(doc),
        }
    }
}

/// First non-empty `<title>`, else first non-empty `<h1>`.
pub fn extract_title(doc: &Html) -> Option<String> {
    [&*TITLE, &*H1].into_iter().find_map(|sel| {
        doc.select(sel)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .find(|t| !t.is_empty())
    })
}

/// `content` of `meta[name=description]`, else of `meta[property=og:description]`.
pub fn extract_description(doc: &Html) -> Option<String> {
    [&*META_DESCRIPTION, &*OG_DESCRIPTION]
        .into_iter()
        .find_map(|sel| {
            doc.select(sel)
                .filter_map(|el| el.value().attr("content"))
                .map(str::trim)
                .find(|c| !c.is_empty())
                .map(str::to_string)
        })
}
