// ABOUTME: HTML helpers for feed item titles and summaries.
// ABOUTME: Strips markup with scraper, decoding entities and collapsing whitespace.

use scraper::Html;

/// Plain text of an HTML fragment, text runs joined by single spaces.
pub fn strip_html(s: &str) -> String {
    if s.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(s);
    fragment
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
