// ABOUTME: DOM passes over a parsed scraper document.
// ABOUTME: Noise removal, content-region detection, and paragraph block collection.

//! DOM passes for article extraction.
//!
//! The passes run in order on one [`scraper::Html`] tree:
//! 1. [`noise::remove_noise`] detaches unwanted subtrees in place.
//! 2. [`region::find_content_region`] picks the element holding the article.
//! 3. [`blocks::collect_blocks`] splits that element into paragraph-level text.

pub mod blocks;
pub mod noise;
pub mod region;

/// Total characters of an element's text once surrounding whitespace is trimmed.
pub(crate) fn trimmed_text_len(el: &scraper::ElementRef) -> usize {
    el.text().collect::<String>().trim().chars().count()
}
