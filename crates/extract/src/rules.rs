// ABOUTME: Static selector tables driving noise removal and content-region detection.
// ABOUTME: Rules are evaluated as an ordered strategy list; the first matching rule wins.

//! Selector rules for article extraction.
//!
//! Two ordered tables drive the DOM passes:
//! - [`UNWANTED`]: every element matching any rule is detached from the tree.
//! - [`CONTENT_REGION`]: tried in priority order; the first rule that yields an
//!   element with text wins, regardless of how long a later match would be.
//!
//! The tables are plain constants bundled into a [`RuleSet`] that an
//! [`Extractor`](crate::Extractor) receives at construction, so site-specific
//! tables can be swapped in without touching the extraction passes.

use aho_corasick::{AhoCorasick, BuildError};
use scraper::node::Element;

/// A single structural match rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorRule {
    /// Element name, ASCII case-insensitive (`article`, `nav`).
    Tag(&'static str),
    /// Exact class token (`.article-body`).
    Class(&'static str),
    /// Class token containing the pattern as a `-`/`_` delimited segment.
    ///
    /// `ad` matches `ad`, `ad-slot` and `top_ad`, but not `header` or `read-more`.
    ClassFragment(&'static str),
    /// Attribute with an exact value (`[itemprop="articleBody"]`).
    Attribute(&'static str, &'static str),
}

impl SelectorRule {
    /// Returns true if the element satisfies this rule.
    pub fn matches(&self, el: &Element) -> bool {
        match *self {
            SelectorRule::Tag(name) => el.name().eq_ignore_ascii_case(name),
            SelectorRule::Class(class) => el.classes().any(|c| c == class),
            SelectorRule::ClassFragment(fragment) => {
                el.classes().any(|c| class_has_fragment(c, fragment))
            }
            SelectorRule::Attribute(name, value) => el.attr(name) == Some(value),
        }
    }
}

fn class_has_fragment(class: &str, fragment: &str) -> bool {
    class
        .split(|c| c == '-' || c == '_')
        .any(|segment| segment.eq_ignore_ascii_case(fragment))
}

/// Elements removed before region detection.
pub const UNWANTED: &[SelectorRule] = &[
    SelectorRule::Tag("nav"),
    SelectorRule::Tag("header"),
    SelectorRule::Tag("footer"),
    SelectorRule::Tag("aside"),
    SelectorRule::Tag("script"),
    SelectorRule::Tag("style"),
    SelectorRule::Tag("noscript"),
    SelectorRule::ClassFragment("nav"),
    SelectorRule::ClassFragment("navigation"),
    SelectorRule::ClassFragment("menu"),
    SelectorRule::ClassFragment("ad"),
    SelectorRule::ClassFragment("ads"),
    SelectorRule::ClassFragment("advert"),
    SelectorRule::ClassFragment("advertisement"),
    SelectorRule::ClassFragment("social"),
    SelectorRule::ClassFragment("share"),
    SelectorRule::ClassFragment("sharing"),
    SelectorRule::ClassFragment("sidebar"),
    SelectorRule::ClassFragment("related"),
    SelectorRule::ClassFragment("recommended"),
    SelectorRule::ClassFragment("comment"),
    SelectorRule::ClassFragment("comments"),
    SelectorRule::ClassFragment("subscribe"),
    SelectorRule::ClassFragment("newsletter"),
    SelectorRule::ClassFragment("breadcrumb"),
    SelectorRule::ClassFragment("breadcrumbs"),
    SelectorRule::ClassFragment("cookie"),
    SelectorRule::ClassFragment("privacy"),
    SelectorRule::ClassFragment("popup"),
    SelectorRule::ClassFragment("modal"),
];

/// Content-region candidates in priority order: semantic tag, site conventions,
/// generic containers, then schema/attribute markers.
pub const CONTENT_REGION: &[SelectorRule] = &[
    SelectorRule::Tag("article"),
    SelectorRule::Class("article-body"),
    SelectorRule::Class("article-content"),
    SelectorRule::Class("story-body"),
    SelectorRule::Class("story-content"),
    SelectorRule::Class("post-content"),
    SelectorRule::Class("post-body"),
    SelectorRule::Class("content"),
    SelectorRule::Class("main-content"),
    SelectorRule::Attribute("data-module", "ArticleBody"),
    SelectorRule::Class("ArticleBody-articleBody"),
    SelectorRule::Attribute("itemprop", "articleBody"),
    SelectorRule::Class("entry-content"),
    SelectorRule::Class("news-content"),
    SelectorRule::Class("news-body"),
];

/// Phrases marking a text block as page chrome (case-insensitive substring).
pub const BOILERPLATE_PHRASES: &[&str] = &[
    "skip navigation",
    "subscribe",
    "sign up",
    "share this article",
    "advertisement",
    "follow us",
    "cookie policy",
    "privacy policy",
];

/// Block prefixes treated as chrome when short paragraphs are being removed.
pub const CHROME_PREFIXES: &[&str] = &["Copyright", "©", "Terms", "Privacy", "Contact"];

/// Like [`CHROME_PREFIXES`] but compared against the lowercased block.
pub const CHROME_PREFIXES_LOWER: &[&str] = &["click", "tap", "swipe", "scroll"];

/// The selector tables an extractor runs with.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    pub unwanted: &'static [SelectorRule],
    pub content_region: &'static [SelectorRule],
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            unwanted: UNWANTED,
            content_region: CONTENT_REGION,
        }
    }
}

impl RuleSet {
    /// Returns true if any unwanted rule matches the element.
    pub fn is_unwanted(&self, el: &Element) -> bool {
        self.unwanted.iter().any(|rule| rule.matches(el))
    }
}

/// Text-level denylists applied by the normalizer.
#[derive(Debug, Clone, Copy)]
pub struct Boilerplate {
    pub phrases: &'static [&'static str],
    pub prefixes: &'static [&'static str],
    pub prefixes_lower: &'static [&'static str],
}

impl Default for Boilerplate {
    fn default() -> Self {
        Self {
            phrases: BOILERPLATE_PHRASES,
            prefixes: CHROME_PREFIXES,
            prefixes_lower: CHROME_PREFIXES_LOWER,
        }
    }
}

impl Boilerplate {
    /// Build a case-insensitive multi-pattern matcher over the phrase list.
    pub fn phrase_matcher(&self) -> Result<AhoCorasick, BuildError> {
        AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(self.phrases)
    }

    /// Returns true if the block opens with a chrome prefix.
    pub fn has_chrome_prefix(&self, block: &str) -> bool {
        if self.prefixes.iter().any(|p| block.starts_with(p)) {
            return true;
        }
        let lower = block.to_lowercase();
        self.prefixes_lower.iter().any(|p| lower.starts_with(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{ElementRef, Html};

    fn first_element(html: &str, tag: &str) -> Element {
        let doc = Html::parse_fragment(html);
        let el = doc
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == tag)
            .expect("element present");
        el.value().clone()
    }

    #[test]
    fn tag_rule_is_case_insensitive() {
        let el = first_element("<NAV>menu</NAV>", "nav");
        assert!(SelectorRule::Tag("nav").matches(&el));
        assert!(!SelectorRule::Tag("header").matches(&el));
    }

    #[test]
    fn class_rule_requires_exact_token() {
        let el = first_element(r#"<div class="story content-wrap">x</div>"#, "div");
        assert!(!SelectorRule::Class("content").matches(&el));
        assert!(SelectorRule::Class("story").matches(&el));
    }

    #[test]
    fn class_fragment_matches_delimited_segments_only() {
        let ad = first_element(r#"<div class="top_ad-slot">x</div>"#, "div");
        assert!(SelectorRule::ClassFragment("ad").matches(&ad));

        let header = first_element(r#"<div class="header read-more">x</div>"#, "div");
        assert!(!SelectorRule::ClassFragment("ad").matches(&header));
    }

    #[test]
    fn attribute_rule_compares_value() {
        let el = first_element(r#"<div itemprop="articleBody">x</div>"#, "div");
        assert!(SelectorRule::Attribute("itemprop", "articleBody").matches(&el));
        assert!(!SelectorRule::Attribute("itemprop", "headline").matches(&el));
        assert!(!SelectorRule::Attribute("data-module", "ArticleBody").matches(&el));
    }

    #[test]
    fn content_region_starts_with_article_tag() {
        assert_eq!(CONTENT_REGION[0], SelectorRule::Tag("article"));
    }

    #[test]
    fn boilerplate_matcher_ignores_case() {
        let matcher = Boilerplate::default().phrase_matcher().unwrap();
        assert!(matcher.is_match("Please SUBSCRIBE to our list"));
        assert!(!matcher.is_match("Markets rallied on Tuesday"));
    }

    #[test]
    fn chrome_prefixes() {
        let bp = Boilerplate::default();
        assert!(bp.has_chrome_prefix("Copyright 2024 Example Media"));
        assert!(bp.has_chrome_prefix("Click here to read more"));
        assert!(!bp.has_chrome_prefix("copyright law changed this week"));
    }
}
