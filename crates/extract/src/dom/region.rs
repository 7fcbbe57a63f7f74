// ABOUTME: Content-region detection over an ordered list of selector rules.
// ABOUTME: First rule yielding an element with text wins; falls back to <body>, then the root.

use scraper::{ElementRef, Html};
use tracing::debug;

use super::trimmed_text_len;
use crate::rules::SelectorRule;

/// Where the chosen region came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    /// Matched the rule at this index of the content-region table.
    Rule(usize),
    Body,
    Root,
}

/// The element selected as the article body.
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    pub element: ElementRef<'a>,
    pub source: RegionSource,
}

/// Pick the content region.
///
/// Rules are tried in table order and, within a rule, elements in document
/// order. The first element whose trimmed text is longer than `min_text`
/// characters wins, even if a later rule would match more text. Returns `None`
/// when the fallback has no text either.
pub fn find_content_region<'a>(
    doc: &'a Html,
    rules: &[SelectorRule],
    min_text: usize,
) -> Option<Region<'a>> {
    for (idx, rule) in rules.iter().enumerate() {
        let hit = doc
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| rule.matches(el.value()))
            .find(|el| trimmed_text_len(el) > min_text);

        if let Some(element) = hit {
            debug!(?rule, "content region matched");
            return Some(Region {
                element,
                source: RegionSource::Rule(idx),
            });
        }
    }

    let fallback = match body(doc) {
        Some(element) => Region {
            element,
            source: RegionSource::Body,
        },
        None => Region {
            element: doc.root_element(),
            source: RegionSource::Root,
        },
    };
    debug!(source = ?fallback.source, "no content rule matched, using fallback");

    if trimmed_text_len(&fallback.element) == 0 {
        return None;
    }
    Some(fallback)
}

fn body(doc: &Html) -> Option<ElementRef<'_>> {
    doc.root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "body")
}
