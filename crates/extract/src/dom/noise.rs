// ABOUTME: Destructive removal of navigation, ads, social widgets, scripts and styles.
// ABOUTME: Matching subtrees are detached from the scraper tree in place.

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::rules::RuleSet;

/// Detach every element matching an unwanted rule.
///
/// Removal is unconditional except for `<html>` and `<body>`, which stay so the
/// region detector always has a fallback. Descendants of a removed element go
/// with it; no matches is a no-op.
pub fn remove_noise(doc: &mut Html, rules: &RuleSet) {
    let doomed: Vec<NodeId> = doc
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| !is_document_frame(el) && rules.is_unwanted(el.value()))
        .map(|el| el.id())
        .collect();

    if doomed.is_empty() {
        return;
    }
    debug!(removed = doomed.len(), "removing noise elements");

    for id in doomed {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn is_document_frame(el: &ElementRef) -> bool {
    matches!(el.value().name(), "html" | "body")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::SelectorRule;

    fn body_text(doc: &Html) -> String {
        doc.root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn removes_tags_and_class_fragments() {
        let mut doc = Html::parse_document(
            r#"<html><body>
                <nav>Home | World</nav>
                <div class="social-share">Tweet</div>
                <script>var x = 1;</script>
                <p>Story text</p>
                <footer>Contact us</footer>
            </body></html>"#,
        );
        remove_noise(&mut doc, &RuleSet::default());
        assert_eq!(body_text(&doc), "Story text");
    }

    #[test]
    fn keeps_body_even_when_its_class_matches() {
        let mut doc =
            Html::parse_document(r#"<html><body class="ad-free"><p>Story text</p></body></html>"#);
        remove_noise(&mut doc, &RuleSet::default());
        assert_eq!(body_text(&doc), "Story text");
    }

    #[test]
    fn nested_matches_are_removed_once() {
        let mut doc = Html::parse_document(
            r#"<html><body><div class="sidebar"><div class="ad">Buy</div></div><p>Kept</p></body></html>"#,
        );
        remove_noise(&mut doc, &RuleSet::default());
        assert_eq!(body_text(&doc), "Kept");
    }

    #[test]
    fn alternate_table_only_removes_its_own_rules() {
        const ONLY_ASIDE: &[SelectorRule] = &[SelectorRule::Tag("aside")];
        let rules = RuleSet {
            unwanted: ONLY_ASIDE,
            ..RuleSet::default()
        };
        let mut doc = Html::parse_document(
            "<html><body><nav>Menu</nav><aside>Promo</aside><p>Body</p></body></html>",
        );
        remove_noise(&mut doc, &rules);
        assert_eq!(body_text(&doc), "Menu Body");
    }
}
