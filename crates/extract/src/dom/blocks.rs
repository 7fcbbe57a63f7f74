// ABOUTME: Splits a content region into paragraph-level text blocks.
// ABOUTME: Block-level elements delimit blocks; inline text accumulates into the current one.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// Elements that start and end a text block.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "details", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "ul",
];

/// Elements whose text never reaches the output, even under a custom rule set.
const OPAQUE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Collect raw paragraph-level text blocks from a region, in document order.
///
/// Whitespace inside a block is left as found; blocks that are only whitespace
/// are dropped.
pub fn collect_blocks(region: ElementRef) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    walk(*region, &mut current, &mut blocks);
    flush(&mut current, &mut blocks);
    blocks
}

fn walk(node: NodeRef<Node>, current: &mut String, blocks: &mut Vec<String>) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => current.push_str(&**text),
            Node::Element(el) => {
                let name = el.name();
                if OPAQUE_TAGS.contains(&name) {
                    continue;
                }
                let is_block = BLOCK_TAGS.contains(&name);
                if is_block {
                    flush(current, blocks);
                }
                walk(child, current, blocks);
                if is_block {
                    flush(current, blocks);
                }
            }
            _ => {}
        }
    }
}

fn flush(current: &mut String, blocks: &mut Vec<String>) {
    if !current.trim().is_empty() {
        blocks.push(std::mem::take(current));
    } else {
        current.clear();
    }
}
