// ABOUTME: Text normalization and truncation for extracted paragraph blocks.
// ABOUTME: Collapses whitespace, drops boilerplate and short blocks, and cuts at word boundaries.

//! Paragraph normalization and truncation.
//!
//! Key behaviors:
//! - Whitespace runs (including newlines) collapse to one space per block.
//! - Blocks containing a boilerplate phrase are dropped (case-insensitive).
//! - With short-paragraph removal on, blocks under the character threshold and
//!   blocks opening with a chrome prefix are dropped.
//! - Surviving blocks keep their relative order.
//! - Lengths are counted in characters, never bytes.

use aho_corasick::AhoCorasick;

use crate::options::ExtractOptions;
use crate::rules::Boilerplate;

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Filters raw blocks down to article prose.
pub struct TextNormalizer<'a> {
    pub phrases: &'a AhoCorasick,
    pub boilerplate: &'a Boilerplate,
    pub options: &'a ExtractOptions,
}

impl TextNormalizer<'_> {
    /// Normalize and filter blocks, preserving order.
    pub fn normalize<I>(&self, blocks: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        blocks
            .into_iter()
            .map(|b| collapse_whitespace(&b))
            .filter(|b| !b.is_empty())
            .filter(|b| !self.phrases.is_match(b.as_str()))
            .filter(|b| !self.options.remove_short_paragraphs || self.is_prose(b))
            .collect()
    }

    fn is_prose(&self, block: &str) -> bool {
        block.chars().count() >= self.options.min_paragraph_chars
            && !self.boilerplate.has_chrome_prefix(block)
    }
}

/// Cut `text` to at most `max_chars` characters.
///
/// When a cut is needed it prefers the last whitespace within `lookback`
/// characters before the limit, so the result does not end mid-word; with no
/// whitespace in that window it hard-cuts at the limit. Trailing whitespace of
/// the kept prefix is removed.
pub fn truncate_at_boundary(text: &str, max_chars: usize, lookback: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut = byte_offset(text, max_chars);
    if text[cut..].starts_with(char::is_whitespace) {
        return text[..cut].trim_end().to_string();
    }

    let window_start = byte_offset(text, max_chars.saturating_sub(lookback));
    if let Some(pos) = text[window_start..cut].rfind(char::is_whitespace) {
        let kept = text[..window_start + pos].trim_end();
        if !kept.is_empty() {
            return kept.to_string();
        }
    }

    text[..cut].to_string()
}

/// Byte offset of the character at index `n`, or the length if `n` is past the end.
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn normalize(blocks: &[&str], options: &ExtractOptions) -> Vec<String> {
        let boilerplate = Boilerplate::default();
        let phrases = boilerplate.phrase_matcher().unwrap();
        let normalizer = TextNormalizer {
            phrases: &phrases,
            boilerplate: &boilerplate,
            options,
        };
        normalizer.normalize(blocks.iter().map(|b| b.to_string()))
    }

    fn long(prefix: &str) -> String {
        format!("{} {}", prefix, "word ".repeat(12).trim_end())
    }

    #[test]
    fn collapses_whitespace_inside_blocks() {
        assert_eq!(collapse_whitespace("  a \n\n b\t c "), "a b c");
    }

    #[test]
    fn drops_boilerplate_blocks_regardless_of_length() {
        let options = ExtractOptions {
            remove_short_paragraphs: false,
            ..ExtractOptions::default()
        };
        let kept = normalize(
            &["Skip Navigation", "Real sentence here.", "Please Subscribe now"],
            &options,
        );
        assert_eq!(kept, vec!["Real sentence here."]);
    }

    #[test]
    fn short_blocks_dropped_only_when_enabled() {
        let x50 = "x".repeat(50);
        let y49 = "y".repeat(49);
        let blocks = ["short", x50.as_str(), y49.as_str()];

        let on = normalize(&blocks, &ExtractOptions::default());
        assert_eq!(on, vec![x50.clone()]);

        let off = normalize(
            &blocks,
            &ExtractOptions {
                remove_short_paragraphs: false,
                ..ExtractOptions::default()
            },
        );
        assert_eq!(off.len(), 3);
    }

    #[test]
    fn chrome_prefixes_dropped_with_short_paragraph_filter() {
        let copyright = long("Copyright 2024 Example Media Group.");
        let click = long("Click here to continue reading this piece.");
        let prose = long("Shares of the chipmaker rose in early trading.");
        let kept = normalize(
            &[copyright.as_str(), click.as_str(), prose.as_str()],
            &ExtractOptions::default(),
        );
        assert_eq!(kept, vec![prose]);
    }

    #[test]
    fn preserves_order() {
        let a = long("Alpha paragraph opens the story.");
        let b = long("Bravo paragraph continues it.");
        let c = long("Charlie paragraph ends it.");
        let kept = normalize(&[a.as_str(), b.as_str(), c.as_str()], &ExtractOptions::default());
        assert_eq!(kept, vec![a, b, c]);
    }

    #[test]
    fn threshold_counts_characters_not_bytes() {
        let block = "é".repeat(50);
        let kept = normalize(&[block.as_str()], &ExtractOptions::default());
        assert_eq!(kept, vec![block]);
    }

    #[test]
    fn truncate_noop_when_within_limit() {
        assert_eq!(truncate_at_boundary("hello world", 11, 50), "hello world");
    }

    #[test]
    fn truncate_backs_up_to_whitespace() {
        let out = truncate_at_boundary("alpha bravo charlie", 14, 50);
        assert_eq!(out, "alpha bravo");
    }

    #[test]
    fn truncate_keeps_word_ending_exactly_at_limit() {
        let out = truncate_at_boundary("alpha bravo charlie", 11, 50);
        assert_eq!(out, "alpha bravo");
    }

    #[test]
    fn truncate_hard_cuts_without_boundary_in_window() {
        let text = format!("{} tail", "a".repeat(100));
        let out = truncate_at_boundary(&text, 80, 50);
        assert_eq!(out, "a".repeat(80));
    }

    #[test]
    fn truncate_respects_multibyte_characters() {
        let out = truncate_at_boundary("ééé ééé", 5, 50);
        assert_eq!(out, "ééé");
        assert!(out.chars().count() <= 5);
    }

    #[test]
    fn truncate_never_ends_mid_word_for_spaced_words() {
        let words = "lorem ipsum dolor sit amet ".repeat(40);
        let text = words.trim_end();
        for limit in [37, 100, 333, 512] {
            let out = truncate_at_boundary(text, limit, 50);
            assert!(out.chars().count() <= limit);
            let next = text[out.len()..].chars().next();
            assert_eq!(next, Some(' '), "cut mid-word at limit {}", limit);
        }
    }
}
