//! Body-text filtering.
//!
//! Turns a page's raw text blocks into numbered paragraphs: blank blocks and
//! blocks lying entirely in the header or footer band are dropped, whitespace
//! is collapsed, and the survivors are ordered top to bottom.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::Paragraph;
use crate::parser::RawBlock;

use super::options::DEFAULT_MARGIN_RATIO;

/// Unicode whitespace plus the ASCII separators U+001C..U+001F.
fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\x1C-\x1F]+").expect("valid whitespace pattern"))
}

/// Collapse every run of whitespace (tabs, newlines and the ASCII
/// separators U+001C..U+001F included) into a single space. Leading and
/// trailing whitespace is collapsed, not trimmed.
pub fn normalize_whitespace(text: &str) -> String {
    whitespace_run().replace_all(text, " ").into_owned()
}

/// Selects body paragraphs from raw text blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageContentFilter {
    margin_ratio: f32,
}

impl Default for PageContentFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN_RATIO)
    }
}

impl PageContentFilter {
    /// Create a filter with the given header/footer band ratio.
    pub fn new(margin_ratio: f32) -> Self {
        Self { margin_ratio }
    }

    /// Whether a block overlaps the body band of a page of `height`.
    ///
    /// A block straddling either band edge is kept.
    pub fn in_body_band(&self, block: &RawBlock, height: f32) -> bool {
        let margin = height * self.margin_ratio;
        block.bbox.bottom > margin && block.bbox.top < height - margin
    }

    /// Filter, normalize, sort and number the blocks of one page.
    ///
    /// The blocks are consumed; ties in `top` keep discovery order.
    pub fn filter(&self, blocks: Vec<RawBlock>, height: f32, page_index: usize) -> Vec<Paragraph> {
        let total = blocks.len();
        let mut kept: Vec<(RawBlock, String)> = blocks
            .into_iter()
            .filter_map(|block| {
                let text = normalize_whitespace(&block.text);
                if text.trim_matches(' ').is_empty() || !self.in_body_band(&block, height) {
                    return None;
                }
                Some((block, text))
            })
            .collect();

        kept.sort_by(|(a, _), (b, _)| a.bbox.top.total_cmp(&b.bbox.top));

        log::debug!(
            "Page {}: kept {} of {} text blocks",
            page_index,
            kept.len(),
            total
        );

        kept.into_iter()
            .enumerate()
            .map(|(i, (block, text))| Paragraph::new(block.bbox, text, i, page_index))
            .collect()
    }
}
