//! Body-text paragraphs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// A paragraph of body text that survived header/footer filtering.
///
/// `paragraph_index` is the paragraph's position in top-to-bottom order on its
/// page, starting at 0. The text is whitespace-normalized and shared with any
/// image or table record it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Block position on the page
    pub bbox: BoundingBox,
    /// Normalized text
    pub text: Arc<str>,
    /// Position in sorted order on the page (0-based)
    pub paragraph_index: usize,
    /// Page the paragraph was found on (0-based)
    pub page_index: usize,
}

impl Paragraph {
    /// Create a paragraph.
    pub fn new(
        bbox: BoundingBox,
        text: impl Into<Arc<str>>,
        paragraph_index: usize,
        page_index: usize,
    ) -> Self {
        Self {
            bbox,
            text: text.into(),
            paragraph_index,
            page_index,
        }
    }

    pub fn top(&self) -> f32 {
        self.bbox.top
    }

    pub fn bottom(&self) -> f32 {
        self.bbox.bottom
    }

    /// The paragraph text.
    pub fn text(&self) -> &str {
        &self.text
    }
}
