//! Image and table records.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{BoundingBox, Paragraph};

/// Description used when a page has images or tables but no body text.
pub const NO_DESCRIPTION: &str = "no description available";

/// Rows of cell strings, exactly as the table extractor produced them.
pub type TableGrid = Vec<Vec<String>>;

/// An image on a page, described by the paragraph immediately above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Text of the describing paragraph
    pub description: Arc<str>,
    /// Discovery order on the page (0-based, not spatial)
    pub image_index: usize,
    /// Page the image was found on (0-based)
    pub page_index: usize,
    /// Index of the describing paragraph, `None` if the page has no body text
    pub paragraph_index: Option<usize>,
    /// Placement on the page
    pub bbox: BoundingBox,
}

impl ImageRecord {
    /// Create an image record described by `paragraph` (or by the sentinel).
    pub fn new(
        image_index: usize,
        page_index: usize,
        bbox: BoundingBox,
        paragraph: Option<&Paragraph>,
    ) -> Self {
        let (description, paragraph_index) = describe(paragraph);
        Self {
            description,
            image_index,
            page_index,
            paragraph_index,
            bbox,
        }
    }

    /// Whether a real paragraph describes this image.
    pub fn has_description(&self) -> bool {
        self.paragraph_index.is_some()
    }
}

/// A table on a page with its raw cell grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Extracted cell grid
    pub content: TableGrid,
    /// Text of the describing paragraph
    pub description: Arc<str>,
    /// Discovery order on the page (0-based, not spatial)
    pub table_index: usize,
    /// Page the table was found on (0-based)
    pub page_index: usize,
    /// Index of the describing paragraph, `None` if the page has no body text
    pub paragraph_index: Option<usize>,
    /// Placement on the page
    pub bbox: BoundingBox,
}

impl TableRecord {
    /// Create a table record described by `paragraph` (or by the sentinel).
    pub fn new(
        content: TableGrid,
        table_index: usize,
        page_index: usize,
        bbox: BoundingBox,
        paragraph: Option<&Paragraph>,
    ) -> Self {
        let (description, paragraph_index) = describe(paragraph);
        Self {
            content,
            description,
            table_index,
            page_index,
            paragraph_index,
            bbox,
        }
    }

    /// Whether a real paragraph describes this table.
    pub fn has_description(&self) -> bool {
        self.paragraph_index.is_some()
    }

    pub fn row_count(&self) -> usize {
        self.content.len()
    }

    pub fn column_count(&self) -> usize {
        self.content.iter().map(Vec::len).max().unwrap_or(0)
    }
}

fn describe(paragraph: Option<&Paragraph>) -> (Arc<str>, Option<usize>) {
    match paragraph {
        Some(p) => (Arc::clone(&p.text), Some(p.paragraph_index)),
        None => (Arc::from(NO_DESCRIPTION), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_shares_paragraph_text() {
        let para = Paragraph::new(BoundingBox::default(), "Figure 1 shows the loop", 3, 0);
        let image = ImageRecord::new(0, 0, BoundingBox::default(), Some(&para));

        assert!(Arc::ptr_eq(&image.description, &para.text));
        assert_eq!(image.paragraph_index, Some(3));
        assert!(image.has_description());
    }

    #[test]
    fn test_sentinel_without_paragraph() {
        let table = TableRecord::new(
            vec![vec!["a".into(), "b".into()], vec!["c".into()]],
            0,
            4,
            BoundingBox::default(),
            None,
        );

        assert_eq!(&*table.description, NO_DESCRIPTION);
        assert!(!table.has_description());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
    }
}
