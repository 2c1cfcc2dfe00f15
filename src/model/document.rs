//! Page- and document-level containers.

use serde::{Deserialize, Serialize};

use super::{ImageRecord, Paragraph, TableRecord};

/// Everything extracted from one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page index (0-based)
    pub page_index: usize,
    /// Page height in page-space units
    pub height: f32,
    /// Body paragraphs in top-to-bottom order
    pub texts: Vec<Paragraph>,
    /// Images in discovery order
    pub images: Vec<ImageRecord>,
    /// Tables in discovery order
    pub tables: Vec<TableRecord>,
}

impl PageContent {
    /// Create an empty page result.
    pub fn new(page_index: usize, height: f32) -> Self {
        Self {
            page_index,
            height,
            ..Self::default()
        }
    }

    /// Check if nothing was extracted from the page.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.images.is_empty() && self.tables.is_empty()
    }
}

/// Source document facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// PDF version from the header (e.g., "1.7"), if known
    pub pdf_version: Option<String>,
    /// Total number of pages
    pub page_count: usize,
}

/// The three content streams of a document, each in ascending page order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Source document facts
    pub info: DocumentInfo,
    /// Paragraphs from all pages
    pub texts: Vec<Paragraph>,
    /// Images from all pages
    pub images: Vec<ImageRecord>,
    /// Tables from all pages
    pub tables: Vec<TableRecord>,
}

impl ExtractedDocument {
    /// Create an empty document result.
    pub fn new(info: DocumentInfo) -> Self {
        Self {
            info,
            ..Self::default()
        }
    }

    /// Append a page's records after everything already collected.
    pub fn append_page(&mut self, page: PageContent) {
        self.texts.extend(page.texts);
        self.images.extend(page.images);
        self.tables.extend(page.tables);
    }

    /// Paragraphs found on `page_index`.
    pub fn texts_on_page(&self, page_index: usize) -> impl Iterator<Item = &Paragraph> {
        self.texts.iter().filter(move |p| p.page_index == page_index)
    }

    /// Images found on `page_index`.
    pub fn images_on_page(&self, page_index: usize) -> impl Iterator<Item = &ImageRecord> {
        self.images
            .iter()
            .filter(move |i| i.page_index == page_index)
    }

    /// Tables found on `page_index`.
    pub fn tables_on_page(&self, page_index: usize) -> impl Iterator<Item = &TableRecord> {
        self.tables
            .iter()
            .filter(move |t| t.page_index == page_index)
    }

    /// Check if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.images.is_empty() && self.tables.is_empty()
    }

    /// Paragraph text of the whole document, one paragraph per line.
    pub fn plain_text(&self) -> String {
        self.texts
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn page(page_index: usize, texts: &[&str]) -> PageContent {
        let mut content = PageContent::new(page_index, 792.0);
        content.texts = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Paragraph::new(BoundingBox::default(), *t, i, page_index))
            .collect();
        content.images = vec![ImageRecord::new(
            0,
            page_index,
            BoundingBox::default(),
            content.texts.first(),
        )];
        content
    }

    #[test]
    fn test_append_preserves_page_order() {
        let mut doc = ExtractedDocument::default();
        doc.append_page(page(0, &["a", "b"]));
        doc.append_page(page(1, &["c"]));

        let pages: Vec<usize> = doc.texts.iter().map(|p| p.page_index).collect();
        assert_eq!(pages, vec![0, 0, 1]);
        assert_eq!(doc.images.len(), 2);
        assert_eq!(doc.texts_on_page(1).count(), 1);
        assert_eq!(doc.images_on_page(0).count(), 1);
        assert_eq!(doc.tables_on_page(0).count(), 0);
        assert_eq!(doc.plain_text(), "a\nb\nc");
    }

    #[test]
    fn test_empty_page() {
        let content = PageContent::new(2, 100.0);
        assert!(content.is_empty());
        assert!(ExtractedDocument::default().is_empty());
    }
}
