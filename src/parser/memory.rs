//! In-memory backend.
//!
//! Useful when page structures come from another parser, or when a test
//! needs exact coordinates.

use crate::error::{Error, Result};

use super::backend::{PdfBackend, RawBlock, RawImage, RawPage, RawTable};

/// A page whose raw structures are already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    pub height: f32,
    pub blocks: Vec<RawBlock>,
    pub images: Vec<RawImage>,
    pub tables: Vec<RawTable>,
}

impl MemoryPage {
    /// Create an empty page of the given height.
    pub fn new(height: f32) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    /// Add a text block.
    pub fn with_block(mut self, block: RawBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Add an image placement.
    pub fn with_image(mut self, image: RawImage) -> Self {
        self.images.push(image);
        self
    }

    /// Add a table.
    pub fn with_table(mut self, table: RawTable) -> Self {
        self.tables.push(table);
        self
    }
}

impl RawPage for MemoryPage {
    fn height(&self) -> f32 {
        self.height
    }

    fn text_blocks(&mut self) -> Vec<RawBlock> {
        std::mem::take(&mut self.blocks)
    }

    fn images(&mut self) -> Vec<RawImage> {
        std::mem::take(&mut self.images)
    }

    fn tables(&mut self) -> Vec<RawTable> {
        std::mem::take(&mut self.tables)
    }
}

/// A document made of [`MemoryPage`]s.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    pages: Vec<MemoryPage>,
}

impl MemoryBackend {
    pub fn new(pages: Vec<MemoryPage>) -> Self {
        Self { pages }
    }

    /// Append a page.
    pub fn push(&mut self, page: MemoryPage) {
        self.pages.push(page);
    }
}

impl PdfBackend for MemoryBackend {
    type Page = MemoryPage;

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn load_page(&self, page_index: usize) -> Result<MemoryPage> {
        self.pages
            .get(page_index)
            .cloned()
            .ok_or(Error::PageOutOfRange(page_index, self.pages.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    #[test]
    fn test_lists_are_handed_over_once() {
        let mut page = MemoryPage::new(1000.0)
            .with_block(RawBlock::new(BoundingBox::new(0.0, 100.0, 50.0, 120.0), "x"))
            .with_image(RawImage::new(BoundingBox::default()));

        assert_eq!(page.text_blocks().len(), 1);
        assert!(page.text_blocks().is_empty());
        assert_eq!(page.images().len(), 1);
        assert!(page.tables().is_empty());
    }

    #[test]
    fn test_load_page_out_of_range() {
        let backend = MemoryBackend::new(vec![MemoryPage::new(792.0)]);
        assert!(backend.load_page(0).is_ok());
        assert!(matches!(
            backend.load_page(1),
            Err(Error::PageOutOfRange(1, 1))
        ));
    }
}
