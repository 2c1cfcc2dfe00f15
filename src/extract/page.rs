//! Per-page extraction.

use crate::model::{ImageRecord, PageContent, TableRecord};
use crate::parser::RawPage;

use super::associate::SpatialAssociator;
use super::filter::PageContentFilter;
use super::options::{BottomOrder, ExtractMode, ExtractOptions};

/// Turns one raw page into paragraphs plus described images and tables.
#[derive(Debug, Clone, Copy)]
pub struct PageExtractor {
    filter: PageContentFilter,
    bottom_order: BottomOrder,
    extract_mode: ExtractMode,
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self::new(&ExtractOptions::default())
    }
}

impl PageExtractor {
    /// Create a page extractor from extract options.
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            filter: PageContentFilter::new(options.margin_ratio),
            bottom_order: options.bottom_order,
            extract_mode: options.extract_mode,
        }
    }

    /// Extract the page at `page_index`.
    ///
    /// Each raw list is taken from the page, turned into records and dropped
    /// before the next one is requested.
    pub fn extract<P: RawPage>(&self, mut page: P, page_index: usize) -> PageContent {
        let height = page.height();
        let mut content = PageContent::new(page_index, height);

        content.texts = self.filter.filter(page.text_blocks(), height, page_index);

        if self.extract_mode == ExtractMode::TextOnly {
            return content;
        }

        let associator = SpatialAssociator::new(&content.texts, self.bottom_order);
        let describe = |top: f32| associator.locate(top).and_then(|i| content.texts.get(i));

        let images: Vec<ImageRecord> = page
            .images()
            .into_iter()
            .enumerate()
            .map(|(i, raw)| ImageRecord::new(i, page_index, raw.bbox, describe(raw.top())))
            .collect();

        let tables: Vec<TableRecord> = page
            .tables()
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                let (bbox, top) = (raw.bbox, raw.top());
                TableRecord::new(raw.extract(), i, page_index, bbox, describe(top))
            })
            .collect();

        if associator.is_empty() && !(images.is_empty() && tables.is_empty()) {
            log::warn!(
                "Page {} has {} images and {} tables but no body text",
                page_index,
                images.len(),
                tables.len()
            );
        }

        content.images = images;
        content.tables = tables;
        content
    }
}
